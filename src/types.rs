use std::{fmt, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Pixel minimums arrive as signed integers. Anything below zero accepts every
/// size, anything past `u32::MAX` accepts none.
pub fn clamp_px(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Why a post was passed over. None of these stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyDownloaded,
    WidthTooSmall(u32),
    HeightTooSmall(u32),
    Unreadable(String),
    BadStatus(u16),
    NoUrl,
    InvalidId,
}

impl SkipReason {
    pub fn message(&self, post_id: &str) -> String {
        match self {
            SkipReason::AlreadyDownloaded => "Image already downloaded, skipping...".to_string(),
            SkipReason::WidthTooSmall(width) => {
                format!("Image width {width} too small, skipping...")
            }
            SkipReason::HeightTooSmall(height) => {
                format!("Image height {height} too small, skipping...")
            }
            SkipReason::Unreadable(reason) => {
                format!("Could not read image dimensions for {post_id} ({reason}), skipping...")
            }
            SkipReason::BadStatus(status) => {
                format!("Image request for {post_id} returned status {status}, skipping...")
            }
            SkipReason::NoUrl => format!("Post {post_id} has no url, skipping..."),
            SkipReason::InvalidId => {
                format!("Post id {post_id:?} is not a usable file name, skipping...")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Saved(PathBuf),
    Skipped(SkipReason),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &PostOutcome) {
        match outcome {
            PostOutcome::Saved(_) => self.saved += 1,
            PostOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "saved {}, skipped {}, failed {}",
            self.saved, self.skipped, self.failed
        )?;
        if self.interrupted {
            write!(f, " (interrupted)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_messages_name_the_dimension() {
        assert_eq!(
            SkipReason::WidthTooSmall(1024).message("abc"),
            "Image width 1024 too small, skipping..."
        );
        assert_eq!(
            SkipReason::HeightTooSmall(768).message("abc"),
            "Image height 768 too small, skipping..."
        );
    }

    #[test]
    fn test_clamp_px() {
        assert_eq!(clamp_px(1920), 1920);
        assert_eq!(clamp_px(-1), 0);
        assert_eq!(clamp_px(i64::MIN), 0);
        assert_eq!(clamp_px(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_run_summary() {
        let mut summary = RunSummary::default();
        summary.record(&PostOutcome::Saved(PathBuf::from("/tmp/a.jpg")));
        summary.record(&PostOutcome::Skipped(SkipReason::AlreadyDownloaded));
        summary.record(&PostOutcome::Skipped(SkipReason::NoUrl));
        assert_eq!(summary.saved, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.to_string(), "saved 1, skipped 2, failed 0");

        summary.interrupted = true;
        assert_eq!(summary.to_string(), "saved 1, skipped 2, failed 0 (interrupted)");
    }
}
