use crate::{
    imagesize,
    reddit::Post,
    types::{Dimensions, PostOutcome, SkipReason},
};
use log::*;
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("failed to create destination {path:?}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },
    #[error("error writing to file {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Creates the destination directory, owner-only on unix, if it does not exist yet.
pub fn prepare_dest(dest: &Path) -> Result<(), DownloadError> {
    if dest.exists() {
        return Ok(());
    }
    info!("creating destination {}", dest.to_string_lossy());
    create_dir(dest).map_err(|source| DownloadError::CreateDir {
        path: dest.to_owned(),
        source,
    })
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// `<dest>/<id>.jpg`, whatever the real image format is. Returns `None` for ids
/// that would not name a plain file inside `dest`.
pub fn target_path(dest: &Path, post: &Post) -> Option<PathBuf> {
    let stem = post.file_stem();
    if stem.is_empty() || stem == "." || stem == ".." || stem.contains(['/', '\\']) {
        return None;
    }
    Some(dest.join(format!("{stem}.jpg")))
}

/// Filters an image size against the minimums. Width is checked first.
pub fn check_resolution(dims: Dimensions, min: Dimensions) -> Result<(), SkipReason> {
    if dims.width < min.width {
        return Err(SkipReason::WidthTooSmall(dims.width));
    }
    if dims.height < min.height {
        return Err(SkipReason::HeightTooSmall(dims.height));
    }
    Ok(())
}

/// Downloads one post's image into `dest` if it is large enough and not saved yet.
///
/// Skips are returned as [`PostOutcome::Skipped`]. Only transport and file
/// errors come back as `Err`, and the caller decides whether those end the run.
pub async fn process_post(
    client: &reqwest::Client,
    post: &Post,
    dest: &Path,
    min: Dimensions,
) -> Result<PostOutcome, DownloadError> {
    let path = match target_path(dest, post) {
        Some(path) => path,
        None => return Ok(PostOutcome::Skipped(SkipReason::InvalidId)),
    };

    if path.exists() {
        debug!("{} exists, skipping", path.to_string_lossy());
        return Ok(PostOutcome::Skipped(SkipReason::AlreadyDownloaded));
    }

    if post.url.is_empty() {
        return Ok(PostOutcome::Skipped(SkipReason::NoUrl));
    }

    if let Some(preview) = post.preview_dimensions() {
        debug!("post {} reports preview size {preview}", post.id);
    }

    info!("downloading {}", post.url);
    let fetch_err = |source| DownloadError::Fetch {
        url: post.url.clone(),
        source,
    };
    let res = client.get(&post.url).send().await.map_err(fetch_err)?;
    let status = res.status();
    if !status.is_success() {
        warn!("image request for {} returned {status}", post.url);
        return Ok(PostOutcome::Skipped(SkipReason::BadStatus(status.as_u16())));
    }
    let bytes = res.bytes().await.map_err(fetch_err)?;

    let dims = match imagesize::read_dimensions(&bytes) {
        Ok(dims) => dims,
        Err(e) => {
            warn!("could not read size of {}: {e}", post.url);
            return Ok(PostOutcome::Skipped(SkipReason::Unreadable(e.to_string())));
        }
    };
    debug!("read {} as {dims}", post.url);

    if let Err(reason) = check_resolution(dims, min) {
        return Ok(PostOutcome::Skipped(reason));
    }

    save(&path, &bytes)
}

fn save(path: &Path, bytes: &[u8]) -> Result<PostOutcome, DownloadError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(PostOutcome::Skipped(SkipReason::AlreadyDownloaded));
        }
        Err(source) => {
            return Err(DownloadError::Write {
                path: path.to_owned(),
                source,
            })
        }
    };

    if let Err(source) = file.write_all(bytes).and_then(|_| file.flush()) {
        // A partial file would read as "already downloaded" on the next run.
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove partial file {}: {e}", path.to_string_lossy());
        }
        return Err(DownloadError::Write {
            path: path.to_owned(),
            source,
        });
    }

    info!("saved {} bytes to {}", bytes.len(), path.to_string_lossy());
    Ok(PostOutcome::Saved(path.to_owned()))
}
