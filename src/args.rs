use crate::types::clamp_px;
use getopts::Options;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgsError {
    #[error(transparent)]
    Getopts(#[from] getopts::Fail),
    #[error("invalid value {value:?} for -{flag}: expected an integer")]
    InvalidNumber { flag: &'static str, value: String },
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),
}

/// Flags as given on the command line. Anything left `None` falls back to the
/// config file and then to the built-in defaults.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub subreddit: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub dest: Option<PathBuf>,
    pub keep_going: bool,
    pub help: bool,
}

fn options() -> Options {
    let mut opts = Options::new();
    // Accept `-subreddit foo` as well as `--subreddit foo`.
    opts.long_only(true);
    opts.optopt(
        "",
        "subreddit",
        "The subreddit you wish to target for pulling images from (default: EarthPorn)",
        "NAME",
    );
    opts.optopt("", "sort", "Sort for the chosen subreddit (default: new)", "SORT");
    opts.optopt("", "limit", "Limit for the chosen subreddit (default: 100)", "N");
    opts.optopt(
        "",
        "width",
        "Image width minimum for downloading, anything smaller will be rejected (default: 2560)",
        "PX",
    );
    opts.optopt(
        "",
        "height",
        "Image height minimum for downloading, anything smaller will be rejected (default: 1440)",
        "PX",
    );
    opts.optopt(
        "",
        "dest",
        "The folder path you wish to save images to (default: ~/Pictures)",
        "DIR",
    );
    opts.optflag(
        "",
        "keep-going",
        "Skip posts whose image cannot be fetched or written instead of stopping",
    );
    opts.optflag("h", "help", "Print this help");
    opts
}

pub fn usage(program: &str) -> String {
    let brief = format!("Usage: {program} [options]");
    options().usage(&brief)
}

fn parse_number(m: &getopts::Matches, flag: &'static str) -> Result<Option<u32>, ArgsError> {
    m.opt_str(flag)
        .map(|value| {
            value
                .trim()
                .parse::<i64>()
                .map(clamp_px)
                .map_err(|_| ArgsError::InvalidNumber { flag, value })
        })
        .transpose()
}

/// Parses arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator,
    I::Item: AsRef<std::ffi::OsStr>,
{
    let m = options().parse(args)?;
    if !m.free.is_empty() {
        return Err(ArgsError::UnexpectedArgument(m.free[0].clone()));
    }

    Ok(Args {
        subreddit: m.opt_str("subreddit"),
        sort: m.opt_str("sort"),
        limit: m.opt_str("limit"),
        width: parse_number(&m, "width")?,
        height: parse_number(&m, "height")?,
        dest: m.opt_str("dest").map(PathBuf::from),
        keep_going: m.opt_present("keep-going"),
        help: m.opt_present("help"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args() {
        assert_eq!(parse_args(Vec::<String>::new()).unwrap(), Args::default());
    }

    #[test]
    fn test_single_dash_long_flags() {
        let args = parse_args([
            "-subreddit",
            "wallpapers",
            "-sort",
            "top",
            "-limit",
            "2",
            "-width",
            "1920",
            "-height",
            "1080",
            "-dest",
            "/tmp/pics",
            "-keep-going",
        ])
        .unwrap();

        assert_eq!(
            args,
            Args {
                subreddit: Some("wallpapers".into()),
                sort: Some("top".into()),
                limit: Some("2".into()),
                width: Some(1920),
                height: Some(1080),
                dest: Some(PathBuf::from("/tmp/pics")),
                keep_going: true,
                help: false,
            }
        );
    }

    #[test]
    fn test_double_dash_and_help() {
        let args = parse_args(["--sort", "hot", "-h"]).unwrap();
        assert_eq!(args.sort.as_deref(), Some("hot"));
        assert!(args.help);
    }

    #[test]
    fn test_invalid_width() {
        match parse_args(["-width", "wide"]) {
            Err(ArgsError::InvalidNumber { flag, value }) => {
                assert_eq!(flag, "width");
                assert_eq!(value, "wide");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
        assert!(parse_args(["-height", "1.5"]).is_err());
    }

    #[test]
    fn test_negative_minimum_accepts_everything() {
        let args = parse_args(["-width", "-1", "-height", "-5"]).unwrap();
        assert_eq!(args.width, Some(0));
        assert_eq!(args.height, Some(0));
    }

    #[test]
    fn test_unknown_flag_and_stray_args() {
        assert!(matches!(
            parse_args(["-bogus", "1"]),
            Err(ArgsError::Getopts(_))
        ));
        match parse_args(["-sort", "top", "EarthPorn"]) {
            Err(err @ ArgsError::UnexpectedArgument(_)) => {
                assert_eq!(err.to_string(), r#"unexpected argument "EarthPorn""#);
            }
            other => panic!("expected unexpected argument, got {other:?}"),
        }
    }

    #[test]
    fn test_usage_lists_flags() {
        let usage = usage("redwall");
        assert!(usage.starts_with("Usage: redwall [options]"));
        assert!(usage.contains("subreddit"));
        assert!(usage.contains("keep-going"));
    }
}
