use log::{debug, info};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::{
    args::Args,
    reddit::{APP_USER_AGENT, REDDIT_BASE_URL},
    types::{clamp_px, Dimensions},
    PKG_NAME,
};

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub const DEFAULT_SUBREDDIT: &str = "EarthPorn";
pub const DEFAULT_SORT: &str = "new";
pub const DEFAULT_LIMIT: &str = "100";
pub const DEFAULT_WIDTH: u32 = 2560;
pub const DEFAULT_HEIGHT: u32 = 1440;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not determine home directory, pass -dest")]
    NoHome,
}

/// `limit = 100` and `limit = "100"` are both accepted.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Limit {
    Number(u64),
    Text(String),
}

impl Limit {
    fn into_string(self) -> String {
        match self {
            Limit::Number(n) => n.to_string(),
            Limit::Text(s) => s,
        }
    }
}

/// Optional config file. Every key can be overridden by the matching flag.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub subreddit: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<Limit>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub dest: Option<PathBuf>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    #[serde(default)]
    pub keep_going: bool,
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub subreddit: String,
    pub sort: String,
    pub limit: String,
    pub min: Dimensions,
    pub dest: PathBuf,
    pub base_url: String,
    pub user_agent: String,
    pub keep_going: bool,
}

/// Reads the file named by `CONFIG_PATH`, or the XDG config file if there is
/// one. No file at the default location means an empty config.
pub fn read_config() -> Result<Config, ConfigError> {
    match env::var_os(CONFIG_PATH_ENV) {
        Some(path) => read_config_from(Path::new(&path)),
        None => match default_config_path() {
            Some(path) => read_config_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

fn default_config_path() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(PKG_NAME).ok()?;
    xdg_dirs.find_config_file("config.toml")
}

pub fn read_config_from(path: &Path) -> Result<Config, ConfigError> {
    info!("reading config from {}", path.to_string_lossy());
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

pub fn default_dest() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join("Pictures"))
        .ok_or(ConfigError::NoHome)
}

impl Settings {
    /// Flags win over the config file, which wins over the defaults.
    pub fn resolve(args: Args, config: Config) -> Result<Settings, ConfigError> {
        let dest = match args.dest.or(config.dest) {
            Some(dest) => dest,
            None => default_dest()?,
        };

        Ok(Settings {
            subreddit: args
                .subreddit
                .or(config.subreddit)
                .unwrap_or_else(|| DEFAULT_SUBREDDIT.to_string()),
            sort: args
                .sort
                .or(config.sort)
                .unwrap_or_else(|| DEFAULT_SORT.to_string()),
            limit: args
                .limit
                .or_else(|| config.limit.map(Limit::into_string))
                .unwrap_or_else(|| DEFAULT_LIMIT.to_string()),
            min: Dimensions {
                width: args
                    .width
                    .or(config.width.map(clamp_px))
                    .unwrap_or(DEFAULT_WIDTH),
                height: args
                    .height
                    .or(config.height.map(clamp_px))
                    .unwrap_or(DEFAULT_HEIGHT),
            },
            dest,
            base_url: config
                .base_url
                .unwrap_or_else(|| REDDIT_BASE_URL.to_string()),
            user_agent: config
                .user_agent
                .unwrap_or_else(|| APP_USER_AGENT.to_string()),
            keep_going: args.keep_going || config.keep_going,
        })
    }
}
