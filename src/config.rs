use std::{path::PathBuf, time::Duration};

use etcetera::BaseStrategy;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;

use crate::{
    APP_NAME, Res,
    cli::Args,
    error::Error,
    git::{BackendKind, divergence::WalkLimits},
    render::Mode,
    summary::Category,
};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
const ENV_PREFIX: &str = "GITLINE_";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub history: HistoryConfig,
    pub symbols: SymbolConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GeneralConfig {
    pub mode: Mode,
    pub backend: BackendKind,
    pub lite: bool,
    pub disable_stats: Vec<Category>,
    pub ignore_repos: Vec<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HistoryConfig {
    pub max_steps: usize,
    pub timeout_ms: u64,
}

impl HistoryConfig {
    pub fn limits(&self) -> WalkLimits {
        WalkLimits {
            max_steps: self.max_steps,
            timeout: (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms)),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SymbolConfig {
    pub branch: String,
    pub detached: String,
    pub ahead: String,
    pub behind: String,
    pub staged: String,
    pub not_staged: String,
    pub untracked: String,
    pub conflicted: String,
    pub stashed: String,
    pub separator: String,
}

impl SymbolConfig {
    pub fn category(&self, category: Category) -> &str {
        match category {
            Category::Ahead => &self.ahead,
            Category::Behind => &self.behind,
            Category::Staged => &self.staged,
            Category::NotStaged => &self.not_staged,
            Category::Untracked => &self.untracked,
            Category::Conflicted => &self.conflicted,
            Category::Stashed => &self.stashed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Figment::from(Toml::string(DEFAULT_CONFIG))
            .extract()
            .expect("Failed to parse default_config.toml")
    }
}

impl Config {
    /// Command line flags take precedence over every config layer. List flags
    /// add to the configured lists.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode {
            self.general.mode = mode;
        }
        if let Some(backend) = args.backend {
            self.general.backend = backend;
        }
        if args.lite {
            self.general.lite = true;
        }

        self.general
            .disable_stats
            .extend(args.disable_stats.iter().copied());
        self.general
            .ignore_repos
            .extend(args.ignore_repos.iter().cloned());
    }
}

/// Embedded defaults, then the config file, then `GITLINE_*` environment
/// variables (`__` separates nested keys, e.g. `GITLINE_GENERAL__MODE`).
pub fn init_config(path: Option<PathBuf>) -> Res<Config> {
    let config_path = match path {
        Some(path) => path,
        None => config_path()?,
    };

    log::debug!("Loading config file at {:?}", config_path);

    let config = Figment::new()
        .merge(Toml::string(DEFAULT_CONFIG))
        .merge(Toml::file(config_path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
        .map_err(Error::Config)?;

    Ok(config)
}

pub fn config_path() -> Res<PathBuf> {
    Ok(etcetera::choose_base_strategy()
        .map_err(|_| Error::NoConfigDir)?
        .config_dir()
        .join(APP_NAME)
        .join("config.toml"))
}
