pub mod cli;
pub mod config;
pub mod error;
pub mod git;
mod git2_opts;
pub mod render;
pub mod summary;

#[cfg(test)]
mod tests;

use config::Config;
use error::Error;
use git::cli::GitEnv;
use render::Segment;
use std::{
    env,
    error::Error as StdError,
    fs,
    path::{Path, PathBuf},
};
use summary::RepoStatus;

pub const APP_NAME: &str = "gitline";
pub const LOG_FILE_NAME: &str = "gitline.log";

pub type Res<T> = Result<T, Box<dyn StdError>>;

pub fn load_config(args: &cli::Args) -> Res<Config> {
    log::debug!("Initializing config");
    let mut config = config::init_config(args.config.clone())?;
    config.apply_args(args);
    Ok(config)
}

/// The prompt line for the directory given on the command line, or the
/// current directory. Empty outside a repository.
pub fn run(args: &cli::Args, config: &Config) -> Res<String> {
    let cwd = match &args.cwd {
        Some(dir) => dir.clone(),
        None => env::current_dir().map_err(Error::CurrentDir)?,
    };

    prompt(&cwd, config, &GitEnv::from_process())
}

pub fn prompt(cwd: &Path, config: &Config, env: &GitEnv) -> Res<String> {
    Ok(render::render(
        &segments(cwd, config, env)?,
        &config.symbols.separator,
    ))
}

pub fn segments(cwd: &Path, config: &Config, env: &GitEnv) -> Res<Vec<Segment>> {
    let Some(backend) = git::open(config.general.backend, cwd, env)? else {
        log::debug!("No repository at {:?}", cwd);
        return Ok(vec![]);
    };

    let root = backend.root()?;
    if is_ignored(&root, &config.general.ignore_repos) {
        log::debug!("Ignoring repository at {:?}", root);
        return Ok(vec![]);
    }

    let status = if config.general.lite {
        RepoStatus {
            head: backend.head()?,
            summary: Default::default(),
        }
    } else {
        summary::collect(
            backend.as_ref(),
            &config.general.disable_stats,
            &config.history.limits(),
        )?
    };

    log::debug!("{:?}", status);
    Ok(render::segments(&status, config.general.mode, &config.symbols))
}

fn is_ignored(root: &Path, ignore_repos: &[PathBuf]) -> bool {
    let canonical = |path: &Path| fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let root = canonical(root);

    ignore_repos.iter().any(|repo| canonical(repo) == root)
}
