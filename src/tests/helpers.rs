use std::path::Path;

use pretty_assertions::assert_eq;

use crate::{
    config::Config,
    git::{BackendKind, cli::GitEnv},
};

mod repo;

pub use repo::{RepoTestContext, commit};

/// The `git` the cli backend spawns gets a cleared environment, so global and
/// system config are switched off the same way `set_env_vars` does for the
/// test process.
pub fn git_env() -> GitEnv {
    GitEnv::from_process()
        .with_var("GIT_CONFIG_GLOBAL", "/dev/null")
        .with_var("GIT_CONFIG_SYSTEM", "/dev/null")
}

/// Renders the prompt for `path` with each backend and checks they agree.
/// The history deadline is switched off so a slow machine can't truncate
/// counts.
pub fn prompt_at(path: &Path, config: &Config) -> String {
    let env = git_env();
    let [libgit2, cli] = [BackendKind::Libgit2, BackendKind::Cli].map(|backend| {
        let mut config = config.clone();
        config.general.backend = backend;
        config.history.timeout_ms = 0;
        crate::prompt(path, &config, &env).unwrap()
    });

    assert_eq!(libgit2, cli, "backends disagree");
    libgit2
}

impl RepoTestContext {
    pub fn prompt(&self) -> String {
        self.prompt_with(&Config::default())
    }

    pub fn prompt_with(&self, config: &Config) -> String {
        prompt_at(self.path(), config)
    }
}

/// Porcelain codes each backend reports for `path`, checked to agree.
pub fn change_codes(path: &Path) -> Vec<String> {
    let env = git_env();
    let [libgit2, cli] = [BackendKind::Libgit2, BackendKind::Cli].map(|backend| {
        let repo = crate::git::open(backend, path, &env).unwrap().unwrap();
        let mut codes = repo
            .change_records()
            .unwrap()
            .into_iter()
            .map(|record| {
                let [index, worktree] = record.status_code;
                format!("{index}{worktree} {}", record.path.display())
            })
            .collect::<Vec<_>>();
        codes.sort();
        codes
    });

    assert_eq!(libgit2, cli, "backends disagree");
    libgit2
}
