use crate::Res;
use git2::{Config, Repository, StatusOptions};

const SHOW_UNTRACKED: &str = "status.showUntrackedFiles";

/// Mirrors what `git status --porcelain` lists, honouring
/// `status.showUntrackedFiles`.
pub(crate) fn status(repo: &Repository) -> Res<StatusOptions> {
    let mut opts = StatusOptions::new();
    let config = repo.config()?;

    opts.include_untracked(show_untracked(&config))
        .recurse_untracked_dirs(config.get_string(SHOW_UNTRACKED).is_ok_and(|mode| mode == "all"))
        .include_ignored(false)
        .renames_head_to_index(true);

    Ok(opts)
}

/// `no` or any false boolean spelling hides untracked files. `normal`, `all`
/// and true booleans show them.
fn show_untracked(config: &Config) -> bool {
    config
        .get_bool(SHOW_UNTRACKED)
        .or_else(|_| config.get_string(SHOW_UNTRACKED).map(|mode| mode != "no"))
        .unwrap_or(true)
}
