use super::*;
use crate::config::Config;

#[test]
fn ignored_repo_prints_nothing() {
    let ctx = RepoTestContext::setup_clone();
    ctx.write("untracked-file", "");

    let mut config = Config::default();
    config.general.ignore_repos = vec![ctx.path().to_path_buf()];

    assert_eq!(ctx.prompt_with(&config), "");
}

#[test]
fn ignored_repo_from_subdirectory() {
    let ctx = RepoTestContext::setup_clone();
    std::fs::create_dir(ctx.dir.child("sub")).unwrap();

    let mut config = Config::default();
    config.general.ignore_repos = vec![ctx.path().to_path_buf()];

    assert_eq!(prompt_at(&ctx.dir.child("sub"), &config), "");
}

#[test]
fn other_repo_ignored() {
    let ctx = RepoTestContext::setup_clone();
    let other = RepoTestContext::setup_init();

    let mut config = Config::default();
    config.general.ignore_repos = vec![other.path().to_path_buf()];

    insta::assert_snapshot!(ctx.prompt_with(&config), @"main");
}

#[test]
fn custom_symbols() {
    let ctx = RepoTestContext::setup_clone();
    commit(ctx.path(), "local-file", "local");
    ctx.write("untracked-file", "");

    let mut config = Config::default();
    config.symbols.ahead = "^".to_string();
    config.symbols.untracked = "?".to_string();
    config.symbols.separator = "|".to_string();

    insta::assert_snapshot!(ctx.prompt_with(&config), @"main|1^|1?");
}
