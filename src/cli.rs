use std::path::PathBuf;

use clap::Parser;

use crate::{git::BackendKind, render::Mode, summary::Category};

#[derive(Default, Debug, Parser)]
#[command(name = crate::APP_NAME)]
#[command(about = "Print a git status segment for a shell prompt")]
pub struct Args {
    /// Directory to inspect instead of the current one
    #[clap(short = 'C', long)]
    pub cwd: Option<PathBuf>,
    #[clap(long, value_enum)]
    pub mode: Option<Mode>,
    /// How to read the repository
    #[clap(long, value_enum)]
    pub backend: Option<BackendKind>,
    /// Only show the branch
    #[clap(long, action)]
    pub lite: bool,
    /// Comma separated categories to hide: ahead, behind, staged, notStaged,
    /// untracked, conflicted, stashed
    #[clap(long, value_delimiter = ',')]
    pub disable_stats: Vec<Category>,
    /// Comma separated repository roots where nothing is shown
    #[clap(long, value_delimiter = ',')]
    pub ignore_repos: Vec<PathBuf>,
    /// Config file to use instead of the default location
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Enable logging to 'gitline.log'
    #[clap(long, action)]
    pub log: bool,
    /// Print version
    #[clap(long, action)]
    pub version: bool,
}
