use std::{fmt::Display, io, string};

#[derive(Debug)]
pub enum Error {
    CurrentDir(io::Error),
    OpenRepo(git2::Error),
    NoRepoWorkdir,
    GetHead(git2::Error),
    GetUpstream(git2::Error),
    BranchNameUtf8(string::FromUtf8Error),
    GitStatus(git2::Error),
    ReadConflicts(git2::Error),
    ReadLog(git2::Error),
    StashList(git2::Error),
    Config(Box<figment::Error>),
    NoConfigDir,
    SpawnCmd(io::Error),
    CmdBadExit(String, Option<i32>),
    CouldntReadCmdOutput(io::Error),
    CmdOutputUtf8(string::FromUtf8Error),
    OpenLogFile(io::Error),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::CurrentDir(e) => {
                f.write_fmt(format_args!("Couldn't read current directory: {}", e))
            }
            Error::OpenRepo(e) => match e.code() {
                git2::ErrorCode::NotFound => f.write_str("No .git found in the current directory"),
                _ => f.write_fmt(format_args!("Couldn't open repo: {e:?}")),
            },
            Error::NoRepoWorkdir => f.write_str("No repository working directory"),
            Error::GetHead(e) => f.write_fmt(format_args!("Couldn't get HEAD: {}", e)),
            Error::GetUpstream(e) => {
                f.write_fmt(format_args!("Couldn't get current branch upstream: {}", e))
            }
            Error::BranchNameUtf8(_e) => f.write_str("Branch name is not valid UTF-8"),
            Error::GitStatus(e) => f.write_fmt(format_args!("Git status error: {}", e)),
            Error::ReadConflicts(e) => {
                f.write_fmt(format_args!("Couldn't read index conflicts: {}", e))
            }
            Error::ReadLog(e) => f.write_fmt(format_args!("Couldn't read log: {}", e)),
            Error::StashList(e) => f.write_fmt(format_args!("Couldn't list stash: {}", e)),
            Error::Config(e) => f.write_fmt(format_args!("Configuration error: {}", e)),
            Error::NoConfigDir => f.write_str("Couldn't determine the config directory"),
            Error::SpawnCmd(e) => f.write_fmt(format_args!("Failed to spawn command: {}", e)),
            Error::CmdBadExit(args, code) => f.write_fmt(format_args!(
                "'{}' exited with code: {}",
                args,
                code.map(|c| c.to_string())
                    .unwrap_or_else(|| "".to_string())
            )),
            Error::CouldntReadCmdOutput(e) => {
                f.write_fmt(format_args!("Couldn't read command output: {}", e))
            }
            Error::CmdOutputUtf8(e) => {
                f.write_fmt(format_args!("Command output is not valid UTF-8: {}", e))
            }
            Error::OpenLogFile(e) => f.write_fmt(format_args!("Couldn't open log file: {}", e)),
        }
    }
}
