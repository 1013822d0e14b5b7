use std::{
    env,
    ffi::{OsStr, OsString},
    io::{self, BufRead, BufReader, Lines},
    iter,
    path::{Path, PathBuf},
    process::{Child, ChildStdout, Command, Stdio},
};

use itertools::Itertools;

use super::{
    Backend, CommitId, Head, History,
    status::{ChangeRecord, parse_porcelain},
};
use crate::{Res, error::Error};

/// Environment handed to every `git` child process. Nothing is inherited from
/// the parent beyond what is captured here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitEnv {
    program: OsString,
    vars: Vec<(OsString, OsString)>,
}

impl GitEnv {
    /// `LANG=C` for stable output, plus the home directory and `PATH` of the
    /// current process.
    pub fn from_process() -> Self {
        let inherited = [home_var(), "PATH"]
            .into_iter()
            .filter_map(|name| env::var_os(name).map(|value| (OsString::from(name), value)));

        Self {
            program: "git".into(),
            vars: iter::once(("LANG".into(), "C".into()))
                .chain(inherited)
                .collect(),
        }
    }

    pub fn with_var(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        let key = key.into();
        self.vars.retain(|(k, _)| *k != key);
        self.vars.push((key, value.into()));
        self
    }

    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn var(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars
            .iter()
            .find(|(k, _)| k == key.as_ref())
            .map(|(_, v)| v.as_os_str())
    }

    fn command(&self, dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            .env_clear()
            .envs(self.vars.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null());
        cmd
    }
}

fn home_var() -> &'static str {
    if cfg!(windows) { "USERPROFILE" } else { "HOME" }
}

fn command_args(cmd: &Command) -> String {
    iter::once(cmd.get_program().to_string_lossy())
        .chain(cmd.get_args().map(|arg| arg.to_string_lossy()))
        .join(" ")
}

/// Reads the repository by running the `git` binary.
pub struct CliBackend {
    root: PathBuf,
    env: GitEnv,
}

impl CliBackend {
    pub fn discover(path: &Path, env: &GitEnv) -> Res<Option<Self>> {
        let output = env
            .command(path, &["rev-parse", "--show-toplevel"])
            .output()
            .map_err(Error::SpawnCmd)?;

        if !output.status.success() {
            return Ok(None);
        }

        let root = String::from_utf8(output.stdout).map_err(Error::CmdOutputUtf8)?;

        Ok(Some(Self {
            root: PathBuf::from(root.trim_end()),
            env: env.clone(),
        }))
    }

    /// Stdout of a git command, or `None` if it exited unsuccessfully.
    fn output(&self, args: &[&str]) -> Res<Option<String>> {
        let mut cmd = self.env.command(&self.root, args);
        let output = cmd.output().map_err(Error::SpawnCmd)?;

        if !output.status.success() {
            log::debug!(
                "'{}' exited with {:?}",
                command_args(&cmd),
                output.status.code()
            );
            return Ok(None);
        }

        Ok(Some(
            String::from_utf8(output.stdout).map_err(Error::CmdOutputUtf8)?,
        ))
    }

    fn first_line(&self, args: &[&str]) -> Res<Option<String>> {
        Ok(self
            .output(args)?
            .and_then(|out| out.lines().next().map(str::to_string))
            .filter(|line| !line.is_empty()))
    }
}

impl Backend for CliBackend {
    fn root(&self) -> Res<PathBuf> {
        Ok(self.root.clone())
    }

    fn head(&self) -> Res<Head> {
        let branch = self.first_line(&["symbolic-ref", "--quiet", "--short", "HEAD"])?;
        let commit = self
            .first_line(&["rev-parse", "--verify", "--quiet", "HEAD^{commit}"])?
            .map(CommitId::new);

        Ok(Head { branch, commit })
    }

    fn upstream_commit(&self) -> Res<Option<CommitId>> {
        if self
            .first_line(&["symbolic-ref", "--quiet", "HEAD"])?
            .is_none()
        {
            return Ok(None);
        }

        Ok(self
            .first_line(&["rev-parse", "--verify", "--quiet", "@{upstream}^{commit}"])?
            .map(CommitId::new))
    }

    fn change_records(&self) -> Res<Vec<ChangeRecord>> {
        let args = ["--no-optional-locks", "status", "--porcelain"];
        let out = self.output(&args)?.ok_or_else(|| {
            Error::CmdBadExit(command_args(&self.env.command(&self.root, &args)), None)
        })?;

        Ok(parse_porcelain(&out))
    }

    fn history_of(&self, commit: &CommitId) -> Res<History<'_>> {
        let cmd = self
            .env
            .command(&self.root, &["rev-list", "--topo-order", commit.as_str()]);

        Ok(Box::new(RevList::spawn(cmd)?))
    }

    fn stash_count(&self) -> Res<usize> {
        Ok(self
            .output(&["rev-list", "--walk-reflogs", "refs/stash"])?
            .map(|out| out.lines().count())
            .unwrap_or(0))
    }
}

/// Lazily streamed `git rev-list`. Dropping it before the end kills the child.
struct RevList {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
    args: String,
    finished: bool,
}

impl RevList {
    fn spawn(mut cmd: Command) -> Res<Self> {
        let args = command_args(&cmd);
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(Error::SpawnCmd)?;

        let stdout = child.stdout.take().ok_or_else(|| {
            Error::CouldntReadCmdOutput(io::Error::other("stdout was not captured"))
        })?;

        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
            args,
            finished: false,
        })
    }
}

impl Iterator for RevList {
    type Item = Res<CommitId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.lines.next() {
            Some(Ok(line)) => Some(Ok(CommitId::new(line.trim()))),
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(Error::CouldntReadCmdOutput(e).into()))
            }
            None => {
                self.finished = true;
                match self.child.wait() {
                    Ok(status) if status.success() => None,
                    Ok(status) => {
                        Some(Err(Error::CmdBadExit(self.args.clone(), status.code()).into()))
                    }
                    Err(e) => Some(Err(Error::CouldntReadCmdOutput(e).into())),
                }
            }
        }
    }
}

impl Drop for RevList {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_is_explicit() {
        let env = GitEnv::from_process().with_var("GIT_CONFIG_GLOBAL", "/dev/null");

        assert_eq!(env.var("LANG"), Some(OsStr::new("C")));
        assert_eq!(env.var("GIT_CONFIG_GLOBAL"), Some(OsStr::new("/dev/null")));
        assert_eq!(env.var("GIT_DIR"), None);
    }

    #[test]
    fn with_var_replaces() {
        let env = GitEnv::from_process().with_var("LANG", "en_US.UTF-8");

        assert_eq!(env.var("LANG"), Some(OsStr::new("en_US.UTF-8")));
        assert_eq!(env.vars.iter().filter(|(k, _)| k == "LANG").count(), 1);
    }

    #[test]
    fn missing_program_is_an_error() {
        let env = GitEnv::from_process().with_program("definitely-not-a-git-binary");
        assert!(CliBackend::discover(Path::new("."), &env).is_err());
    }
}
