use std::{env, fs, path::Path, process::Command};

use temp_dir::TempDir;

pub struct RepoTestContext {
    pub dir: TempDir,
    pub remote_dir: TempDir,
}

impl RepoTestContext {
    /// An empty repository on `main` with no commits and no remote.
    pub fn setup_init() -> Self {
        let remote_dir = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();

        set_env_vars();
        run(dir.path(), &["git", "init", "--initial-branch=main"]);
        set_config(dir.path());

        Self { dir, remote_dir }
    }

    /// A clone of a bare remote holding one commit. `main` tracks `origin/main`.
    pub fn setup_clone() -> Self {
        let remote_dir = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();

        set_env_vars();

        run(
            remote_dir.path(),
            &["git", "init", "--bare", "--initial-branch=main"],
        );
        set_config(remote_dir.path());

        clone_and_commit(&remote_dir, "initial-file", "hello");
        clone(&remote_dir, dir.path());

        Self { dir, remote_dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, file_name: &str, contents: &str) {
        fs::write(self.dir.child(file_name), contents).expect("error writing to file");
    }

    pub fn git(&self, args: &[&str]) -> String {
        let cmd = [&["git"], args].concat();
        run(self.dir.path(), &cmd)
    }

    /// Commits `file_name` to the remote through a throwaway clone, then
    /// fetches so the local upstream ref moves.
    pub fn push_from_elsewhere(&self, file_name: &str, contents: &str) {
        clone_and_commit(&self.remote_dir, file_name, contents);
        self.git(&["fetch"]);
    }

    pub fn remove_from_elsewhere(&self, file_name: &str) {
        let other_dir = TempDir::new().unwrap();
        clone(&self.remote_dir, other_dir.path());

        run(other_dir.path(), &["git", "rm", file_name]);
        run(
            other_dir.path(),
            &["git", "commit", "-m", &format!("remove {}", file_name)],
        );
        run(other_dir.path(), &["git", "push", "origin", "HEAD:main"]);
        self.git(&["fetch"]);
    }
}

pub fn set_env_vars() {
    // https://git-scm.com/book/en/v2/Git-Internals-Environment-Variables
    // SAFETY: every test writes the same values.
    unsafe {
        env::set_var("GIT_CONFIG_GLOBAL", "/dev/null");
        env::set_var("GIT_CONFIG_SYSTEM", "/dev/null");
        env::set_var("GIT_AUTHOR_NAME", "Author Name");
        env::set_var("GIT_AUTHOR_EMAIL", "author@email.com");
        env::set_var("GIT_AUTHOR_DATE", "Fri Feb 16 11:11 2024 +0100");
        env::set_var("GIT_COMMITTER_NAME", "Committer Name");
        env::set_var("GIT_COMMITTER_EMAIL", "committer@email.com");
        env::set_var("GIT_COMMITTER_DATE", "Sun Feb 18 14:00 2024 +0100");
        env::set_var("LC_ALL", "C");
    }
}

/// Runs `cmd` in `dir` and returns its stdout. Panics unless it exits cleanly,
/// except for `git merge` which is allowed to stop on conflicts.
pub fn run(dir: &Path, cmd: &[&str]) -> String {
    let output = Command::new(cmd[0])
        .args(&cmd[1..])
        .current_dir(dir)
        .output()
        .unwrap_or_else(|_| panic!("failed to execute {:?}", cmd));

    if !output.status.success() && cmd.get(1) != Some(&"merge") {
        panic!(
            "{:?} failed: {}",
            cmd,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    String::from_utf8(output.stdout).unwrap()
}

fn set_config(path: &Path) {
    run(path, &["git", "config", "user.email", "ci@example.com"]);
    run(path, &["git", "config", "user.name", "CI"]);
}

fn clone(remote_dir: &TempDir, dir: &Path) {
    run(dir, &["git", "clone", remote_dir.path().to_str().unwrap(), "."]);
    set_config(dir);
}

pub fn clone_and_commit(remote_dir: &TempDir, file_name: &str, file_content: &str) {
    let other_dir = TempDir::new().unwrap();
    clone(remote_dir, other_dir.path());

    commit(other_dir.path(), file_name, file_content);
    run(other_dir.path(), &["git", "push", "origin", "HEAD:main"]);
}

pub fn commit(dir: &Path, file_name: &str, contents: &str) {
    let path = dir.join(file_name);
    let message = match path.try_exists() {
        Ok(true) => format!("modify {}", file_name),
        _ => format!("add {}", file_name),
    };
    fs::write(path, contents).expect("error writing to file");
    run(dir, &["git", "add", file_name]);
    run(dir, &["git", "commit", "-m", &message]);
}
