use std::{path::PathBuf, sync::LazyLock};

use regex::Regex;

/// One entry of `git status --porcelain`: index code, worktree code and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub status_code: [char; 2],
    pub path: PathBuf,
}

impl ChangeRecord {
    pub fn new(status_code: [char; 2], path: impl Into<PathBuf>) -> Self {
        Self {
            status_code,
            path: path.into(),
        }
    }

    pub fn is_untracked(&self) -> bool {
        self.status_code == ['?', '?']
    }

    pub fn is_unmerged(&self) -> bool {
        matches!(
            self.status_code,
            ['D', 'D'] | ['A', 'U'] | ['U', 'D'] | ['U', 'A'] | ['D', 'U'] | ['A', 'A'] | ['U', 'U']
        )
    }

    pub fn is_staged(&self) -> bool {
        self.status_code[0] != ' '
    }

    pub fn is_unstaged(&self) -> bool {
        self.status_code[1] != ' '
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub staged: usize,
    pub not_staged: usize,
    pub untracked: usize,
    pub conflicted: usize,
}

/// Sorts change records into disjoint buckets. Unmerged pairs are checked
/// before the per-column test since their codes are never spaces. A record
/// that is neither untracked nor unmerged may count as both staged and
/// not staged.
pub fn classify<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> StatusCounts {
    let mut counts = StatusCounts::default();

    for record in records {
        if record.is_untracked() {
            counts.untracked += 1;
        } else if record.is_unmerged() {
            counts.conflicted += 1;
        } else {
            if record.is_staged() {
                counts.staged += 1;
            }
            if record.is_unstaged() {
                counts.not_staged += 1;
            }
        }
    }

    counts
}

static FILE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<code>[^\n]{2}) (?:(?<orig_path>.+?) -> )?(?<path>.+)$")
        .expect("valid status line regex")
});

/// Parses `git status --porcelain` output. The `## ` branch header and any
/// line without a two character code and a path are skipped.
pub fn parse_porcelain(input: &str) -> Vec<ChangeRecord> {
    input
        .lines()
        .filter(|line| !line.starts_with("## "))
        .filter_map(|line| {
            let captures = FILE_REGEX.captures(line)?;
            let mut code = captures.name("code")?.as_str().chars();
            let status_code = [code.next()?, code.next()?];

            if status_code == [' ', ' '] {
                return None;
            }

            Some(ChangeRecord::new(
                status_code,
                unquote(captures.name("path")?.as_str()),
            ))
        })
        .collect()
}

fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(path)
}
