use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use git2::{Branch, ErrorCode, Index, IndexConflict, Repository, Sort};

use super::{Backend, CommitId, Head, History, status::ChangeRecord};
use crate::{Res, error::Error, git2_opts};

pub struct Git2Backend {
    repo: Repository,
}

impl Git2Backend {
    pub fn discover(path: &Path) -> Res<Option<Self>> {
        match Repository::discover(path) {
            Ok(repo) if repo.is_bare() => Ok(None),
            Ok(repo) => Ok(Some(Self { repo })),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(Error::OpenRepo(e).into()),
        }
    }
}

/// `GIT_INDEX_ENTRY_INTENT_TO_ADD`, set on entries added with `git add -N`.
const INTENT_TO_ADD: u16 = 1 << 13;

/// Porcelain codes of unmerged paths, keyed by path.
fn conflict_codes(index: &Index) -> Res<HashMap<PathBuf, [char; 2]>> {
    let mut codes = HashMap::new();

    if !index.has_conflicts() {
        return Ok(codes);
    }

    for conflict in index.conflicts().map_err(Error::ReadConflicts)? {
        let conflict = conflict.map_err(Error::ReadConflicts)?;
        let Some(entry) = [&conflict.our, &conflict.their, &conflict.ancestor]
            .into_iter()
            .flatten()
            .next()
        else {
            continue;
        };

        codes.insert(bytes_to_path(&entry.path), unmerged_code(&conflict));
    }

    Ok(codes)
}

impl Backend for Git2Backend {
    fn root(&self) -> Res<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::NoRepoWorkdir.into())
    }

    fn head(&self) -> Res<Head> {
        match self.repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit().map_err(Error::GetHead)?;
                let branch = if head.is_branch() {
                    Some(
                        String::from_utf8(head.shorthand_bytes().to_vec())
                            .map_err(Error::BranchNameUtf8)?,
                    )
                } else {
                    None
                };

                Ok(Head {
                    branch,
                    commit: Some(commit.id().into()),
                })
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD").map_err(Error::GetHead)?;
                let branch = head
                    .symbolic_target_bytes()
                    .map(|target| target.strip_prefix(b"refs/heads/").unwrap_or(target))
                    .map(|name| String::from_utf8(name.to_vec()))
                    .transpose()
                    .map_err(Error::BranchNameUtf8)?;

                Ok(Head {
                    branch,
                    commit: None,
                })
            }
            Err(e) => Err(Error::GetHead(e).into()),
        }
    }

    fn upstream_commit(&self) -> Res<Option<CommitId>> {
        let head = match self.repo.head() {
            Ok(head) if head.is_branch() => head,
            _ => return Ok(None),
        };

        match Branch::wrap(head).upstream() {
            Ok(upstream) => {
                let commit = upstream
                    .get()
                    .peel_to_commit()
                    .map_err(Error::GetUpstream)?;
                Ok(Some(commit.id().into()))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(Error::GetUpstream(e).into()),
        }
    }

    fn change_records(&self) -> Res<Vec<ChangeRecord>> {
        let mut opts = git2_opts::status(&self.repo)?;
        let index = self.repo.index().map_err(Error::GitStatus)?;
        let conflicts = conflict_codes(&index)?;
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(Error::GitStatus)?;

        Ok(statuses
            .iter()
            .filter_map(|entry| {
                let path = bytes_to_path(entry.path_bytes());
                let status = entry.status();

                let code = if status.is_conflicted() {
                    conflicts.get(&path).copied().unwrap_or(['U', 'U'])
                } else if is_intent_to_add(&index, &path) {
                    [' ', 'A']
                } else {
                    status_code(status)?
                };

                Some(ChangeRecord::new(code, path))
            })
            .collect())
    }

    fn history_of(&self, commit: &CommitId) -> Res<History<'_>> {
        let oid = git2::Oid::from_str(commit.as_str()).map_err(Error::ReadLog)?;
        let mut revwalk = self.repo.revwalk().map_err(Error::ReadLog)?;
        revwalk.set_sorting(Sort::TOPOLOGICAL).map_err(Error::ReadLog)?;
        revwalk.push(oid).map_err(Error::ReadLog)?;

        Ok(Box::new(revwalk.map(|oid| -> Res<CommitId> {
            Ok(oid.map_err(Error::ReadLog)?.into())
        })))
    }

    fn stash_count(&self) -> Res<usize> {
        match self.repo.reflog("refs/stash") {
            Ok(reflog) => Ok(reflog.len()),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(0),
            Err(e) => Err(Error::StashList(e).into()),
        }
    }
}

fn is_intent_to_add(index: &Index, path: &Path) -> bool {
    index
        .get_path(path, 0)
        .is_some_and(|entry| entry.flags_extended & INTENT_TO_ADD != 0)
}

fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

fn status_code(status: git2::Status) -> Option<[char; 2]> {
    if status.is_wt_new() {
        return Some(['?', '?']);
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };

    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };

    match [index, worktree] {
        [' ', ' '] => None,
        code => Some(code),
    }
}

/// Which stages of an unmerged path exist decides its porcelain code.
fn unmerged_code(conflict: &IndexConflict) -> [char; 2] {
    match (
        conflict.ancestor.is_some(),
        conflict.our.is_some(),
        conflict.their.is_some(),
    ) {
        (true, false, false) => ['D', 'D'],
        (false, true, false) => ['A', 'U'],
        (true, true, false) => ['U', 'D'],
        (false, false, true) => ['U', 'A'],
        (true, false, true) => ['D', 'U'],
        (false, true, true) => ['A', 'A'],
        _ => ['U', 'U'],
    }
}
