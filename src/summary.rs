use serde::Deserialize;
use strum::{Display, EnumIter, EnumString};

use crate::{
    Res,
    git::{
        Backend, Head,
        divergence::{Divergence, WalkLimits, divergence},
        status::{StatusCounts, classify},
    },
};

/// Names accepted by `disable_stats`, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Category {
    Ahead,
    Behind,
    Staged,
    NotStaged,
    Untracked,
    Conflicted,
    Stashed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepoStatusSummary {
    pub ahead: usize,
    pub behind: usize,
    pub staged: usize,
    pub not_staged: usize,
    pub untracked: usize,
    pub conflicted: usize,
    pub stashed: usize,
}

impl RepoStatusSummary {
    pub fn dirty(&self) -> bool {
        self.untracked + self.not_staged + self.staged + self.conflicted > 0
    }

    pub fn has_info(&self) -> bool {
        self.dirty() || self.ahead + self.behind + self.stashed > 0
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Ahead => self.ahead,
            Category::Behind => self.behind,
            Category::Staged => self.staged,
            Category::NotStaged => self.not_staged,
            Category::Untracked => self.untracked,
            Category::Conflicted => self.conflicted,
            Category::Stashed => self.stashed,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut usize {
        match category {
            Category::Ahead => &mut self.ahead,
            Category::Behind => &mut self.behind,
            Category::Staged => &mut self.staged,
            Category::NotStaged => &mut self.not_staged,
            Category::Untracked => &mut self.untracked,
            Category::Conflicted => &mut self.conflicted,
            Category::Stashed => &mut self.stashed,
        }
    }

    /// Zeroes the given categories. Applied before `dirty` or `has_info` are
    /// read, so hidden categories never count.
    pub fn disable(&mut self, categories: &[Category]) {
        for &category in categories {
            *self.get_mut(category) = 0;
        }
    }

    fn set_counts(&mut self, counts: StatusCounts) {
        self.staged = counts.staged;
        self.not_staged = counts.not_staged;
        self.untracked = counts.untracked;
        self.conflicted = counts.conflicted;
    }

    fn set_divergence(&mut self, divergence: Divergence) {
        self.ahead = divergence.ahead;
        self.behind = divergence.behind;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStatus {
    pub head: Head,
    pub summary: RepoStatusSummary,
}

/// Reads everything the prompt shows from `backend`. Lookups for disabled
/// categories are skipped entirely. Divergence and stash failures degrade to
/// zero instead of failing the prompt.
pub fn collect(
    backend: &dyn Backend,
    disabled: &[Category],
    limits: &WalkLimits,
) -> Res<RepoStatus> {
    let enabled = |category: Category| !disabled.contains(&category);
    let head = backend.head()?;
    let mut summary = RepoStatusSummary::default();

    if [
        Category::Staged,
        Category::NotStaged,
        Category::Untracked,
        Category::Conflicted,
    ]
    .into_iter()
    .any(enabled)
    {
        log::debug!("Reading status");
        summary.set_counts(classify(&backend.change_records()?));
    }

    if enabled(Category::Ahead) || enabled(Category::Behind) {
        log::debug!("Computing ahead/behind");
        summary.set_divergence(ahead_behind(backend, &head, limits));
    }

    if enabled(Category::Stashed) {
        summary.stashed = backend.stash_count().unwrap_or_else(|e| {
            log::warn!("Couldn't count stash entries: {}", e);
            0
        });
    }

    summary.disable(disabled);

    Ok(RepoStatus { head, summary })
}

fn ahead_behind(backend: &dyn Backend, head: &Head, limits: &WalkLimits) -> Divergence {
    let (Some(_), Some(local)) = (&head.branch, &head.commit) else {
        return Divergence::default();
    };

    let upstream = match backend.upstream_commit() {
        Ok(Some(upstream)) => upstream,
        Ok(None) => return Divergence::default(),
        Err(e) => {
            log::warn!("Couldn't read upstream: {}", e);
            return Divergence::default();
        }
    };

    divergence(local, &upstream, |commit| backend.history_of(commit), limits).unwrap_or_else(
        |e| {
            log::warn!("Couldn't walk history: {}", e);
            Divergence::default()
        },
    )
}
