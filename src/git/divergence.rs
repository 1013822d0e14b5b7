//! Ahead/behind counting between a local branch and its upstream.
//!
//! Both histories are walked in lockstep from their tips. A fast-forward is
//! detected as soon as one walk reaches the other tip, which costs only as many
//! steps as the shorter side. Otherwise both walks run to the end and the fork
//! point is found by matching the two histories from their oldest commits.
//!
//! The histories are assumed to be two chains sharing everything up to a
//! single fork point. Merges that happen after the fork are not accounted
//! for, so counts for such histories may be off. The usual case is a local
//! branch that merged its upstream: the walk can meet the upstream tip before
//! every local commit has been seen, so ahead comes out low.

use std::{
    collections::HashSet,
    hash::Hash,
    time::{Duration, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Lockstep iterations before giving up with a partial count.
    pub max_steps: usize,
    pub timeout: Option<Duration>,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_steps: 4096,
            timeout: Some(Duration::from_millis(200)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Divergence {
    pub ahead: usize,
    pub behind: usize,
    /// Set when a limit cut the walk short. Counts are then lower bounds.
    pub truncated: bool,
}

impl Divergence {
    fn exact(ahead: usize, behind: usize) -> Self {
        Self {
            ahead,
            behind,
            truncated: false,
        }
    }
}

struct Walk<C, I> {
    commits: I,
    seen: Vec<C>,
    done: bool,
}

impl<C, E, I> Walk<C, I>
where
    I: Iterator<Item = Result<C, E>>,
{
    fn new(commits: I) -> Self {
        Self {
            commits,
            seen: vec![],
            done: false,
        }
    }

    fn advance(&mut self) -> Result<Option<&C>, E> {
        if self.done {
            return Ok(None);
        }

        match self.commits.next() {
            Some(commit) => {
                self.seen.push(commit?);
                Ok(self.seen.last())
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/// Counts commits only reachable from `local` (ahead) and only reachable from
/// `upstream` (behind).
///
/// `history_of` must open a fresh walk yielding the given commit followed by
/// its ancestors, newest first, each commit at most once.
pub fn divergence<C, E, I, F>(
    local: &C,
    upstream: &C,
    mut history_of: F,
    limits: &WalkLimits,
) -> Result<Divergence, E>
where
    C: Eq + Hash,
    I: Iterator<Item = Result<C, E>>,
    F: FnMut(&C) -> Result<I, E>,
{
    if local == upstream {
        return Ok(Divergence::default());
    }

    let mut local_walk = Walk::new(history_of(local)?);
    let mut upstream_walk = Walk::new(history_of(upstream)?);
    let deadline = limits.timeout.map(|timeout| Instant::now() + timeout);
    let mut steps = 0;

    while !(local_walk.done && upstream_walk.done) {
        if steps >= limits.max_steps || deadline.is_some_and(|d| Instant::now() >= d) {
            log::debug!(
                "History walk stopped after {} steps ({} local, {} upstream commits)",
                steps,
                local_walk.seen.len(),
                upstream_walk.seen.len()
            );
            return Ok(partial(&local_walk, &upstream_walk));
        }
        steps += 1;

        if local_walk.advance()?.is_some_and(|commit| commit == upstream) {
            return Ok(Divergence::exact(local_walk.seen.len() - 1, 0));
        }

        if upstream_walk.advance()?.is_some_and(|commit| commit == local) {
            return Ok(Divergence::exact(0, upstream_walk.seen.len() - 1));
        }
    }

    Ok(fork_point(&local_walk.seen, &upstream_walk.seen))
}

/// Both walks reached their root commits. Everything in the shared oldest
/// suffix is common history.
fn fork_point<C: PartialEq>(local: &[C], upstream: &[C]) -> Divergence {
    let shared = local
        .iter()
        .rev()
        .zip(upstream.iter().rev())
        .take_while(|(l, u)| l == u)
        .count();

    Divergence::exact(local.len() - shared, upstream.len() - shared)
}

/// Lower bounds for a walk cut short. Commits before the first one both
/// sides have seen are exclusive to their side. Without a shared commit, a
/// side's commits only count once the other side has been walked completely.
fn partial<C: Eq + Hash, I>(local: &Walk<C, I>, upstream: &Walk<C, I>) -> Divergence {
    fn exclusive<C: Eq + Hash, I>(ours: &Walk<C, I>, theirs: &Walk<C, I>) -> usize {
        let theirs_seen = theirs.seen.iter().collect::<HashSet<_>>();

        match ours.seen.iter().position(|commit| theirs_seen.contains(commit)) {
            Some(shared) => shared,
            None if theirs.done => ours.seen.len(),
            None => 0,
        }
    }

    Divergence {
        ahead: exclusive(local, upstream),
        behind: exclusive(upstream, local),
        truncated: true,
    }
}
