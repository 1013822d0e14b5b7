use itertools::Itertools;
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::{
    config::SymbolConfig,
    git::Head,
    summary::{Category, RepoStatus},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Branch followed by a symbol per non-empty category
    Simple,
    /// Branch followed by a count and symbol per non-empty category
    Compact,
    /// Branch and one segment per non-empty category
    #[default]
    Fancy,
}

/// What a segment shows, for a theme to pick colours from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Clean,
    Dirty,
    Stat(Category),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub content: String,
    pub kind: SegmentKind,
}

pub fn branch_label(head: &Head, symbols: &SymbolConfig) -> String {
    let name = match (&head.branch, &head.commit) {
        (Some(branch), _) => branch.clone(),
        (None, Some(commit)) => format!("{} {}", symbols.detached, commit.short()),
        (None, None) => "HEAD".to_string(),
    };

    if symbols.branch.is_empty() {
        name
    } else {
        format!("{} {}", symbols.branch, name)
    }
}

pub fn segments(status: &RepoStatus, mode: Mode, symbols: &SymbolConfig) -> Vec<Segment> {
    let summary = &status.summary;
    let stats = Category::iter()
        .map(|category| (category, summary.get(category), symbols.category(category)))
        .filter(|(_, count, _)| *count > 0)
        .collect::<Vec<_>>();

    let mut branch = Segment {
        name: "git-branch",
        content: branch_label(&status.head, symbols),
        kind: if summary.dirty() {
            SegmentKind::Dirty
        } else {
            SegmentKind::Clean
        },
    };

    match mode {
        Mode::Simple => {
            if summary.has_info() {
                branch.content.push(' ');
                branch
                    .content
                    .extend(stats.iter().map(|(_, _, symbol)| *symbol));
            }
            vec![branch]
        }
        Mode::Compact => {
            for (_, count, symbol) in &stats {
                branch.content.push_str(&format!(" {count}{symbol}"));
            }
            vec![branch]
        }
        Mode::Fancy => std::iter::once(branch)
            .chain(stats.iter().map(|&(category, count, symbol)| Segment {
                name: "git-status",
                content: format!("{count}{symbol}"),
                kind: SegmentKind::Stat(category),
            }))
            .collect(),
    }
}

pub fn render(segments: &[Segment], separator: &str) -> String {
    segments
        .iter()
        .map(|segment| segment.content.as_str())
        .join(separator)
}
