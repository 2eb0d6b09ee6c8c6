use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

/// Number of entries the table holds.
pub const HIGH_SCORE_COUNT: usize = 5;

const PLACEHOLDER_INITIALS: &str = "---";
const UNNAMED_INITIALS: &str = "???";

/// One line of the high-score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub initials: String,
    pub score: usize,
}

/// The persisted top-5 table, always sorted from highest to lowest.
///
/// Stored as one `initials<TAB>score` line per entry. A missing or
/// malformed file yields zero-score placeholders rather than an error;
/// the file is rewritten in full on every qualifying insert.
#[derive(Debug)]
pub struct HighScoreList {
    path: PathBuf,
    entries: Vec<HighScoreEntry>,
}

impl HighScoreList {
    /// Loads the table from `path`, falling back to placeholders when
    /// the file is missing or does not parse.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        let entries = fs::read_to_string(path)
            .ok()
            .and_then(|text| parse_entries(&text))
            .unwrap_or_else(placeholder_entries);
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Whether `score` beats the lowest entry (strictly).
    #[must_use]
    pub fn is_record(&self, score: usize) -> bool {
        self.entries.last().is_some_and(|entry| score > entry.score)
    }

    /// Inserts a qualifying score, drops the lowest entry, and rewrites
    /// the file. Initials are trimmed; empty initials become "???".
    /// A non-qualifying score changes nothing.
    pub fn add(&mut self, initials: &str, score: usize) -> anyhow::Result<()> {
        let Some(position) = self.entries.iter().position(|entry| score > entry.score) else {
            return Ok(());
        };
        let initials = initials.trim();
        let initials = if initials.is_empty() {
            UNNAMED_INITIALS
        } else {
            initials
        };
        self.entries.insert(
            position,
            HighScoreEntry {
                initials: initials.to_owned(),
                score,
            },
        );
        self.entries.truncate(HIGH_SCORE_COUNT);
        self.save()
    }

    fn save(&self) -> anyhow::Result<()> {
        let text: String = self
            .entries
            .iter()
            .map(|entry| format!("{}\t{}\n", entry.initials, entry.score))
            .collect();
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write high scores to {}", self.path.display()))
    }
}

fn placeholder_entries() -> Vec<HighScoreEntry> {
    (0..HIGH_SCORE_COUNT)
        .map(|_| HighScoreEntry {
            initials: PLACEHOLDER_INITIALS.to_owned(),
            score: 0,
        })
        .collect()
}

/// Parses the stored table. `None` on any malformed line, a wrong entry
/// count, or an out-of-order table (hand-edited files are not trusted).
fn parse_entries(text: &str) -> Option<Vec<HighScoreEntry>> {
    let mut entries = Vec::with_capacity(HIGH_SCORE_COUNT);
    for line in text.lines() {
        let (initials, score) = line.split_once('\t')?;
        let score = score.parse().ok()?;
        entries.push(HighScoreEntry {
            initials: initials.to_owned(),
            score,
        });
    }
    if entries.len() != HIGH_SCORE_COUNT {
        return None;
    }
    if !entries.is_sorted_by(|a, b| a.score >= b.score) {
        return None;
    }
    Some(entries)
}
