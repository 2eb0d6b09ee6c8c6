use std::path::PathBuf;

use crate::{command::DEFAULT_HIGH_SCORES_PATH, high_score::HighScoreList};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HighScoresArg {
    /// Path of the high-score file
    #[clap(long, default_value = DEFAULT_HIGH_SCORES_PATH)]
    high_scores: PathBuf,
}

pub(crate) fn run(arg: &HighScoresArg) {
    let list = HighScoreList::load_or_default(&arg.high_scores);
    for (rank, entry) in list.entries().iter().enumerate() {
        println!("{}. {:<3} {:>8}", rank + 1, entry.initials, entry.score);
    }
}
