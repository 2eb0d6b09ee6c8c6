use std::path::PathBuf;

use blockfall_engine::PieceSeed;

use crate::{command::DEFAULT_HIGH_SCORES_PATH, high_score::HighScoreList, tui::Tui};

mod app;
mod screen;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (16 hex digits); random if omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Path of the high-score file
    #[clap(long, default_value = DEFAULT_HIGH_SCORES_PATH)]
    high_scores: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            high_scores: PathBuf::from(DEFAULT_HIGH_SCORES_PATH),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let high_scores = HighScoreList::load_or_default(&arg.high_scores);
    let mut app = app::PlayApp::new(arg.seed, high_scores);
    Tui::new().run(&mut app)
}
