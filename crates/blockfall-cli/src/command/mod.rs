use clap::{Parser, Subcommand};

mod high_scores;
mod play;

/// Default location of the high-score file.
pub(crate) const DEFAULT_HIGH_SCORES_PATH: &str = "blockfall_highscores.txt";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal (the default)
    Play(#[clap(flatten)] play::PlayArg),
    /// Print the high-score table and exit
    HighScores(#[clap(flatten)] high_scores::HighScoresArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(play::PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::HighScores(arg) => high_scores::run(&arg),
    }
    Ok(())
}
