use blockfall_engine::PieceSeed;
use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::screen::PlayScreen,
    high_score::HighScoreList,
    tui::{App, Tui},
};

const TICK_RATE: f64 = 60.0;
const FRAME_RATE: f64 = 30.0;

#[derive(Debug)]
pub(crate) struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub(crate) fn new(seed: Option<PieceSeed>, high_scores: HighScoreList) -> Self {
        Self {
            screen: PlayScreen::new(seed, high_scores),
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(TICK_RATE);
        tui.set_frame_rate(FRAME_RATE);
    }

    fn should_exit(&self) -> bool {
        self.screen.should_exit()
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        self.screen.handle_event(tui.reports_key_release(), &event);
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.screen.update();
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }
}
