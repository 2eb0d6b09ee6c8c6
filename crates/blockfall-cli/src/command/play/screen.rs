use std::time::Instant;

use blockfall_engine::{
    Board, GameEvent, GameSession, InputAction, PieceSeed, RandomPieceSource, SessionState,
};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Widget as _},
};

use crate::{
    high_score::HighScoreList,
    ui::widgets::{BoardDisplay, HighScoresDisplay, PieceDisplay, StatsDisplay, style},
};

const BOARD_ROWS: usize = 20;
const BOARD_COLS: usize = 10;
const MAX_INITIALS_LEN: usize = 3;

/// Popup shown over the board after a game ends.
#[derive(Debug)]
enum GameOverPrompt {
    /// The score qualified; collecting initials for the table.
    EnterInitials { score: usize, initials: String },
    /// Plain game-over notice.
    Finished,
}

#[derive(Debug)]
pub(crate) struct PlayScreen {
    session: GameSession,
    high_scores: HighScoreList,
    prompt: Option<GameOverPrompt>,
    notice: Option<String>,
    last_update: Instant,
    is_exiting: bool,
}

impl PlayScreen {
    pub(crate) fn new(seed: Option<PieceSeed>, high_scores: HighScoreList) -> Self {
        let source = match seed {
            Some(seed) => RandomPieceSource::with_seed(seed),
            None => RandomPieceSource::new(),
        };
        let mut session = GameSession::new(Board::new(BOARD_ROWS, BOARD_COLS, Box::new(source)));
        session.start_new_game();
        Self {
            session,
            high_scores,
            prompt: None,
            notice: None,
            last_update: Instant::now(),
            is_exiting: false,
        }
    }

    pub(crate) fn should_exit(&self) -> bool {
        self.is_exiting
    }

    pub(crate) fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_update);
        self.last_update = now;
        self.session.advance(dt);
        self.process_events();
    }

    fn process_events(&mut self) {
        let events: Vec<GameEvent> = self.session.drain_events().collect();
        for event in events {
            if let GameEvent::GameOver { score } = event {
                self.prompt = Some(if self.high_scores.is_record(score) {
                    GameOverPrompt::EnterInitials {
                        score,
                        initials: String::new(),
                    }
                } else {
                    GameOverPrompt::Finished
                });
            }
        }
    }

    pub(crate) fn handle_event(&mut self, reports_key_release: bool, event: &Event) {
        if let Some(key) = event.as_key_event() {
            if self.prompt.is_some() {
                if key.kind != KeyEventKind::Release {
                    self.handle_prompt_key(key);
                }
            } else {
                self.handle_game_key(reports_key_release, key);
                self.process_events();
            }
        }
    }

    fn handle_game_key(&mut self, reports_key_release: bool, key: KeyEvent) {
        match key.kind {
            KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                KeyCode::Char('n') => {
                    self.notice = None;
                    self.session.start_new_game();
                }
                code => {
                    if let Some(action) = action_for_key(code) {
                        self.session.key_down(action, false);
                        // Without release reporting a press is a tap:
                        // release immediately so the repeat timers never
                        // run away.
                        if !reports_key_release {
                            self.session.key_up(action);
                        }
                    }
                }
            },
            KeyEventKind::Repeat => {
                if let Some(action) = action_for_key(key.code) {
                    self.session.key_down(action, true);
                }
            }
            KeyEventKind::Release => {
                if let Some(action) = action_for_key(key.code) {
                    self.session.key_up(action);
                }
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match &mut self.prompt {
            Some(GameOverPrompt::EnterInitials { score, initials }) => match key.code {
                KeyCode::Enter => {
                    let score = *score;
                    let initials = std::mem::take(initials);
                    if let Err(err) = self.high_scores.add(&initials, score) {
                        self.notice = Some(format!("failed to save high scores: {err:#}"));
                    }
                    self.prompt = Some(GameOverPrompt::Finished);
                }
                KeyCode::Backspace => {
                    initials.pop();
                }
                KeyCode::Char(c) if initials.len() < MAX_INITIALS_LEN && c.is_ascii_alphanumeric() => {
                    initials.push(c.to_ascii_uppercase());
                }
                _ => {}
            },
            Some(GameOverPrompt::Finished) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                KeyCode::Char('n') | KeyCode::Enter => {
                    self.prompt = None;
                    self.notice = None;
                    self.session.start_new_game();
                }
                _ => {}
            },
            None => {}
        }
    }

    fn border_style(&self) -> Style {
        match self.session.state() {
            SessionState::NotStarted | SessionState::Running => style::RUNNING_BORDER,
            SessionState::Paused => style::PAUSED_BORDER,
            SessionState::GameOver => style::GAME_OVER_BORDER,
        }
    }

    fn help_line(&self) -> String {
        if let Some(notice) = &self.notice {
            return notice.clone();
        }
        match (&self.prompt, self.session.state()) {
            (Some(GameOverPrompt::EnterInitials { .. }), _) => {
                "Type up to 3 initials, then press Enter".to_owned()
            }
            (Some(GameOverPrompt::Finished), _) => "N (New Game) | Q (Quit)".to_owned(),
            (None, SessionState::Paused) => "P (Resume) | N (New Game) | Q (Quit)".to_owned(),
            (None, _) => {
                "← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | P (Pause) | N (New Game) | Q (Quit)"
                    .to_owned()
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        let border_style = self.border_style();
        let panel =
            |title: &'static str| Block::bordered().title(Line::from(title).centered());

        let board_display = BoardDisplay::new(self.session.board())
            .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
        let next_display = PieceDisplay::new()
            .kind(self.session.board().next_piece().kind())
            .block(panel("NEXT").border_style(border_style).style(style::DEFAULT));
        let stats_display = StatsDisplay::new(self.session.stats())
            .block(panel("STATS").border_style(border_style).style(style::DEFAULT));
        let scores_display = HighScoresDisplay::new(self.high_scores.entries())
            .block(panel("HIGH SCORES").border_style(border_style).style(style::DEFAULT));

        let help_text = Text::from(self.help_line()).centered();

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(board_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let side_width = stats_display
            .width()
            .max(next_display.width())
            .max(scores_display.width());
        let [board_area, side_area] = Layout::horizontal([
            Constraint::Length(board_display.width()),
            Constraint::Length(side_width),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);

        let [next_area, stats_area, scores_area] = Layout::vertical([
            Constraint::Length(next_display.height()),
            Constraint::Length(stats_display.height()),
            Constraint::Length(scores_display.height()),
        ])
        .spacing(1)
        .areas(side_area);

        frame.render_widget(&board_display, board_area);
        frame.render_widget(&next_display, next_area);
        frame.render_widget(&stats_display, stats_area);
        frame.render_widget(&scores_display, scores_area);
        frame.render_widget(help_text, help_area);

        if let Some((text, popup_style)) = self.popup() {
            let block = Block::new().style(popup_style);
            let text = Text::styled(text, popup_style).centered();
            let area = board_area.centered(
                Constraint::Length(board_display.width()),
                Constraint::Length(3),
            );
            let inner = block.inner(area);
            Clear.render(area, frame.buffer_mut());
            block.render(area, frame.buffer_mut());
            text.render(
                inner.centered_vertically(Constraint::Length(1)),
                frame.buffer_mut(),
            );
        }
    }

    fn popup(&self) -> Option<(String, Style)> {
        match (&self.prompt, self.session.state()) {
            (Some(GameOverPrompt::EnterInitials { score, initials }), _) => Some((
                format!("NEW HIGH SCORE: {score}!  [{initials:<3}]"),
                style::RECORD_POPUP,
            )),
            (Some(GameOverPrompt::Finished), _) => {
                Some(("GAME OVER!!".to_owned(), style::GAME_OVER_POPUP))
            }
            (None, SessionState::Paused) => Some(("PAUSED".to_owned(), style::PAUSED_POPUP)),
            _ => None,
        }
    }
}

/// Maps physical keys to the five logical actions (arrows or WASD).
fn action_for_key(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') => Some(InputAction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(InputAction::Right),
        KeyCode::Up | KeyCode::Char('w') => Some(InputAction::Rotate),
        KeyCode::Down | KeyCode::Char('s') => Some(InputAction::SoftDrop),
        KeyCode::Char('p') => Some(InputAction::Pause),
        _ => None,
    }
}
