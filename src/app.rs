use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use tracing::error;

use crate::course::{Level, LevelId};
use crate::progress::{
    AttemptOutcome, AttemptPhase, LevelAttempt, LevelStatus, ProgressStore, SaveSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Map,
    Level,
    ConfirmReset,
}

pub struct App<S: SaveSlot> {
    pub store: ProgressStore<S>,
    pub screen: Screen,
    /// Index into the catalog's levels.
    pub map_cursor: usize,
    pub attempt: Option<LevelAttempt>,
    pub message: String,
    pub message_style: Style,
    pub article_scroll: u16,
    pub should_quit: bool,
}

impl<S: SaveSlot> App<S> {
    pub fn new(store: ProgressStore<S>) -> Self {
        // Start the cursor on the first level still to play
        let map_cursor = store
            .catalog()
            .levels()
            .iter()
            .position(|l| store.status(l.id()) == LevelStatus::Available)
            .unwrap_or(0);

        App {
            store,
            screen: Screen::Map,
            map_cursor,
            attempt: None,
            message: String::new(),
            message_style: Style::default(),
            article_scroll: 0,
            should_quit: false,
        }
    }

    pub fn selected_level(&self) -> &Level {
        &self.store.catalog().levels()[self.map_cursor]
    }

    /// The level being played, if any.
    pub fn current_level(&self) -> Option<&Level> {
        let attempt = self.attempt.as_ref()?;
        self.store.catalog().level(attempt.level()).ok()
    }

    fn set_message(&mut self, message: impl Into<String>, style: Style) {
        self.message = message.into();
        self.message_style = style;
    }

    fn clear_message(&mut self) {
        self.message.clear();
        self.message_style = Style::default();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Map => self.handle_map_key(key.code),
            Screen::Level => self.handle_level_key(key.code),
            Screen::ConfirmReset => self.handle_confirm_key(key.code),
        }
    }

    fn handle_map_key(&mut self, code: KeyCode) {
        let count = self.store.catalog().total_levels();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.map_cursor = self.map_cursor.saturating_sub(1);
                self.clear_message();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.map_cursor + 1 < count {
                    self.map_cursor += 1;
                }
                self.clear_message();
            }
            KeyCode::Enter => {
                let id = self.selected_level().id();
                self.open_level(id);
            }
            KeyCode::Char('r') => {
                self.screen = Screen::ConfirmReset;
                self.set_message(
                    "Erase all progress and wealth? [y/N]",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                );
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        self.screen = Screen::Map;
        if !matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.clear_message();
            return;
        }

        match self.store.reset_progress() {
            Ok(()) => {
                self.map_cursor = 0;
                self.set_message(
                    "Progress reset. Your journey begins again.",
                    Style::default().fg(Color::Yellow),
                );
            }
            Err(e) => {
                error!(error = %e, "reset failed");
                self.set_message(
                    format!("Could not reset: {e}"),
                    Style::default().fg(Color::Magenta),
                );
            }
        }
    }

    pub fn open_level(&mut self, id: LevelId) {
        match LevelAttempt::start(&self.store, id) {
            Ok(attempt) if attempt.phase() == AttemptPhase::Locked => {
                self.set_message(
                    "That quest is locked. Complete the one before it first.",
                    Style::default().fg(Color::DarkGray),
                );
            }
            Ok(mut attempt) => {
                attempt.begin();
                self.attempt = Some(attempt);
                self.map_cursor = id as usize - 1;
                self.article_scroll = 0;
                self.screen = Screen::Level;
                self.clear_message();
            }
            Err(e) => {
                self.set_message(
                    format!("QUEST NOT FOUND ({e})"),
                    Style::default().fg(Color::Red),
                );
            }
        }
    }

    fn back_to_map(&mut self) {
        self.attempt = None;
        self.screen = Screen::Map;
        self.clear_message();
    }

    fn handle_level_key(&mut self, code: KeyCode) {
        let Some(mut attempt) = self.attempt else {
            self.back_to_map();
            return;
        };

        match code {
            KeyCode::Esc | KeyCode::Char('m') => self.back_to_map(),
            KeyCode::PageDown | KeyCode::Char('J') => {
                self.article_scroll = self.article_scroll.saturating_add(3);
            }
            KeyCode::PageUp | KeyCode::Char('K') => {
                self.article_scroll = self.article_scroll.saturating_sub(3);
            }
            KeyCode::Enter if attempt.phase() == AttemptPhase::Completed => {
                match self.store.catalog().next_level_id(attempt.level()) {
                    Some(next) => self.open_level(next),
                    None => self.back_to_map(),
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                attempt.retry();
                let option = c as usize - '1' as usize;
                self.answer(&mut attempt, option);
                self.attempt = Some(attempt);
            }
            _ => {}
        }
    }

    fn answer(&mut self, attempt: &mut LevelAttempt, option: usize) {
        let last = self.store.catalog().is_last_level(attempt.level());
        match attempt.submit(&mut self.store, option) {
            Ok(AttemptOutcome::Correct(completion)) => {
                let reward = if completion.first_time {
                    format!("  +{} wealth", format_wealth(completion.reward))
                } else {
                    String::new()
                };
                let next = if last {
                    "All quests complete, you are a Money Master!  [ENTER: map]"
                } else {
                    "Next quest unlocked!  [ENTER: next quest]"
                };
                self.set_message(
                    format!("*** QUEST COMPLETE! ***{reward}\n\n{next}"),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                );
            }
            Ok(AttemptOutcome::Wrong) => {
                self.set_message("INCORRECT — TRY AGAIN", Style::default().fg(Color::Red));
            }
            Ok(AttemptOutcome::Ignored) => {}
            Err(e) => {
                error!(level = attempt.level(), option, error = %e, "answer failed");
                self.set_message(e.to_string(), Style::default().fg(Color::Magenta));
            }
        }
    }
}

/// `12000` -> `$12,000`.
pub fn format_wealth(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
