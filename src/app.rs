//! App: terminal init, main loop, key handling and the end-of-game name prompt.

use crate::GameConfig;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, View};
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gemswap::engine::{ActivationStatus, SwapStatus};
use gemswap::leaderboard::{Leaderboard, MAX_NAME_LEN};
use gemswap::{Cell, Session};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long a status message stays in the sidebar.
const MESSAGE_TTL: Duration = Duration::from_millis(1800);

/// What happened to the score once the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Saved at this 1-based rank.
    Ranked(usize),
    /// Submitted but below the top ten.
    Unranked,
    /// Player chose not to save.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Playing,
    /// Time is up; typing a name for the leaderboard.
    NameEntry { name: String },
    /// Waiting for restart or quit.
    Finished(Outcome),
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    session: Session,
    leaderboard: Leaderboard,
    screen: Screen,
    cursor: usize,
    selected: Option<usize>,
    /// Status line: why a swap was refused, or the points from the last move.
    message: Option<(String, Instant)>,
}

fn wall_clock() -> NaiveDateTime {
    Local::now().naive_local()
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Result<Self> {
        let now = Instant::now();
        let session = Session::start(config.engine.clone(), config.time_limit, config.seed, now)?;
        let leaderboard = match &config.leaderboard_path {
            Some(path) => Leaderboard::load(path, wall_clock()),
            None => Leaderboard::new(wall_clock()),
        };
        info!(
            seed = session.engine().seed(),
            size = config.engine.size,
            kinds = config.engine.kinds,
            "game started"
        );
        Ok(Self {
            config,
            theme,
            session,
            leaderboard,
            screen: Screen::Playing,
            cursor: 0,
            selected: None,
            message: None,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let wall = wall_clock();
            self.update(now, wall);

            let view = View {
                session: &self.session,
                leaderboard: &self.leaderboard,
                theme: &self.theme,
                screen: &self.screen,
                cursor: self.cursor,
                selected: self.selected,
                message: self.message.as_ref().map(|(m, _)| m.as_str()),
                now,
                wall,
            };
            terminal.draw(|f| ui::draw(f, &view))?;

            let timeout = self.config.frame_interval.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if !self.handle_key(key, Instant::now())? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Clock-driven changes: time-up, hourly leaderboard wipe, stale messages.
    fn update(&mut self, now: Instant, wall: NaiveDateTime) {
        self.session.tick(now);
        if self.screen == Screen::Playing && self.session.is_over() {
            self.selected = None;
            self.screen = Screen::NameEntry {
                name: String::new(),
            };
        }
        self.leaderboard.roll_over(wall);
        if self
            .message
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) > MESSAGE_TTL)
        {
            self.message = None;
        }
    }

    /// Returns false when the player quits.
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<bool> {
        if matches!(self.screen, Screen::NameEntry { .. }) {
            return Ok(self.name_entry_key(key, now));
        }
        match key_to_action(key) {
            Action::Quit => return Ok(false),
            Action::Restart => self.restart(now)?,
            _ if self.screen != Screen::Playing => {}
            Action::Up => self.move_cursor(-1, 0),
            Action::Down => self.move_cursor(1, 0),
            Action::Left => self.move_cursor(0, -1),
            Action::Right => self.move_cursor(0, 1),
            Action::Select => self.select(now)?,
            Action::Detonate => self.detonate(self.cursor, now)?,
            Action::Cancel => self.selected = None,
            Action::None => {}
        }
        Ok(true)
    }

    fn name_entry_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return false;
        }
        let Screen::NameEntry { name } = &mut self.screen else {
            return true;
        };
        match key.code {
            KeyCode::Char(c) if !c.is_control() && name.chars().count() < MAX_NAME_LEN => {
                name.push(c);
            }
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Enter => {
                let name = name.clone();
                self.submit_score(&name, now);
            }
            KeyCode::Esc => self.screen = Screen::Finished(Outcome::Skipped),
            _ => {}
        }
        true
    }

    fn submit_score(&mut self, name: &str, now: Instant) {
        let score = self.session.score();
        let rank = match self.leaderboard.submit(name, score) {
            Ok(rank) => rank,
            Err(e) => {
                self.flash(e.to_string(), now);
                return;
            }
        };
        info!(name, score, ?rank, "score submitted");
        if let Some(path) = &self.config.leaderboard_path {
            if let Err(e) = self.leaderboard.save(path) {
                warn!(path = %path.display(), error = %e, "could not save leaderboard");
                self.flash(format!("could not save: {e}"), now);
            }
        }
        self.screen = Screen::Finished(rank.map_or(Outcome::Unranked, Outcome::Ranked));
    }

    fn restart(&mut self, now: Instant) -> Result<()> {
        self.session.restart(now)?;
        self.screen = Screen::Playing;
        self.selected = None;
        self.message = None;
        info!(seed = self.session.engine().seed(), "game restarted");
        Ok(())
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let grid = self.session.engine().grid();
        let last = grid.size() - 1;
        let (row, col) = grid.coords(self.cursor);
        let row = row.saturating_add_signed(dr).min(last);
        let col = col.saturating_add_signed(dc).min(last);
        self.cursor = grid.index(row, col);
    }

    /// Space/Enter: pick a cell, swap with the picked neighbour, or set off a detonator.
    fn select(&mut self, now: Instant) -> Result<()> {
        let grid = self.session.engine().grid();
        let here = self.cursor;
        let on_detonator = grid.at(here).is_some_and(Cell::is_detonator);
        let adjacent = self.selected.is_some_and(|s| grid.is_adjacent(s, here));
        match self.selected {
            None if on_detonator => self.detonate(here, now)?,
            None => self.selected = Some(here),
            Some(s) if s == here => self.selected = None,
            Some(s) if adjacent => {
                self.selected = None;
                self.swap(s, here, now)?;
            }
            Some(_) => self.selected = Some(here),
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize, now: Instant) -> Result<()> {
        let Some(report) = self.session.swap(a, b, now)? else {
            return Ok(());
        };
        match report.status {
            SwapStatus::Rejected(reason) => self.flash(reason.to_string(), now),
            SwapStatus::Reverted => self.flash("no match".to_string(), now),
            SwapStatus::Cascaded => {
                self.flash(gain_message(report.score_delta, report.combo.count), now);
            }
        }
        Ok(())
    }

    fn detonate(&mut self, index: usize, now: Instant) -> Result<()> {
        let Some(report) = self.session.detonate(index, now)? else {
            return Ok(());
        };
        self.selected = None;
        match report.status {
            ActivationStatus::Ignored => self.flash("no detonator here".to_string(), now),
            ActivationStatus::Detonated => {
                self.flash(gain_message(report.score_delta, report.combo.count), now);
            }
        }
        Ok(())
    }

    fn flash(&mut self, message: String, now: Instant) {
        self.message = Some((message, now));
    }
}

fn gain_message(points: u32, combo: u32) -> String {
    if combo > 1 {
        format!("+{points}  combo x{combo}")
    } else {
        format!("+{points}")
    }
}
