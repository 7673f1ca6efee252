//! Layout and drawing: board, sidebar (score, clock, combo, leaderboard), game over.

use crate::app::{Outcome, Screen};
use crate::theme::Theme;
use chrono::NaiveDateTime;
use gemswap::leaderboard::{self, Gap, Leaderboard};
use gemswap::{Cell, Grid, Session};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};
use std::time::{Duration, Instant};

/// Each cell is drawn as " x ": three columns by one row.
const CELL_WIDTH: u16 = 3;
const SIDEBAR_WIDTH: u16 = 30;
/// Score 4, clock 4, combo 4, leaderboard 2 + 10 + 1, status 1.
const SIDEBAR_HEIGHT: u16 = 26;
const POPUP_WIDTH: u16 = 34;
const POPUP_HEIGHT: u16 = 10;

/// One glyph per token kind so colours are not the only cue.
const GLYPHS: [&str; 6] = ["●", "◆", "▲", "■", "♣", "♥"];
const DETONATOR_GLYPH: &str = "✱";

/// Everything the frame needs, borrowed from the app for one draw.
pub struct View<'a> {
    pub session: &'a Session,
    pub leaderboard: &'a Leaderboard,
    pub theme: &'a Theme,
    pub screen: &'a Screen,
    pub cursor: usize,
    pub selected: Option<usize>,
    pub message: Option<&'a str>,
    pub now: Instant,
    pub wall: NaiveDateTime,
}

pub fn draw(frame: &mut Frame, view: &View) {
    let area = frame.area();
    let theme = view.theme;
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

    let n = view.session.engine().grid().size() as u16;
    let board_w = n * CELL_WIDTH + 2;
    let board_h = n + 2;
    let total_w = (board_w + 1 + SIDEBAR_WIDTH).min(area.width);
    let total_h = board_h.max(SIDEBAR_HEIGHT).min(area.height);
    let outer = centered(area, total_w, total_h);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_w),
            Constraint::Length(1),
            Constraint::Length(SIDEBAR_WIDTH),
        ])
        .split(outer);
    let board_area = Rect {
        height: board_h.min(chunks[0].height),
        ..chunks[0]
    };
    draw_board(frame, view, board_area);
    draw_sidebar(frame, view, chunks[2]);

    if *view.screen != Screen::Playing {
        draw_game_over(frame, view, outer);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn block<'a>(theme: &Theme, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.frame).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.accent)))
}

fn draw_board(frame: &mut Frame, view: &View, area: Rect) {
    let grid = view.session.engine().grid();
    let board = block(view.theme, " gemswap ");
    let inner = board.inner(area);
    frame.render_widget(board, area);
    let lines: Vec<Line> = (0..grid.size())
        .map(|row| {
            grid.row_indices(row)
                .map(|i| cell_span(view, grid, i))
                .collect::<Vec<_>>()
                .into()
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn cell_span(view: &View, grid: &Grid, index: usize) -> Span<'static> {
    let theme = view.theme;
    let (glyph, fg) = match grid.at(index).unwrap_or(Cell::Empty) {
        Cell::Token(kind) => (GLYPHS[kind as usize % GLYPHS.len()], theme.token(kind)),
        Cell::Detonator => (DETONATOR_GLYPH, theme.detonator),
        Cell::Empty => (" ", theme.muted),
    };
    let playing = *view.screen == Screen::Playing;
    let bg = if playing && view.selected == Some(index) {
        theme.selected
    } else if playing && view.cursor == index {
        theme.cursor
    } else {
        theme.bg
    };
    let mut style = Style::default().fg(fg).bg(bg);
    if matches!(grid.at(index), Some(Cell::Detonator)) {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(format!(" {glyph} "), style)
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let label = Style::default().fg(theme.accent);
    let fg = Style::default().fg(theme.text);
    let muted = Style::default().fg(theme.muted);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // score + gap to first
            Constraint::Length(4), // clock
            Constraint::Length(4), // combo
            Constraint::Min(3),    // leaderboard
            Constraint::Length(1), // status
        ])
        .split(area);

    // --- Score ---
    let score = view.session.score();
    let gap = match view.leaderboard.gap_to_first(score) {
        Gap::Unclaimed => "no scores yet this hour".to_string(),
        Gap::Behind(points) => format!("{points} behind first"),
        Gap::Leading => "top of the board".to_string(),
    };
    let score_block = block(theme, " Score ");
    let inner = score_block.inner(chunks[0]);
    frame.render_widget(score_block, chunks[0]);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                score.to_string(),
                fg.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(gap, muted)),
        ]),
        inner,
    );

    // --- Clock ---
    let remaining = view.session.remaining(view.now);
    let limit = view.session.time_limit();
    let clock_ratio = if limit.is_zero() {
        0.0
    } else {
        remaining.as_secs_f64() / limit.as_secs_f64()
    };
    let clock_block = block(theme, " Time ");
    let inner = clock_block.inner(chunks[1]);
    frame.render_widget(clock_block, chunks[1]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(Span::styled(format!("{}s left", ceil_secs(remaining)), fg)),
        rows[0],
    );
    frame.render_widget(
        Gauge::default()
            .ratio(clock_ratio.clamp(0.0, 1.0))
            .label("")
            .gauge_style(Style::default().fg(bar_color(clock_ratio))),
        rows[1],
    );

    // --- Combo ---
    let engine = view.session.engine();
    let combo = engine.combo(view.now);
    let combo_ratio = engine.combo_tracker().remaining_ratio(view.now);
    let combo_label = if combo.active {
        format!("x{} (max {})", combo.count, engine.combo_tracker().max())
    } else {
        "-".to_string()
    };
    let combo_block = block(theme, " Combo ");
    let inner = combo_block.inner(chunks[2]);
    frame.render_widget(combo_block, chunks[2]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(Paragraph::new(Span::styled(combo_label, label)), rows[0]);
    frame.render_widget(
        Gauge::default()
            .ratio(combo_ratio.clamp(0.0, 1.0))
            .label("")
            .gauge_style(Style::default().fg(bar_color(combo_ratio))),
        rows[1],
    );

    // --- Leaderboard ---
    let highlight = match view.screen {
        Screen::Finished(Outcome::Ranked(rank)) => Some(*rank),
        _ => None,
    };
    let mut lines: Vec<Line> = view
        .leaderboard
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let style = if highlight == Some(i + 1) {
                label.add_modifier(Modifier::BOLD)
            } else {
                fg
            };
            let name: String = e.name.chars().take(14).collect();
            Line::from(Span::styled(
                format!("{:>2}. {:<14} {:>6}", i + 1, name, e.score),
                style,
            ))
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("empty", muted)));
    }
    let reset = leaderboard::until_reset(view.wall).as_secs();
    lines.push(Line::from(Span::styled(
        format!("resets in {:02}:{:02}", reset / 60, reset % 60),
        muted,
    )));
    let board_block = block(theme, " This hour ");
    let inner = board_block.inner(chunks[3]);
    frame.render_widget(board_block, chunks[3]);
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    // --- Status ---
    let status = view
        .message
        .map_or_else(|| Span::styled("space pick  x detonate", muted), |m| Span::styled(m, label));
    frame.render_widget(Paragraph::new(status), chunks[4]);
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let fg = Style::default().fg(theme.text);
    let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
    let mut lines = vec![
        Line::from(Span::styled(
            " Time's up! ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(format!("Score: {}", view.session.score()), fg)),
        Line::from(""),
    ];
    match view.screen {
        Screen::NameEntry { name } => {
            lines.push(Line::from(vec![
                Span::styled("Name: ", Style::default().fg(theme.accent)),
                Span::styled(format!("{name}_"), fg),
            ]));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Enter save    Esc skip", fg)));
        }
        Screen::Finished(outcome) => {
            let text = match outcome {
                Outcome::Ranked(rank) => format!("Saved at #{rank}"),
                Outcome::Unranked => "Not in the top ten".to_string(),
                Outcome::Skipped => "Not saved".to_string(),
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(theme.accent))));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("R — Restart    Q — Quit", fg)));
        }
        Screen::Playing => {}
    }
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.bg))
            .block(block(theme, " Game over ")),
        popup,
    );
}

fn bar_color(ratio: f64) -> Color {
    if ratio > 0.6 {
        Color::Green
    } else if ratio > 0.3 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Whole seconds, rounded up so the clock reads 0 only when time is out.
fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use gemswap::EngineConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(session: &Session, board: &Leaderboard, screen: &Screen, now: Instant) -> String {
        let theme = Theme::default();
        let view = View {
            session,
            leaderboard: board,
            theme: &theme,
            screen,
            cursor: 0,
            selected: None,
            message: None,
            now,
            wall: Local::now().naive_local(),
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draws_board_and_sidebar() {
        let now = Instant::now();
        let session =
            Session::start(EngineConfig::default(), Duration::from_secs(60), Some(5), now).unwrap();
        let mut board = Leaderboard::new(Local::now().naive_local());
        board.submit("ada", 120).unwrap();
        let out = render(&session, &board, &Screen::Playing, now);
        assert!(out.contains("gemswap"));
        assert!(out.contains("60s left"));
        assert!(out.contains("120 behind first"));
        assert!(out.contains("ada"));
        assert!(!out.contains("Time's up"));
    }

    #[test]
    fn test_draws_name_prompt() {
        let now = Instant::now();
        let session = Session::start(EngineConfig::default(), Duration::ZERO, Some(5), now).unwrap();
        let board = Leaderboard::new(Local::now().naive_local());
        let screen = Screen::NameEntry {
            name: "bo".to_string(),
        };
        let out = render(&session, &board, &screen, now);
        assert!(out.contains("Time's up!"));
        assert!(out.contains("bo_"));
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::from_millis(59_001)), 60);
        assert_eq!(ceil_secs(Duration::from_secs(3)), 3);
        assert_eq!(ceil_secs(Duration::ZERO), 0);
    }
}
