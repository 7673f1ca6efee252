//! Top-10 leaderboard persisted to disk (XDG config or ~/.config/gemswap), wiped every hour.

use anyhow::Result;
use chrono::{NaiveDateTime, Timelike};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const FILENAME: &str = "leaderboard";
const PERIOD_PREFIX: &str = "period ";

pub const MAX_ENTRIES: usize = 10;
pub const MAX_NAME_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub score: u32,
}

/// Where a score stands against the current leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// Nobody has scored this hour.
    Unclaimed,
    /// Points still needed to pass the leader.
    Behind(u32),
    /// At or above the top score.
    Leading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("name is empty")]
    EmptyName,
}

/// Entries are kept sorted by score, highest first; equal scores keep submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    /// Local hour the entries belong to, e.g. "2026-10-19 14".
    period: String,
    entries: Vec<Entry>,
}

/// Returns the default leaderboard path (config dir / gemswap / leaderboard).
pub fn default_path() -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join("gemswap").join(FILENAME)
}

fn period_of(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d %H").to_string()
}

/// Time left until the next top of the hour, when the board is wiped.
pub fn until_reset(now: NaiveDateTime) -> Duration {
    let into_hour = u64::from(now.minute()) * 60 + u64::from(now.second());
    Duration::from_secs(3600 - into_hour)
}

impl Leaderboard {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            period: period_of(now),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Wipe the entries if `now` is in a later hour than the stored one. Returns true if wiped.
    pub fn roll_over(&mut self, now: NaiveDateTime) -> bool {
        let period = period_of(now);
        if period == self.period {
            return false;
        }
        let dropped = self.entries.len();
        self.entries.clear();
        self.period = period;
        info!(dropped, period = %self.period, "leaderboard reset");
        true
    }

    /// Add a score. Returns the 1-based rank, or None if it did not make the top ten.
    pub fn submit(&mut self, name: &str, score: u32) -> Result<Option<usize>, SubmitError> {
        let name = clean_name(name);
        if name.is_empty() {
            return Err(SubmitError::EmptyName);
        }
        let pos = self.entries.iter().filter(|e| e.score >= score).count();
        if pos >= MAX_ENTRIES {
            return Ok(None);
        }
        self.entries.insert(pos, Entry { name, score });
        self.entries.truncate(MAX_ENTRIES);
        Ok(Some(pos + 1))
    }

    pub fn gap_to_first(&self, score: u32) -> Gap {
        match self.entries.first() {
            None => Gap::Unclaimed,
            Some(top) if top.score > score => Gap::Behind(top.score - score),
            Some(_) => Gap::Leading,
        }
    }

    /// Parse the on-disk text form. Unreadable lines are skipped; a stale period yields an empty board.
    pub fn parse(text: &str, now: NaiveDateTime) -> Self {
        let mut board = Self::new(now);
        let mut stored_period = None;
        let mut entries = Vec::new();
        for line in text.lines() {
            if let Some(p) = line.strip_prefix(PERIOD_PREFIX) {
                stored_period = Some(p.trim().to_string());
                continue;
            }
            let Some((score, name)) = line.split_once('\t') else {
                continue;
            };
            let (Ok(score), name) = (score.trim().parse::<u32>(), clean_name(name)) else {
                continue;
            };
            if !name.is_empty() {
                entries.push(Entry { name, score });
            }
        }
        if stored_period.as_deref() == Some(board.period.as_str()) {
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_ENTRIES);
            board.entries = entries;
        }
        board
    }

    pub fn render(&self) -> String {
        let mut out = format!("{PERIOD_PREFIX}{}\n", self.period);
        for e in &self.entries {
            out.push_str(&format!("{}\t{}\n", e.score, e.name));
        }
        out
    }

    /// Load from disk. Missing or unreadable files give an empty board for the current hour.
    pub fn load(path: &Path, now: NaiveDateTime) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, now),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "could not read leaderboard");
                }
                Self::new(now)
            }
        }
    }

    /// Save to disk. Creates the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = fs::File::create(path)?;
        f.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Trim, flatten control characters and cap the length.
fn clean_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(MAX_NAME_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_submit_keeps_order_and_cap() {
        let mut board = Leaderboard::new(at(14, 0, 0));
        for i in 0..12u32 {
            board.submit(&format!("p{i}"), i * 100).unwrap();
        }
        assert_eq!(board.entries().len(), MAX_ENTRIES);
        assert_eq!(board.entries()[0].score, 1100);
        assert_eq!(board.entries()[9].score, 200);
        assert_eq!(board.submit("low", 50), Ok(None));
    }

    #[test]
    fn test_ties_rank_after_existing() {
        let mut board = Leaderboard::new(at(14, 0, 0));
        board.submit("first", 300).unwrap();
        assert_eq!(board.submit("second", 300), Ok(Some(2)));
        assert_eq!(board.entries()[0].name, "first");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut board = Leaderboard::new(at(14, 0, 0));
        assert_eq!(board.submit("   ", 10), Err(SubmitError::EmptyName));
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_gap_to_first() {
        let mut board = Leaderboard::new(at(14, 0, 0));
        assert_eq!(board.gap_to_first(0), Gap::Unclaimed);
        board.submit("ace", 500).unwrap();
        assert_eq!(board.gap_to_first(120), Gap::Behind(380));
        assert_eq!(board.gap_to_first(500), Gap::Leading);
    }

    #[test]
    fn test_roll_over_next_hour() {
        let mut board = Leaderboard::new(at(14, 10, 0));
        board.submit("ace", 500).unwrap();
        assert!(!board.roll_over(at(14, 59, 59)));
        assert!(board.roll_over(at(15, 0, 0)));
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_until_reset() {
        assert_eq!(until_reset(at(14, 0, 0)), Duration::from_secs(3600));
        assert_eq!(until_reset(at(14, 59, 30)), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_render() {
        let mut board = Leaderboard::new(at(9, 5, 0));
        board.submit("ann", 70).unwrap();
        board.submit("bo", 90).unwrap();
        let text = board.render();
        assert_eq!(text, "period 2026-10-19 09\n90\tbo\n70\tann\n");
        assert_eq!(Leaderboard::parse(&text, at(9, 40, 0)), board);
    }

    #[test]
    fn test_parse_stale_or_garbage() {
        let text = "period 2026-10-19 08\n90\tbo\n";
        assert!(Leaderboard::parse(text, at(9, 0, 0)).entries().is_empty());
        let text = "period 2026-10-19 09\nnope\nx\tbad\n40\tok\n";
        let board = Leaderboard::parse(text, at(9, 0, 0));
        assert_eq!(board.entries(), &[Entry { name: "ok".into(), score: 40 }]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("gemswap-test-{}", std::process::id()));
        let path = dir.join(FILENAME);
        let mut board = Leaderboard::new(at(20, 0, 0));
        board.submit("zed", 1234).unwrap();
        board.save(&path).unwrap();
        assert_eq!(Leaderboard::load(&path, at(20, 30, 0)), board);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("gemswap-definitely-missing").join(FILENAME);
        assert!(Leaderboard::load(&path, at(1, 0, 0)).entries().is_empty());
    }
}
