//! A timed game: one engine, a running score and a countdown.

use crate::config::EngineConfig;
use crate::engine::{ActivationReport, Engine, SwapReport};
use crate::error::EngineError;
use std::time::{Duration, Instant};
use tracing::info;

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct Session {
    engine: Engine,
    engine_config: EngineConfig,
    /// Fixed seed for every restart; None draws a new one each game.
    seed: Option<u64>,
    time_limit: Duration,
    started: Instant,
    score: u32,
    over: bool,
}

impl Session {
    pub fn start(
        engine_config: EngineConfig,
        time_limit: Duration,
        seed: Option<u64>,
        now: Instant,
    ) -> Result<Self, EngineError> {
        let engine = Engine::initialize(engine_config.clone(), seed)?;
        Ok(Self {
            engine,
            engine_config,
            seed,
            time_limit,
            started: now,
            score: 0,
            over: false,
        })
    }

    /// New board, zero score, full clock.
    pub fn restart(&mut self, now: Instant) -> Result<(), EngineError> {
        self.engine = Engine::initialize(self.engine_config.clone(), self.seed)?;
        self.started = now;
        self.score = 0;
        self.over = false;
        Ok(())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.time_limit
            .saturating_sub(now.saturating_duration_since(self.started))
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Advance the clock. Returns true exactly once, on the tick the time runs out.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.over || !self.remaining(now).is_zero() {
            return false;
        }
        self.over = true;
        self.engine.reset_combo();
        info!(score = self.score, seed = self.engine.seed(), "time up");
        true
    }

    /// Swap two cells. None once the game is over.
    pub fn swap(&mut self, a: usize, b: usize, now: Instant) -> Result<Option<SwapReport>, EngineError> {
        self.tick(now);
        if self.over {
            return Ok(None);
        }
        let report = self.engine.apply_swap(a, b, now)?;
        self.score += report.score_delta;
        Ok(Some(report))
    }

    /// Set off a detonator. None once the game is over.
    pub fn detonate(&mut self, index: usize, now: Instant) -> Result<Option<ActivationReport>, EngineError> {
        self.tick(now);
        if self.over {
            return Ok(None);
        }
        let report = self.engine.activate_detonator(index, now)?;
        self.score += report.score_delta;
        Ok(Some(report))
    }
}
