//! Turn timer - countdown state machine for one turn
//!
//! The timer does not own a clock. Whoever drives the game calls [`TurnTimer::tick`]
//! every [`TIMER_TICK_MS`]; the timer counts down and reports expiry exactly once.
//!
//! Every `start` and every effective `cancel` bumps the epoch. A driver that
//! scheduled its next tick for an older epoch must reschedule instead of
//! delivering it, so a placement and an expiry can never both land on one turn.

use crate::types::{BASE_TURN_MS, LAST_SPEEDUP_LEVEL, MIN_TURN_MS, TIMER_TICK_MS, TURN_STEP_MS};

/// Turn length for a level (ms)
pub fn turn_delay_ms(level: u32) -> u32 {
    if level <= LAST_SPEEDUP_LEVEL {
        BASE_TURN_MS - TURN_STEP_MS * level
    } else {
        MIN_TURN_MS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        time_left_ms: u32,
    },
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Timer was not running; nothing happened
    Idle,
    /// Still counting down
    Running { time_left_ms: u32 },
    /// Countdown reached zero; the timer is Idle again
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TurnTimer {
    state: TimerState,
    delay_ms: u32,
    epoch: u64,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown of `delay_ms`, replacing any running one
    pub fn start(&mut self, delay_ms: u32) {
        self.epoch = self.epoch.wrapping_add(1);
        self.delay_ms = delay_ms;
        self.state = TimerState::Running {
            time_left_ms: delay_ms,
        };
    }

    /// Stop without expiring. Safe to call when already idle.
    pub fn cancel(&mut self) {
        if self.is_running() {
            self.epoch = self.epoch.wrapping_add(1);
            self.state = TimerState::Idle;
        }
    }

    pub fn restart(&mut self, delay_ms: u32) {
        self.cancel();
        self.start(delay_ms);
    }

    /// Advance by one tick interval
    pub fn tick(&mut self) -> TimerTick {
        let TimerState::Running { time_left_ms } = self.state else {
            return TimerTick::Idle;
        };

        let left = time_left_ms.saturating_sub(TIMER_TICK_MS);
        if left == 0 {
            self.state = TimerState::Idle;
            TimerTick::Expired
        } else {
            self.state = TimerState::Running { time_left_ms: left };
            TimerTick::Running { time_left_ms: left }
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Remaining time, 0 when idle
    pub fn time_left_ms(&self) -> u32 {
        match self.state {
            TimerState::Running { time_left_ms } => time_left_ms,
            TimerState::Idle => 0,
        }
    }

    /// Length of the most recently started countdown
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
