//! Simulated match time.
//!
//! # Design
//!
//! Time is an integer count of milliseconds since the start of the match.
//! Second-valued quantities coming from planners and interaction estimators
//! are converted with [`SimTime::ms_from_secs`], which rounds **up** so an
//! action never completes before the time it actually needs.
//!
//! The clock is advanced only by the game server.  Every other component
//! reads it; nothing rewinds it except an explicit [`MatchClock::reset`] at
//! episode start.

use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute point in match time, in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Return the time `ms` milliseconds after `self`.
    #[inline]
    pub fn offset(self, ms: u64) -> SimTime {
        SimTime(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Build a time from seconds (ceiling to the next millisecond).
    #[inline]
    pub fn from_secs_f64(secs: f64) -> SimTime {
        SimTime(Self::ms_from_secs(secs))
    }

    /// Convert a duration in seconds to whole milliseconds, rounding up.
    ///
    /// Negative and non-finite inputs map to zero.
    #[inline]
    pub fn ms_from_secs(secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 0;
        }
        (secs * 1_000.0).ceil() as u64
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        self.offset(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: SimTime) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1_000, self.0 % 1_000)
    }
}

// ── MatchTiming ───────────────────────────────────────────────────────────────

/// Period lengths of a match, in seconds.
///
/// The endgame is the tail of teleop, not an extra period: the match is over
/// once `auto + teleop` seconds have elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchTiming {
    pub auto_secs:    u64,
    pub teleop_secs:  u64,
    pub endgame_secs: u64,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self {
            auto_secs:    15,
            teleop_secs:  135,
            endgame_secs: 30,
        }
    }
}

impl MatchTiming {
    /// The instant at which the match ends.
    #[inline]
    pub fn end(&self) -> SimTime {
        SimTime((self.auto_secs + self.teleop_secs) * 1_000)
    }

    /// The instant at which the endgame period begins.
    #[inline]
    pub fn endgame_start(&self) -> SimTime {
        SimTime(
            (self.auto_secs + self.teleop_secs.saturating_sub(self.endgame_secs)) * 1_000,
        )
    }

    /// Which period `t` falls into.
    pub fn phase_at(&self, t: SimTime) -> MatchPhase {
        if t >= self.end() {
            MatchPhase::Over
        } else if t < SimTime(self.auto_secs * 1_000) {
            MatchPhase::Auto
        } else if t >= self.endgame_start() {
            MatchPhase::Endgame
        } else {
            MatchPhase::Teleop
        }
    }
}

/// Named period of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchPhase {
    Auto,
    Teleop,
    Endgame,
    Over,
}

impl MatchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchPhase::Auto    => "auto",
            MatchPhase::Teleop  => "teleop",
            MatchPhase::Endgame => "endgame",
            MatchPhase::Over    => "over",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MatchClock ────────────────────────────────────────────────────────────────

/// The single authoritative match clock.
///
/// Only moves forward: [`advance`][Self::advance] adds a non-negative
/// duration and [`advance_to`][Self::advance_to] ignores targets in the past.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchClock {
    pub timing:  MatchTiming,
    current:     SimTime,
}

impl MatchClock {
    pub fn new(timing: MatchTiming) -> Self {
        Self { timing, current: SimTime::ZERO }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.current
    }

    /// Move the clock forward by `ms` milliseconds.
    #[inline]
    pub fn advance(&mut self, ms: u64) -> SimTime {
        self.current = self.current.offset(ms);
        self.current
    }

    /// Move the clock to `t` if `t` is in the future; no-op otherwise.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) -> SimTime {
        if t > self.current {
            self.current = t;
        }
        self.current
    }

    /// Rewind to the start of the match.  Episode reset only.
    pub fn reset(&mut self) {
        self.current = SimTime::ZERO;
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.current >= self.timing.end()
    }

    #[inline]
    pub fn phase(&self) -> MatchPhase {
        self.timing.phase_at(self.current)
    }

    /// Milliseconds left before the match ends (zero once over).
    #[inline]
    pub fn remaining_ms(&self) -> u64 {
        self.timing.end().since(self.current)
    }
}

impl fmt::Display for MatchClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current, self.phase())
    }
}
