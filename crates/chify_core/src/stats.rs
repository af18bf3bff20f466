//! Count-up statistics.
//!
//! A counter starts at zero when it first becomes visible and climbs by
//! one every `duration / target` until it reaches its target. Values are
//! derived from elapsed time, so no per-step timer is needed.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Default time for a counter to reach its target
pub const DEFAULT_COUNTER_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCounter {
    pub label: String,
    pub target: u32,
    pub suffix: String,
    #[serde(skip)]
    pub duration: Duration,
}

impl StatCounter {
    pub fn new(label: impl Into<String>, target: u32, suffix: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target,
            suffix: suffix.into(),
            duration: DEFAULT_COUNTER_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Value shown `elapsed` after the counter was revealed
    pub fn value_at(&self, elapsed: Duration) -> u32 {
        let total = self.duration.as_millis();
        if total == 0 || elapsed.as_millis() >= total {
            return self.target;
        }
        let steps = elapsed.as_millis() * u128::from(self.target) / total;
        steps.min(u128::from(self.target)) as u32
    }

    pub fn display_at(&self, elapsed: Duration) -> String {
        format!("{}{}", self.value_at(elapsed), self.suffix)
    }
}

/// A counter's label and the value currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatReading {
    pub label: String,
    pub value: String,
}

/// Headline numbers under the hero
pub fn headline_stats() -> Vec<StatCounter> {
    vec![
        StatCounter::new("Patient Recoveries", 15000, "+"),
        StatCounter::new("Specialists", 120, "+"),
        StatCounter::new("Centers Nationally", 45, ""),
        StatCounter::new("Years Excellence", 25, ""),
    ]
}

/// Numbers in the expertise section
pub fn expertise_stats() -> Vec<StatCounter> {
    vec![
        StatCounter::new("Clinical Trials", 80, "+"),
        StatCounter::new("Board Members", 12, ""),
        StatCounter::new("Partnerships", 150, "+"),
        StatCounter::new("Patents Held", 5, ""),
    ]
}

/// A group of counters that animate together once revealed
#[derive(Debug, Clone)]
pub struct StatBoard {
    counters: Vec<StatCounter>,
    revealed_at: Option<Instant>,
}

impl StatBoard {
    pub fn new(counters: Vec<StatCounter>) -> Self {
        Self {
            counters,
            revealed_at: None,
        }
    }

    /// Apply one duration to every counter
    pub fn with_duration(mut self, duration: Duration) -> Self {
        for counter in &mut self.counters {
            counter.duration = duration;
        }
        self
    }

    pub fn counters(&self) -> &[StatCounter] {
        &self.counters
    }

    /// Start the count-up. Only the first call has an effect.
    pub fn reveal(&mut self) -> bool {
        if self.revealed_at.is_some() {
            return false;
        }
        self.revealed_at = Some(Instant::now());
        true
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    /// Current readings; all zero before reveal
    pub fn readings(&self) -> Vec<StatReading> {
        let elapsed = self
            .revealed_at
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO);
        self.counters
            .iter()
            .map(|c| StatReading {
                label: c.label.clone(),
                value: c.display_at(elapsed),
            })
            .collect()
    }
}
