// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::types::timestamp::Timestamp;

/// The ease factor of a card that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Ease factors never drop below this.
pub const MIN_EASE: f64 = 1.3;

/// Grades at or above this are successful recalls.
const PASSING_QUALITY: u8 = 3;

const MAX_QUALITY: u8 = 4;

/// Intervals are capped at roughly a century.
pub const MAX_INTERVAL: u32 = 36_500;

/// How well the learner recalled a card, from 0 (blackout) to 4 (perfect).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Result<Self, ErrorReport> {
        if value > MAX_QUALITY {
            return Err(ErrorReport::invalid_input(format!(
                "quality must be between 0 and {MAX_QUALITY}, got {value}."
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

impl TryFrom<u8> for Quality {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Quality::new(value)
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spaced-repetition state of a single card.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(from = "StoredRecord")]
pub struct ReviewRecord {
    /// Multiplier applied to the interval after each successful review.
    #[serde(rename = "ef")]
    pub ease_factor: f64,
    /// Days between the last review and the due date.
    pub interval: u32,
    /// Consecutive successful reviews.
    #[serde(rename = "reps")]
    pub repetitions: u32,
    /// When the card becomes due. `None` if it was never scheduled.
    #[serde(rename = "due", skip_serializing_if = "Option::is_none")]
    pub due_at: Option<Timestamp>,
}

impl Default for ReviewRecord {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval: 0,
            repetitions: 0,
            due_at: None,
        }
    }
}

/// A record as read from storage, before its bounds are enforced.
#[derive(Deserialize)]
#[serde(default)]
struct StoredRecord {
    #[serde(rename = "ef")]
    ease_factor: f64,
    interval: u32,
    #[serde(rename = "reps")]
    repetitions: u32,
    #[serde(rename = "due")]
    due_at: Option<Timestamp>,
}

impl Default for StoredRecord {
    fn default() -> Self {
        let ReviewRecord {
            ease_factor,
            interval,
            repetitions,
            due_at,
        } = ReviewRecord::default();
        Self {
            ease_factor,
            interval,
            repetitions,
            due_at,
        }
    }
}

impl From<StoredRecord> for ReviewRecord {
    fn from(stored: StoredRecord) -> Self {
        let ease_factor = if stored.ease_factor.is_finite() {
            stored.ease_factor.max(MIN_EASE)
        } else {
            INITIAL_EASE
        };
        Self {
            ease_factor,
            interval: stored.interval.min(MAX_INTERVAL),
            repetitions: stored.repetitions,
            due_at: stored.due_at,
        }
    }
}

impl ReviewRecord {
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.due_at {
            None => true,
            Some(due_at) => due_at <= now,
        }
    }
}

/// Compute the state of a card after a review graded `quality` at `now`.
pub fn schedule(record: ReviewRecord, quality: Quality, now: Timestamp) -> ReviewRecord {
    let ReviewRecord {
        mut ease_factor,
        mut interval,
        mut repetitions,
        ..
    } = record;
    if quality.is_success() {
        interval = match repetitions {
            0 => 1,
            1 => 6,
            _ => next_interval(interval, ease_factor),
        };
        ease_factor = new_ease(ease_factor, quality);
        repetitions = repetitions.saturating_add(1);
    } else {
        // Relearn tomorrow.
        repetitions = 0;
        interval = 1;
    }
    ReviewRecord {
        ease_factor,
        interval,
        repetitions,
        due_at: Some(now.plus_days(interval)),
    }
}

fn next_interval(interval: u32, ease_factor: f64) -> u32 {
    let days = (interval as f64 * ease_factor).round();
    if days >= MAX_INTERVAL as f64 {
        MAX_INTERVAL
    } else {
        days as u32
    }
}

fn new_ease(ease_factor: f64, quality: Quality) -> f64 {
    let q = 5.0 - quality.value() as f64;
    (ease_factor + (0.1 - q * (0.08 + q * 0.02))).max(MIN_EASE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    const DAY: i64 = 86_400_000;

    fn now() -> Timestamp {
        Timestamp::from_millis(1_700_000_000_000).unwrap()
    }

    fn q(value: u8) -> Quality {
        Quality::new(value).unwrap()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quality_range() {
        for value in 0..=4 {
            assert!(Quality::new(value).is_ok());
        }
        let err = Quality::new(5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: invalid input: quality must be between 0 and 4, got 5."
        );
    }

    #[test]
    fn test_first_success() {
        let record = schedule(ReviewRecord::default(), q(4), now());
        assert_eq!(record.repetitions, 1);
        assert_eq!(record.interval, 1);
        // q=4 gives a delta of exactly 0.
        assert!(approx_eq(record.ease_factor, 2.5));
        assert_eq!(record.due_at.unwrap().as_millis(), now().as_millis() + DAY);
    }

    #[test]
    fn test_second_success() {
        let first = schedule(ReviewRecord::default(), q(4), now());
        let second = schedule(first, q(4), now());
        assert_eq!(second.repetitions, 2);
        assert_eq!(second.interval, 6);
        assert_eq!(
            second.due_at.unwrap().as_millis(),
            now().as_millis() + 6 * DAY
        );
    }

    #[test]
    fn test_later_success_uses_previous_ease() {
        let record = ReviewRecord {
            ease_factor: 2.0,
            interval: 6,
            repetitions: 2,
            due_at: None,
        };
        let next = schedule(record, q(3), now());
        assert_eq!(next.interval, 12);
        assert_eq!(next.repetitions, 3);
        // 2.0 + (0.1 - 2 * (0.08 + 2 * 0.02)) = 1.86
        assert!(approx_eq(next.ease_factor, 1.86));
    }

    #[test]
    fn test_interval_rounds() {
        let record = ReviewRecord {
            ease_factor: 2.5,
            interval: 7,
            repetitions: 3,
            due_at: None,
        };
        // 7 * 2.5 = 17.5
        assert_eq!(schedule(record, q(4), now()).interval, 18);
    }

    #[test]
    fn test_failure_resets() -> Fallible<()> {
        let record = ReviewRecord {
            ease_factor: 2.2,
            interval: 40,
            repetitions: 5,
            due_at: Some(now()),
        };
        for value in 0..3 {
            let next = schedule(record, Quality::new(value)?, now());
            assert_eq!(next.repetitions, 0);
            assert_eq!(next.interval, 1);
            assert!(approx_eq(next.ease_factor, 2.2));
            assert_eq!(next.due_at.unwrap().as_millis(), now().as_millis() + DAY);
        }
        Ok(())
    }

    #[test]
    fn test_ease_never_below_minimum() {
        let mut record = ReviewRecord {
            ease_factor: MIN_EASE,
            interval: 1,
            repetitions: 0,
            due_at: None,
        };
        for _ in 0..20 {
            record = schedule(record, q(3), now());
            assert!(record.ease_factor >= MIN_EASE);
        }
        assert!(approx_eq(record.ease_factor, MIN_EASE));
    }

    #[test]
    fn test_is_due() {
        let record = ReviewRecord::default();
        assert!(record.is_due(now()));
        let scheduled = schedule(record, q(4), now());
        assert!(!scheduled.is_due(now()));
        assert!(scheduled.is_due(now().plus_days(1)));
    }

    #[test]
    fn test_deserialize_partial_record() -> Fallible<()> {
        let record: ReviewRecord = serde_json::from_str(r#"{"interval": 6}"#)?;
        assert_eq!(record.interval, 6);
        assert_eq!(record.repetitions, 0);
        assert!(approx_eq(record.ease_factor, INITIAL_EASE));
        assert_eq!(record.due_at, None);
        Ok(())
    }

    #[test]
    fn test_long_success_streak() {
        let mut record = ReviewRecord::default();
        for _ in 0..30 {
            record = schedule(record, q(4), now());
            assert!(record.interval <= MAX_INTERVAL);
        }
        assert_eq!(record.repetitions, 30);
        assert_eq!(record.interval, MAX_INTERVAL);
        assert_eq!(
            record.due_at.unwrap().as_millis(),
            now().as_millis() + MAX_INTERVAL as i64 * DAY
        );
    }

    #[test]
    fn test_huge_interval_is_capped() {
        let record = ReviewRecord {
            ease_factor: 2.5,
            interval: 100_000_000,
            repetitions: 2,
            due_at: None,
        };
        let next = schedule(record, q(4), now());
        assert_eq!(next.interval, MAX_INTERVAL);
        assert_eq!(next.repetitions, 3);
    }

    #[test]
    fn test_repetitions_saturate() {
        let record = ReviewRecord {
            ease_factor: 2.5,
            interval: 6,
            repetitions: u32::MAX,
            due_at: None,
        };
        assert_eq!(schedule(record, q(4), now()).repetitions, u32::MAX);
    }

    #[test]
    fn test_loaded_record_is_bounded() -> Fallible<()> {
        let record: ReviewRecord =
            serde_json::from_str(r#"{"ef": 0.5, "interval": 4000000000, "reps": 2}"#)?;
        assert!(approx_eq(record.ease_factor, MIN_EASE));
        assert_eq!(record.interval, MAX_INTERVAL);
        assert_eq!(record.repetitions, 2);
        // A failed review keeps the ease, which must already be valid.
        let next = schedule(record, q(1), now());
        assert!(next.ease_factor >= MIN_EASE);
        Ok(())
    }
}
