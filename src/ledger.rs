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

use serde::Deserialize;
use serde::Serialize;

use crate::types::date::Date;

/// XP needed to fill the progress bar once.
const MILESTONE_XP: u64 = 150;

/// XP earned on one calendar day.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ActivityEntry {
    pub date: Date,
    pub xp: u64,
}

/// A point on the XP chart.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct ChartPoint {
    /// Month and day, e.g. `03-14`.
    pub date: String,
    pub xp: u64,
}

/// Experience points and daily activity.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Ledger {
    pub total_xp: u64,
    /// One entry per active day, oldest first.
    pub history: Vec<ActivityEntry>,
}

impl Ledger {
    /// Award `amount` XP on `today`.
    pub fn add_xp(&mut self, amount: u64, today: Date) {
        match self.history.last_mut() {
            Some(last) if last.date == today => {
                last.xp += amount;
            }
            _ => {
                self.history.push(ActivityEntry {
                    date: today,
                    xp: amount,
                });
            }
        }
        self.total_xp += amount;
    }

    /// Number of consecutive active days up to today. A streak that ended
    /// yesterday is still alive until the end of today.
    pub fn streak(&self, today: Date) -> u32 {
        let mut entries = self.history.iter().rev().peekable();
        let mut expected = match entries.peek() {
            Some(last) if last.date == today => today,
            Some(last) if Some(last.date) == today.yesterday() => last.date,
            _ => return 0,
        };
        let mut streak = 0;
        for entry in entries {
            if entry.date != expected {
                break;
            }
            streak += 1;
            match expected.yesterday() {
                Some(prev) => expected = prev,
                None => break,
            }
        }
        streak
    }

    /// XP per active day, for plotting. Shows today at zero when there is
    /// no history yet.
    pub fn chart(&self, today: Date) -> Vec<ChartPoint> {
        if self.history.is_empty() {
            return vec![ChartPoint {
                date: today.short_label(),
                xp: 0,
            }];
        }
        self.history
            .iter()
            .map(|entry| ChartPoint {
                date: entry.date.short_label(),
                xp: entry.xp,
            })
            .collect()
    }

    /// Percent progress toward the next XP milestone.
    pub fn milestone_progress(&self) -> u8 {
        let within = self.total_xp % MILESTONE_XP;
        (within * 100 / MILESTONE_XP).min(100) as u8
    }

    pub fn xp_on(&self, date: Date) -> u64 {
        self.history
            .iter()
            .rev()
            .find(|entry| entry.date == date)
            .map(|entry| entry.xp)
            .unwrap_or(0)
    }
}
