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

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Fallible;
use crate::ledger::ChartPoint;
use crate::types::level::Level;
use crate::workspace::Workspace;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_stats(ws: &Workspace, format: StatsFormat, out: &mut dyn Write) -> Fallible<()> {
    let stats = get_stats(ws);
    match format {
        StatsFormat::Text => {
            writeln!(out, "Level: {}", stats.level)?;
            writeln!(out, "Total XP: {}", stats.total_xp)?;
            writeln!(out, "Streak: {}", stats.streak)?;
            writeln!(out, "Cards due: {}", stats.due_card_count)?;
            writeln!(out, "Cards reviewed: {}", stats.reviewed_card_count)?;
            for (level, percent) in &stats.exam_results {
                writeln!(out, "Exam {level}: {percent}%")?;
            }
            writeln!(out, "XP per day:")?;
            for point in &stats.chart {
                writeln!(out, "  {} {:>4} {}", point.date, point.xp, bar(point.xp))?;
            }
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            writeln!(out, "{stats_json}")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    level: Level,
    total_xp: u64,
    streak: u32,
    due_card_count: usize,
    reviewed_card_count: usize,
    exam_results: BTreeMap<Level, u8>,
    chart: Vec<ChartPoint>,
}

fn get_stats(ws: &Workspace) -> Stats {
    let state = ws.session.state();
    let moment = ws.session.moment();
    Stats {
        level: state.level,
        total_xp: state.ledger.total_xp,
        streak: state.ledger.streak(moment.today),
        due_card_count: state
            .review
            .due_cards(state.level, ws.content(), moment.now)
            .len(),
        reviewed_card_count: state.review.len(),
        exam_results: state.exam_results.clone(),
        chart: state.ledger.chart(moment.today),
    }
}

/// One `#` per ten XP.
fn bar(xp: u64) -> String {
    "#".repeat((xp / 10) as usize)
}
