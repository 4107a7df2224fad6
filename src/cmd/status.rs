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

use std::io::Write;

use crate::error::Fallible;
use crate::workspace::Workspace;

/// Print the dashboard: level, XP, streak, due cards and exam result.
pub fn print_status(ws: &Workspace, out: &mut dyn Write) -> Fallible<()> {
    let state = ws.session.state();
    let moment = ws.session.moment();
    let content = ws.content();
    let due = state.review.due_cards(state.level, content, moment.now);

    writeln!(out, "Hallo, {}!", state.name)?;
    writeln!(out, "{}", content.title)?;
    writeln!(out)?;
    writeln!(
        out,
        "XP: {} ({}% to next milestone)",
        state.ledger.total_xp,
        state.ledger.milestone_progress()
    )?;
    writeln!(out, "Today: {} XP", state.ledger.xp_on(moment.today))?;
    writeln!(out, "Streak: {} day(s)", state.ledger.streak(moment.today))?;
    writeln!(out, "Cards due: {}", due.len())?;
    match state.exam_results.get(&state.level) {
        Some(percent) => writeln!(out, "Exam result: {percent}%")?,
        None => writeln!(out, "Exam result: —")?,
    }
    writeln!(out)?;
    writeln!(out, "Goals:")?;
    for goal in &content.goals {
        writeln!(out, "  - {goal}")?;
    }
    Ok(())
}
