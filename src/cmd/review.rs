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

use std::io::BufRead;
use std::io::Write;

use crate::cmd::prompt::GradeInput;
use crate::cmd::prompt::read_grade;
use crate::cmd::prompt::read_line;
use crate::error::Fallible;
use crate::workspace::Workspace;

/// Drill the flashcards of the current level that are due now.
pub fn review_cards(
    ws: &mut Workspace,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Fallible<()> {
    let level = ws.session.state().level;
    let now = ws.session.moment().now;
    let due = ws.session.state().review.due_cards(level, ws.content(), now);
    if due.is_empty() {
        writeln!(out, "No cards due. Come back later!")?;
        return Ok(());
    }
    writeln!(out, "{} cards due.", due.len())?;
    let total = due.len();
    let mut reviewed = 0;
    for (idx, card) in due.iter().enumerate() {
        let Some(entry) = ws.content().vocab_entry(card).cloned() else {
            continue;
        };
        writeln!(out)?;
        writeln!(out, "[{}/{total}] {}", idx + 1, entry.de)?;
        if let Some(tip) = &entry.tip {
            writeln!(out, "Hint: {tip}")?;
        }
        ws.speak(&entry.de);
        writeln!(out, "[press enter to reveal]")?;
        if read_line(input)?.is_none() {
            break;
        }
        writeln!(out, "{}", entry.ru)?;
        match read_grade(input, out)? {
            GradeInput::Grade(quality) => {
                let record = ws.session.grade_card(card, quality);
                reviewed += 1;
                writeln!(out, "Next review in {} day(s).", record.interval)?;
            }
            GradeInput::Quit => break,
        }
    }
    writeln!(out)?;
    writeln!(out, "Reviewed {reviewed} of {total} cards.")?;
    Ok(())
}
