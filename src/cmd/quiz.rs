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

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::cmd::prompt::print_options;
use crate::cmd::prompt::read_choice;
use crate::cmd::prompt::read_line;
use crate::error::Fallible;
use crate::quiz::QuizItem;
use crate::quiz::make_quiz;
use crate::workspace::Workspace;

/// Generate and run a quiz for the current level. A seed makes the quiz
/// reproducible.
pub fn run_quiz(
    ws: &mut Workspace,
    seed: Option<u64>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Fallible<()> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let items = make_quiz(ws.content(), &mut rng);
    let total = items.len();
    let mut correct = 0;
    for (idx, item) in items.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "[{}/{total}] {}", idx + 1, item.prompt())?;
        let response = match item {
            QuizItem::MultipleChoice { options, .. } => {
                print_options(out, options)?;
                read_choice(input, out, options.len())?.map(|choice| options[choice].clone())
            }
            QuizItem::FillBlank { .. } => {
                write!(out, "> ")?;
                out.flush()?;
                read_line(input)?
            }
        };
        let Some(response) = response else {
            break;
        };
        if ws.session.answer_quiz(item, &response) {
            correct += 1;
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "The correct answer is: {}", item.answer())?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{correct} of {total} correct.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::types::level::Level;
    use crate::workspace::temp_workspace;

    #[test]
    fn test_quiz_scores_each_answer() -> Fallible<()> {
        let (_dir, mut ws) = temp_workspace()?;
        ws.session.set_level(Level::A2);
        let quiz = make_quiz(ws.content(), &mut ChaCha8Rng::seed_from_u64(3));

        // Answer every multiple-choice question correctly, then miss the
        // fill-in.
        let mut script = String::new();
        for item in &quiz {
            if let QuizItem::MultipleChoice {
                options, answer, ..
            } = item
            {
                let pos = options.iter().position(|o| o == answer).unwrap();
                script.push_str(&format!("{}\n", pos + 1));
            }
        }
        script.push_str("hat\n");

        let mut out = Vec::new();
        run_quiz(&mut ws, Some(3), &mut Cursor::new(script), &mut out)?;
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("5 of 6 correct."));
        assert!(out.contains("The correct answer is: habe"));
        assert_eq!(ws.session.state().ledger.total_xp, 5 * 6 + 2);
        Ok(())
    }
}
