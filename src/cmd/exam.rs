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
use std::io::BufRead;
use std::io::Write;

use crate::cmd::prompt::print_options;
use crate::cmd::prompt::read_choice;
use crate::cmd::prompt::read_line;
use crate::error::Fallible;
use crate::grader::Answer;
use crate::grader::ExamItem;
use crate::workspace::Workspace;

/// Take the exam of the current level. Questions left unanswered at the end
/// of input count as wrong.
pub fn take_exam(
    ws: &mut Workspace,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Fallible<()> {
    let level = ws.session.state().level;
    let pool = ws.content().exam.clone();
    writeln!(out, "Exam {level}")?;
    let mut answers: BTreeMap<usize, Answer> = BTreeMap::new();
    for (idx, item) in pool.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "[{}/{}] {}", idx + 1, pool.len(), item.prompt())?;
        let answer = match item {
            ExamItem::MultipleChoice { options, .. } => {
                print_options(out, options)?;
                read_choice(input, out, options.len())?.map(Answer::Choice)
            }
            ExamItem::FillBlank { .. } => {
                write!(out, "> ")?;
                out.flush()?;
                read_line(input)?.map(Answer::Text)
            }
            ExamItem::WordOrder { parts, .. } => {
                writeln!(out, "Words: {}", parts.join(" / "))?;
                write!(out, "> ")?;
                out.flush()?;
                read_line(input)?.map(Answer::Text)
            }
        };
        match answer {
            Some(answer) => {
                answers.insert(idx, answer);
            }
            None => break,
        }
    }
    let percent = ws.session.submit_exam(&pool, &answers);
    writeln!(out)?;
    writeln!(out, "Result: {percent}%")?;
    Ok(())
}
