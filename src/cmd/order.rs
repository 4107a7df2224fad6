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

use crate::cmd::prompt::read_line;
use crate::error::Fallible;
use crate::grader::ExamItem;
use crate::workspace::Workspace;

/// Fallback drill for levels whose exam has no word-order item.
fn default_item() -> ExamItem {
    ExamItem::WordOrder {
        prompt: "Соберите предложение".to_string(),
        parts: vec!["ich".to_string(), "bin".to_string(), "hier".to_string()],
        answer: String::new(),
    }
}

/// Ask the learner to arrange words into a sentence.
pub fn word_order(
    ws: &mut Workspace,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Fallible<()> {
    let item = ws
        .content()
        .word_order_item()
        .cloned()
        .unwrap_or_else(default_item);
    let ExamItem::WordOrder {
        prompt,
        parts,
        answer,
    } = &item
    else {
        return Ok(());
    };
    writeln!(out, "{prompt}")?;
    writeln!(out, "Words: {}", parts.join(" / "))?;
    write!(out, "> ")?;
    out.flush()?;
    let Some(sentence) = read_line(input)? else {
        return Ok(());
    };
    if ws.session.check_word_order(&item, &sentence) {
        writeln!(out, "Correct!")?;
    } else {
        writeln!(out, "Almost. The correct answer is: {answer}")?;
    }
    Ok(())
}
