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

use crate::error::Fallible;
use crate::sm2::Quality;

/// Read one line without its trailing newline. `None` at end of input.
pub fn read_line(input: &mut dyn BufRead) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask until the learner picks one of `count` options, numbered from 1.
/// Returns the zero-based index, or `None` at end of input.
pub fn read_choice(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    count: usize,
) -> Fallible<Option<usize>> {
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
            _ => writeln!(out, "Invalid input. Please enter a number between 1 and {count}.")?,
        }
    }
}

/// What the learner did with a revealed flashcard.
pub enum GradeInput {
    Grade(Quality),
    Quit,
}

/// Ask until the learner enters a grade from 0 to 4, or `q` to stop.
pub fn read_grade(input: &mut dyn BufRead, out: &mut dyn Write) -> Fallible<GradeInput> {
    loop {
        writeln!(
            out,
            "Grade: (0 = Blackout, 1 = Wrong, 2 = Hard, 3 = Good, 4 = Easy, q = Quit)"
        )?;
        let Some(line) = read_line(input)? else {
            return Ok(GradeInput::Quit);
        };
        let line = line.trim();
        if line == "q" {
            return Ok(GradeInput::Quit);
        }
        match line.parse::<u8>().map(Quality::new) {
            Ok(Ok(quality)) => return Ok(GradeInput::Grade(quality)),
            _ => writeln!(out, "Invalid input. Please enter a number between 0 and 4.")?,
        }
    }
}

/// Print options as a numbered list.
pub fn print_options(out: &mut dyn Write, options: &[String]) -> Fallible<()> {
    for (idx, option) in options.iter().enumerate() {
        writeln!(out, "  {}. {option}", idx + 1)?;
    }
    Ok(())
}
