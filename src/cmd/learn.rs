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

use crate::cmd::prompt::print_options;
use crate::cmd::prompt::read_choice;
use crate::cmd::prompt::read_line;
use crate::error::Fallible;
use crate::workspace::Workspace;

/// Show the level's vocabulary and grammar, then run its listening tasks.
pub fn learn(ws: &mut Workspace, input: &mut dyn BufRead, out: &mut dyn Write) -> Fallible<()> {
    let content = ws.content().clone();
    writeln!(out, "{}", content.title)?;
    writeln!(out)?;
    writeln!(out, "Vocabulary:")?;
    for entry in &content.vocab {
        match &entry.tip {
            Some(tip) => writeln!(out, "  {} = {} ({tip})", entry.de, entry.ru)?,
            None => writeln!(out, "  {} = {}", entry.de, entry.ru)?,
        }
    }
    for rule in &content.grammar {
        writeln!(out)?;
        writeln!(out, "{}", rule.title)?;
        writeln!(out, "  {}", rule.rule)?;
        for example in &rule.examples {
            writeln!(out, "  - {example}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Hear the words and examples read aloud? [y/N]")?;
    let Some(answer) = read_line(input)? else {
        return Ok(());
    };
    if answer.trim().eq_ignore_ascii_case("y") {
        let words = content.vocab.iter().map(|entry| entry.de.as_str());
        let examples = content
            .grammar
            .iter()
            .flat_map(|rule| rule.examples.iter().map(String::as_str));
        for text in words.chain(examples) {
            writeln!(out, "  {text} [enter to hear, s to stop]")?;
            match read_line(input)? {
                None => return Ok(()),
                Some(line) if line.trim().eq_ignore_ascii_case("s") => break,
                Some(_) => ws.speak(text),
            }
        }
    }
    for task in &content.listening {
        writeln!(out)?;
        writeln!(out, "Listening. [press enter to play]")?;
        if read_line(input)?.is_none() {
            return Ok(());
        }
        ws.speak(&task.text);
        writeln!(out, "Question: {}", task.question)?;
        print_options(out, &task.options)?;
        let Some(choice) = read_choice(input, out, task.options.len())? else {
            return Ok(());
        };
        if ws.session.answer_listening(task, choice) {
            writeln!(out, "Excellent!")?;
        } else {
            writeln!(out, "Not bad, listen again. Transcript: {}", task.text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::speech::RecordingSpeaker;
    use crate::workspace::temp_workspace;

    const LISTENING_TEXT: &str = "Guten Morgen! Wie geht's? Mir geht es gut, danke.";

    #[test]
    fn test_listening_correct() -> Fallible<()> {
        let (_dir, mut ws) = temp_workspace()?;
        let mut out = Vec::new();
        learn(&mut ws, &mut Cursor::new("\n\n1\n"), &mut out)?;
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Guten Morgen = Доброе утро (формальное)"));
        assert!(out.contains("  - Ich bin Alex."));
        assert!(out.contains("Excellent!"));
        assert_eq!(ws.session.state().ledger.total_xp, 10);
        Ok(())
    }

    #[test]
    fn test_listening_wrong() -> Fallible<()> {
        let (_dir, mut ws) = temp_workspace()?;
        let mut out = Vec::new();
        learn(&mut ws, &mut Cursor::new("\n\n3\n"), &mut out)?;
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Transcript: Guten Morgen!"));
        assert_eq!(ws.session.state().ledger.total_xp, 2);
        Ok(())
    }

    #[test]
    fn test_hear_words_then_stop() -> Fallible<()> {
        let (_dir, mut ws) = temp_workspace()?;
        let speaker = RecordingSpeaker::default();
        ws.speaker = Box::new(speaker.clone());
        let mut out = Vec::new();
        learn(&mut ws, &mut Cursor::new("y\n\n\ns\n\n1\n"), &mut out)?;
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("  Guten Morgen [enter to hear, s to stop]"));
        assert_eq!(
            *speaker.spoken.borrow(),
            vec!["Guten Morgen", "Wie geht's?", LISTENING_TEXT]
        );
        assert_eq!(ws.session.state().ledger.total_xp, 10);
        Ok(())
    }

    #[test]
    fn test_declining_speech_speaks_only_listening() -> Fallible<()> {
        let (_dir, mut ws) = temp_workspace()?;
        let speaker = RecordingSpeaker::default();
        ws.speaker = Box::new(speaker.clone());
        learn(&mut ws, &mut Cursor::new("n\n\n1\n"), &mut Vec::new())?;
        assert_eq!(*speaker.spoken.borrow(), vec![LISTENING_TEXT]);
        Ok(())
    }

    #[test]
    fn test_end_of_input_awards_nothing() -> Fallible<()> {
        let (_dir, mut ws) = temp_workspace()?;
        learn(&mut ws, &mut Cursor::new(""), &mut Vec::new())?;
        assert_eq!(ws.session.state().ledger.total_xp, 0);
        Ok(())
    }
}
