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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::grader::ExamItem;
use crate::types::card_id::CardId;
use crate::types::level::Level;

/// Course content for all levels. Read-only once loaded.
#[derive(Deserialize, Clone, Debug)]
pub struct Curriculum {
    #[serde(rename = "A1")]
    a1: LevelContent,
    #[serde(rename = "A2")]
    a2: LevelContent,
    #[serde(rename = "B1")]
    b1: LevelContent,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LevelContent {
    pub title: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub vocab: Vec<VocabEntry>,
    #[serde(default)]
    pub grammar: Vec<GrammarRule>,
    #[serde(default)]
    pub listening: Vec<ListeningTask>,
    #[serde(default)]
    pub exam: Vec<ExamItem>,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct VocabEntry {
    /// German text, shown on the front of the flashcard.
    pub de: String,
    /// Russian translation.
    pub ru: String,
    pub tip: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GrammarRule {
    pub title: String,
    pub rule: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ListeningTask {
    /// Transcript read aloud to the learner.
    pub text: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
}

impl ListeningTask {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

impl Curriculum {
    /// The course content shipped with the binary.
    pub fn builtin() -> Fallible<Self> {
        Self::parse(include_str!("curriculum.toml"))
    }

    pub fn from_path(path: &Path) -> Fallible<Self> {
        log::debug!("Loading curriculum from {}", path.display());
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let curriculum: Curriculum = toml::from_str(content)?;
        curriculum.validate()?;
        Ok(curriculum)
    }

    pub fn level(&self, level: Level) -> &LevelContent {
        match level {
            Level::A1 => &self.a1,
            Level::A2 => &self.a2,
            Level::B1 => &self.b1,
        }
    }

    /// Reject content that would make questions unanswerable.
    fn validate(&self) -> Fallible<()> {
        for level in Level::ALL {
            let content = self.level(level);
            for task in &content.listening {
                if task.correct >= task.options.len() {
                    return fail(format!(
                        "{level}: listening task '{}' has no option {}.",
                        task.question, task.correct
                    ));
                }
            }
            for item in &content.exam {
                if let ExamItem::MultipleChoice {
                    prompt,
                    options,
                    correct,
                } = item
                {
                    if *correct >= options.len() {
                        return fail(format!(
                            "{level}: exam question '{prompt}' has no option {correct}."
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl LevelContent {
    /// Card identities of this level's vocabulary, in curriculum order.
    pub fn card_ids(&self, level: Level) -> Vec<CardId> {
        self.vocab
            .iter()
            .map(|entry| CardId::new(level, entry.de.clone()))
            .collect()
    }

    pub fn vocab_entry(&self, card: &CardId) -> Option<&VocabEntry> {
        self.vocab.iter().find(|entry| entry.de == card.front())
    }

    /// The first word-order item of the exam pool, used for the drill.
    pub fn word_order_item(&self) -> Option<&ExamItem> {
        self.exam
            .iter()
            .find(|item| matches!(item, ExamItem::WordOrder { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() -> Fallible<()> {
        let curriculum = Curriculum::builtin()?;
        let a1 = curriculum.level(Level::A1);
        assert_eq!(a1.title, "A1: База");
        assert_eq!(a1.goals.len(), 5);
        assert_eq!(a1.vocab.len(), 10);
        assert_eq!(a1.vocab[0].de, "Guten Morgen");
        assert_eq!(a1.vocab[0].tip.as_deref(), Some("формальное"));
        assert_eq!(a1.vocab[2].tip, None);
        assert_eq!(a1.grammar[0].examples[0], "Ich bin Alex.");
        assert_eq!(a1.exam.len(), 3);
        assert_eq!(curriculum.level(Level::A2).vocab.len(), 5);
        assert_eq!(curriculum.level(Level::B1).exam.len(), 3);
        Ok(())
    }

    #[test]
    fn test_card_ids_in_order() -> Fallible<()> {
        let curriculum = Curriculum::builtin()?;
        let ids = curriculum.level(Level::A2).card_ids(Level::A2);
        let fronts: Vec<&str> = ids.iter().map(|id| id.front()).collect();
        assert_eq!(
            fronts,
            vec!["Rechnung", "Bahnhof", "Termin", "gestern", "nächste Woche"]
        );
        assert!(ids.iter().all(|id| id.level() == Level::A2));
        Ok(())
    }

    #[test]
    fn test_word_order_item() -> Fallible<()> {
        let curriculum = Curriculum::builtin()?;
        assert!(curriculum.level(Level::A1).word_order_item().is_some());
        assert!(curriculum.level(Level::A2).word_order_item().is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_listening_task() {
        let content = r#"
[A1]
title = "A1"

[[A1.listening]]
text = "Hallo"
question = "?"
options = ["a"]
correct = 3

[A2]
title = "A2"

[B1]
title = "B1"
"#;
        let err = Curriculum::parse(content).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: A1: listening task '?' has no option 3."
        );
    }

    #[test]
    fn test_missing_level() {
        let content = r#"
[A1]
title = "A1"
"#;
        assert!(Curriculum::parse(content).is_err());
    }
}
