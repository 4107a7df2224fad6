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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::curriculum::LevelContent;
use crate::curriculum::VocabEntry;
use crate::grader::normalize;

/// Maximum number of vocabulary questions in a quiz.
const MAX_VOCAB_QUESTIONS: usize = 5;

/// Wrong options offered next to each correct translation.
const DISTRACTORS: usize = 2;

/// A practice question. Unlike exam items, quiz items are generated and
/// each answer is scored on its own.
#[derive(Clone, PartialEq, Debug)]
pub enum QuizItem {
    /// Pick the translation of a German word.
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        answer: String,
    },
    /// Type a word missing from a grammar example.
    FillBlank { prompt: String, answer: String },
}

impl QuizItem {
    pub fn prompt(&self) -> &str {
        match self {
            QuizItem::MultipleChoice { prompt, .. } => prompt,
            QuizItem::FillBlank { prompt, .. } => prompt,
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            QuizItem::MultipleChoice { answer, .. } => answer,
            QuizItem::FillBlank { answer, .. } => answer,
        }
    }

    /// Multiple choice compares the chosen option text; fill-in compares
    /// normalized input.
    pub fn check(&self, response: &str) -> bool {
        match self {
            QuizItem::MultipleChoice { answer, .. } => response == answer,
            QuizItem::FillBlank { answer, .. } => normalize(response) == *answer,
        }
    }
}

/// Build a quiz for a level. `rng` drives distractor choice and option
/// order.
pub fn make_quiz<R: Rng + ?Sized>(content: &LevelContent, rng: &mut R) -> Vec<QuizItem> {
    let mut items = Vec::new();
    for correct in content.vocab.iter().take(MAX_VOCAB_QUESTIONS) {
        items.push(vocab_question(correct, &content.vocab, rng));
    }
    if let Some(rule) = content.grammar.first() {
        let answer = rule
            .examples
            .first()
            .and_then(|example| example.split_whitespace().nth(1))
            .map(normalize)
            .unwrap_or_default();
        items.push(QuizItem::FillBlank {
            prompt: format!("Вставьте пропущенное слово ({})", rule.title),
            answer,
        });
    }
    items
}

fn vocab_question<R: Rng + ?Sized>(
    correct: &VocabEntry,
    vocab: &[VocabEntry],
    rng: &mut R,
) -> QuizItem {
    let others: Vec<&VocabEntry> = vocab.iter().filter(|entry| *entry != correct).collect();
    let mut options: Vec<String> = vec![correct.ru.clone()];
    options.extend(
        others
            .choose_multiple(rng, DISTRACTORS)
            .map(|entry| entry.ru.clone()),
    );
    options.shuffle(rng);
    QuizItem::MultipleChoice {
        prompt: format!("Перевод: {}", correct.de),
        options,
        answer: correct.ru.clone(),
    }
}
