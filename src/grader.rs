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

use serde::Deserialize;
use serde::Serialize;

/// A single exam question.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type")]
pub enum ExamItem {
    /// Pick one of several options.
    #[serde(rename = "mc")]
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        correct: usize,
    },
    /// Type the missing word.
    #[serde(rename = "fill")]
    FillBlank { prompt: String, answer: String },
    /// Arrange the parts into a sentence.
    #[serde(rename = "order")]
    WordOrder {
        prompt: String,
        parts: Vec<String>,
        answer: String,
    },
}

/// What the learner submitted for an item.
#[derive(Clone, PartialEq, Debug)]
pub enum Answer {
    Choice(usize),
    Text(String),
}

impl ExamItem {
    pub fn prompt(&self) -> &str {
        match self {
            ExamItem::MultipleChoice { prompt, .. } => prompt,
            ExamItem::FillBlank { prompt, .. } => prompt,
            ExamItem::WordOrder { prompt, .. } => prompt,
        }
    }

    /// Whether `answer` is correct. A missing answer, or an answer of the
    /// wrong kind, is incorrect.
    pub fn is_correct(&self, answer: Option<&Answer>) -> bool {
        match (self, answer) {
            (ExamItem::MultipleChoice { correct, .. }, Some(Answer::Choice(choice))) => {
                choice == correct
            }
            (ExamItem::FillBlank { answer: expected, .. }, Some(Answer::Text(text)))
            | (ExamItem::WordOrder { answer: expected, .. }, Some(Answer::Text(text))) => {
                normalize(text) == *expected
            }
            _ => false,
        }
    }
}

/// Trim and lower-case free-text input before comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Score `answers` (keyed by item index) against `pool`, as a percentage
/// rounded half up. An empty pool scores 0.
pub fn grade(pool: &[ExamItem], answers: &BTreeMap<usize, Answer>) -> u8 {
    if pool.is_empty() {
        return 0;
    }
    let correct = pool
        .iter()
        .enumerate()
        .filter(|(idx, item)| item.is_correct(answers.get(idx)))
        .count();
    percentage(correct, pool.len())
}

fn percentage(correct: usize, total: usize) -> u8 {
    let ratio = correct as f64 / total as f64;
    (ratio * 100.0).round() as u8
}
