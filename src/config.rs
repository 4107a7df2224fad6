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

pub const CONFIG_FILE_NAME: &str = "deutschme.toml";

#[derive(Deserialize, Clone, Default, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub rewards: Rewards,
    pub speech: SpeechConfig,
}

/// XP awarded per learner action.
#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Rewards {
    /// Flashcard graded 3 or better.
    pub card_success: u64,
    pub card_failure: u64,
    pub listening_correct: u64,
    pub listening_wrong: u64,
    pub order_correct: u64,
    pub order_wrong: u64,
    pub quiz_correct: u64,
    pub quiz_wrong: u64,
    /// Flat bonus for finishing an exam, whatever the score.
    pub exam_bonus: u64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            card_success: 8,
            card_failure: 3,
            listening_correct: 10,
            listening_wrong: 2,
            order_correct: 12,
            order_wrong: 4,
            quiz_correct: 6,
            quiz_wrong: 2,
            exam_bonus: 50,
        }
    }
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// Text-to-speech program, invoked as `<program> -v <voice> <text>`.
    pub program: String,
    pub language: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "espeak-ng".to_string(),
            language: "de-DE".to_string(),
        }
    }
}

impl Config {
    /// Load `deutschme.toml` from the directory, or the defaults if there is
    /// none.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No config file, using defaults.");
            return Ok(Self::default());
        }
        log::debug!("Loading config from {}", path.display());
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        Ok(toml::from_str(content)?)
    }
}
