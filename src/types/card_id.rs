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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::level::Level;

const SEPARATOR: char = '|';

/// Identifies a vocabulary entry within a level by its German front text.
///
/// Persisted as `<level>|<front>`, e.g. `A1|Danke`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CardId {
    level: Level,
    front: String,
}

impl CardId {
    pub fn new(level: Level, front: impl Into<String>) -> Self {
        Self {
            level,
            front: front.into(),
        }
    }

    #[cfg(test)]
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn parse(s: &str) -> Fallible<Self> {
        let (level, front) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| ErrorReport::new(format!("invalid card key: {s}")))?;
        Ok(Self::new(level.parse()?, front))
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.level, SEPARATOR, self.front)
    }
}

impl Serialize for CardId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        CardId::parse(&string).map_err(D::Error::custom)
    }
}
