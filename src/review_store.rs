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

use crate::curriculum::LevelContent;
use crate::sm2::ReviewRecord;
use crate::types::card_id::CardId;
use crate::types::level::Level;
use crate::types::timestamp::Timestamp;

/// Scheduling state of every card the learner has graded.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Debug)]
#[serde(transparent)]
pub struct ReviewStore {
    records: BTreeMap<CardId, ReviewRecord>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, card: &CardId) -> Option<&ReviewRecord> {
        self.records.get(card)
    }

    /// The card's record, or a fresh one if it was never graded.
    pub fn record_or_default(&self, card: &CardId) -> ReviewRecord {
        self.get(card).copied().unwrap_or_default()
    }

    /// Insert a record, replacing any previous one for the card.
    pub fn upsert(&mut self, card: CardId, record: ReviewRecord) {
        self.records.insert(card, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Cards of the level that are due at `now`, in curriculum order. A card
    /// without a record is due.
    pub fn due_cards(&self, level: Level, content: &LevelContent, now: Timestamp) -> Vec<CardId> {
        content
            .card_ids(level)
            .into_iter()
            .filter(|card| match self.get(card) {
                None => true,
                Some(record) => record.is_due(now),
            })
            .collect()
    }
}
