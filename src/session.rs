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

use crate::clock::Clock;
use crate::config::Rewards;
use crate::curriculum::ListeningTask;
use crate::error::Fallible;
use crate::grader::Answer;
use crate::grader::ExamItem;
use crate::grader::grade;
use crate::ledger::ActivityEntry;
use crate::ledger::Ledger;
use crate::quiz::QuizItem;
use crate::review_store::ReviewStore;
use crate::sm2::Quality;
use crate::sm2::ReviewRecord;
use crate::sm2::schedule;
use crate::storage::STATE_KEY;
use crate::storage::Storage;
use crate::types::card_id::CardId;
use crate::types::date::Date;
use crate::types::level::Level;
use crate::types::timestamp::Timestamp;

const DEFAULT_NAME: &str = "Студент";

/// Everything the app remembers about the learner.
#[derive(Clone, PartialEq, Debug)]
pub struct SessionState {
    pub level: Level,
    pub ledger: Ledger,
    pub review: ReviewStore,
    /// Last exam score per level, in percent.
    pub exam_results: BTreeMap<Level, u8>,
    pub name: String,
    pub dark: bool,
}

/// The time at which an action happens.
#[derive(Clone, Copy, Debug)]
pub struct Moment {
    pub now: Timestamp,
    pub today: Date,
}

impl Moment {
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self {
            now: clock.now(),
            today: clock.today(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            level: Level::A1,
            ledger: Ledger::default(),
            review: ReviewStore::new(),
            exam_results: BTreeMap::new(),
            name: DEFAULT_NAME.to_string(),
            dark: false,
        }
    }
}

// Each operation below leaves `self` untouched and returns the next state.
impl SessionState {
    pub fn set_level(&self, level: Level) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    pub fn set_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn set_dark(&self, dark: bool) -> Self {
        Self {
            dark,
            ..self.clone()
        }
    }

    pub fn add_xp(&self, amount: u64, today: Date) -> Self {
        let mut next = self.clone();
        next.ledger.add_xp(amount, today);
        next
    }

    /// Reschedule a flashcard and award XP for the review.
    pub fn grade_card(
        &self,
        card: &CardId,
        quality: Quality,
        at: Moment,
        rewards: &Rewards,
    ) -> (Self, ReviewRecord) {
        let record = schedule(self.review.record_or_default(card), quality, at.now);
        log::debug!(
            "{card} q={quality} EF={:.2} I={}d reps={}",
            record.ease_factor,
            record.interval,
            record.repetitions
        );
        let mut next = self.clone();
        next.review.upsert(card.clone(), record);
        let xp = if quality.is_success() {
            rewards.card_success
        } else {
            rewards.card_failure
        };
        next.ledger.add_xp(xp, at.today);
        (next, record)
    }

    pub fn answer_listening(
        &self,
        task: &ListeningTask,
        choice: usize,
        today: Date,
        rewards: &Rewards,
    ) -> (Self, bool) {
        let correct = task.is_correct(choice);
        let xp = if correct {
            rewards.listening_correct
        } else {
            rewards.listening_wrong
        };
        (self.add_xp(xp, today), correct)
    }

    pub fn check_word_order(
        &self,
        item: &ExamItem,
        sentence: &str,
        today: Date,
        rewards: &Rewards,
    ) -> (Self, bool) {
        let correct = item.is_correct(Some(&Answer::Text(sentence.to_string())));
        let xp = if correct {
            rewards.order_correct
        } else {
            rewards.order_wrong
        };
        (self.add_xp(xp, today), correct)
    }

    pub fn answer_quiz(
        &self,
        item: &QuizItem,
        response: &str,
        today: Date,
        rewards: &Rewards,
    ) -> (Self, bool) {
        let correct = item.check(response);
        let xp = if correct {
            rewards.quiz_correct
        } else {
            rewards.quiz_wrong
        };
        (self.add_xp(xp, today), correct)
    }

    /// Grade an exam for the current level, record the score and award the
    /// exam bonus.
    pub fn submit_exam(
        &self,
        pool: &[ExamItem],
        answers: &BTreeMap<usize, Answer>,
        today: Date,
        rewards: &Rewards,
    ) -> (Self, u8) {
        let percent = grade(pool, answers);
        let mut next = self.clone();
        next.exam_results.insert(self.level, percent);
        next.ledger.add_xp(rewards.exam_bonus, today);
        (next, percent)
    }
}

/// The persisted shape of [`SessionState`].
#[derive(Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct StateDocument {
    level: Level,
    xp: u64,
    review: ReviewStore,
    history: Vec<ActivityEntry>,
    name: Option<String>,
    exam_results: BTreeMap<Level, u8>,
    dark: bool,
}

impl From<StateDocument> for SessionState {
    fn from(doc: StateDocument) -> Self {
        Self {
            level: doc.level,
            ledger: Ledger {
                total_xp: doc.xp,
                history: doc.history,
            },
            review: doc.review,
            exam_results: doc.exam_results,
            name: doc.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            dark: doc.dark,
        }
    }
}

impl From<&SessionState> for StateDocument {
    fn from(state: &SessionState) -> Self {
        Self {
            level: state.level,
            xp: state.ledger.total_xp,
            review: state.review.clone(),
            history: state.ledger.history.clone(),
            name: Some(state.name.clone()),
            exam_results: state.exam_results.clone(),
            dark: state.dark,
        }
    }
}

/// Read the learner's state. Missing or unreadable data yields the default
/// state.
pub fn load_or_default(storage: &dyn Storage) -> SessionState {
    let content = match storage.get(STATE_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => {
            log::debug!("No saved state, starting fresh.");
            return SessionState::default();
        }
        Err(e) => {
            log::warn!("Could not read saved state: {e}");
            return SessionState::default();
        }
    };
    match serde_json::from_str::<StateDocument>(&content) {
        Ok(doc) => doc.into(),
        Err(e) => {
            log::warn!("Saved state is corrupt, starting fresh: {e}");
            SessionState::default()
        }
    }
}

/// Write the whole state under [`STATE_KEY`].
pub fn save(storage: &mut dyn Storage, state: &SessionState) -> Fallible<()> {
    let json = serde_json::to_string(&StateDocument::from(state))?;
    storage.set(STATE_KEY, &json)?;
    log::debug!("Saved state ({} bytes).", json.len());
    Ok(())
}

/// A learner's state together with where it is persisted. Every change is
/// written through to storage immediately.
pub struct Session {
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    rewards: Rewards,
    state: SessionState,
}

impl Session {
    pub fn open(storage: Box<dyn Storage>, clock: Box<dyn Clock>, rewards: Rewards) -> Self {
        let state = load_or_default(storage.as_ref());
        Self {
            storage,
            clock,
            rewards,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn moment(&self) -> Moment {
        Moment::from_clock(self.clock.as_ref())
    }

    /// Replace the state and persist it. A failed write is logged; the
    /// in-memory state stays current either way.
    fn commit(&mut self, next: SessionState) {
        self.state = next;
        if let Err(e) = save(self.storage.as_mut(), &self.state) {
            log::warn!("Could not save state: {e}");
        }
    }

    pub fn set_level(&mut self, level: Level) {
        let next = self.state.set_level(level);
        self.commit(next);
    }

    pub fn set_name(&mut self, name: &str) {
        let next = self.state.set_name(name);
        self.commit(next);
    }

    pub fn set_dark(&mut self, dark: bool) {
        let next = self.state.set_dark(dark);
        self.commit(next);
    }

    pub fn grade_card(&mut self, card: &CardId, quality: Quality) -> ReviewRecord {
        let (next, record) = self
            .state
            .grade_card(card, quality, self.moment(), &self.rewards);
        self.commit(next);
        record
    }

    pub fn answer_listening(&mut self, task: &ListeningTask, choice: usize) -> bool {
        let today = self.moment().today;
        let (next, correct) = self
            .state
            .answer_listening(task, choice, today, &self.rewards);
        self.commit(next);
        correct
    }

    pub fn check_word_order(&mut self, item: &ExamItem, sentence: &str) -> bool {
        let today = self.moment().today;
        let (next, correct) = self
            .state
            .check_word_order(item, sentence, today, &self.rewards);
        self.commit(next);
        correct
    }

    pub fn answer_quiz(&mut self, item: &QuizItem, response: &str) -> bool {
        let today = self.moment().today;
        let (next, correct) = self.state.answer_quiz(item, response, today, &self.rewards);
        self.commit(next);
        correct
    }

    pub fn submit_exam(&mut self, pool: &[ExamItem], answers: &BTreeMap<usize, Answer>) -> u8 {
        let today = self.moment().today;
        let (next, percent) = self.state.submit_exam(pool, answers, today, &self.rewards);
        self.commit(next);
        percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::curriculum::Curriculum;
    use crate::sm2::MAX_INTERVAL;
    use crate::sm2::MIN_EASE;
    use crate::storage::MemoryStorage;

    const DAY: i64 = 86_400_000;

    fn moment() -> Moment {
        Moment {
            now: Timestamp::from_millis(1_741_910_400_000).unwrap(),
            today: Date::parse("2025-03-14").unwrap(),
        }
    }

    fn clock() -> Box<dyn Clock> {
        let at = moment();
        Box::new(FixedClock {
            now: at.now,
            today: at.today,
        })
    }

    #[test]
    fn test_default_state() {
        let state = SessionState::default();
        assert_eq!(state.level, Level::A1);
        assert_eq!(state.ledger.total_xp, 0);
        assert_eq!(state.review.len(), 0);
        assert!(state.exam_results.is_empty());
        assert_eq!(state.name, "Студент");
        assert!(!state.dark);
    }

    #[test]
    fn test_operations_do_not_mutate() {
        let state = SessionState::default();
        let next = state.set_level(Level::B1).add_xp(5, moment().today);
        assert_eq!(state, SessionState::default());
        assert_eq!(next.level, Level::B1);
        assert_eq!(next.ledger.total_xp, 5);
    }

    #[test]
    fn test_grade_card_first_success() -> Fallible<()> {
        let state = SessionState::default();
        let card = CardId::new(Level::A1, "Danke");
        let (next, record) =
            state.grade_card(&card, Quality::new(4)?, moment(), &Rewards::default());
        assert_eq!(record.repetitions, 1);
        assert_eq!(record.interval, 1);
        assert_eq!(record.due_at.unwrap().as_millis(), moment().now.as_millis() + DAY);
        assert_eq!(next.review.get(&card), Some(&record));
        assert_eq!(next.ledger.total_xp, 8);
        Ok(())
    }

    #[test]
    fn test_grade_card_failure_xp() -> Fallible<()> {
        let card = CardId::new(Level::A1, "Danke");
        let (next, _) = SessionState::default().grade_card(
            &card,
            Quality::new(1)?,
            moment(),
            &Rewards::default(),
        );
        assert_eq!(next.ledger.total_xp, 3);
        Ok(())
    }

    #[test]
    fn test_submit_exam() -> Fallible<()> {
        let curriculum = Curriculum::builtin()?;
        let state = SessionState::default().set_level(Level::A2);
        let pool = &curriculum.level(Level::A2).exam;
        let answers = BTreeMap::from([
            (0, Answer::Choice(1)),
            (1, Answer::Text("habe".to_string())),
        ]);
        let (next, percent) =
            state.submit_exam(pool, &answers, moment().today, &Rewards::default());
        assert_eq!(percent, 67);
        assert_eq!(next.exam_results.get(&Level::A2), Some(&67));
        assert_eq!(next.exam_results.get(&Level::A1), None);
        assert_eq!(next.ledger.total_xp, 50);
        Ok(())
    }

    #[test]
    fn test_listening_and_word_order_rewards() -> Fallible<()> {
        let curriculum = Curriculum::builtin()?;
        let content = curriculum.level(Level::A1);
        let rewards = Rewards::default();
        let today = moment().today;
        let state = SessionState::default();

        let (state, ok) = state.answer_listening(&content.listening[0], 0, today, &rewards);
        assert!(ok);
        let (state, ok) = state.answer_listening(&content.listening[0], 2, today, &rewards);
        assert!(!ok);
        assert_eq!(state.ledger.total_xp, 12);

        let item = content.word_order_item().unwrap();
        let (state, ok) = state.check_word_order(item, "Ich komme aus Berlin ", today, &rewards);
        assert!(ok);
        let (state, ok) = state.check_word_order(item, "aus Berlin komme ich", today, &rewards);
        assert!(!ok);
        assert_eq!(state.ledger.total_xp, 12 + 12 + 4);
        assert_eq!(state.ledger.history.len(), 1);
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Fallible<()> {
        let mut storage = MemoryStorage::default();
        let card = CardId::new(Level::A1, "Wie geht's?");
        let (state, _) = SessionState::default()
            .set_name("Alex")
            .set_dark(true)
            .grade_card(&card, Quality::new(3)?, moment(), &Rewards::default());
        let (state, _) =
            state.submit_exam(&[], &BTreeMap::new(), moment().today, &Rewards::default());
        save(&mut storage, &state)?;
        let loaded = load_or_default(&storage);
        assert_eq!(loaded, state);
        Ok(())
    }

    #[test]
    fn test_load_missing() {
        let storage = MemoryStorage::default();
        assert_eq!(load_or_default(&storage), SessionState::default());
    }

    #[test]
    fn test_load_corrupt() {
        let mut storage = MemoryStorage::default();
        storage
            .values
            .insert(STATE_KEY.to_string(), "{not json".to_string());
        assert_eq!(load_or_default(&storage), SessionState::default());
    }

    #[test]
    fn test_load_legacy_document() -> Fallible<()> {
        let mut storage = MemoryStorage::default();
        let json = r#"{
            "level": "A2",
            "streak": 0,
            "xp": 61,
            "review": {"A2|Bahnhof": {"ef": 2.36, "interval": 1, "reps": 0, "due": 1741996800000}},
            "history": [{"date": "2025-03-13", "xp": 11}, {"date": "2025-03-14", "xp": 50}],
            "name": "Маша",
            "examResults": {"A1": 100},
            "dark": true
        }"#;
        storage.values.insert(STATE_KEY.to_string(), json.to_string());
        let state = load_or_default(&storage);
        assert_eq!(state.level, Level::A2);
        assert_eq!(state.ledger.total_xp, 61);
        assert_eq!(state.ledger.history.len(), 2);
        assert_eq!(state.name, "Маша");
        assert_eq!(state.exam_results.get(&Level::A1), Some(&100));
        assert!(state.dark);
        let record = state.review.get(&CardId::new(Level::A2, "Bahnhof")).unwrap();
        assert_eq!(record.interval, 1);
        Ok(())
    }

    #[test]
    fn test_load_out_of_range_record() -> Fallible<()> {
        let mut storage = MemoryStorage::default();
        let json = r#"{
            "level": "A1",
            "review": {
                "A1|Danke": {"ef": 0.5, "interval": 4000000000, "reps": 2, "due": 0}
            }
        }"#;
        storage.values.insert(STATE_KEY.to_string(), json.to_string());
        let state = load_or_default(&storage);
        let card = CardId::new(Level::A1, "Danke");
        let record = state.review.get(&card).unwrap();
        assert!(record.ease_factor >= MIN_EASE);
        assert_eq!(record.interval, MAX_INTERVAL);

        let (next, record) =
            state.grade_card(&card, Quality::new(3)?, moment(), &Rewards::default());
        assert_eq!(record.interval, MAX_INTERVAL);
        assert_eq!(record.repetitions, 3);
        assert!(record.ease_factor >= MIN_EASE);
        assert!(record.due_at.unwrap() > moment().now);
        assert_eq!(next.review.get(&card), Some(&record));
        Ok(())
    }

    #[test]
    fn test_session_writes_through() -> Fallible<()> {
        let mut session = Session::open(
            Box::new(MemoryStorage::default()),
            clock(),
            Rewards::default(),
        );
        let card = CardId::new(Level::A1, "Danke");
        let record = session.grade_card(&card, Quality::new(4)?);
        assert_eq!(record.repetitions, 1);
        assert_eq!(session.state().ledger.total_xp, 8);

        let saved = load_or_default(session.storage.as_ref());
        assert_eq!(&saved, session.state());
        Ok(())
    }

    #[test]
    fn test_session_survives_failed_save() {
        let storage = MemoryStorage {
            read_only: true,
            ..Default::default()
        };
        let mut session = Session::open(Box::new(storage), clock(), Rewards::default());
        session.set_level(Level::B1);
        session.set_name("Alex");
        assert_eq!(session.state().level, Level::B1);
        assert_eq!(session.state().name, "Alex");
        assert_eq!(
            load_or_default(session.storage.as_ref()),
            SessionState::default()
        );
    }

    #[test]
    fn test_end_to_end() -> Fallible<()> {
        let curriculum = Curriculum::builtin()?;
        let content = curriculum.level(Level::A1);
        let mut session = Session::open(
            Box::new(MemoryStorage::default()),
            clock(),
            Rewards::default(),
        );
        let now = session.moment().now;
        let due = session.state().review.due_cards(Level::A1, content, now);
        assert_eq!(due.len(), 10);

        let record = session.grade_card(&due[0], Quality::new(4)?);
        assert_eq!(record.repetitions, 1);
        assert_eq!(record.interval, 1);
        assert_eq!(session.state().ledger.total_xp, 8);

        let due = session.state().review.due_cards(Level::A1, content, now);
        assert_eq!(due.len(), 9);
        assert_eq!(due[0].front(), "Wie geht's?");

        let answers = BTreeMap::from([(0, Answer::Choice(0))]);
        let percent = session.submit_exam(&content.exam, &answers);
        assert_eq!(percent, 33);
        assert_eq!(session.state().ledger.total_xp, 58);
        assert_eq!(session.state().ledger.streak(moment().today), 1);
        Ok(())
    }
}
