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

use std::env::current_dir;
use std::path::Path;
use std::path::PathBuf;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::curriculum::Curriculum;
use crate::curriculum::LevelContent;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::session::Session;
use crate::speech::Speaker;
use crate::speech::speaker_from_config;
use crate::storage::DATABASE_FILE_NAME;
use crate::storage::SqliteStorage;

/// Everything a command needs: the learner's session, the course content
/// and the configured side channels.
pub struct Workspace {
    pub directory: PathBuf,
    pub config: Config,
    pub curriculum: Curriculum,
    pub session: Session,
    pub speaker: Box<dyn Speaker>,
}

impl Workspace {
    pub fn open(directory: Option<String>, curriculum: Option<String>) -> Fallible<Self> {
        Self::open_with_clock(directory, curriculum, Box::new(SystemClock))
    }

    pub fn open_with_clock(
        directory: Option<String>,
        curriculum: Option<String>,
        clock: Box<dyn Clock>,
    ) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let curriculum = match curriculum {
            Some(path) => Curriculum::from_path(Path::new(&path))?,
            None => Curriculum::builtin()?,
        };

        let db_path: PathBuf = directory.join(DATABASE_FILE_NAME);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let storage = SqliteStorage::new(db_path)?;
        let session = Session::open(Box::new(storage), clock, config.rewards.clone());
        let speaker = speaker_from_config(&config.speech);

        Ok(Self {
            directory,
            config,
            curriculum,
            session,
            speaker,
        })
    }

    /// Content of the learner's current level.
    pub fn content(&self) -> &LevelContent {
        self.curriculum.level(self.session.state().level)
    }

    /// Read German text aloud.
    pub fn speak(&mut self, text: &str) {
        self.speaker.speak(text, &self.config.speech.language);
    }
}

/// A workspace in a fresh temporary directory, with speech disabled.
#[cfg(test)]
pub fn temp_workspace() -> Fallible<(tempfile::TempDir, Workspace)> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join(crate::config::CONFIG_FILE_NAME),
        "[speech]\nenabled = false\n",
    )?;
    let path = dir.path().display().to_string();
    let ws = Workspace::open(Some(path), None)?;
    Ok((dir, ws))
}
