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

use std::process::Child;
use std::process::Command;
use std::process::Stdio;

use crate::config::SpeechConfig;

/// Reads text aloud. Fire-and-forget: nothing is reported back.
pub trait Speaker {
    fn speak(&mut self, text: &str, language: &str);
}

/// Does nothing. Used when speech is disabled.
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, text: &str, _language: &str) {
        log::debug!("(silent) {text}");
    }
}

/// Remembers what it was asked to say.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

#[cfg(test)]
impl Speaker for RecordingSpeaker {
    fn speak(&mut self, text: &str, _language: &str) {
        self.spoken.borrow_mut().push(text.to_string());
    }
}

/// Speaks through an external text-to-speech program. At most one utterance
/// plays at a time: starting a new one stops the previous one.
pub struct CommandSpeaker {
    program: String,
    current: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: None,
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str, language: &str) {
        self.cancel();
        let spawned = Command::new(&self.program)
            .arg("-v")
            .arg(voice(language))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(e) => log::debug!("Could not run {}: {e}", self.program),
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Map a BCP 47 tag such as `de-DE` to an espeak voice name (`de`).
fn voice(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or(language)
        .to_lowercase()
}

/// Pick a speaker according to the configuration.
pub fn speaker_from_config(config: &SpeechConfig) -> Box<dyn Speaker> {
    if config.enabled {
        Box::new(CommandSpeaker::new(config.program.clone()))
    } else {
        Box::new(SilentSpeaker)
    }
}
