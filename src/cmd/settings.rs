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

use std::io::Write;

use crate::error::Fallible;
use crate::types::level::Level;
use crate::workspace::Workspace;

pub fn set_level(ws: &mut Workspace, level: Level, out: &mut dyn Write) -> Fallible<()> {
    ws.session.set_level(level);
    writeln!(out, "Level set to {}.", ws.content().title)?;
    Ok(())
}

/// Update preferences. With no options, print the current ones.
pub fn settings(
    ws: &mut Workspace,
    name: Option<String>,
    dark: Option<bool>,
    out: &mut dyn Write,
) -> Fallible<()> {
    if let Some(name) = name {
        ws.session.set_name(&name);
    }
    if let Some(dark) = dark {
        ws.session.set_dark(dark);
    }
    let state = ws.session.state();
    writeln!(out, "Name: {}", state.name)?;
    writeln!(out, "Dark mode: {}", if state.dark { "on" } else { "off" })?;
    Ok(())
}
