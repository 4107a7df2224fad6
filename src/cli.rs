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

use std::io::stdin;
use std::io::stdout;

use clap::Parser;
use clap::Subcommand;

use crate::cmd::exam::take_exam;
use crate::cmd::learn::learn;
use crate::cmd::order::word_order;
use crate::cmd::quiz::run_quiz;
use crate::cmd::review::review_cards;
use crate::cmd::settings::set_level;
use crate::cmd::settings::settings;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::status::print_status;
use crate::error::Fallible;
use crate::types::level::Level;
use crate::workspace::Workspace;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the learner's data. Defaults to the current directory.
    #[arg(long, global = true)]
    directory: Option<String>,
    /// Course file to use instead of the built-in curriculum.
    #[arg(long, global = true)]
    curriculum: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show level, XP, streak and cards due.
    Status,
    /// Switch to another level.
    Level {
        #[arg(value_enum)]
        level: Level,
    },
    /// Review the flashcards that are due.
    Review,
    /// Study vocabulary and grammar, and do the listening tasks.
    Learn,
    /// Put words in the right order.
    Order,
    /// Take a generated practice quiz.
    Quiz {
        /// Seed for a reproducible quiz.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Take the level exam.
    Exam,
    /// Print progress statistics.
    Stats {
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// View or change preferences.
    Settings {
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        /// Dark mode.
        #[arg(long)]
        dark: Option<bool>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let mut ws = Workspace::open(cli.directory, cli.curriculum)?;
    log::debug!("Using data directory {}", ws.directory.display());
    let mut input = stdin().lock();
    let mut out = stdout().lock();
    match cli.command {
        Command::Status => print_status(&ws, &mut out),
        Command::Level { level } => set_level(&mut ws, level, &mut out),
        Command::Review => review_cards(&mut ws, &mut input, &mut out),
        Command::Learn => learn(&mut ws, &mut input, &mut out),
        Command::Order => word_order(&mut ws, &mut input, &mut out),
        Command::Quiz { seed } => run_quiz(&mut ws, seed, &mut input, &mut out),
        Command::Exam => take_exam(&mut ws, &mut input, &mut out),
        Command::Stats { format } => print_stats(&ws, format, &mut out),
        Command::Settings { name, dark } => settings(&mut ws, name, dark, &mut out),
    }
}
