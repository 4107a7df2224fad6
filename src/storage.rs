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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::error::Fallible;

/// The key the learner's state is stored under.
pub const STATE_KEY: &str = "deutschme_state_v1";

/// File name of the on-disk store inside the data directory.
pub const DATABASE_FILE_NAME: &str = "deutschme.db";

/// A string key-value store.
pub trait Storage {
    fn get(&self, key: &str) -> Fallible<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Fallible<()>;
}

/// Key-value storage in a SQLite database.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let sql = "select value from store where key = ?;";
        let value: Option<String> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let sql = "insert or replace into store (key, value) values (?, ?);";
        tx.execute(sql, (key, value))?;
        tx.commit()?;
        Ok(())
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["store"], |row| row.get(0))?;
    Ok(count > 0)
}

/// In-memory storage, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    pub values: std::collections::HashMap<String, String>,
    /// When set, every write fails.
    pub read_only: bool,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Fallible<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Fallible<()> {
        if self.read_only {
            return crate::error::fail("storage is read-only.");
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::error::ErrorReport;

    #[test]
    fn test_sqlite_round_trip() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DATABASE_FILE_NAME);
        let path = path.to_str().ok_or_else(|| ErrorReport::new("invalid path"))?;
        let mut storage = SqliteStorage::new(path)?;
        assert_eq!(storage.get(STATE_KEY)?, None);
        storage.set(STATE_KEY, "{}")?;
        storage.set(STATE_KEY, "{\"xp\":1}")?;
        assert_eq!(storage.get(STATE_KEY)?.as_deref(), Some("{\"xp\":1}"));

        // Reopening finds the existing schema and data.
        drop(storage);
        let storage = SqliteStorage::new(path)?;
        assert_eq!(storage.get(STATE_KEY)?.as_deref(), Some("{\"xp\":1}"));
        Ok(())
    }

    #[test]
    fn test_memory_read_only() {
        let mut storage = MemoryStorage {
            read_only: true,
            ..Default::default()
        };
        assert!(storage.set(STATE_KEY, "{}").is_err());
    }
}
