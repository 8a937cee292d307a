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
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;

pub const DATABASE_FILE_NAME: &str = "flashdeck.db";

/// A directory holding the database and, optionally, a config file.
pub struct Collection {
    pub directory: PathBuf,
    pub db: Database,
    pub config: Config,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
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

        let db = {
            let start = Instant::now();
            let db_path: PathBuf = directory.join(DATABASE_FILE_NAME);
            let db_path: &str = db_path
                .to_str()
                .ok_or_else(|| ErrorReport::new("invalid path"))?;
            let db = Database::new(db_path)?;
            let duration = start.elapsed().as_millis();
            log::debug!("Database opened in {duration}ms.");
            db
        };

        Ok(Self {
            directory,
            db,
            config,
        })
    }
}
