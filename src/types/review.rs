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

use serde::Serialize;

use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// A single past review of a card. Never modified once recorded.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
pub struct ReviewEvent {
    pub date: Timestamp,
    pub quality: Quality,
}

impl ReviewEvent {
    pub fn new(date: Timestamp, quality: Quality) -> Self {
        Self { date, quality }
    }
}
