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

use serde::Serialize;

use crate::types::review::ReviewEvent;
use crate::types::window::Window;

/// Number of reviews whose day falls inside the window.
pub fn reviews_in_window<'a>(
    events: impl IntoIterator<Item = &'a ReviewEvent>,
    window: Window,
) -> usize {
    events
        .into_iter()
        .filter(|e| window.contains(e.date.date()))
        .count()
}

/// Reviews per day over the whole window, idle days included. Rounded to one
/// decimal place.
pub fn learning_pace(reviews: usize, window: Window) -> f64 {
    let per_day = reviews as f64 / f64::from(window.days());
    (per_day * 10.0).round() / 10.0
}

/// Estimated time spent studying, assuming every review takes the same
/// number of seconds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StudyTime {
    pub hours: u64,
    pub minutes: u64,
}

impl StudyTime {
    pub fn estimate(reviews: usize, seconds_per_review: u32) -> Self {
        let seconds = reviews as u64 * u64::from(seconds_per_review);
        // Round to the nearest minute.
        let minutes = (seconds + 30) / 60;
        Self {
            hours: minutes / 60,
            minutes: minutes % 60,
        }
    }
}

impl Display for StudyTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

impl Serialize for StudyTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
