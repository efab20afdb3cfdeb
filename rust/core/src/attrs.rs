// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric attribute sets attached to model elements.
//!
//! Authoring tools disagree on parameter spelling ("Diameter" vs
//! "Outside Diameter" vs "Nominal Diameter"), so lookups normalize keys and
//! probe candidate names in priority order.

use rustc_hash::FxHashMap;

/// Case-insensitive numeric attributes (values in millimetres)
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    values: FxHashMap<String, f64>,
}

fn normalize(key: &str) -> String {
    // "Outside Diameter" and "outside_diameter" address the same slot
    key.to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under the same
    /// normalized key
    pub fn insert(&mut self, key: &str, value: f64) {
        self.values.insert(normalize(key), value);
    }

    /// Look up a single attribute by name
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(&normalize(key)).copied()
    }

    /// First present attribute from a prioritized candidate list
    pub fn first_of(&self, candidates: &[&str]) -> Option<f64> {
        candidates.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}
