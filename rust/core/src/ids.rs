// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an element in the source model.
///
/// Hosts, conduits, exclusion zones and obstructions all carry the id the
/// external model query handed over. The core never interprets it beyond
/// equality, ordering and display; linked-model elements keep the id they
/// have in their own model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Raw id value as handed over by the model query.
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
