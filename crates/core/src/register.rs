// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Single-character handles for endpoints, watches, and command registers.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Register(pub char);

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<char> for Register {
    fn from(c: char) -> Self {
        Register(c)
    }
}
