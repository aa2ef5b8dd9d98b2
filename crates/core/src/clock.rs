// SPDX-License-Identifier: MIT
// Copyright (c) 2026 LogWatch contributors

//! Clock abstraction for testable date/time stamping.
//!
//! The Service Manager stamps every data and marker record with an ISO
//! date and a local `HH:MM:SS` time. Routing that through
//! a trait instead of calling `chrono::Local::now()` directly keeps the
//! sequence-monotonicity and replay-order tests deterministic.

use chrono::Local;

pub trait Clock: Clone + Send + Sync + 'static {
    /// Current local date as `YYYY-MM-DD`.
    fn date(&self) -> String;
    /// Current local time as `HH:MM:SS`.
    fn time(&self) -> String;
}

#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn date(&self) -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    fn time(&self) -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FakeClock {
    stamp: std::sync::Arc<parking_lot::Mutex<(String, String)>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self { stamp: std::sync::Arc::new(parking_lot::Mutex::new((date.into(), time.into()))) }
    }

    pub fn set(&self, date: impl Into<String>, time: impl Into<String>) {
        *self.stamp.lock() = (date.into(), time.into());
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FakeClock {
    fn date(&self) -> String {
        self.stamp.lock().0.clone()
    }

    fn time(&self) -> String {
        self.stamp.lock().1.clone()
    }
}
