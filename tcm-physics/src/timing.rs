/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Wall-clock accounting for named sections of a computation.
//!
//! A [`TimingSink`] accumulates time under a string key. [`TimingSink::timer`] returns a
//! guard that records the time between its construction and its drop:
//!
//! ```
//! use tcm_physics::timing::TimingSink;
//!
//! let sink = TimingSink::new();
//! {
//!     let _timer = sink.timer("g_matrix");
//!     // ...
//! }
//! assert!(sink.get("g_matrix").is_some());
//! ```
//!
//! [`TimingSink::report`] renders the accumulated table as
//!
//! ```text
//! [-----------------------------------]
//! [ chi_matrix |          0.005137020 ]
//! [   g_matrix |          0.000000075 ]
//! [-----------------------------------]
//! ```

use std::{
    collections::HashMap,
    io::Write,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
    time::{Duration, Instant},
};

/// Width of the time column of [`TimingSink::report`].
const TIME_WIDTH: usize = 20;

/// A thread-safe table of accumulated durations.
#[derive(Debug, Default)]
pub struct TimingSink {
    stats: Mutex<HashMap<String, Duration>>,
}

impl TimingSink {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave the table in a torn state, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Duration>> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `delta` to the time recorded under `name`, starting from zero if `name` has not
    /// been seen before.
    pub fn update(&self, name: &str, delta: Duration) {
        let mut stats = self.lock();
        match stats.get_mut(name) {
            Some(total) => *total += delta,
            None => {
                stats.insert(name.to_owned(), delta);
            }
        }
    }

    /// Return the total time recorded under `name`.
    pub fn get(&self, name: &str) -> Option<Duration> {
        self.lock().get(name).copied()
    }

    /// Return a guard that adds its lifetime to `name` when dropped.
    pub fn timer(&self, name: impl Into<String>) -> Timer<'_> {
        Timer {
            sink: self,
            name: name.into(),
            check_point: Instant::now(),
        }
    }

    /// Run `f` and record its wall-clock time under `name`.
    pub fn measure<F, R>(&self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _timer = self.timer(name);
        f()
    }

    /// Return a snapshot of all entries sorted by name.
    pub fn entries(&self) -> Vec<(String, Duration)> {
        let mut entries: Vec<_> = self
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Write the table of accumulated times in seconds, sorted by name.
    pub fn report<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        let entries = self.entries();
        let name_width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let hline = "-".repeat(name_width + TIME_WIDTH + 5);
        writeln!(out, "[{hline}]")?;
        for (name, time) in entries.iter() {
            writeln!(
                out,
                "[ {:>nw$} | {:>tw$.9} ]",
                name,
                time.as_secs_f64(),
                nw = name_width,
                tw = TIME_WIDTH
            )?;
        }
        writeln!(out, "[{hline}]")
    }

    /// [`Self::report`] into a `String`.
    pub fn report_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a `Vec` cannot fail.
        let _ = self.report(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Records the time between its construction and its drop into a [`TimingSink`].
#[must_use = "the time is recorded when the timer is dropped"]
pub struct Timer<'a> {
    sink: &'a TimingSink,
    name: String,
    check_point: Instant,
}

impl Timer<'_> {
    /// Time since construction.
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.check_point)
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink.update(&self.name, self.elapsed());
    }
}

/// A process-wide sink for callers that do not want to thread one through.
pub fn global() -> &'static TimingSink {
    static GLOBAL: OnceLock<TimingSink> = OnceLock::new();
    GLOBAL.get_or_init(TimingSink::new)
}

///////////
// Tests //
///////////
