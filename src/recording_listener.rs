// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Recording Listener
//!
//! This module provides a listener that records every lifecycle callback in memory, for
//! testing code that drives a [`LifecycleNotifier`](crate::LifecycleNotifier) and for
//! checking what diagnostic context a listener would observe.
//!
//! Each callback becomes one line.  Project and mojo callbacks also record the value the
//! calling thread's inherited context held for `maven.project.id` / `maven.mojo.id` at the
//! time of the call, or `-` when it was absent.

use crate::context::{inherited_value, mojo_id};
use crate::key::{KEY_MOJO_ID, KEY_PROJECT_ID};
use crate::listener::LifecycleListener;
use crate::model::{Lifecycle, MojoExecution, Project, Session};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A listener that stores a line per callback in a `Vec<String>`.
///
/// # Example
///
/// ```rust
/// use buildwise::{LifecycleNotifier, Project, RecordingListener};
/// use std::sync::Arc;
///
/// let notifier = LifecycleNotifier::default();
/// let recorder = Arc::new(RecordingListener::new());
/// notifier.add_listener(recorder.clone());
///
/// // no basedir, so no context is recorded
/// let project = Project::new("com.acme", "widget", "1.0");
/// notifier.notify_project_build_start(&project);
/// notifier.notify_project_build_finish(&project);
///
/// assert_eq!(
///     recorder.drain_events(),
///     "project-build-start com.acme:widget:1.0 [-]\nproject-build-finish com.acme:widget:1.0 [-]"
/// );
/// ```
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<String>>,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Debug/Default: derived, empty buffer
// - Clone: NOT implemented - listeners are registered by identity, a clone would be a
//   different listener
// - PartialEq/Eq/Hash: NOT implemented for the same reason

fn context_or_dash(key: &str) -> String {
    inherited_value(key).unwrap_or_else(|| "-".to_string())
}

impl RecordingListener {
    /// Creates a listener with nothing recorded.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    // a panicking test thread shouldn't hide what was recorded before it
    fn events(&self) -> MutexGuard<'_, Vec<String>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: String) {
        self.events().push(event);
    }

    /// Drains all recorded events into a single string, clearing the internal buffer.
    ///
    /// Events are joined with newlines, oldest first.
    pub fn drain_events(&self) -> String {
        let mut events = self.events();
        let result = events.join("\n");
        events.clear();
        result
    }
}

impl LifecycleListener for RecordingListener {
    fn on_session_start(&self, _session: &Session) {
        self.record("session-start".to_string());
    }

    fn on_session_finish(&self, _session: &Session) {
        self.record("session-finish".to_string());
    }

    fn on_project_build_start(&self, project: &Project) {
        self.record(format!(
            "project-build-start {} [{}]",
            project.id(),
            context_or_dash(KEY_PROJECT_ID)
        ));
    }

    fn on_project_build_finish(&self, project: &Project) {
        self.record(format!(
            "project-build-finish {} [{}]",
            project.id(),
            context_or_dash(KEY_PROJECT_ID)
        ));
    }

    fn on_mojo_execution_start(
        &self,
        project: &Project,
        lifecycle: &Lifecycle,
        execution: &MojoExecution,
    ) {
        self.record(format!(
            "mojo-execution-start {} {} {} [{}]",
            project.id(),
            lifecycle.id(),
            mojo_id(execution),
            context_or_dash(KEY_MOJO_ID)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_clears_the_buffer() {
        let recorder = RecordingListener::new();
        recorder.on_session_start(&Session::default());
        recorder.on_session_finish(&Session::default());
        assert_eq!(recorder.drain_events(), "session-start\nsession-finish");
        assert_eq!(recorder.drain_events(), "");
    }
}
