// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle notification for the buildwise system.
//!
//! This module provides [`LifecycleNotifier`], which forwards build lifecycle transitions to
//! registered [`LifecycleListener`]s and keeps the diagnostic context in step with them.
//!
//! # Architecture
//!
//! Listeners are held in a copy-on-write snapshot of `Arc<dyn LifecycleListener>`.
//! This design ensures:
//! - Dispatch never waits for registration, and registration never waits for a listener
//! - A listener may add or remove listeners (itself included) from inside a callback
//! - Listeners stay alive for the whole dispatch they were part of
//! - Compatible with WASM environments where blocking mutexes may not be available
//!
//! # Ordering
//!
//! Listeners are called in registration order.  The diagnostic context for a project or mojo
//! is written *before* the corresponding start hooks run and removed *after* the finish hooks
//! run, so every hook sees the context of the entity being entered or left.
//!
//! # Ownership
//!
//! There is no global notifier.  The component driving the build owns one and hands out
//! references (or an `Arc`) to whatever needs to register.
//!
//! # Examples
//!
//! ```
//! use buildwise::{LifecycleNotifier, RecordingListener, Session};
//! use std::sync::Arc;
//!
//! let notifier = LifecycleNotifier::default();
//! let recorder = Arc::new(RecordingListener::new());
//! notifier.add_listener(recorder.clone());
//!
//! notifier.notify_session_start(&Session::default());
//! assert_eq!(recorder.drain_events(), "session-start");
//! ```

use crate::context::ContextPropagator;
use crate::listener::LifecycleListener;
use crate::model::{Lifecycle, MojoExecution, Project, Session};
use crate::snapshot::SnapshotCell;
use std::sync::Arc;

type Listeners = Vec<Arc<dyn LifecycleListener>>;

/// Dispatches build lifecycle events and maintains the matching diagnostic context.
///
/// # Thread Safety
///
/// All methods take `&self` and can be called from any thread.  In a parallel build each
/// project's events arrive on the thread building it, and the context writes land in that
/// thread's context.
pub struct LifecycleNotifier {
    listeners: SnapshotCell<Listeners>,
    propagator: ContextPropagator,
}

impl std::fmt::Debug for LifecycleNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleNotifier")
            .field("listeners", &self.listeners.load().len())
            .field("propagator", &self.propagator)
            .finish()
    }
}

impl Default for LifecycleNotifier {
    fn default() -> Self {
        Self::new(ContextPropagator::default())
    }
}

/// Compares the data pointers only; vtable pointers for one type may differ across
/// codegen units.
fn same_listener(a: &Arc<dyn LifecycleListener>, b: &Arc<dyn LifecycleListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl LifecycleNotifier {
    /// Creates a notifier with no listeners whose context writes go through `propagator`.
    ///
    /// [`Default`] uses a propagator over the thread-local store.
    pub fn new(propagator: ContextPropagator) -> Self {
        Self {
            listeners: SnapshotCell::new(Vec::new()),
            propagator,
        }
    }

    /// The propagator that receives this notifier's context writes.
    pub fn propagator(&self) -> &ContextPropagator {
        &self.propagator
    }

    /// Appends a listener.
    ///
    /// Registering the same instance twice makes it receive each event twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use buildwise::{LifecycleNotifier, RecordingListener};
    /// use std::sync::Arc;
    ///
    /// let notifier = LifecycleNotifier::default();
    /// notifier.add_listener(Arc::new(RecordingListener::new()));
    /// assert_eq!(notifier.listeners().len(), 1);
    /// ```
    pub fn add_listener(&self, listener: Arc<dyn LifecycleListener>) {
        self.listeners.update(|current| {
            let mut next = current.clone();
            next.push(listener);
            next
        });
    }

    /// Removes every registration of `listener`.
    ///
    /// Listeners are matched by identity, not by value.  Removing a listener that was never
    /// added does nothing.  A dispatch already in progress still calls the removed listener.
    ///
    /// # Examples
    ///
    /// ```
    /// use buildwise::{LifecycleListener, LifecycleNotifier, RecordingListener};
    /// use std::sync::Arc;
    ///
    /// let notifier = LifecycleNotifier::default();
    /// let listener: Arc<dyn LifecycleListener> = Arc::new(RecordingListener::new());
    /// notifier.add_listener(listener.clone());
    ///
    /// // a different instance is not removed
    /// notifier.remove_listener(&(Arc::new(RecordingListener::new()) as Arc<dyn LifecycleListener>));
    /// assert_eq!(notifier.listeners().len(), 1);
    ///
    /// notifier.remove_listener(&listener);
    /// assert!(notifier.listeners().is_empty());
    /// ```
    pub fn remove_listener(&self, listener: &Arc<dyn LifecycleListener>) {
        if !self.listeners.load().iter().any(|l| same_listener(l, listener)) {
            return;
        }
        self.listeners.update(|current| {
            current
                .iter()
                .filter(|l| !same_listener(l, listener))
                .cloned()
                .collect()
        });
    }

    /// The current listeners, in registration order.
    pub fn listeners(&self) -> Arc<Listeners> {
        self.listeners.load()
    }

    fn dispatch(&self, event: &'static str, f: impl Fn(&dyn LifecycleListener)) {
        let listeners = self.listeners.load();
        let count = listeners.len();
        logwise::debuginternal_sync!(
            "Dispatching {event} to {count} listeners",
            event = event,
            count = count
        );
        for listener in listeners.iter() {
            f(listener.as_ref());
        }
    }

    /// Calls every listener's session start hook.  The context is not touched.
    pub fn notify_session_start(&self, session: &Session) {
        self.dispatch("session start", |l| l.on_session_start(session));
    }

    /// Calls every listener's session finish hook.  The context is not touched.
    pub fn notify_session_finish(&self, session: &Session) {
        self.dispatch("session finish", |l| l.on_session_finish(session));
    }

    /// Establishes the project's context, then calls the start hooks.
    pub fn notify_project_build_start(&self, project: &Project) {
        self.propagator.set_project_context(Some(project));
        self.dispatch("project build start", |l| l.on_project_build_start(project));
    }

    /// Calls the finish hooks, then removes the project's context.
    pub fn notify_project_build_finish(&self, project: &Project) {
        self.dispatch("project build finish", |l| l.on_project_build_finish(project));
        self.propagator.clear_project_context(Some(project));
    }

    /// Establishes the mojo's context, then calls the start hooks.
    pub fn notify_mojo_execution_start(
        &self,
        project: &Project,
        lifecycle: &Lifecycle,
        execution: &MojoExecution,
    ) {
        self.propagator.set_mojo_context(Some(execution));
        self.dispatch("mojo execution start", |l| {
            l.on_mojo_execution_start(project, lifecycle, execution)
        });
    }

    /// Removes the mojo's context.  Listeners are not called.
    pub fn notify_mojo_execution_finish(&self, _project: &Project, _execution: &MojoExecution) {
        self.propagator.clear_mojo_context();
    }
}
