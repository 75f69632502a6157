// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inheritable second tier of the diagnostic context.
//!
//! Each thread owns its own [`ContextMap`].  Nothing is shared between threads: a child
//! thread or task receives a value copy taken when it is spawned.

use super::context_map::ContextMap;
use crate::sys;
use std::cell::RefCell;

thread_local! {
    // None until the first write on this thread
    static INHERITABLE: RefCell<Option<ContextMap>> = const { RefCell::new(None) };
}

pub(crate) fn put(key: &str, value: &str) {
    let _ = INHERITABLE.try_with(|i| {
        i.borrow_mut()
            .get_or_insert_with(ContextMap::new)
            .insert(key, value)
    });
}

pub(crate) fn remove(key: &str) {
    let _ = INHERITABLE.try_with(|i| {
        if let Some(map) = i.borrow_mut().as_mut() {
            map.remove(key);
        }
    });
}

/// Reads `key` from the calling thread's inheritable context.
///
/// This is the fallback [`ContextPropagator::lookup`](super::ContextPropagator::lookup)
/// uses when a log event did not capture the key.
pub fn inherited_value(key: &str) -> Option<String> {
    INHERITABLE
        .try_with(|i| {
            i.borrow()
                .as_ref()
                .and_then(|map| map.get(key))
                .map(str::to_owned)
        })
        .ok()
        .flatten()
}

/// Returns a copy of the calling thread's inheritable context.
///
/// Pass it to [`install_inherited`] on another thread to hand the context over.
pub fn inherited_snapshot() -> ContextMap {
    INHERITABLE
        .try_with(|i| i.borrow().clone().unwrap_or_default())
        .unwrap_or_default()
}

/// Replaces the calling thread's inheritable context, returning the previous one.
///
/// ```rust
/// use buildwise::context::{ContextMap, inherited_value, install_inherited};
///
/// let map: ContextMap = [("maven.mojo.goal", "compile")].into_iter().collect();
/// let previous = install_inherited(map);
/// assert_eq!(inherited_value("maven.mojo.goal").as_deref(), Some("compile"));
/// install_inherited(previous);
/// ```
pub fn install_inherited(map: ContextMap) -> ContextMap {
    INHERITABLE
        .try_with(|i| i.borrow_mut().replace(map).unwrap_or_default())
        .unwrap_or_default()
}

/// Spawns a thread that inherits the calling thread's context.
///
/// The inheritable context is copied at the time of the call.  Writes made afterwards, on
/// either thread, are not seen by the other.
///
/// ```rust
/// use buildwise::context::{ContextPropagator, ContextMap, spawn};
/// use buildwise::MojoExecution;
///
/// let propagator = ContextPropagator::default();
/// propagator.set_mojo_context(Some(&MojoExecution::new("g", "a", "compile")));
///
/// let goal = spawn(move || {
///     // the child has no diagnostic store entries of its own
///     propagator.lookup(&ContextMap::new(), "maven.mojo.goal")
/// })
/// .join()
/// .unwrap();
/// assert_eq!(goal.as_deref(), Some("compile"));
/// ```
pub fn spawn<F, T>(f: F) -> sys::JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let inherited = inherited_snapshot();
    sys::spawn(move || {
        install_inherited(inherited);
        f()
    })
}
