// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logging backend's per-thread diagnostic store.

use super::context_map::ContextMap;
use std::cell::RefCell;
use std::fmt::Debug;

/// A logging backend's per-thread diagnostic store.
///
/// This is the first tier of the diagnostic context: the backend reads it when formatting
/// a log line on the thread that produced it, and copies it into log events it hands off
/// to other threads.  Every method acts on the calling thread's store.
///
/// Implementations must not panic; a failure to record context must never fail the build.
pub trait DiagnosticStore: Debug + Send + Sync {
    fn put(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    fn get(&self, key: &str) -> Option<String>;

    /**
    Copies the calling thread's entries, the way a log event captures them when it is created.
    */
    fn snapshot(&self) -> ContextMap;
}

thread_local! {
    static DIAGNOSTICS: RefCell<ContextMap> = const { RefCell::new(ContextMap::new()) };
}

/**
A diagnostic store kept in a plain thread-local.

All instances share the same per-thread storage, so any `ThreadLocalStore` sees what any
other wrote on the same thread.  Values are not inherited by spawned threads; that is what
the second tier in [`ContextPropagator`](super::ContextPropagator) is for.

```rust
use buildwise::context::{DiagnosticStore, ThreadLocalStore};

let store = ThreadLocalStore::new();
store.put("maven.mojo.goal", "compile");
assert_eq!(ThreadLocalStore::new().get("maven.mojo.goal").as_deref(), Some("compile"));
store.remove("maven.mojo.goal");
assert_eq!(store.get("maven.mojo.goal"), None);
```
*/
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ThreadLocalStore {}

impl ThreadLocalStore {
    pub const fn new() -> Self {
        Self {}
    }
}

// thread-locals are unavailable while the thread is being torn down; we just drop the write.
impl DiagnosticStore for ThreadLocalStore {
    fn put(&self, key: &str, value: &str) {
        let _ = DIAGNOSTICS.try_with(|d| d.borrow_mut().insert(key, value));
    }

    fn remove(&self, key: &str) {
        let _ = DIAGNOSTICS.try_with(|d| d.borrow_mut().remove(key));
    }

    fn get(&self, key: &str) -> Option<String> {
        DIAGNOSTICS
            .try_with(|d| d.borrow().get(key).map(str::to_owned))
            .ok()
            .flatten()
    }

    fn snapshot(&self) -> ContextMap {
        DIAGNOSTICS
            .try_with(|d| d.borrow().clone())
            .unwrap_or_default()
    }
}
