// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread-scoped diagnostic context for build lifecycle state.
//!
//! This module keeps a small key/value map per thread describing what the build is doing
//! right now (which project, which plugin goal) so that log lines can be annotated without
//! passing that state through every call.
//!
//! # Overview
//!
//! The context lives in two tiers:
//!
//! - A [`DiagnosticStore`]: the logging backend's own per-thread map.  The backend reads
//!   it when formatting a line on the same thread, and copies it into each log event.
//! - An inheritable per-thread [`ContextMap`] kept by this crate.  It mirrors every write
//!   to the first tier, and is handed to child threads and tasks by value when they are
//!   spawned.
//!
//! [`ContextPropagator`] writes both tiers.  [`lookup`] reads them back for a log event:
//! the event's captured properties first, then the calling thread's inherited map.
//!
//! ```rust
//! use buildwise::context::{ContextMap, ContextPropagator, lookup};
//! use buildwise::MojoExecution;
//!
//! let propagator = ContextPropagator::default();
//! propagator.set_mojo_context(Some(&MojoExecution::new("g", "a", "compile")));
//!
//! // An event that captured its own properties answers from them.
//! let event: ContextMap = [("maven.mojo.goal", "test")].into_iter().collect();
//! assert_eq!(lookup(&event, "maven.mojo.goal").as_deref(), Some("test"));
//!
//! // An event without them falls back to this thread's inherited context.
//! assert_eq!(lookup(&ContextMap::new(), "maven.mojo.goal").as_deref(), Some("compile"));
//! ```
//!
//! # Inheritance
//!
//! Rust threads don't inherit thread-locals.  Use [`spawn`] for threads and
//! [`InheritContext`] for futures; both copy the inheritable map at spawn time.
//! Threads started any other way begin with an empty inheritable map.
//!
//! ```rust
//! use buildwise::context::{ContextPropagator, InheritContext, inherited_value};
//! use buildwise::MojoExecution;
//!
//! let propagator = ContextPropagator::default();
//! propagator.set_mojo_context(Some(&MojoExecution::new("g", "a", "compile")));
//!
//! let task = InheritContext::capture(async { inherited_value("maven.mojo.goal") });
//! # let _ = task;
//! ```

mod apply_context;
mod context_map;
mod inheritable;
mod propagator;
mod store;

#[cfg(test)]
mod tests;

pub use apply_context::InheritContext;
pub use context_map::{ContextMap, EventProperties};
pub use inheritable::{inherited_snapshot, inherited_value, install_inherited, spawn};
pub use propagator::{ContextPropagator, log_dir, lookup, mojo_id};
pub use store::{DiagnosticStore, ThreadLocalStore};
