//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# buildwise

buildwise turns build lifecycle events into diagnostic logging context.

# The problem

A parallel build interleaves the output of many projects and plugin goals.  A log line that
says `Compiling 12 source files` is useless unless you know *which* project and *which*
execution emitted it.  Threading that information through every call that might log is not an
option: the code doing the logging belongs to plugins that know nothing about it.

The usual answer is a per-thread diagnostic context ("MDC"): a small key/value map the logging
backend consults when it formats a line.  buildwise keeps that map in step with the build.

# The pieces

* [`LifecycleNotifier`] receives lifecycle transitions (session, project build, mojo
  execution) from the build driver, updates the context, and forwards each transition to
  registered [`LifecycleListener`]s in registration order.
* [`context::ContextPropagator`] writes project and mojo state into the context under the
  fixed keys in [`key`], e.g. `maven.project.id` and `maven.mojo.id`.
* [`context::lookup`] reads a key back for a log event, falling back to the calling thread's
  inherited context when the event did not capture it.
* [`ContextPattern`] renders `%X{key}` placeholders in a log format pattern through `lookup`.

```rust
use buildwise::{Lifecycle, LifecycleNotifier, MojoExecution, Project};
use buildwise::context::{ContextMap, lookup};

let notifier = LifecycleNotifier::default();
let project = Project::new("com.acme", "widget", "1.0").with_basedir(std::env::temp_dir());
let lifecycle = Lifecycle::new("default", ["compile"]);
let compile = MojoExecution::new("org.apache.maven.plugins", "maven-compiler-plugin", "compile")
    .with_execution_id("default-compile");

notifier.notify_project_build_start(&project);
notifier.notify_mojo_execution_start(&project, &lifecycle, &compile);

let event = ContextMap::new();
assert_eq!(lookup(&event, "maven.project.id").as_deref(), Some("com.acme:widget:1.0"));
assert_eq!(
    lookup(&event, "maven.mojo.id").as_deref(),
    Some("org.apache.maven.plugins:maven-compiler-plugin:compile")
);

notifier.notify_mojo_execution_finish(&project, &compile);
notifier.notify_project_build_finish(&project);
assert_eq!(lookup(&event, "maven.project.id"), None);
```

# Best effort

Nothing in the context or notification path returns an error.  Missing data (a project that is
not on disk, an execution without a version) yields less context, never a failed build.

# Multithreading

The context is per thread.  Rust threads don't inherit thread-locals, so a worker that should
see its parent's context must be started with [`context::spawn`], or its future wrapped in
[`context::InheritContext`].
*/

pub mod context;
pub mod key;
mod listener;
mod model;
mod notifier;
pub mod pattern;
mod recording_listener;
mod snapshot;
mod sys;

logwise::declare_logging_domain!();

pub use key::ContextKey;
pub use listener::LifecycleListener;
pub use model::{Lifecycle, MojoExecution, Project, Session};
pub use notifier::LifecycleNotifier;
pub use pattern::{ContextPattern, PatternError};
pub use recording_listener::RecordingListener;
pub use sys::JoinHandle;
