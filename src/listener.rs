//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::model::{Lifecycle, MojoExecution, Project, Session};

/**
Observes build lifecycle transitions.

Register with [`LifecycleNotifier::add_listener`](crate::LifecycleNotifier::add_listener).
Every hook has an empty default, so implement only what you need.

Hooks run synchronously on the thread driving the build, with the live descriptors.  When a
project or mojo hook runs, the diagnostic context for that project or mojo is already in
place (start hooks) or still in place (finish hooks).

```rust
use buildwise::{LifecycleListener, Project};

#[derive(Debug)]
struct Timer;

impl LifecycleListener for Timer {
    fn on_project_build_start(&self, project: &Project) {
        println!("starting {project}");
    }
}
```
*/
pub trait LifecycleListener: Send + Sync {
    /// Called once, before any project is built.
    fn on_session_start(&self, _session: &Session) {}

    /// Called once, after the last project has finished.
    fn on_session_finish(&self, _session: &Session) {}

    /// Called after the project's context has been written.
    fn on_project_build_start(&self, _project: &Project) {}

    /// Called while the project's context is still present; it is removed afterwards.
    fn on_project_build_finish(&self, _project: &Project) {}

    /**
    Called before each mojo runs, after the mojo's context has been written.

    There is no matching finish hook.
    */
    fn on_mojo_execution_start(
        &self,
        _project: &Project,
        _lifecycle: &Lifecycle,
        _execution: &MojoExecution,
    ) {
    }
}

/*
Boilerplate notes.

# LifecycleListener

Listeners are registered by identity, so PartialEq/Hash on the trait would be misleading.
Debug isn't required: listeners are often closures-in-a-struct that have nothing useful to print.
Send/Sync are required since a parallel build notifies from several threads at once.
*/
