// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes build lifecycle state into both tiers of the diagnostic context.

use super::context_map::EventProperties;
use super::inheritable;
use super::store::{DiagnosticStore, ThreadLocalStore};
use crate::key::ContextKey;
use crate::model::{MojoExecution, Project};
use std::sync::Arc;

/// Mirrors project and mojo state into the diagnostic context of the calling thread.
///
/// Every write goes to two places: the logging backend's [`DiagnosticStore`], and this
/// crate's inheritable per-thread map.  The second copy exists for log events that are
/// formatted on a thread that never saw the first one (see [`lookup`]).
///
/// Nothing here reports failure.  Missing or unusable input produces less context, not an
/// error.
///
/// # Examples
///
/// ```rust
/// use buildwise::context::{ContextMap, ContextPropagator};
/// use buildwise::MojoExecution;
///
/// let propagator = ContextPropagator::default();
/// let execution = MojoExecution::new("org.apache.maven.plugins", "maven-compiler-plugin", "compile")
///     .with_execution_id("custom-compile");
///
/// propagator.set_mojo_context(Some(&execution));
/// assert_eq!(
///     propagator.lookup(&ContextMap::new(), "maven.mojo.id").as_deref(),
///     Some("org.apache.maven.plugins:maven-compiler-plugin:compile:custom-compile"),
/// );
///
/// propagator.clear_mojo_context();
/// assert_eq!(propagator.lookup(&ContextMap::new(), "maven.mojo.id"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ContextPropagator {
    store: Arc<dyn DiagnosticStore>,
}

impl Default for ContextPropagator {
    fn default() -> Self {
        Self::new(Arc::new(ThreadLocalStore::new()))
    }
}

impl ContextPropagator {
    /// Creates a propagator whose first-tier writes go to `store`.
    pub fn new(store: Arc<dyn DiagnosticStore>) -> Self {
        Self { store }
    }

    /// The backend store this propagator writes to.
    pub fn store(&self) -> &Arc<dyn DiagnosticStore> {
        &self.store
    }

    fn put(&self, key: ContextKey, value: &str) {
        self.store.put(key.as_str(), value);
        inheritable::put(key.as_str(), value);
    }

    fn put_opt(&self, key: ContextKey, value: Option<&str>) {
        match value {
            Some(value) => self.put(key, value),
            None => self.remove(key),
        }
    }

    fn remove(&self, key: ContextKey) {
        self.store.remove(key.as_str());
        inheritable::remove(key.as_str());
    }

    /// Puts `project` into the calling thread's context.
    ///
    /// Only projects that live on disk are recorded.  A missing project, or one without an
    /// existing base directory (a standalone invocation), leaves the context untouched.
    pub fn set_project_context(&self, project: Option<&Project>) {
        let Some(project) = project else {
            return;
        };
        let Some(basedir) = project.basedir().filter(|b| b.exists()) else {
            logwise::debuginternal_sync!(
                "Not a project on disk, skipping context for {project}",
                project = project.id()
            );
            return;
        };
        let basedir = std::path::absolute(basedir).unwrap_or_else(|_| basedir.to_path_buf());
        self.put(ContextKey::ProjectId, &project.id());
        self.put(ContextKey::ProjectGroupId, project.group_id());
        self.put(ContextKey::ProjectArtifactId, project.artifact_id());
        self.put(ContextKey::ProjectBasedir, &basedir.to_string_lossy());
        self.put_opt(ContextKey::ProjectLogdir, log_dir(project).as_deref());
    }

    /// Removes all project keys from the calling thread's context.
    ///
    /// Safe to call whether or not [`set_project_context`](Self::set_project_context)
    /// recorded anything.
    pub fn clear_project_context(&self, project: Option<&Project>) {
        if project.is_none() {
            return;
        }
        for key in ContextKey::PROJECT {
            self.remove(key);
        }
    }

    /// Puts `execution` into the calling thread's context.
    pub fn set_mojo_context(&self, execution: Option<&MojoExecution>) {
        let Some(execution) = execution else {
            return;
        };
        self.put(ContextKey::MojoId, &mojo_id(execution));
        self.put(ContextKey::MojoGroupId, execution.group_id());
        self.put(ContextKey::MojoArtifactId, execution.artifact_id());
        self.put_opt(ContextKey::MojoVersion, execution.version());
        self.put(ContextKey::MojoGoal, execution.goal());
    }

    /// Removes all mojo keys from the calling thread's context.
    pub fn clear_mojo_context(&self) {
        for key in ContextKey::MOJO {
            self.remove(key);
        }
    }

    /// See [`lookup`].
    pub fn lookup(&self, event: &impl EventProperties, key: &str) -> Option<String> {
        lookup(event, key)
    }
}

/// Resolves `key` for a log event.
///
/// The event's own captured properties win.  When the event did not capture the key (it was
/// produced on a thread whose backend store lacked it), the calling thread's inherited
/// context answers instead.  This makes the function suitable as a value resolver in a log
/// format pattern run by an asynchronous appender.
pub fn lookup(event: &impl EventProperties, key: &str) -> Option<String> {
    match event.property(key) {
        Some(value) => Some(value.to_owned()),
        None => inheritable::inherited_value(key),
    }
}

/// `groupId:artifactId:goal`, plus `:executionId` unless the id is the default one.
///
/// ```rust
/// use buildwise::MojoExecution;
/// use buildwise::context::mojo_id;
///
/// let compile = MojoExecution::new("org.apache.maven.plugins", "maven-compiler-plugin", "compile");
/// assert_eq!(
///     mojo_id(&compile.clone().with_execution_id("default-compile")),
///     "org.apache.maven.plugins:maven-compiler-plugin:compile"
/// );
/// assert_eq!(
///     mojo_id(&compile.with_execution_id("custom-compile")),
///     "org.apache.maven.plugins:maven-compiler-plugin:compile:custom-compile"
/// );
/// ```
pub fn mojo_id(execution: &MojoExecution) -> String {
    let mut id = format!(
        "{}:{}:{}",
        execution.group_id(),
        execution.artifact_id(),
        execution.goal()
    );
    let custom_id = execution
        .execution_id()
        .filter(|_| !execution.has_default_execution_id());
    if let Some(execution_id) = custom_id {
        id.push(':');
        id.push_str(execution_id);
    }
    id
}

/// The conventional per-project log directory: the build output directory.
pub fn log_dir(project: &Project) -> Option<String> {
    project
        .build_directory()
        .map(|d| d.to_string_lossy().into_owned())
}
