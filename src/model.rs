// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only descriptors for the build tool's lifecycle model.
//!
//! The build tool owns sessions, projects and executions; this crate only reads them.
//! These types carry exactly what the diagnostic context and listeners need.
//!
//! ```rust
//! use buildwise::{MojoExecution, Project};
//!
//! let project = Project::new("com.acme", "widget", "1.0")
//!     .with_basedir("/repo/widget")
//!     .with_build_directory("/repo/widget/target");
//! assert_eq!(project.id(), "com.acme:widget:1.0");
//!
//! let execution = MojoExecution::new("org.apache.maven.plugins", "maven-compiler-plugin", "compile")
//!     .with_execution_id("default-compile");
//! assert_eq!(execution.goal(), "compile");
//! ```

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// A project in the build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Project {
    group_id: String,
    artifact_id: String,
    version: String,
    basedir: Option<PathBuf>,
    build_directory: Option<PathBuf>,
}

impl Project {
    /// Creates a project from its coordinates, with no directories.
    ///
    /// A project without a base directory is treated as a standalone invocation and gets no
    /// diagnostic context.
    ///
    /// ```rust
    /// use buildwise::Project;
    /// let project = Project::new("com.acme", "widget", "1.0");
    /// assert_eq!(project.basedir(), None);
    /// assert_eq!(project.to_string(), "com.acme:widget:1.0");
    /// ```
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            basedir: None,
            build_directory: None,
        }
    }

    /// Sets the directory containing the project's build file.
    ///
    /// Relative paths are resolved against the current directory when the context is written.
    pub fn with_basedir(mut self, basedir: impl Into<PathBuf>) -> Self {
        self.basedir = Some(basedir.into());
        self
    }

    /// Sets the build output directory, recorded as the project's log directory.
    pub fn with_build_directory(mut self, build_directory: impl Into<PathBuf>) -> Self {
        self.build_directory = Some(build_directory.into());
        self
    }

    /// `groupId:artifactId:version`
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// The project version.  It appears in the context only as part of [`Project::id`].
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The directory containing the project's build file.
    ///
    /// Standalone invocations (no build file) have none.
    pub fn basedir(&self) -> Option<&Path> {
        self.basedir.as_deref()
    }

    /// The build output directory.
    pub fn build_directory(&self) -> Option<&Path> {
        self.build_directory.as_deref()
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// One execution of a plugin goal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MojoExecution {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    goal: String,
    execution_id: Option<String>,
}

impl MojoExecution {
    /// Creates an execution of `goal` from the plugin's coordinates.
    ///
    /// The version and execution id start out absent.  An absent execution id counts as the
    /// default one.
    ///
    /// ```rust
    /// use buildwise::MojoExecution;
    /// let execution = MojoExecution::new("org.apache.maven.plugins", "maven-jar-plugin", "jar");
    /// assert!(execution.has_default_execution_id());
    /// assert_eq!(execution.version(), None);
    /// ```
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        goal: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            goal: goal.into(),
            execution_id: None,
        }
    }

    /// Sets the plugin version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the execution id, as declared in the build file or generated as `default-<goal>`.
    pub fn with_execution_id(mut self, execution_id: impl Into<String>) -> Self {
        self.execution_id = Some(execution_id.into());
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// The configured execution id, if the build tool supplied one.
    pub fn execution_id(&self) -> Option<&str> {
        self.execution_id.as_deref()
    }

    /// Whether the execution id is the one the build tool assigns when none is configured,
    /// `default-<goal>`.  A missing id counts as default.
    pub fn has_default_execution_id(&self) -> bool {
        match &self.execution_id {
            None => true,
            Some(id) => id
                .strip_prefix("default-")
                .is_some_and(|goal| goal == self.goal),
        }
    }
}

/// A build lifecycle, e.g. `default` or `clean`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lifecycle {
    id: String,
    phases: Vec<String>,
}

impl Lifecycle {
    /// Creates a lifecycle from its id and ordered phase names.
    ///
    /// ```rust
    /// use buildwise::Lifecycle;
    /// let lifecycle = Lifecycle::new("clean", ["pre-clean", "clean", "post-clean"]);
    /// assert_eq!(lifecycle.phases()[1], "clean");
    /// ```
    pub fn new<P: Into<String>>(id: impl Into<String>, phases: impl IntoIterator<Item = P>) -> Self {
        Self {
            id: id.into(),
            phases: phases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phases(&self) -> &[String] {
        &self.phases
    }
}

/// One invocation of the build tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Session {
    projects: Vec<Project>,
    top_level_directory: Option<PathBuf>,
}

impl Session {
    /// Creates a session over `projects`, given in build order.
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            top_level_directory: None,
        }
    }

    /// Sets the directory the build was started from.
    pub fn with_top_level_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.top_level_directory = Some(directory.into());
        self
    }

    /// Projects in build order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn top_level_directory(&self) -> Option<&Path> {
        self.top_level_directory.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_execution_id_matches_goal() {
        let e = MojoExecution::new("g", "a", "compile");
        assert!(e.has_default_execution_id());
        assert!(e.clone().with_execution_id("default-compile").has_default_execution_id());
        assert!(!e.clone().with_execution_id("default-testCompile").has_default_execution_id());
        assert!(!e.with_execution_id("custom-compile").has_default_execution_id());
    }

    #[test]
    fn project_display_is_id() {
        let p = Project::new("com.acme", "widget", "1.0");
        assert_eq!(p.to_string(), p.id());
    }
}
