// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed key namespace for diagnostic context entries.
//!
//! These strings are referenced by name from log format patterns, so they must not change.

use std::fmt::Display;

pub const KEY_PROJECT_ID: &str = "maven.project.id";
pub const KEY_PROJECT_GROUPID: &str = "maven.project.groupId";
pub const KEY_PROJECT_ARTIFACTID: &str = "maven.project.artifactId";
pub const KEY_PROJECT_VERSION: &str = "maven.project.version";
pub const KEY_PROJECT_BASEDIR: &str = "maven.project.basedir";
pub const KEY_PROJECT_LOGDIR: &str = "maven.project.logdir";
pub const KEY_MOJO_ID: &str = "maven.mojo.id";
pub const KEY_MOJO_GROUPID: &str = "maven.mojo.groupId";
pub const KEY_MOJO_ARTIFACTID: &str = "maven.mojo.artifactId";
pub const KEY_MOJO_VERSION: &str = "maven.mojo.version";
pub const KEY_MOJO_GOAL: &str = "maven.mojo.goal";

/// A key in the diagnostic context.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextKey {
    /// `groupId:artifactId:version` of the project being built
    ProjectId,
    ProjectGroupId,
    ProjectArtifactId,
    /// Part of the namespace for log patterns, but never written into the context
    ProjectVersion,
    /// Absolute path of the project's base directory
    ProjectBasedir,
    /// The project's build output directory, where per-project logs conventionally go
    ProjectLogdir,
    /// `groupId:artifactId:goal[:executionId]` of the running mojo
    MojoId,
    MojoGroupId,
    MojoArtifactId,
    MojoVersion,
    MojoGoal,
}

impl ContextKey {
    /// Project-scoped keys, in write order.
    ///
    /// [`ContextKey::ProjectVersion`] is not among them.
    pub const PROJECT: [ContextKey; 5] = [
        ContextKey::ProjectId,
        ContextKey::ProjectGroupId,
        ContextKey::ProjectArtifactId,
        ContextKey::ProjectBasedir,
        ContextKey::ProjectLogdir,
    ];

    /// Mojo-scoped keys, in write order.
    pub const MOJO: [ContextKey; 5] = [
        ContextKey::MojoId,
        ContextKey::MojoGroupId,
        ContextKey::MojoArtifactId,
        ContextKey::MojoVersion,
        ContextKey::MojoGoal,
    ];

    /// Every key in the namespace.
    pub const ALL: [ContextKey; 11] = [
        ContextKey::ProjectId,
        ContextKey::ProjectGroupId,
        ContextKey::ProjectArtifactId,
        ContextKey::ProjectVersion,
        ContextKey::ProjectBasedir,
        ContextKey::ProjectLogdir,
        ContextKey::MojoId,
        ContextKey::MojoGroupId,
        ContextKey::MojoArtifactId,
        ContextKey::MojoVersion,
        ContextKey::MojoGoal,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ContextKey::ProjectId => KEY_PROJECT_ID,
            ContextKey::ProjectGroupId => KEY_PROJECT_GROUPID,
            ContextKey::ProjectArtifactId => KEY_PROJECT_ARTIFACTID,
            ContextKey::ProjectVersion => KEY_PROJECT_VERSION,
            ContextKey::ProjectBasedir => KEY_PROJECT_BASEDIR,
            ContextKey::ProjectLogdir => KEY_PROJECT_LOGDIR,
            ContextKey::MojoId => KEY_MOJO_ID,
            ContextKey::MojoGroupId => KEY_MOJO_GROUPID,
            ContextKey::MojoArtifactId => KEY_MOJO_ARTIFACTID,
            ContextKey::MojoVersion => KEY_MOJO_VERSION,
            ContextKey::MojoGoal => KEY_MOJO_GOAL,
        }
    }

    /// Parses the string form of a key.
    ///
    /// ```
    /// use buildwise::ContextKey;
    /// assert_eq!(ContextKey::from_name("maven.mojo.goal"), Some(ContextKey::MojoGoal));
    /// assert_eq!(ContextKey::from_name("maven.project.version"), Some(ContextKey::ProjectVersion));
    /// assert_eq!(ContextKey::from_name("maven.mojo"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<ContextKey> {
        ContextKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ContextKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
