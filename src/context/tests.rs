// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::apply_context::InheritContext;
use super::context_map::ContextMap;
use super::inheritable::{inherited_snapshot, inherited_value, install_inherited, spawn};
use super::propagator::{ContextPropagator, lookup};
use super::store::{DiagnosticStore, ThreadLocalStore};
use crate::key::ContextKey;
use crate::model::{MojoExecution, Project};
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;
#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

/// A store that keeps one map for every thread, so tests can see exactly what was written.
#[derive(Debug, Default)]
struct SharedStore(Mutex<ContextMap>);

impl DiagnosticStore for SharedStore {
    fn put(&self, key: &str, value: &str) {
        self.0.lock().unwrap().insert(key, value);
    }
    fn remove(&self, key: &str) {
        self.0.lock().unwrap().remove(key);
    }
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).map(str::to_owned)
    }
    fn snapshot(&self) -> ContextMap {
        self.0.lock().unwrap().clone()
    }
}

fn widget(basedir: &std::path::Path) -> Project {
    Project::new("com.acme", "widget", "1.0")
        .with_basedir(basedir)
        .with_build_directory(basedir.join("target"))
}

fn compiler() -> MojoExecution {
    MojoExecution::new("org.apache.maven.plugins", "maven-compiler-plugin", "compile")
        .with_version("3.11.0")
        .with_execution_id("default-compile")
}

fn empty() -> ContextMap {
    ContextMap::new()
}

#[test]
fn project_context_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let propagator = ContextPropagator::default();
    let project = widget(dir.path());

    propagator.set_project_context(Some(&project));
    let basedir = dir.path().to_string_lossy().into_owned();
    let logdir = dir.path().join("target").to_string_lossy().into_owned();
    for (key, expected) in [
        ContextKey::ProjectId.as_str(),
        ContextKey::ProjectGroupId.as_str(),
        ContextKey::ProjectArtifactId.as_str(),
        ContextKey::ProjectBasedir.as_str(),
        ContextKey::ProjectLogdir.as_str(),
    ]
    .into_iter()
    .zip([
        "com.acme:widget:1.0",
        "com.acme",
        "widget",
        basedir.as_str(),
        logdir.as_str(),
    ]) {
        assert_eq!(lookup(&empty(), key).as_deref(), Some(expected), "{key}");
        assert_eq!(
            ThreadLocalStore::new().get(key).as_deref(),
            Some(expected),
            "{key}"
        );
    }
    // the version is part of the id only
    assert_eq!(lookup(&empty(), ContextKey::ProjectVersion.as_str()), None);

    propagator.clear_project_context(Some(&project));
    for key in ContextKey::PROJECT {
        assert_eq!(lookup(&empty(), key.as_str()), None, "{key}");
        assert_eq!(ThreadLocalStore::new().get(key.as_str()), None, "{key}");
    }
}

#[test]
fn relative_basedirs_are_made_absolute() {
    // tests run from the package root, where `src` exists
    let relative = Path::new("src");
    assert!(relative.is_dir());
    let store = Arc::new(SharedStore::default());
    let propagator = ContextPropagator::new(store.clone());
    let project = Project::new("com.acme", "widget", "1.0").with_basedir(relative);

    propagator.set_project_context(Some(&project));
    let recorded = store
        .get(ContextKey::ProjectBasedir.as_str())
        .expect("basedir recorded");
    assert!(Path::new(&recorded).is_absolute(), "{recorded}");
    assert_eq!(
        Path::new(&recorded),
        std::env::current_dir().unwrap().join("src")
    );
    assert_eq!(
        inherited_value(ContextKey::ProjectBasedir.as_str()),
        Some(recorded)
    );
    propagator.clear_project_context(Some(&project));
}

#[test]
fn projects_not_on_disk_are_skipped() {
    let store = Arc::new(SharedStore::default());
    let propagator = ContextPropagator::new(store.clone());

    propagator.set_project_context(None);
    propagator.set_project_context(Some(&Project::new("com.acme", "widget", "1.0")));
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    propagator.set_project_context(Some(&widget(&missing)));

    assert!(store.snapshot().is_empty());
    assert_eq!(inherited_value(ContextKey::ProjectId.as_str()), None);
}

#[test]
fn clearing_without_setting_is_harmless() {
    let propagator = ContextPropagator::new(Arc::new(SharedStore::default()));
    propagator.clear_project_context(Some(&Project::new("com.acme", "widget", "1.0")));
    propagator.clear_project_context(None);
    propagator.clear_mojo_context();
    assert_eq!(inherited_value(ContextKey::ProjectId.as_str()), None);
}

#[test]
fn clearing_an_absent_project_keeps_context() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SharedStore::default());
    let propagator = ContextPropagator::new(store.clone());
    let project = widget(dir.path());
    propagator.set_project_context(Some(&project));

    propagator.clear_project_context(None);
    assert_eq!(
        store.get(ContextKey::ProjectId.as_str()).as_deref(),
        Some("com.acme:widget:1.0")
    );

    propagator.clear_project_context(Some(&project));
    assert!(store.snapshot().is_empty());
}

#[test]
fn resetting_leaves_no_stale_entries() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let store = Arc::new(SharedStore::default());
    let propagator = ContextPropagator::new(store.clone());

    let a = widget(first.path());
    propagator.set_project_context(Some(&a));
    propagator.clear_project_context(Some(&a));
    // no build directory this time
    let b = Project::new("com.acme", "gadget", "2.0").with_basedir(second.path());
    propagator.set_project_context(Some(&b));

    assert_eq!(
        lookup(&empty(), ContextKey::ProjectId.as_str()).as_deref(),
        Some("com.acme:gadget:2.0")
    );
    assert_eq!(
        lookup(&empty(), ContextKey::ProjectBasedir.as_str()).as_deref(),
        Some(second.path().to_string_lossy().as_ref())
    );
    assert_eq!(lookup(&empty(), ContextKey::ProjectLogdir.as_str()), None);
    // id, groupId, artifactId, basedir
    assert_eq!(store.snapshot().len(), 4);

    // without a clear in between, the absent build directory still removes the old logdir
    propagator.set_project_context(Some(&a));
    propagator.set_project_context(Some(&b));
    assert_eq!(lookup(&empty(), ContextKey::ProjectLogdir.as_str()), None);
    propagator.clear_project_context(Some(&b));
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn mojo_context_round_trip() {
    let store = Arc::new(SharedStore::default());
    let propagator = ContextPropagator::new(store.clone());
    propagator.set_mojo_context(Some(&compiler()));

    let written: Vec<_> = store
        .snapshot()
        .iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    assert_eq!(
        written,
        [
            ("maven.mojo.id", "org.apache.maven.plugins:maven-compiler-plugin:compile"),
            ("maven.mojo.groupId", "org.apache.maven.plugins"),
            ("maven.mojo.artifactId", "maven-compiler-plugin"),
            ("maven.mojo.version", "3.11.0"),
            ("maven.mojo.goal", "compile"),
        ]
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
    );
    assert_eq!(inherited_snapshot(), store.snapshot());

    propagator.clear_mojo_context();
    assert!(store.snapshot().is_empty());
    assert!(inherited_snapshot().is_empty());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn mojo_context_drops_absent_version() {
    let propagator = ContextPropagator::new(Arc::new(SharedStore::default()));
    propagator.set_mojo_context(Some(&compiler()));
    let unversioned = MojoExecution::new("org.example", "custom-plugin", "generate")
        .with_execution_id("generate-sources");
    propagator.set_mojo_context(Some(&unversioned));

    assert_eq!(inherited_value(ContextKey::MojoVersion.as_str()), None);
    assert_eq!(
        inherited_value(ContextKey::MojoId.as_str()).as_deref(),
        Some("org.example:custom-plugin:generate:generate-sources")
    );
    propagator.set_mojo_context(None);
    assert_eq!(
        inherited_value(ContextKey::MojoGoal.as_str()).as_deref(),
        Some("generate")
    );
    propagator.clear_mojo_context();
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn event_properties_win_over_inherited() {
    let propagator = ContextPropagator::new(Arc::new(SharedStore::default()));
    propagator.set_mojo_context(Some(&compiler()));

    let mut event = std::collections::HashMap::new();
    event.insert("maven.mojo.goal".to_string(), "testCompile".to_string());
    assert_eq!(
        lookup(&event, "maven.mojo.goal").as_deref(),
        Some("testCompile")
    );
    // falls back per key, not per event
    assert_eq!(
        lookup(&event, "maven.mojo.artifactId").as_deref(),
        Some("maven-compiler-plugin")
    );
    assert_eq!(lookup(&event, "maven.unknown"), None);
    propagator.clear_mojo_context();
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn install_returns_previous_context() {
    let map: ContextMap = [("maven.mojo.goal", "compile")].into_iter().collect();
    let previous = install_inherited(map.clone());
    assert!(previous.is_empty());
    assert_eq!(install_inherited(previous), map);
    assert_eq!(inherited_value("maven.mojo.goal"), None);
}

#[test]
fn spawned_threads_inherit_a_copy() {
    let propagator = ContextPropagator::new(Arc::new(SharedStore::default()));
    propagator.set_mojo_context(Some(&compiler()));

    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let child = spawn(move || {
        // wait until the parent has changed its own context
        rx.recv().unwrap();
        (
            lookup(&ContextMap::new(), "maven.mojo.goal"),
            lookup(&ContextMap::new(), "maven.mojo.artifactId"),
        )
    });
    propagator.clear_mojo_context();
    tx.send(()).unwrap();

    let (goal, artifact) = child.join().unwrap();
    assert_eq!(goal.as_deref(), Some("compile"));
    assert_eq!(artifact.as_deref(), Some("maven-compiler-plugin"));
}

#[test]
fn unrelated_threads_see_nothing() {
    let propagator = ContextPropagator::new(Arc::new(SharedStore::default()));
    propagator.set_mojo_context(Some(&compiler()));

    let seen = std::thread::spawn(|| lookup(&ContextMap::new(), "maven.mojo.goal"))
        .join()
        .unwrap();
    assert_eq!(seen, None);
    propagator.clear_mojo_context();
}

#[test]
fn child_writes_do_not_reach_the_parent() {
    let propagator = ContextPropagator::new(Arc::new(SharedStore::default()));
    propagator.set_mojo_context(Some(&compiler()));

    let child_propagator = propagator.clone();
    spawn(move || {
        child_propagator.clear_mojo_context();
        assert_eq!(inherited_value("maven.mojo.goal"), None);
    })
    .join()
    .unwrap();

    assert_eq!(inherited_value("maven.mojo.goal").as_deref(), Some("compile"));
    propagator.clear_mojo_context();
}

/// A future that panics the first time it is polled.
struct Explode;

impl Future for Explode {
    type Output = ();

    fn poll(self: std::pin::Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        panic!("task failure");
    }
}

#[test]
fn panicking_task_restores_the_worker_context() {
    let worker: ContextMap = [("maven.mojo.goal", "worker-goal")].into_iter().collect();
    let previous = install_inherited(worker);

    let task_context: ContextMap = [("maven.mojo.goal", "task-goal")].into_iter().collect();
    let mut task = std::pin::pin!(InheritContext::new(task_context, Explode));
    let mut cx = Context::from_waker(Waker::noop());
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        task.as_mut().poll(&mut cx)
    }));
    assert!(result.is_err());

    assert_eq!(
        inherited_value("maven.mojo.goal").as_deref(),
        Some("worker-goal")
    );
    install_inherited(previous);
    assert_eq!(inherited_value("maven.mojo.goal"), None);
}
