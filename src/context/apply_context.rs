// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context inheritance for futures.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::context_map::ContextMap;
use super::inheritable::{inherited_snapshot, install_inherited};

/// A [`Future`] wrapper that carries an inherited context across executor threads.
///
/// Executors poll tasks on whatever worker thread is free, and those threads never saw the
/// context of the code that spawned the task.  `InheritContext` installs its own context
/// around each poll and restores the worker's afterwards.  Writes the future makes while it
/// is polled are kept for its next poll.
///
/// # Examples
///
/// ```rust
/// use buildwise::context::{ContextMap, InheritContext, inherited_value};
///
/// async fn compile() -> Option<String> {
///     inherited_value("maven.mojo.goal")
/// }
///
/// # async fn example() {
/// let context: ContextMap = [("maven.mojo.goal", "compile")].into_iter().collect();
/// let goal = InheritContext::new(context, compile()).await;
/// assert_eq!(goal.as_deref(), Some("compile"));
/// # }
/// ```
#[derive(Debug)]
pub struct InheritContext<F>(ContextMap, F);

impl<F> InheritContext<F> {
    pub fn new(context: ContextMap, f: F) -> Self {
        Self(context, f)
    }

    /// Wraps `f` with a copy of the calling thread's inheritable context.
    pub fn capture(f: F) -> Self {
        Self(inherited_snapshot(), f)
    }
}

/// Puts the worker's context back when a poll ends, including when it unwinds.
struct RestoreWorker<'a> {
    task: &'a mut ContextMap,
    prior: ContextMap,
}

impl Drop for RestoreWorker<'_> {
    fn drop(&mut self) {
        *self.task = install_inherited(std::mem::take(&mut self.prior));
    }
}

impl<F> Future for InheritContext<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        // SAFETY: the context map is never pinned; the future is only accessed pinned
        let (context, fut) = unsafe {
            let d = self.get_unchecked_mut();
            (&mut d.0, Pin::new_unchecked(&mut d.1))
        };
        let prior = install_inherited(std::mem::take(context));
        let _restore = RestoreWorker {
            task: context,
            prior,
        };
        fut.poll(cx)
    }
}
