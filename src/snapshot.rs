// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A copy-on-write cell.

Readers take an `Arc` to the current value and then work without any lock held.
Writers build a new value from the current one and swap it in.  Neither side ever waits
on code it doesn't control: the lock only guards cloning or replacing the `Arc`.

On the wasm main thread we can't necessarily block, so the lock is a spinlock.
*/

use std::cell::UnsafeCell;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
//we allow for 254 readers or 1 writer (val = 255)
const LOCKED_WRITE: u8 = u8::MAX;

pub(crate) struct SnapshotCell<T> {
    current: UnsafeCell<Arc<T>>,
    locked: AtomicU8,
}

unsafe impl<T: Send + Sync> Send for SnapshotCell<T> {}
unsafe impl<T: Send + Sync> Sync for SnapshotCell<T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for SnapshotCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SnapshotCell").field(&self.load()).finish()
    }
}

/// Releases the write lock, even if the update closure unwinds.
struct WriteGuard<'a>(&'a AtomicU8);

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.0.store(UNLOCKED, Release);
    }
}

impl<T> SnapshotCell<T> {
    pub(crate) fn new(value: T) -> Self {
        SnapshotCell {
            current: UnsafeCell::new(Arc::new(value)),
            locked: AtomicU8::new(UNLOCKED),
        }
    }

    fn spin_lock_write(&self) -> WriteGuard<'_> {
        while self
            .locked
            .compare_exchange_weak(UNLOCKED, LOCKED_WRITE, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
        WriteGuard(&self.locked)
    }

    fn spin_lock_read(&self) {
        while self
            .locked
            .fetch_update(Acquire, Relaxed, |v| {
                if v < (LOCKED_WRITE - 1) {
                    Some(v + 1)
                } else {
                    None
                }
            })
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    fn spin_unlock_read(&self) {
        self.locked.fetch_sub(1, Release);
    }

    /// Returns the current snapshot.
    ///
    /// Later updates never change a snapshot that was already loaded.
    pub(crate) fn load(&self) -> Arc<T> {
        self.spin_lock_read();
        // SAFETY: readers share access; writers are excluded while the count is nonzero.
        // Arc::clone cannot unwind.
        let snapshot = unsafe { (*self.current.get()).clone() };
        self.spin_unlock_read();
        snapshot
    }

    /// Replaces the current value with `f(current)`.
    ///
    /// `f` runs with the write lock held, so it must not touch this cell.
    pub(crate) fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let replaced = {
            let _guard = self.spin_lock_write();
            // SAFETY: we have exclusive access until the guard drops
            let slot = unsafe { &mut *self.current.get() };
            let next = Arc::new(f(slot));
            std::mem::replace(slot, next)
        };
        // the old value may be the last reference; drop it outside the lock
        drop(replaced);
    }
}
