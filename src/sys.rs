// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific threading for cross-platform compatibility.
//!
//! On native platforms threads come from `std::thread`, while on WASM they come from
//! `wasm_thread`, which backs each thread with a web worker.
//!
//! # Public API
//!
//! [`JoinHandle`] is re-exported at the crate root as the return type of
//! [`context::spawn`](crate::context::spawn).

#[cfg(not(target_arch = "wasm32"))]
pub use std::thread::{JoinHandle, spawn};
#[cfg(target_arch = "wasm32")]
pub use wasm_thread::{JoinHandle, spawn};
