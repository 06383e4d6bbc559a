//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input (key state)
//! - Storage (LocalStorage on web)
//! - Time (wall clock in milliseconds)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;
pub mod time;

pub use input::KeyState;
pub use time::{FpsCounter, now_ms};
