//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the host is up.
//!
//! # Tasks
//! - Display refresh: polls the engine so expired entries disappear from view

mod refresh;

pub use refresh::spawn_refresh_task;
