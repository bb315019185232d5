//! Adapters layer: concrete implementations of the ports.

pub mod storage;
pub mod task_api;
pub mod telegram;
