//! Task Courier - Telegram front end for a task-tracking API
//!
//! Walks a user through multi-step prompts (create/get user, task,
//! comment; attach a file to a task) and relays the collected data to
//! the remote task-tracking service, streaming attachments through
//! without buffering them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
