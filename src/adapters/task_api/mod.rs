//! Task API adapter.

mod client;

pub use client::{HttpTaskApi, HttpTaskApiConfig};
