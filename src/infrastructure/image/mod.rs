//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching with a decoded-byte cost budget
//! - An async fetch session with task tracking and cancellation
//! - The reqwest-backed byte transport

pub mod fetch_session;
pub mod http_transport;
pub mod memory_cache;

pub use fetch_session::{FetchSession, FetchSessionConfig, MediaLoadedEvent};
pub use http_transport::HttpByteTransport;
pub use memory_cache::{CacheStats, DEFAULT_COST_BUDGET, MemoryImageCache};
