//! Background Tasks Module
//!
//! Contains background tasks that maintain a cache while it is in use.
//!
//! # Tasks
//! - TTL Purge: reclaims expired entries at a fixed interval

mod purge;

pub use purge::{spawn_purge_task, PurgeExpired};
