//! Database layer - connection pool, schema, repositories and the store gateway
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default) - no Arc<Mutex<Connection>>
//! - Handlers only see the `Store` trait, so tests can swap in `MemoryStore`
//! - Keyed reads/updates/deletes report zero matched rows as `NotFound`

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
pub use store::{PgStore, Store};
