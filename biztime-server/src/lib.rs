//! biztime-server: HTTP API over companies and their invoices
//!
//! Routes map verbs onto parameterized SQL through the `Store` gateway.
//! The gateway is injected, so the same router runs against PostgreSQL
//! (`PgStore`) or an in-process `MemoryStore`.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{BiztimeConfig, ConfigError};
pub use db::{DbError, MemoryStore, PgStore, Store};
pub use http::{build_router, run_server, ApiError, ServerConfig};
