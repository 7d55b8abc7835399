//! Optional PostgreSQL connection pool.
//!
//! The pool is built lazily from `database.url`; nothing connects until the
//! first checkout. An empty URL means the server runs without a database.

mod pool;

pub use pool::{AsyncDbPool, build_pool, check_connection, connect_in_background};
