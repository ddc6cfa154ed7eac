//! SQLite persistence for client state.
//!
//! Provides connection management and versioned schema migrations. The
//! [`SqliteStore`](crate::storage::SqliteStore) key/value backend sits on top.
//!
//! # Usage
//!
//! ```no_run
//! use restaurant_recommender::database::Database;
//!
//! let db = Database::open("restaurant-recommender.db").expect("failed to open database");
//!
//! // Or an in-memory database for tests
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
