//! Restaurant recommender: a client for a restaurant recommendation API.
//!
//! The core is the recent-clicks cache in [`managers::click_history_manager`],
//! which remembers the last few distinct restaurants a user opened and seeds
//! the "similar restaurants" request with the newest one.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod storage;
pub mod types;
