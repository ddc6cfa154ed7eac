// Restaurant recommender shared type definitions
// Each submodule defines types used across the client.

pub mod errors;
pub mod history;
pub mod panel;
pub mod restaurant;
pub mod settings;
