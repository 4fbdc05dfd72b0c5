//! Panelvote Core Library
//!
//! Domain logic for the panel scoring client: criteria and rubric, score
//! aggregation, the shared game state, the backend client and the
//! polling sync loop.

pub mod admin;
pub mod api;
pub mod ballot;
pub mod config;
pub mod criteria;
pub mod error;
pub mod format;
pub mod game_state;
pub mod logging;
pub mod scores;
pub mod session;
pub mod sync;
