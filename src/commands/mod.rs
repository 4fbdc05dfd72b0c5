//! CLI commands for panelvote

pub mod admin;
pub mod criteria;
pub mod dispatch;
pub mod login;
pub mod results;
pub mod status;
pub mod vote;
pub mod watch;
