//! CLI command implementations.

pub mod activity;
pub mod evaluate;
pub mod init;
pub mod quest;
pub mod xp;
