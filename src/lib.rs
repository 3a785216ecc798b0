// ABOUTME: Library root for stackswap - exposes the deployment engine and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod control_plane;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod status;
pub mod types;
