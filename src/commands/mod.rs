// ABOUTME: Command module aggregator for the stackswap CLI.
// ABOUTME: Re-exports deploy and status command handlers.

mod deploy;
mod status;

pub use deploy::{DeployArgs, deploy};
pub use status::status;
