// ABOUTME: Control plane abstraction for stacks, auto scaling groups and clusters.
// ABOUTME: Capability traits plus the aws CLI backed implementation.

pub mod aws_cli;
pub mod traits;

pub use aws_cli::{AwsCli, AwsCliError, AwsSettings};
pub use traits::*;
