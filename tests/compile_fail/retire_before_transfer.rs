// ABOUTME: Compile-fail test verifying retire cannot be called on ClusterVerified.
// ABOUTME: The legacy stack is only deleted after its workloads are drained.

use stackswap::control_plane::StackOps;
use stackswap::deploy::{ClusterVerified, Deployment};

async fn try_early_retire<S: StackOps>(deployment: Deployment<ClusterVerified>, stacks: &S) {
    // ERROR: retire() method doesn't exist on Deployment<ClusterVerified>
    let _ = deployment.retire(stacks).await;
}

fn main() {}
