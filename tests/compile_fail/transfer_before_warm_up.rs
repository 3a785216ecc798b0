// ABOUTME: Compile-fail test verifying transfer cannot be called on StackCreated.
// ABOUTME: Workloads only move once the cluster is verified and the new pool is warm.

use stackswap::control_plane::ControlPlane;
use stackswap::deploy::{Deployment, StackCreated};

async fn try_early_transfer<C: ControlPlane>(deployment: Deployment<StackCreated>, cp: &C) {
    // ERROR: transfer() method doesn't exist on Deployment<StackCreated>
    let _ = deployment.transfer(cp).await;
}

fn main() {}
