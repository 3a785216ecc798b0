// ABOUTME: Status command implementation.
// ABOUTME: Prints each live slot with its stack status, pool capacity and services.

use stackswap::config::Config;
use stackswap::control_plane::AwsCli;
use stackswap::error::Result;
use stackswap::output::{Output, OutputMode};
use stackswap::status::component_status;

/// Show the live state of one component.
pub async fn status(
    config: &Config,
    component: &str,
    environment: Option<&str>,
    output: Output,
) -> Result<()> {
    let target = config.target(component, environment)?;
    let control_plane = AwsCli::new(config.aws.clone());
    let status = component_status(&control_plane, &target).await?;

    if output.mode() == OutputMode::Json {
        output.json("status", &status);
        return Ok(());
    }

    println!("Component: {} ({})", status.component, status.environment);
    if status.slots.is_empty() {
        println!("  no stacks deployed");
    }
    for slot in &status.slots {
        println!("  {}: {}", slot.stack, slot.status);
        if let Some(cluster) = &slot.cluster {
            println!("    cluster: {cluster}");
        }
        if let Some(pool) = &slot.pool {
            println!(
                "    pool {}: {} healthy, desired {} (min {}, max {})",
                pool.name, pool.healthy, pool.desired, pool.min, pool.max
            );
        }
    }
    match &status.next_slot {
        Some(next) => println!("  next replacement: {next}"),
        None => output.warning("more than one slot is live; remove the stale stack manually"),
    }

    for service in &status.services {
        let state = if service.steady { "steady" } else { "converging" };
        println!(
            "  service {}/{}: {}/{} running ({state})",
            service.cluster, service.name, service.running, service.desired
        );
        if let Some(event) = &service.last_event {
            println!("    last event: {event}");
        }
    }
    Ok(())
}
