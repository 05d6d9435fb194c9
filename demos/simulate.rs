//! Example: force-driven payload simulation.
//!
//! This example demonstrates how to:
//! - Load a robot configuration from TOML
//! - Run force-driven control cycles (kinematics, tension allocation,
//!   integration)
//! - Send each cycle's tension plan to a dispatcher
//! - Read back tensions, residual force and boundary bounces
//!
//! Run with: `cargo run --example simulate --features std`

use cable_motion::{load_config, AllocationStatus, CableRobot, RecordingDispatcher, Result, Vec3};

/// Pushing force, as applied by a held key in manual force control.
const CONTROL_FORCE: f32 = 20.0;

fn main() -> Result<()> {
    println!("=== Force-Driven Cable Robot Simulation ===\n");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/robot.toml").to_string());
    let config = load_config(&path)?;
    let mut robot = CableRobot::from_config(config)?;
    let mut motors = RecordingDispatcher::new(robot.anchors().len());

    println!("Anchors:");
    for anchor in robot.anchors().iter() {
        let p = anchor.position;
        println!("  {} at ({:.0}, {:.0}, {:.0}) shortens {:?}", anchor.name, p.x, p.y, p.z, anchor.shorten_direction);
    }
    let bounds = robot.bounds();
    println!(
        "Workspace: ({:.0}, {:.0}, {:.0}) .. ({:.0}, {:.0}, {:.0})\n",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );

    // Hold still, push right, let go, push forward into the wall
    let phases = [
        ("hold", Vec3::zeros(), 20),
        ("push right", Vec3::new(CONTROL_FORCE, 0.0, 0.0), 40),
        ("release", Vec3::zeros(), 40),
        ("push forward", Vec3::new(0.0, 0.0, CONTROL_FORCE), 200),
    ];

    println!("{:<14} {:>5} {:>28} {:>30} {:>8}", "phase", "cycle", "position", "tensions", "resid");
    println!("{}", "-".repeat(90));

    let mut cycle_index = 0;
    for (name, force, cycles) in phases {
        for i in 0..cycles {
            let cycle = robot.drive_force(&force, &mut motors)?;
            cycle_index += 1;

            if cycle.allocation.status == AllocationStatus::Degraded {
                println!("{:<14} {:>5} allocation degraded", name, cycle_index);
            }
            if cycle.report.bounced_any() {
                println!("{:<14} {:>5} bounced {:?}", name, cycle_index, cycle.report.bounced);
            }

            if i % 10 == 0 || i + 1 == cycles {
                let p = robot.position();
                let t = motors.tensions();
                println!(
                    "{:<14} {:>5} ({:>7.2}, {:>7.2}, {:>7.2}) [{}] {:>8.3}",
                    name,
                    cycle_index,
                    p.x,
                    p.y,
                    p.z,
                    t.iter().map(|v| format!("{:5.2}", v)).collect::<Vec<_>>().join(" "),
                    cycle.allocation.residual().norm()
                );
            }
        }
    }

    println!("\n{} tension plans dispatched", motors.dispatched());
    println!("\n=== Simulation Complete ===");
    Ok(())
}
