//! Example: keyboard jog control with lockstep stepping.
//!
//! This example demonstrates how to:
//! - Decode operator tokens (`w a s d q e`, `stop`, `x,y,z`, or key strings
//!   such as `wwa`) into commands
//! - Dispatch step plans to four STEP/DIR pin pairs on one software clock
//! - Undo the last sequence with `undo`
//!
//! Pins and delays are mocks that print what real hardware would do.
//!
//! Run with: `cargo run --example keyboard_steps --features std`

use std::io::{self, BufRead, Write};

use cable_motion::command::{parse_command, parse_sequence, CommandLog};
use cable_motion::{load_config, CableRobot, LockstepDispatcher, Result};

/// Mock STEP pin that counts pulses.
struct MockStepPin {
    pulses: u32,
}

impl embedded_hal::digital::ErrorType for MockStepPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockStepPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.pulses += 1;
        Ok(())
    }
}

/// Mock DIR pin that reports level changes.
struct MockDirPin {
    motor: usize,
}

impl embedded_hal::digital::ErrorType for MockDirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockDirPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        println!("  motor{} DIR low (cw)", self.motor);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        println!("  motor{} DIR high (ccw)", self.motor);
        Ok(())
    }
}

/// Mock delay that only accumulates the time real hardware would spend.
#[derive(Default)]
struct MockDelay {
    total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

fn main() -> Result<()> {
    println!("=== Keyboard Jog Control ===\n");

    let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/robot.toml"))?;
    let mut robot = CableRobot::from_config(config)?;

    let mut motors = LockstepDispatcher::new(MockDelay::default());
    for motor in 0..robot.anchors().len() {
        motors.add_motor(MockStepPin { pulses: 0 }, MockDirPin { motor })?;
    }

    let mut log: CommandLog = CommandLog::new();

    println!("Keys: w/s forward/back, a/d left/right, q/e up/down, stop, x,y,z, undo, quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let token = line.trim();

        let result = match token {
            "quit" | "exit" => break,
            "undo" => match log.undo() {
                Some(sequence) => robot.execute_sequence(&sequence, &mut motors),
                None => {
                    println!("No command to reverse.");
                    continue;
                }
            },
            _ => match parse_command(token) {
                Ok(command) => robot.execute(&command, &mut motors),
                // Several keys in one line form a sequence
                Err(_) => match parse_sequence(token) {
                    Ok(sequence) => robot.execute_sequence(&sequence, &mut motors).map(|()| log.log(sequence)),
                    Err(e) => {
                        println!("Invalid command: {}", e);
                        continue;
                    }
                },
            },
        };

        // Single-key jogs are undoable too
        if result.is_ok() && token.len() == 1 {
            if let Ok(sequence) = parse_sequence(token) {
                log.log(sequence);
            }
        }

        match result {
            Ok(()) => {
                let p = robot.position();
                println!(
                    "  payload ({:.1}, {:.1}, {:.1}), spools {:?}, {:.1} s of stepping so far",
                    p.x,
                    p.y,
                    p.z,
                    robot.spool_positions().as_slice(),
                    motors.delay().total_ns as f64 / 1e9
                );
            }
            Err(e) => println!("  error: {}", e),
        }
    }

    Ok(())
}
