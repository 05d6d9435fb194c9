//! Command module for cable-motion.
//!
//! Decodes operator tokens into [`Command`]s and keeps a bounded history of
//! executed jog sequences so the last one can be undone. The transport that
//! delivers tokens (keyboard, serial, buttons) lives outside the crate.

mod history;
mod token;

pub use history::{reverse_sequence, CommandLog, DEFAULT_HISTORY};
pub use token::{mode_from_key, parse_command, parse_sequence, Command, ModeSequence, MAX_SEQUENCE};
