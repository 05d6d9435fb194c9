//! Token decoding.

use heapless::{String, Vec};

use crate::error::{CommandError, Result};
use crate::geometry::{is_finite, Vec3};
use crate::kinematics::MovementMode;

/// Longest jog sequence accepted in one token.
pub const MAX_SEQUENCE: usize = 32;

/// Ordered jog modes from one sequence token.
pub type ModeSequence = Vec<MovementMode, MAX_SEQUENCE>;

/// A decoded operator command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Jog one step in a direction.
    Move(MovementMode),
    /// Go to an absolute position.
    Target(Vec3),
    /// Halt: drop any velocity, move nothing.
    Stop,
}

/// Jog mode bound to a key.
///
/// `w`/`s` forward/backward, `a`/`d` left/right, `q` or `u` up, `e` or `n`
/// down. Case-insensitive.
pub fn mode_from_key(key: char) -> Option<MovementMode> {
    match key.to_ascii_lowercase() {
        'w' => Some(MovementMode::Forward),
        's' => Some(MovementMode::Backward),
        'a' => Some(MovementMode::Left),
        'd' => Some(MovementMode::Right),
        'q' | 'u' => Some(MovementMode::Up),
        'e' | 'n' => Some(MovementMode::Down),
        _ => None,
    }
}

impl MovementMode {
    /// Canonical key for this mode.
    pub fn key(self) -> char {
        match self {
            MovementMode::Forward => 'w',
            MovementMode::Backward => 's',
            MovementMode::Left => 'a',
            MovementMode::Right => 'd',
            MovementMode::Up => 'u',
            MovementMode::Down => 'n',
        }
    }
}

/// Decode a single command token.
///
/// Accepts one mode key, `stop`, or an absolute target written `x,y,z` or
/// `x y z`. Surrounding whitespace is ignored.
///
/// # Errors
///
/// - `CommandError::Empty` for a blank token
/// - `CommandError::InvalidTarget` for a malformed coordinate triple
/// - `CommandError::UnknownToken` for anything else
pub fn parse_command(token: &str) -> Result<Command> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CommandError::Empty.into());
    }

    if token.eq_ignore_ascii_case("stop") {
        return Ok(Command::Stop);
    }

    let mut chars = token.chars();
    if let (Some(key), None) = (chars.next(), chars.next()) {
        if let Some(mode) = mode_from_key(key) {
            return Ok(Command::Move(mode));
        }
    }

    if token.contains(|c: char| c == ',' || c.is_whitespace()) {
        return parse_target(token).map(Command::Target);
    }

    warn!("unknown command token '{}'", token);
    Err(CommandError::UnknownToken(truncated(token)).into())
}

/// Decode a string of mode keys, such as `wwad`, into a sequence.
///
/// # Errors
///
/// - `CommandError::Empty` for a blank token
/// - `CommandError::UnknownToken` if any character is not a mode key; nothing
///   in the sequence is accepted then
/// - `CommandError::SequenceTooLong` past [`MAX_SEQUENCE`] modes
pub fn parse_sequence(token: &str) -> Result<ModeSequence> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CommandError::Empty.into());
    }

    let mut sequence = ModeSequence::new();
    for key in token.chars() {
        let mode = match mode_from_key(key) {
            Some(mode) => mode,
            None => {
                warn!("invalid command sequence '{}'", token);
                return Err(CommandError::UnknownToken(truncated(token)).into());
            }
        };
        sequence.push(mode).map_err(|_| CommandError::SequenceTooLong)?;
    }

    Ok(sequence)
}

fn parse_target(token: &str) -> Result<Vec3> {
    let mut coords = [0.0f32; 3];
    let mut count = 0;

    for part in token
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        if count == 3 {
            return Err(CommandError::InvalidTarget.into());
        }
        coords[count] = part.parse().map_err(|_| CommandError::InvalidTarget)?;
        count += 1;
    }

    let target = Vec3::from(coords);
    if count != 3 || !is_finite(&target) {
        return Err(CommandError::InvalidTarget.into());
    }

    Ok(target)
}

fn truncated(token: &str) -> String<32> {
    let mut out = String::new();
    for c in token.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
