//! Error types for cable-motion.
//!
//! Provides unified error handling across configuration, kinematics, actuation
//! and command decoding.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all cable-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Geometry or kinematics error
    Kinematics(KinematicsError),
    /// Actuation dispatch error
    Actuation(ActuationError),
    /// Command token decoding error
    Command(CommandError),
}

/// Configuration-related errors. All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Fewer anchors than needed for 3D force control
    TooFewAnchors(usize),
    /// More anchors than the fixed-capacity storage holds
    TooManyAnchors(usize),
    /// Duplicate anchor name in configuration
    DuplicateAnchorName(heapless::String<16>),
    /// Anchor coordinate is NaN or infinite
    NonFiniteAnchor(heapless::String<16>),
    /// Spool circumference must be > 0
    InvalidCircumference(f32),
    /// Steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Half-step delay must be > 0
    InvalidStepDelay(f32),
    /// Payload mass must be > 0
    InvalidMass(f32),
    /// Control cycle period must be > 0
    InvalidTimeStep(f32),
    /// Gravity must be finite and >= 0
    InvalidGravity(f32),
    /// Damping coefficient must be finite and >= 0
    InvalidDamping(f32),
    /// Restitution must lie in [0, 1]
    InvalidRestitution(f32),
    /// Maximum tension must be finite and >= 0
    InvalidMaxTension(f32),
    /// Workspace fall allowance must be finite and >= 0
    InvalidFallAllowance(f32),
    /// Workspace margin must be finite
    InvalidMargin(f32),
    /// The margin insets the box past its center on this axis
    InvertedWorkspace(crate::geometry::Axis),
    /// Initial payload position has a NaN or infinite component
    NonFiniteInitialPosition,
    /// Jog distance must be positive
    InvalidJogDistance(f32),
    /// A movement mode row does not have one entry per anchor
    ModeTableMismatch {
        /// Number of entries in the row
        entries: usize,
        /// Number of configured anchors
        anchors: usize,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Geometry and kinematics errors.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// A coordinate or length was NaN or infinite
    NonFinite,
    /// Integrator time step must be finite and > 0
    InvalidTimeStep(f32),
    /// Legacy mode tables require a row per mode for this anchor count
    ModeTableUnavailable,
}

/// Actuation dispatch errors. Surfaced to the caller as fatal; no retry.
#[derive(Debug, Clone, PartialEq)]
pub enum ActuationError {
    /// Pin operation failed
    PinError,
    /// Timer/PIO channel operation failed
    ChannelError,
    /// Plan has a different number of commands than the dispatcher has motors
    MotorCountMismatch {
        /// Commands in the plan
        commands: usize,
        /// Motors attached to the dispatcher
        motors: usize,
    },
    /// Backend cannot execute this kind of command (e.g. tension on a stepper)
    UnsupportedCommand,
}

/// Command decoding errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Token is not a known mode, `stop`, or coordinate triple
    UnknownToken(heapless::String<32>),
    /// Coordinate triple has a malformed component
    InvalidTarget,
    /// Sequence is longer than the fixed-capacity buffer
    SequenceTooLong,
    /// Sequence was empty
    Empty,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Kinematics(e) => write!(f, "Kinematics error: {}", e),
            Error::Actuation(e) => write!(f, "Actuation error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::TooFewAnchors(n) => {
                write!(f, "{} anchors configured, at least 3 are required", n)
            }
            ConfigError::TooManyAnchors(n) => {
                write!(f, "{} anchors configured, at most {} are supported", n, crate::geometry::MAX_ANCHORS)
            }
            ConfigError::DuplicateAnchorName(name) => write!(f, "Duplicate anchor name: '{}'", name),
            ConfigError::NonFiniteAnchor(name) => {
                write!(f, "Anchor '{}' has a non-finite coordinate", name)
            }
            ConfigError::InvalidCircumference(v) => {
                write!(f, "Invalid spool circumference: {}. Must be > 0", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidStepDelay(v) => write!(f, "Invalid half-step delay: {}. Must be > 0", v),
            ConfigError::InvalidMass(v) => write!(f, "Invalid mass: {}. Must be > 0", v),
            ConfigError::InvalidTimeStep(v) => write!(f, "Invalid time step: {}. Must be > 0", v),
            ConfigError::InvalidGravity(v) => write!(f, "Invalid gravity: {}. Must be >= 0", v),
            ConfigError::InvalidDamping(v) => write!(f, "Invalid damping: {}. Must be >= 0", v),
            ConfigError::InvalidRestitution(v) => {
                write!(f, "Invalid restitution: {}. Must be in [0, 1]", v)
            }
            ConfigError::InvalidMaxTension(v) => write!(f, "Invalid max tension: {}. Must be >= 0", v),
            ConfigError::InvalidFallAllowance(v) => {
                write!(f, "Invalid fall allowance: {}. Must be >= 0", v)
            }
            ConfigError::InvalidMargin(v) => write!(f, "Invalid workspace margin: {}. Must be finite", v),
            ConfigError::InvertedWorkspace(axis) => {
                write!(f, "Workspace margin leaves no room along the {:?} axis", axis)
            }
            ConfigError::NonFiniteInitialPosition => {
                write!(f, "Initial payload position has a non-finite coordinate")
            }
            ConfigError::InvalidJogDistance(v) => write!(f, "Invalid jog distance: {}. Must be > 0", v),
            ConfigError::ModeTableMismatch { entries, anchors } => {
                write!(f, "Mode row has {} entries but {} anchors are configured", entries, anchors)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::NonFinite => write!(f, "Non-finite coordinate or length"),
            KinematicsError::InvalidTimeStep(dt) => write!(f, "Invalid time step: {}", dt),
            KinematicsError::ModeTableUnavailable => {
                write!(f, "No movement mode table for this anchor layout")
            }
        }
    }
}

impl fmt::Display for ActuationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuationError::PinError => write!(f, "GPIO pin operation failed"),
            ActuationError::ChannelError => write!(f, "Step channel operation failed"),
            ActuationError::MotorCountMismatch { commands, motors } => {
                write!(f, "Plan has {} commands for {} motors", commands, motors)
            }
            ActuationError::UnsupportedCommand => {
                write!(f, "Command not supported by this dispatcher")
            }
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownToken(token) => write!(f, "Unknown command token '{}'", token),
            CommandError::InvalidTarget => write!(f, "Malformed target coordinates"),
            CommandError::SequenceTooLong => write!(f, "Command sequence too long"),
            CommandError::Empty => write!(f, "Empty command"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<KinematicsError> for Error {
    fn from(e: KinematicsError) -> Self {
        Error::Kinematics(e)
    }
}

impl From<ActuationError> for Error {
    fn from(e: ActuationError) -> Self {
        Error::Actuation(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for KinematicsError {}

#[cfg(feature = "std")]
impl std::error::Error for ActuationError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}
