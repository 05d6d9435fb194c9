//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::RobotConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use cable_motion::load_config;
///
/// let config = load_config("robot.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RobotConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<RobotConfig> {
    let config: RobotConfig = toml::from_str(content).map_err(|e| {
        let msg = truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

fn truncated(message: &str) -> heapless::String<128> {
    let mut out = heapless::String::new();
    for c in message.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_ANCHORS: &str = r#"
[[anchors]]
name = "C1"
position = [-200.0, 200.0, -200.0]
shorten = "cw"

[[anchors]]
name = "C2"
position = [-200.0, 200.0, 200.0]
shorten = "cw"

[[anchors]]
name = "C3"
position = [200.0, 200.0, 200.0]
shorten = "ccw"

[[anchors]]
name = "C4"
position = [200.0, 200.0, -200.0]
shorten = "ccw"
"#;

    #[test]
    fn test_parse_minimal_config() {
        let toml = format!("{FOUR_ANCHORS}\n[spool]\ncircumference = 10.0\n");

        let config = parse_config(&toml).unwrap();
        assert_eq!(config.anchor_count(), 4);
        assert_eq!(config.spool.steps_per_revolution, 200);
        assert!((config.physics.gravity - 9.81).abs() < 1e-6);
        assert!((config.physics.dt - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_bad_circumference() {
        let toml = format!("{FOUR_ANCHORS}\n[spool]\ncircumference = 0.0\n");

        let err = parse_config(&toml).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidCircumference(_))));
    }

    #[test]
    fn test_parse_reports_syntax_errors() {
        let err = parse_config("[[anchors]\nname = ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config("/nonexistent/robot.toml").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::IoError(_))));
    }
}
