//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::geometry::{Axis, MAX_ANCHORS};

use super::{ModesConfig, PhysicsConfig, RobotConfig, SpoolConfig};

/// Minimum anchor count for full 3D force control.
pub const MIN_ANCHORS: usize = 3;

/// Validate a robot configuration.
///
/// Checks:
/// - Between 3 and `MAX_ANCHORS` anchors, uniquely named, finite coordinates
/// - Spool circumference, steps per revolution and step delay are positive
/// - Physics parameters are physically meaningful, initial position finite
/// - Workspace margin is finite and leaves a non-empty box
/// - Mode table rows have one entry per anchor and the jog distance is positive
pub fn validate_config(config: &RobotConfig) -> Result<()> {
    validate_anchors(config)?;
    validate_spool(&config.spool)?;
    validate_physics(&config.physics)?;
    validate_workspace(config)?;
    validate_modes(&config.modes, config.anchor_count())?;
    Ok(())
}

fn validate_anchors(config: &RobotConfig) -> Result<()> {
    let count = config.anchor_count();
    if count < MIN_ANCHORS {
        return Err(Error::Config(ConfigError::TooFewAnchors(count)));
    }
    if count > MAX_ANCHORS {
        return Err(Error::Config(ConfigError::TooManyAnchors(count)));
    }

    for (i, anchor) in config.anchors.iter().enumerate() {
        if !anchor.is_finite() {
            return Err(Error::Config(ConfigError::NonFiniteAnchor(anchor.name.clone())));
        }
        if config.anchors[..i].iter().any(|a| a.name == anchor.name) {
            return Err(Error::Config(ConfigError::DuplicateAnchorName(anchor.name.clone())));
        }
    }

    Ok(())
}

pub(crate) fn validate_spool(spool: &SpoolConfig) -> Result<()> {
    if !positive(spool.circumference) {
        return Err(Error::Config(ConfigError::InvalidCircumference(spool.circumference)));
    }

    if spool.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            spool.steps_per_revolution,
        )));
    }

    if !positive(spool.half_step_delay.0) {
        return Err(Error::Config(ConfigError::InvalidStepDelay(spool.half_step_delay.0)));
    }

    Ok(())
}

fn validate_physics(physics: &PhysicsConfig) -> Result<()> {
    if !positive(physics.mass) {
        return Err(Error::Config(ConfigError::InvalidMass(physics.mass)));
    }

    if !positive(physics.dt) {
        return Err(Error::Config(ConfigError::InvalidTimeStep(physics.dt)));
    }

    if !non_negative(physics.gravity) {
        return Err(Error::Config(ConfigError::InvalidGravity(physics.gravity)));
    }

    if !non_negative(physics.damping) {
        return Err(Error::Config(ConfigError::InvalidDamping(physics.damping)));
    }

    if !(0.0..=1.0).contains(&physics.restitution) {
        return Err(Error::Config(ConfigError::InvalidRestitution(physics.restitution)));
    }

    if !non_negative(physics.max_tension) {
        return Err(Error::Config(ConfigError::InvalidMaxTension(physics.max_tension)));
    }

    if !physics.initial_position.iter().all(|c| c.is_finite()) {
        return Err(Error::Config(ConfigError::NonFiniteInitialPosition));
    }

    Ok(())
}

// Anchors must already be valid: the box is built from their hull.
fn validate_workspace(config: &RobotConfig) -> Result<()> {
    let workspace = &config.workspace;

    if !non_negative(workspace.fall_allowance) {
        return Err(Error::Config(ConfigError::InvalidFallAllowance(
            workspace.fall_allowance,
        )));
    }

    if !workspace.margin.is_finite() {
        return Err(Error::Config(ConfigError::InvalidMargin(workspace.margin)));
    }

    for axis in Axis::ALL {
        let i = axis.index();
        let mut low = f32::INFINITY;
        let mut high = f32::NEG_INFINITY;
        for anchor in config.anchors.iter() {
            low = low.min(anchor.position[i]);
            high = high.max(anchor.position[i]);
        }

        low -= workspace.margin;
        high += workspace.margin;
        if axis == config.physics.up_axis {
            low -= workspace.fall_allowance;
        }

        if low > high {
            return Err(Error::Config(ConfigError::InvertedWorkspace(axis)));
        }
    }

    Ok(())
}

fn validate_modes(modes: &ModesConfig, anchors: usize) -> Result<()> {
    if let Some(delay) = modes.half_step_delay {
        if !positive(delay.0) {
            return Err(Error::Config(ConfigError::InvalidStepDelay(delay.0)));
        }
    }

    if !positive(modes.jog_distance) {
        return Err(Error::Config(ConfigError::InvalidJogDistance(modes.jog_distance)));
    }

    for row in modes.overrides() {
        if row.len() != anchors {
            return Err(Error::Config(ConfigError::ModeTableMismatch {
                entries: row.len(),
                anchors,
            }));
        }
    }

    Ok(())
}

// NaN fails both checks
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::Seconds;

    #[test]
    fn test_invalid_steps_per_revolution() {
        let spool = SpoolConfig::new(10.0, 0);

        let result = validate_spool(&spool);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
        ));
    }

    #[test]
    fn test_nan_circumference_rejected() {
        let spool = SpoolConfig::new(f32::NAN, 200);

        assert!(matches!(
            validate_spool(&spool),
            Err(Error::Config(ConfigError::InvalidCircumference(_)))
        ));
    }

    #[test]
    fn test_zero_step_delay_rejected() {
        let mut spool = SpoolConfig::new(10.0, 200);
        spool.half_step_delay = Seconds(0.0);

        assert!(matches!(
            validate_spool(&spool),
            Err(Error::Config(ConfigError::InvalidStepDelay(_)))
        ));
    }

    #[test]
    fn test_restitution_range() {
        let physics = PhysicsConfig {
            restitution: 1.5,
            ..PhysicsConfig::default()
        };

        assert!(matches!(
            validate_physics(&physics),
            Err(Error::Config(ConfigError::InvalidRestitution(_)))
        ));
        assert!(validate_physics(&PhysicsConfig::default()).is_ok());
    }

    fn square_config() -> RobotConfig {
        use crate::config::{AnchorConfig, WorkspaceConfig};
        use crate::kinematics::Direction;

        let anchor = |name: &str, position: [f32; 3]| AnchorConfig {
            name: heapless::String::try_from(name).unwrap(),
            position,
            shorten_direction: Direction::Clockwise,
        };

        RobotConfig {
            anchors: [
                anchor("C1", [-200.0, 200.0, -200.0]),
                anchor("C2", [-200.0, 200.0, 200.0]),
                anchor("C3", [200.0, 200.0, 200.0]),
                anchor("C4", [200.0, 200.0, -200.0]),
            ]
            .into_iter()
            .collect(),
            spool: SpoolConfig::new(10.0, 200),
            physics: PhysicsConfig::default(),
            workspace: WorkspaceConfig::default(),
            modes: ModesConfig::default(),
        }
    }

    #[test]
    fn test_nan_margin_rejected() {
        let mut config = square_config();
        config.workspace.margin = f32::NAN;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidMargin(_)))
        ));
    }

    #[test]
    fn test_margin_cannot_invert_box() {
        let mut config = square_config();

        // 400 wide on X and Z: an inset of 200 still leaves a single plane
        config.workspace.margin = -200.0;
        assert!(validate_config(&config).is_ok());

        config.workspace.margin = -300.0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvertedWorkspace(Axis::X)))
        ));
    }

    #[test]
    fn test_fall_allowance_keeps_up_axis_open() {
        let mut config = square_config();
        // Every anchor shares y = 200, so only the fall allowance gives Y room
        config.workspace.margin = -150.0;
        config.physics.up_axis = Axis::Y;
        config.workspace.fall_allowance = 400.0;
        assert!(validate_config(&config).is_ok());

        config.workspace.fall_allowance = 200.0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvertedWorkspace(Axis::Y)))
        ));
    }

    #[test]
    fn test_non_finite_initial_position_rejected() {
        let mut config = square_config();
        config.physics.initial_position = [0.0, f32::INFINITY, 0.0];

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::NonFiniteInitialPosition))
        ));
    }

    #[test]
    fn test_mode_rows_must_match_anchor_count() {
        use crate::kinematics::SpoolAction;

        let mut modes = ModesConfig::default();
        assert!(validate_modes(&modes, 4).is_ok());

        modes.up = Some([SpoolAction::Shorten; 3].into_iter().collect());
        assert!(matches!(
            validate_modes(&modes, 4),
            Err(Error::Config(ConfigError::ModeTableMismatch { entries: 3, anchors: 4 }))
        ));
        assert!(validate_modes(&modes, 3).is_ok());

        modes.jog_distance = 0.0;
        assert!(matches!(
            validate_modes(&modes, 3),
            Err(Error::Config(ConfigError::InvalidJogDistance(_)))
        ));
    }
}
