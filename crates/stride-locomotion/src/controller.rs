//! Locomotion controller: one explicit tick per simulation frame

use glam::{Quat, Vec3};
use stride_core::{heading_rotation, GroundState};
use tracing::{info, trace, warn};

use crate::composer::{compose_velocity, sprint_eligible, PlanarBasis};
use crate::input::{HeadPose, InputSample};
use crate::turn::TurnState;
use crate::upright::correct_upright;
use crate::vertical::VerticalIntegrator;
use crate::{LocomotionConfig, LocomotionError};

/// Mutable per-entity locomotion state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionState {
    /// Snap turn latch
    pub turn: TurnState,
    /// Vertical velocity integrator
    pub vertical: VerticalIntegrator,
    /// Last non-degenerate movement basis, used when the head looks straight up or down
    pub last_basis: PlanarBasis,
}

/// Everything one tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionOutput {
    /// Rig orientation after turning and upright correction
    pub orientation: Quat,
    /// Rotation that takes the previous orientation to `orientation`
    pub orientation_delta: Quat,
    /// Velocity for this tick in meters per second
    pub velocity: Vec3,
    /// Displacement to hand to the move-with-collision primitive
    pub displacement: Vec3,
    /// Whether sprint speed was selected
    pub sprinting: bool,
    /// Whether a snap turn fired
    pub snapped: bool,
    /// Delta time actually used after sanitizing and clamping
    pub dt: f32,
}

/// Drives one rig's turning, gravity, and movement
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    state: LocomotionState,
}

impl LocomotionController {
    /// Create a controller, rejecting invalid configuration
    pub fn new(config: LocomotionConfig) -> Result<Self, LocomotionError> {
        config.validate()?;
        info!(
            "Locomotion controller created ({} turning, walk {} m/s, sprint {} m/s)",
            config.turn_style, config.move_speed, config.sprint_speed
        );
        Ok(Self {
            config,
            state: LocomotionState::default(),
        })
    }

    /// Configuration this controller was built with
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Current locomotion state
    pub fn state(&self) -> &LocomotionState {
        &self.state
    }

    /// Current vertical velocity
    pub fn vertical_velocity(&self) -> f32 {
        self.state.vertical.velocity()
    }

    /// Forget vertical motion and the snap latch, e.g. after a teleport
    pub fn reset(&mut self) {
        self.state.vertical.reset();
        self.state.turn = TurnState::Idle;
    }

    /// Advance one tick.
    ///
    /// Order: turn, upright correction, vertical integration, then movement
    /// composition using the post-turn facing. `orientation` is the rig's
    /// current world rotation and `head` is in rig-local space.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &InputSample,
        head: &HeadPose,
        ground: GroundState,
        orientation: Quat,
    ) -> LocomotionOutput {
        let dt = self.sanitize_dt(dt);
        let input = input.sanitized();
        let grounded = ground.is_grounded;

        let turn = self.state.turn.update(input.turn_axis.x, dt, &self.config);
        let mut new_orientation = if turn.heading_delta != 0.0 {
            (orientation * heading_rotation(turn.heading_delta)).normalize()
        } else {
            orientation
        };
        if self.config.force_upright {
            new_orientation = correct_upright(new_orientation);
        }

        let vertical_velocity = self
            .state
            .vertical
            .step(grounded, input.jump, dt, &self.config);

        let (basis, degenerate) = PlanarBasis::from_head(
            new_orientation * head.forward,
            new_orientation * head.right,
            self.state.last_basis,
        );
        if degenerate {
            trace!("Head direction has no horizontal component, using fallback basis");
        }
        self.state.last_basis = basis;

        let sprinting = sprint_eligible(grounded, input.sprint, input.move_axis, &self.config);
        let velocity = compose_velocity(
            basis,
            input.move_axis,
            vertical_velocity,
            sprinting,
            &self.config,
        );

        LocomotionOutput {
            orientation: new_orientation,
            orientation_delta: new_orientation * orientation.inverse(),
            velocity,
            displacement: velocity * dt,
            sprinting,
            snapped: turn.snapped,
            dt,
        }
    }

    fn sanitize_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            warn!("Ignoring invalid delta time {dt}");
            return 0.0;
        }
        match self.config.max_delta_time {
            Some(max_dt) => dt.min(max_dt),
            None => dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TurnStyle;
    use stride_core::heading_degrees;

    const DT: f32 = 1.0 / 72.0;

    fn controller(config: LocomotionConfig) -> LocomotionController {
        LocomotionController::new(config).unwrap()
    }

    fn tick(
        ctrl: &mut LocomotionController,
        input: InputSample,
        ground: GroundState,
        orientation: Quat,
    ) -> LocomotionOutput {
        ctrl.tick(DT, &input, &HeadPose::default(), ground, orientation)
    }

    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.abs_diff_eq(b, 1e-5) || a.abs_diff_eq(-b, 1e-5)
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = LocomotionConfig {
            move_speed: -1.0,
            ..Default::default()
        };
        assert!(LocomotionController::new(config).is_err());
    }

    #[test]
    fn test_grounded_idle_tick_sticks_to_floor() {
        let mut ctrl = controller(LocomotionConfig::default());
        let out = tick(&mut ctrl, InputSample::new(), GroundState::GROUNDED, Quat::IDENTITY);
        assert_eq!(ctrl.vertical_velocity(), -1.0);
        assert_eq!(out.velocity, Vec3::new(0.0, -1.0, 0.0));
        assert!((out.displacement.y + DT).abs() < 1e-7);
    }

    #[test]
    fn test_held_snap_rotates_once_over_many_ticks() {
        let mut ctrl = controller(LocomotionConfig::default());
        let mut orientation = Quat::IDENTITY;
        let mut snaps = 0;
        for _ in 0..20 {
            let out = tick(
                &mut ctrl,
                InputSample::new().with_turn(1.0),
                GroundState::GROUNDED,
                orientation,
            );
            orientation = out.orientation;
            snaps += out.snapped as u32;
        }
        assert_eq!(snaps, 1);
        assert!((heading_degrees(orientation) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_snap_rearm_sequence_snaps_twice() {
        let mut ctrl = controller(LocomotionConfig::default());
        let mut orientation = Quat::IDENTITY;
        let mut fired = Vec::new();
        for turn in [1.0, 1.0, 0.0, 1.0] {
            let out = tick(
                &mut ctrl,
                InputSample::new().with_turn(turn),
                GroundState::GROUNDED,
                orientation,
            );
            orientation = out.orientation;
            fired.push(out.snapped);
        }
        assert_eq!(fired, vec![true, false, false, true]);
        assert!((heading_degrees(orientation) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_turn_accumulates_continuously() {
        let mut ctrl = controller(LocomotionConfig {
            turn_style: TurnStyle::Smooth,
            turn_speed: 90.0,
            ..Default::default()
        });
        let mut orientation = Quat::IDENTITY;
        let mut largest_step: f32 = 0.0;
        for _ in 0..100 {
            let out = ctrl.tick(
                0.01,
                &InputSample::new().with_turn(0.5),
                &HeadPose::default(),
                GroundState::GROUNDED,
                orientation,
            );
            let step = heading_degrees(out.orientation) - heading_degrees(orientation);
            largest_step = largest_step.max(step);
            orientation = out.orientation;
        }
        assert!((heading_degrees(orientation) - 45.0).abs() < 1e-2);
        assert!(largest_step < 0.5);
    }

    #[test]
    fn test_movement_follows_post_turn_facing() {
        let mut ctrl = controller(LocomotionConfig::default());
        let out = tick(
            &mut ctrl,
            InputSample::new().with_turn(1.0).with_move(0.0, 1.0),
            GroundState::GROUNDED,
            Quat::IDENTITY,
        );
        let horizontal = Vec3::new(out.velocity.x, 0.0, out.velocity.z);
        let expected = heading_rotation(45.0) * -Vec3::Z * 3.0;
        assert!((horizontal - expected).length() < 1e-4);
    }

    #[test]
    fn test_jump_snap_and_sprint_in_one_tick() {
        let mut ctrl = controller(LocomotionConfig::default());
        let input = InputSample::new()
            .with_turn(-1.0)
            .with_move(0.0, 1.0)
            .with_jump()
            .with_sprint();
        let out = tick(&mut ctrl, input, GroundState::GROUNDED, Quat::IDENTITY);

        assert!(out.snapped);
        assert!(out.sprinting);
        assert_eq!(ctrl.vertical_velocity(), 5.0);
        assert!((heading_degrees(out.orientation) + 45.0).abs() < 1e-3);
        let horizontal = Vec3::new(out.velocity.x, 0.0, out.velocity.z);
        assert!((horizontal.length() - 6.0).abs() < 1e-4);
        assert_eq!(out.velocity.y, 5.0);
    }

    #[test]
    fn test_sprint_button_in_air_walks() {
        let mut ctrl = controller(LocomotionConfig::default());
        let input = InputSample::new().with_move(0.0, 1.0).with_sprint();
        let out = tick(&mut ctrl, input, GroundState::AIRBORNE, Quat::IDENTITY);
        assert!(!out.sprinting);
        let horizontal = Vec3::new(out.velocity.x, 0.0, out.velocity.z);
        assert!((horizontal.length() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_tilted_rig_is_levelled_every_tick() {
        let mut ctrl = controller(LocomotionConfig::default());
        let tilted = Quat::from_euler(
            glam::EulerRot::YXZ,
            30f32.to_radians(),
            0.2,
            -0.1,
        );
        let out = tick(&mut ctrl, InputSample::new(), GroundState::GROUNDED, tilted);
        let (yaw, pitch, roll) = out.orientation.to_euler(glam::EulerRot::YXZ);
        assert!((yaw.to_degrees() - 30.0).abs() < 1e-3);
        assert!(pitch.abs() < 1e-6 && roll.abs() < 1e-6);
        let reconstructed = out.orientation_delta * tilted;
        assert!(same_rotation(reconstructed, out.orientation));
    }

    #[test]
    fn test_tilt_is_kept_without_force_upright() {
        let mut ctrl = controller(LocomotionConfig {
            force_upright: false,
            ..Default::default()
        });
        let tilted = Quat::from_rotation_x(0.3);
        let out = tick(&mut ctrl, InputSample::new(), GroundState::GROUNDED, tilted);
        assert!(same_rotation(out.orientation, tilted));
    }

    #[test]
    fn test_head_looking_straight_up_never_produces_nan() {
        let mut ctrl = controller(LocomotionConfig::default());
        let head = HeadPose::new(Vec3::new(0.0, 1.6, 0.0), Vec3::Y, Vec3::Y);
        let input = InputSample::new().with_move(0.3, 1.0);
        let first = ctrl.tick(DT, &input, &head, GroundState::GROUNDED, Quat::IDENTITY);
        let second = ctrl.tick(DT, &input, &head, GroundState::GROUNDED, Quat::IDENTITY);
        assert!(first.displacement.is_finite());
        assert_eq!(first.displacement, second.displacement);
    }

    #[test]
    fn test_degenerate_head_reuses_last_valid_basis() {
        let mut ctrl = controller(LocomotionConfig::default());
        let input = InputSample::new().with_move(0.0, 1.0);
        let side = HeadPose::new(Vec3::ZERO, Vec3::X, Vec3::Z);
        ctrl.tick(DT, &input, &side, GroundState::GROUNDED, Quat::IDENTITY);

        let up = HeadPose::new(Vec3::ZERO, Vec3::Y, Vec3::NEG_Y);
        let out = ctrl.tick(DT, &input, &up, GroundState::GROUNDED, Quat::IDENTITY);
        assert!((out.velocity.x - 3.0).abs() < 1e-5);
        assert!(out.velocity.z.abs() < 1e-5);
    }

    #[test]
    fn test_huge_dt_is_accepted_and_finite() {
        let mut ctrl = controller(LocomotionConfig::default());
        let out = ctrl.tick(
            3600.0,
            &InputSample::new(),
            &HeadPose::default(),
            GroundState::AIRBORNE,
            Quat::IDENTITY,
        );
        assert_eq!(out.dt, 3600.0);
        assert!(out.displacement.is_finite());
    }

    #[test]
    fn test_configured_clamp_limits_dt() {
        let mut ctrl = controller(LocomotionConfig {
            max_delta_time: Some(0.1),
            ..Default::default()
        });
        let out = ctrl.tick(
            5.0,
            &InputSample::new(),
            &HeadPose::default(),
            GroundState::AIRBORNE,
            Quat::IDENTITY,
        );
        assert_eq!(out.dt, 0.1);
        assert_eq!(ctrl.vertical_velocity(), -9.81 * 0.1);
    }

    #[test]
    fn test_invalid_dt_is_treated_as_zero() {
        let mut ctrl = controller(LocomotionConfig::default());
        for dt in [f32::NAN, f32::INFINITY, -0.5] {
            let out = ctrl.tick(
                dt,
                &InputSample::new().with_move(0.0, 1.0),
                &HeadPose::default(),
                GroundState::AIRBORNE,
                Quat::IDENTITY,
            );
            assert_eq!(out.dt, 0.0);
            assert_eq!(out.displacement, Vec3::ZERO);
        }
        assert_eq!(ctrl.vertical_velocity(), 0.0);
    }

    #[test]
    fn test_reset_clears_velocity_and_latch() {
        let mut ctrl = controller(LocomotionConfig::default());
        tick(
            &mut ctrl,
            InputSample::new().with_turn(1.0).with_jump(),
            GroundState::GROUNDED,
            Quat::IDENTITY,
        );
        assert!(ctrl.state().turn.is_engaged());
        ctrl.reset();
        assert_eq!(ctrl.vertical_velocity(), 0.0);
        assert_eq!(ctrl.state().turn, TurnState::Idle);
    }
}
