//! Keeps the rig level by discarding pitch and roll

use glam::{EulerRot, Quat};

/// Remove pitch and roll from `rotation`, keeping its yaw
pub fn correct_upright(rotation: Quat) -> Quat {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    if pitch != 0.0 || roll != 0.0 {
        Quat::from_rotation_y(yaw)
    } else {
        rotation
    }
}
