/// Configuration errors detected when a controller or rig is built.
///
/// None of these are recoverable at runtime; a misconfigured rig must not
/// silently fall back to defaults.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocomotionError {
    #[error("unknown turn style '{0}' (expected 'smooth' or 'snap')")]
    UnknownTurnStyle(String),

    #[error("invalid locomotion setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("locomotion rig has no head tracker assigned")]
    MissingHeadTracker,
}
