//! Construction-time configuration errors

/// Rejected [`AhrsSettings`](crate::AhrsSettings) values.
///
/// Settings are only checked once, when the filter is built. The update path
/// itself never fails.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum SettingsError {
    /// Sample frequency must be finite and strictly positive
    #[error("invalid sample frequency: {0} Hz")]
    InvalidSampleFrequency(f32),

    /// Proportional gain must be finite and non-negative
    #[error("invalid proportional gain: {0}")]
    InvalidGain(f32),
}
