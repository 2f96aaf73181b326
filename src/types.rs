//! Configuration and diagnostic types for the orientation filter

use crate::error::SettingsError;
use crate::math::{exact_inverse_sqrt, fast_inverse_sqrt};

/// Default sample frequency in Hz
pub const DEFAULT_SAMPLE_FREQUENCY: f32 = 100.0;

/// Default proportional gain (Kp)
pub const DEFAULT_PROPORTIONAL_GAIN: f32 = 0.5;

/// Reciprocal square root strategy used for vector and quaternion normalization
///
/// # Example
/// ```
/// use mahony_ahrs::{Ahrs, AhrsSettings, Normalization};
///
/// // Bit-level approximation, for parity with device firmware
/// let settings = AhrsSettings {
///     normalization: Normalization::Fast,
///     ..Default::default()
/// };
/// let ahrs = Ahrs::with_settings(settings).unwrap();
/// assert_eq!(ahrs.settings().normalization, Normalization::Fast);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Bit-level approximation with a single Newton-Raphson step
    ///
    /// Cheap on targets without an FPU. The result is within about 0.2% of
    /// the true reciprocal square root, so the stored quaternion components
    /// have a magnitude slightly below one.
    Fast,
    /// `1 / sqrt(x)` computed with `libm`
    #[default]
    Exact,
}

impl Normalization {
    /// Reciprocal square root of `x` using this strategy
    #[inline]
    pub fn inverse_sqrt(self, x: f32) -> f32 {
        match self {
            Normalization::Fast => fast_inverse_sqrt(x),
            Normalization::Exact => exact_inverse_sqrt(x),
        }
    }
}

/// Orientation filter settings
///
/// Both constants are fixed for the lifetime of a filter instance. The sample
/// frequency must match the rate at which [`Ahrs::update`](crate::Ahrs::update)
/// is actually called; any mismatch scales the integrated rotation with no
/// internal correction.
///
/// # Example
/// ```
/// use mahony_ahrs::AhrsSettings;
///
/// let settings = AhrsSettings {
///     sample_frequency: 512.0,   // 512 Hz IMU
///     proportional_gain: 1.0,    // trust the accelerometer more
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AhrsSettings {
    /// Rate in Hz at which the filter is updated (typically 100.0)
    pub sample_frequency: f32,
    /// Proportional gain Kp (typically 0.5)
    ///
    /// Scales how strongly the gravity direction error corrects integrated
    /// gyroscope drift. Higher values follow the accelerometer more closely,
    /// lower values follow the gyroscope. Zero disables the correction.
    pub proportional_gain: f32,
    /// Reciprocal square root used for normalization
    pub normalization: Normalization,
}

impl AhrsSettings {
    /// Check the settings, returning the first offending value
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.sample_frequency.is_finite() || self.sample_frequency <= 0.0 {
            return Err(SettingsError::InvalidSampleFrequency(self.sample_frequency));
        }
        if !self.proportional_gain.is_finite() || self.proportional_gain < 0.0 {
            return Err(SettingsError::InvalidGain(self.proportional_gain));
        }
        Ok(())
    }

    /// Sampling interval in seconds
    pub fn sample_period(&self) -> f32 {
        1.0 / self.sample_frequency
    }
}

impl Default for AhrsSettings {
    fn default() -> Self {
        Self {
            sample_frequency: DEFAULT_SAMPLE_FREQUENCY,
            proportional_gain: DEFAULT_PROPORTIONAL_GAIN,
            normalization: Normalization::default(),
        }
    }
}

/// Filter status flags
///
/// # Example
/// ```
/// use mahony_ahrs::Ahrs;
///
/// let mut ahrs = Ahrs::new();
/// ahrs.update(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
///
/// if ahrs.flags().accelerometer_ignored {
///     println!("no accelerometer sample, integrating gyroscope only");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AhrsFlags {
    /// Whether the last update skipped the gravity correction
    ///
    /// True when the accelerometer triplet was exactly zero, in which case
    /// the quaternion was advanced by gyroscope integration alone.
    pub accelerometer_ignored: bool,
}
