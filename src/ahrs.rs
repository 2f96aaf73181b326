//! Orientation filter implementation

use log::{debug, trace};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::error::SettingsError;
use crate::types::{AhrsFlags, AhrsSettings};

/// Gravity-referenced orientation filter
///
/// Integrates gyroscope readings into a body-to-Earth quaternion and corrects
/// the integration drift with proportional feedback from the accelerometer,
/// using gravity as the absolute reference. There is no integral term, so the
/// filter has no windup state beyond the quaternion itself.
///
/// The filter assumes a fixed sampling rate: call [`Ahrs::update`] exactly
/// once per sample period of the configured
/// [`sample_frequency`](AhrsSettings::sample_frequency).
#[derive(Debug, Clone)]
pub struct Ahrs {
    /// Settings the filter was built with
    settings: AhrsSettings,
    /// Orientation components (WXYZ format) exactly as the last update left them
    quaternion: Quaternion<f32>,
    /// Proportional gain, doubled to absorb the half-vector convention
    two_kp: f32,
    /// Half the sample period, applied to the corrected angular rate
    half_sample_period: f32,
    /// Status of the last update
    flags: AhrsFlags,
}

impl Ahrs {
    /// Create a filter with default settings (100 Hz, Kp = 0.5, exact normalization)
    pub fn new() -> Self {
        Self::from_valid_settings(AhrsSettings::default())
    }

    /// Create a filter with the given settings
    ///
    /// # Errors
    /// Returns [`SettingsError`] if the sample frequency is not strictly
    /// positive or the gain is negative. Either value must be finite.
    ///
    /// # Example
    /// ```
    /// use mahony_ahrs::{Ahrs, AhrsSettings};
    ///
    /// let settings = AhrsSettings {
    ///     sample_frequency: 200.0,
    ///     ..Default::default()
    /// };
    /// let ahrs = Ahrs::with_settings(settings).unwrap();
    /// assert_eq!(ahrs.settings().sample_frequency, 200.0);
    ///
    /// let invalid = AhrsSettings {
    ///     sample_frequency: 0.0,
    ///     ..Default::default()
    /// };
    /// assert!(Ahrs::with_settings(invalid).is_err());
    /// ```
    pub fn with_settings(settings: AhrsSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::from_valid_settings(settings))
    }

    fn from_valid_settings(settings: AhrsSettings) -> Self {
        debug!(
            "orientation filter: {} Hz, Kp = {}, {:?} normalization",
            settings.sample_frequency, settings.proportional_gain, settings.normalization
        );

        Ahrs {
            settings,
            quaternion: Quaternion::identity(),
            two_kp: 2.0 * settings.proportional_gain,
            half_sample_period: 0.5 * settings.sample_period(),
            flags: AhrsFlags::default(),
        }
    }

    /// Reset the orientation to identity
    pub fn reset(&mut self) {
        self.quaternion = Quaternion::identity();
        self.flags = AhrsFlags::default();
    }

    /// Get current settings
    pub fn settings(&self) -> AhrsSettings {
        self.settings
    }

    /// Advance the filter by one sample
    ///
    /// # Arguments
    /// * `gx`, `gy`, `gz` - Gyroscope reading in radians per second
    /// * `ax`, `ay`, `az` - Accelerometer reading, any unit
    ///
    /// An accelerometer reading of exactly `(0, 0, 0)` carries no direction.
    /// The gravity correction is skipped for that sample and the quaternion is
    /// advanced by gyroscope integration alone.
    ///
    /// # Example
    /// ```
    /// use mahony_ahrs::Ahrs;
    ///
    /// let mut ahrs = Ahrs::new();
    ///
    /// // Level and at rest
    /// ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    ///
    /// let [w, x, y, z] = ahrs.components();
    /// assert!((w - 1.0).abs() < 0.002);
    /// assert_eq!((x, y, z), (0.0, 0.0, 0.0));
    /// ```
    pub fn update(&mut self, gx: f32, gy: f32, gz: f32, ax: f32, ay: f32, az: f32) {
        self.update_vectors(Vector3::new(gx, gy, gz), Vector3::new(ax, ay, az));
    }

    /// Advance the filter by one sample given as vectors
    ///
    /// Same as [`Ahrs::update`].
    pub fn update_vectors(&mut self, gyroscope: Vector3<f32>, accelerometer: Vector3<f32>) {
        let normalization = self.settings.normalization;
        let mut gyroscope = gyroscope;

        // Normalising a zero vector is undefined, fall back to integration only
        let accelerometer_ignored = accelerometer == Vector3::zeros();
        if accelerometer_ignored {
            if !self.flags.accelerometer_ignored {
                trace!("zero accelerometer reading, gyroscope integration only");
            }
        } else {
            let (ax, ay, az) = (accelerometer.x, accelerometer.y, accelerometer.z);
            let recip_norm = normalization.inverse_sqrt(ax * ax + ay * ay + az * az);
            let accelerometer = accelerometer * recip_norm;

            // Error is the cross product between measured and estimated gravity
            let half_error = accelerometer.cross(&half_gravity(&self.quaternion));

            gyroscope += half_error * self.two_kp;
        }
        self.flags.accelerometer_ignored = accelerometer_ignored;

        self.integrate_quaternion(gyroscope * self.half_sample_period);
    }

    /// Get current orientation quaternion
    ///
    /// Always unit length. Under [`Normalization::Fast`](crate::Normalization::Fast)
    /// the stored components sit slightly below one and are renormalized here.
    pub fn quaternion(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_quaternion(self.quaternion)
    }

    /// Get quaternion components as `[w, x, y, z]`
    ///
    /// These are the stored values, not renormalized.
    pub fn components(&self) -> [f32; 4] {
        let q = &self.quaternion;
        [q.w, q.i, q.j, q.k]
    }

    /// Set orientation quaternion directly
    pub fn set_quaternion(&mut self, quaternion: UnitQuaternion<f32>) {
        self.quaternion = quaternion.into_inner();
    }

    /// Get algorithm flags
    pub fn flags(&self) -> AhrsFlags {
        self.flags
    }

    /// Gravity direction in the sensor frame implied by the current orientation
    ///
    /// Points "up": at identity this is `(0, 0, 1)`, the accelerometer reading
    /// of a level sensor at rest. Computed from the renormalized quaternion so
    /// the result is a unit vector under either normalization.
    pub fn gravity(&self) -> Vector3<f32> {
        half_gravity(self.quaternion().as_ref()) * 2.0
    }

    /// Current orientation as (roll, pitch, yaw) in radians
    pub fn euler_angles(&self) -> (f32, f32, f32) {
        self.quaternion().euler_angles()
    }

    /// First-order integration of `q' = q + q * (0, half_rate)` followed by normalization
    fn integrate_quaternion(&mut self, half_rate: Vector3<f32>) {
        let (gx, gy, gz) = (half_rate.x, half_rate.y, half_rate.z);
        let q = &self.quaternion;

        // Every component reads the pre-update values
        let (qa, qb, qc) = (q.w, q.i, q.j);
        let mut q3 = q.k;

        let mut q0 = qa + (-qb * gx - qc * gy - q3 * gz);
        let mut q1 = qb + (qa * gx + qc * gz - q3 * gy);
        let mut q2 = qc + (qa * gy - qb * gz + q3 * gx);
        q3 += qa * gz + qb * gy - qc * gx;

        let recip_norm = self
            .settings
            .normalization
            .inverse_sqrt(q0 * q0 + q1 * q1 + q2 * q2 + q3 * q3);
        q0 *= recip_norm;
        q1 *= recip_norm;
        q2 *= recip_norm;
        q3 *= recip_norm;

        self.quaternion = Quaternion::new(q0, q1, q2, q3);
    }
}

/// Third row of the rotation matrix, halved
fn half_gravity(q: &Quaternion<f32>) -> Vector3<f32> {
    let (q0, q1, q2, q3) = (q.w, q.i, q.j, q.k);

    Vector3::new(
        q1 * q3 - q0 * q2,
        q0 * q1 + q2 * q3,
        q0 * q0 - 0.5 + q3 * q3,
    )
}

impl Default for Ahrs {
    fn default() -> Self {
        Self::new()
    }
}
