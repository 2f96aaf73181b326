//! Mathematical utilities and nalgebra extensions for the orientation filter

use nalgebra::{UnitQuaternion, Vector3};

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

const INVERSE_SQRT_MAGIC: u32 = 0x5f37_59df;

/// Fast inverse square root
///
/// Initial guess from the IEEE-754 bit pattern followed by one Newton-Raphson
/// step. Accurate to about 0.18% for any positive finite input. Returns `0.0`
/// for zero or negative input, which has no reciprocal square root.
///
/// # Example
/// ```
/// use mahony_ahrs::fast_inverse_sqrt;
///
/// let y = fast_inverse_sqrt(4.0);
/// assert!((y - 0.5).abs() < 0.001);
/// ```
pub fn fast_inverse_sqrt(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }

    let half_x = 0.5 * x;
    let y = f32::from_bits(INVERSE_SQRT_MAGIC - (x.to_bits() >> 1));

    y * (1.5 - (half_x * y * y))
}

/// Reciprocal square root through `libm`
pub(crate) fn exact_inverse_sqrt(x: f32) -> f32 {
    1.0 / libm::sqrtf(x)
}

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f32>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn deg_to_rad(&self) -> Vector3<f32> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f32> {
        *self * RAD_TO_DEG
    }
}

/// Extension trait for UnitQuaternion operations
pub trait QuaternionExt {
    /// Convert quaternion to Euler angles (roll, pitch, yaw) in radians
    fn to_euler(&self) -> Vector3<f32>;

    /// Convert quaternion to Euler angles in degrees
    fn to_euler_degrees(&self) -> Vector3<f32>;

    /// Create quaternion from Euler angles in degrees
    fn from_euler_degrees(roll: f32, pitch: f32, yaw: f32) -> UnitQuaternion<f32>;
}

impl QuaternionExt for UnitQuaternion<f32> {
    fn to_euler(&self) -> Vector3<f32> {
        let (roll, pitch, yaw) = self.euler_angles();
        Vector3::new(roll, pitch, yaw)
    }

    fn to_euler_degrees(&self) -> Vector3<f32> {
        self.to_euler().rad_to_deg()
    }

    fn from_euler_degrees(roll: f32, pitch: f32, yaw: f32) -> UnitQuaternion<f32> {
        let euler_rad = Vector3::new(roll, pitch, yaw).deg_to_rad();
        UnitQuaternion::from_euler_angles(euler_rad.x, euler_rad.y, euler_rad.z)
    }
}
