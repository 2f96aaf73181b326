#![no_std]

//! Mahony AHRS - a gravity-referenced orientation filter for 6-axis IMUs
//!
//! Fuses gyroscope and accelerometer samples taken at a fixed rate into a
//! quaternion describing the sensor orientation relative to Earth. Gyroscope
//! drift is corrected by proportional feedback from the direction of gravity
//! measured by the accelerometer.
//!
//! The update path is a fixed amount of `f32` arithmetic: no allocation, no
//! I/O and no failure modes. Normalization uses an exact reciprocal square
//! root by default. The bit-level fast inverse square root is available for
//! cores without a floating-point unit, where it keeps the per-sample cost
//! low.
//!
//! # Features
//!
//! - Proportional gravity feedback with a configurable gain
//! - Gyroscope-only integration when the accelerometer reading is zero
//! - Fast or exact normalization
//! - `#![no_std]` compatible for embedded systems
//!
//! # Quick Start
//!
//! ```rust
//! use mahony_ahrs::Ahrs;
//!
//! let mut ahrs = Ahrs::new(); // 100 Hz, Kp = 0.5
//!
//! // Call once per sample period
//! ahrs.update(
//!     0.01, -0.02, 0.1, // gyroscope, rad/s
//!     0.0, 0.0, 1.0,    // accelerometer, g
//! );
//!
//! // Orientation as [w, x, y, z]
//! let quaternion = ahrs.components();
//!
//! // Or as Euler angles (roll, pitch, yaw) in radians
//! let (roll, pitch, yaw) = ahrs.euler_angles();
//! ```

mod ahrs;
mod error;
mod math;
mod types;

// Re-export all public types and functions
pub use ahrs::Ahrs;
pub use error::SettingsError;
pub use math::{DEG_TO_RAD, QuaternionExt, RAD_TO_DEG, Vector3Ext, fast_inverse_sqrt};
pub use types::*;
