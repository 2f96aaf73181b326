use mahony_ahrs::{Ahrs, AhrsSettings, Normalization, QuaternionExt, fast_inverse_sqrt};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const EPSILON: f32 = 1e-5;

/// Fast inverse square root is good to about 0.18%
const FAST_TOLERANCE: f32 = 0.002;

fn ahrs_with(normalization: Normalization) -> Ahrs {
    Ahrs::with_settings(AhrsSettings {
        normalization,
        ..Default::default()
    })
    .unwrap()
}

/// Magnitude of the stored components, before any renormalization on read
fn magnitude(ahrs: &Ahrs) -> f32 {
    let [w, x, y, z] = ahrs.components();
    Quaternion::new(w, x, y, z).norm()
}

fn random_sample(rng: &mut Pcg64) -> (Vector3<f32>, Vector3<f32>) {
    let gyroscope = Vector3::new(
        rng.random_range(-5.0..5.0),
        rng.random_range(-5.0..5.0),
        rng.random_range(-5.0..5.0),
    );
    let accelerometer = Vector3::new(
        rng.random_range(-2.0..2.0),
        rng.random_range(-2.0..2.0),
        rng.random_range(-2.0..2.0),
    );
    (gyroscope, accelerometer)
}

/// Test that the quaternion stays unit length for arbitrary input
#[test]
fn test_unit_magnitude_after_update() {
    let mut rng = Pcg64::seed_from_u64(7);
    let mut ahrs = Ahrs::new();

    for i in 0..5000 {
        let (gyroscope, accelerometer) = random_sample(&mut rng);
        ahrs.update_vectors(gyroscope, accelerometer);

        let norm = magnitude(&ahrs);
        assert!((norm - 1.0).abs() < EPSILON, "Sample {}: |q| = {}", i, norm);
    }
}

/// Test that fast normalization stays within its approximation bound without drifting
#[test]
fn test_fast_normalization_does_not_drift() {
    let mut rng = Pcg64::seed_from_u64(11);
    let mut ahrs = ahrs_with(Normalization::Fast);

    for i in 0..20_000 {
        let (gyroscope, accelerometer) = random_sample(&mut rng);
        ahrs.update_vectors(gyroscope, accelerometer);

        let norm = magnitude(&ahrs);
        assert!(
            norm > 1.0 - FAST_TOLERANCE && norm <= 1.0,
            "Sample {}: |q| = {}",
            i,
            norm
        );

        // Rotations handed to callers are unit length regardless
        let rotated = ahrs.quaternion() * Vector3::x();
        assert!(
            (rotated.norm() - 1.0).abs() < EPSILON,
            "Sample {}: |q * x| = {}",
            i,
            rotated.norm()
        );
    }
}

/// Test a single level, stationary sample from identity
#[test]
fn test_level_sample_from_identity() {
    let mut ahrs = Ahrs::new();
    ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    assert_eq!(ahrs.components(), [1.0, 0.0, 0.0, 0.0]);
    assert!((magnitude(&ahrs) - 1.0).abs() < EPSILON);

    // Fast normalization only scales w
    let mut ahrs = ahrs_with(Normalization::Fast);
    ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);

    let [w, x, y, z] = ahrs.components();
    assert!((w - 1.0).abs() < FAST_TOLERANCE);
    assert_eq!([x, y, z], [0.0, 0.0, 0.0]);
}

/// Test that a sample agreeing with the current estimate changes nothing
#[test]
fn test_no_error_no_change() {
    let start = UnitQuaternion::from_euler_angles(0.4, -0.3, 1.0);
    let mut ahrs = ahrs_with(Normalization::Exact);
    ahrs.set_quaternion(start);

    // Accelerometer scale is irrelevant
    let accelerometer = ahrs.gravity() * 9.81;
    ahrs.update_vectors(Vector3::zeros(), accelerometer);

    let difference = (ahrs.quaternion().coords - start.coords).norm();
    assert!(difference < 1e-6, "Quaternion moved by {}", difference);
}

/// Test that a zero accelerometer reading skips the correction entirely
#[test]
fn test_zero_accelerometer_skips_correction() {
    let start = UnitQuaternion::from_euler_angles(0.2, 0.1, -0.5);
    let gyroscope = Vector3::new(0.3, -0.2, 0.1);

    let mut ahrs = Ahrs::new();
    let mut no_gain = Ahrs::with_settings(AhrsSettings {
        proportional_gain: 0.0,
        ..Default::default()
    })
    .unwrap();
    let mut corrected = Ahrs::new();
    for filter in [&mut ahrs, &mut no_gain, &mut corrected] {
        filter.set_quaternion(start);
    }

    for _ in 0..100 {
        ahrs.update_vectors(gyroscope, Vector3::zeros());
        no_gain.update_vectors(gyroscope, Vector3::zeros());
        corrected.update_vectors(gyroscope, Vector3::new(0.0, 0.0, 1.0));
    }

    // Identical to a filter with the feedback switched off
    assert_eq!(ahrs.components(), no_gain.components());
    assert!(ahrs.flags().accelerometer_ignored);
    assert!(ahrs.components().iter().all(|c| c.is_finite()));

    // and different from one that receives gravity
    assert_ne!(ahrs.components(), corrected.components());
    assert!(!corrected.flags().accelerometer_ignored);
}

/// Test that repeated zero accelerometer readings still integrate cleanly
#[test]
fn test_long_accelerometer_dropout() {
    let mut ahrs = Ahrs::new();

    for _ in 0..10_000 {
        ahrs.update(0.5, -0.25, 1.0, 0.0, 0.0, 0.0);
    }

    let norm = magnitude(&ahrs);
    assert!(norm.is_finite());
    assert!((norm - 1.0).abs() < EPSILON, "|q| = {}", norm);
}

/// Test fast inverse square root on representative values
#[test]
fn test_fast_inverse_sqrt_accuracy() {
    for x in [1.0f32, 4.0, 100.0] {
        let approximate_sqrt = fast_inverse_sqrt(x) * x;
        let relative_error = (approximate_sqrt - x.sqrt()).abs() / x.sqrt();
        assert!(relative_error < FAST_TOLERANCE, "x = {}: {}", x, relative_error);
    }

    assert!((fast_inverse_sqrt(1.0) - 1.0).abs() < FAST_TOLERANCE);
}

/// Test that gravity feedback pulls a tilted estimate back to level
#[test]
fn test_converges_to_level() {
    let mut ahrs = ahrs_with(Normalization::Exact);
    ahrs.set_quaternion(UnitQuaternion::from_euler_angles(30.0f32.to_radians(), 0.0, 0.0));

    for _ in 0..3000 {
        ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    }

    let [w, x, y, z] = ahrs.components();
    assert!((w - 1.0).abs() < 1e-4, "w = {}", w);
    assert!(x.abs() < 1e-4, "x = {}", x);
    assert!(y.abs() < 1e-4 && z.abs() < 1e-4);
}

/// Test convergence from a combined roll and pitch error with fast normalization
#[test]
fn test_converges_from_roll_and_pitch() {
    let mut ahrs = ahrs_with(Normalization::Fast);
    ahrs.set_quaternion(UnitQuaternion::from_euler_degrees(28.0, -23.0, 45.0));

    for _ in 0..3000 {
        ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
    }

    let gravity = ahrs.gravity();
    assert!((gravity - Vector3::z()).norm() < 1e-3, "Gravity: {:?}", gravity);

    // Heading is not observable from gravity and is left alone
    let (roll, pitch, _) = ahrs.euler_angles();
    assert!(roll.abs() < 1e-3 && pitch.abs() < 1e-3);
}

/// Test that a downward reference drives the estimate upside down
///
/// `(0, 0, 1)` is the level reference for this filter. Feeding `(0, 0, -1)`
/// makes identity an unstable equilibrium and the estimate flips over.
#[test]
fn test_inverted_reference_flips_estimate() {
    let mut ahrs = Ahrs::new();

    // Exactly at identity the error is zero and nothing moves
    for _ in 0..100 {
        ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, -1.0);
    }
    assert!((ahrs.gravity() - Vector3::z()).norm() < 1e-6);

    // Any tilt grows until the estimate matches the reference
    ahrs.set_quaternion(UnitQuaternion::from_euler_angles(0.1, 0.0, 0.0));
    for _ in 0..3000 {
        ahrs.update(0.0, 0.0, 0.0, 0.0, 0.0, -1.0);
    }

    let gravity = ahrs.gravity();
    assert!((gravity + Vector3::z()).norm() < 1e-3, "Gravity: {:?}", gravity);
}

/// Test pure gyroscope integration of a constant yaw rate
#[test]
fn test_constant_rate_integration() {
    for normalization in [Normalization::Fast, Normalization::Exact] {
        let mut ahrs = ahrs_with(normalization);

        // One second at 100 Hz
        for _ in 0..100 {
            ahrs.update(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
        }

        let (roll, pitch, yaw) = ahrs.euler_angles();
        assert!((yaw - 0.1).abs() < 1e-4, "{:?}: yaw = {}", normalization, yaw);
        assert!(roll.abs() < EPSILON && pitch.abs() < EPSILON);
    }
}

/// Test that the integration step follows the configured sample frequency
#[test]
fn test_sample_frequency_scales_integration() {
    let settings = AhrsSettings {
        sample_frequency: 200.0,
        normalization: Normalization::Exact,
        ..Default::default()
    };
    let mut ahrs = Ahrs::with_settings(settings).unwrap();

    // One second at 200 Hz
    for _ in 0..200 {
        ahrs.update(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
    }
    let (_, _, yaw) = ahrs.euler_angles();
    assert!((yaw - 0.1).abs() < 1e-4, "yaw = {}", yaw);

    // Calling a 100 Hz filter at 200 Hz integrates twice the rotation
    let mut mismatched = ahrs_with(Normalization::Exact);
    for _ in 0..200 {
        mismatched.update(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
    }
    let (_, _, yaw) = mismatched.euler_angles();
    assert!((yaw - 0.2).abs() < 1e-4, "yaw = {}", yaw);
}

/// Test that vector and scalar updates are the same operation
#[test]
fn test_update_method_consistency() {
    let mut rng = Pcg64::seed_from_u64(3);
    let mut scalar = Ahrs::new();
    let mut vector = Ahrs::new();

    for _ in 0..500 {
        let (g, a) = random_sample(&mut rng);
        scalar.update(g.x, g.y, g.z, a.x, a.y, a.z);
        vector.update_vectors(g, a);
    }

    assert_eq!(scalar.components(), vector.components());
}
