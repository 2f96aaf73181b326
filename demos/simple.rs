use mahony_ahrs::Ahrs;

fn main() {
    // 100 Hz, Kp = 0.5
    let mut ahrs = Ahrs::new();

    for _ in 0..10 {
        // this loop should repeat each time new gyroscope data is available
        let (gx, gy, gz) = (0.0, 0.0, 0.0); // replace this with actual gyroscope data in rad/s
        let (ax, ay, az) = (0.0, 0.0, 1.0); // replace this with actual accelerometer data in g

        ahrs.update(gx, gy, gz, ax, ay, az);

        let (roll, pitch, yaw) = ahrs.euler_angles();

        println!(
            "Roll: {:.2}, Pitch: {:.2}, Yaw: {:.2}",
            roll.to_degrees(),
            pitch.to_degrees(),
            yaw.to_degrees()
        );
    }

    // Quaternion in the order a transmitter would pack it
    let [w, x, y, z] = ahrs.components();
    println!("Quaternion: {w:.4} {x:.4} {y:.4} {z:.4}");
}
