//! Orientation tracking on a recorded sensor trace
//!
//! Runs the filter over `testdata/sensor_data.csv` and plots the estimated
//! roll and pitch against the ground truth, together with the samples where
//! the accelerometer reading was missing.
//!
//! Run with: `cargo run --example plot`

use mahony_ahrs::{Ahrs, AhrsSettings};
use plotters::prelude::*;
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct SensorData {
    #[serde(rename = "Time (s)")]
    time: f32,
    #[serde(rename = "Gyroscope X (rad/s)")]
    gyro_x: f32,
    #[serde(rename = "Gyroscope Y (rad/s)")]
    gyro_y: f32,
    #[serde(rename = "Gyroscope Z (rad/s)")]
    gyro_z: f32,
    #[serde(rename = "Accelerometer X (g)")]
    accel_x: f32,
    #[serde(rename = "Accelerometer Y (g)")]
    accel_y: f32,
    #[serde(rename = "Accelerometer Z (g)")]
    accel_z: f32,
    #[serde(rename = "Gravity X")]
    gravity_x: f32,
    #[serde(rename = "Gravity Y")]
    gravity_y: f32,
    #[serde(rename = "Gravity Z")]
    gravity_z: f32,
}

impl SensorData {
    /// True roll and pitch in degrees, from the gravity direction
    fn true_tilt(&self) -> (f32, f32) {
        let roll = self.gravity_y.atan2(self.gravity_z);
        let pitch = (-self.gravity_x).clamp(-1.0, 1.0).asin();
        (roll.to_degrees(), pitch.to_degrees())
    }
}

const SAMPLE_RATE: f32 = 100.0; // 100 Hz

fn main() -> Result<(), Box<dyn Error>> {
    let mut reader = csv::Reader::from_path("testdata/sensor_data.csv")?;
    let mut sensor_data = Vec::new();

    for result in reader.deserialize() {
        let record: SensorData = result?;
        sensor_data.push(record);
    }

    let settings = AhrsSettings {
        sample_frequency: SAMPLE_RATE,
        proportional_gain: 0.5,
        ..Default::default()
    };
    let mut ahrs = Ahrs::with_settings(settings)?;

    let mut estimated = Vec::with_capacity(sensor_data.len());
    let mut ignored = Vec::with_capacity(sensor_data.len());

    for data in &sensor_data {
        ahrs.update(
            data.gyro_x,
            data.gyro_y,
            data.gyro_z,
            data.accel_x,
            data.accel_y,
            data.accel_z,
        );

        let (roll, pitch, _) = ahrs.euler_angles();
        estimated.push((roll.to_degrees(), pitch.to_degrees()));
        ignored.push(if ahrs.flags().accelerometer_ignored { 1.0f32 } else { 0.0 });
    }

    let (roll, pitch) = estimated.last().copied().unwrap_or_default();
    println!("Processed {} samples", sensor_data.len());
    println!("Final roll {roll:.2}°, pitch {pitch:.2}°");

    create_plots(&sensor_data, &estimated, &ignored)?;
    println!("Plot saved to tilt_tracking.png");

    Ok(())
}

fn create_plots(
    sensor_data: &[SensorData],
    estimated: &[(f32, f32)],
    ignored: &[f32],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("tilt_tracking.png", (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let (upper, lower) = root.split_vertically(560);
    let time_range = match (sensor_data.first(), sensor_data.last()) {
        (Some(first), Some(last)) => first.time..last.time,
        _ => return Err("no sensor data".into()),
    };

    let mut tilt_chart = ChartBuilder::on(&upper)
        .caption("Estimated and true tilt", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(0)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -90f32..90f32)?;

    tilt_chart.configure_mesh().y_desc("Degrees").draw()?;

    let series = [
        ("Roll", RED, true),
        ("Pitch", GREEN, false),
    ];
    for (label, color, is_roll) in series {
        let pick = move |(r, p): (f32, f32)| if is_roll { r } else { p };

        tilt_chart
            .draw_series(LineSeries::new(
                sensor_data
                    .iter()
                    .zip(estimated.iter())
                    .map(|(d, &e)| (d.time, pick(e))),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));

        tilt_chart
            .draw_series(LineSeries::new(
                sensor_data.iter().map(|d| (d.time, pick(d.true_tilt()))),
                color.mix(0.4),
            ))?
            .label(format!("{label} (true)"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color.mix(0.4)));
    }

    tilt_chart.configure_series_labels().draw()?;

    let mut flag_chart = ChartBuilder::on(&lower)
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range, -0.1f32..1.1f32)?;

    flag_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_label_formatter(&|y| if *y < 0.5 { "False".to_string() } else { "True".to_string() })
        .draw()?;

    flag_chart
        .draw_series(LineSeries::new(
            sensor_data
                .iter()
                .zip(ignored.iter())
                .map(|(d, &v)| (d.time, v)),
            &CYAN,
        ))?
        .label("Accelerometer ignored")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], CYAN));

    flag_chart.configure_series_labels().draw()?;

    root.present()?;
    Ok(())
}
