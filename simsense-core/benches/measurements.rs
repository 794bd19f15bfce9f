use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use simsense_core::analytic::{AnalyticCaseData2D, AnalyticSimDataGenerator};
use simsense_core::sensors::create_sensor_pos_array;
use simsense_core::{Field, PointSensorArray, SampleField, SensorArrayFactory, SimData};

fn make_sim_data(num_elem_x: usize, num_elem_y: usize) -> SimData {
    let case = AnalyticCaseData2D::default()
        .with_mesh(100.0, 50.0, num_elem_x, num_elem_y)
        .with_time_steps(Array1::linspace(0.0, 100.0, 101))
        .with_field("temperature", |x, y, t| {
            20.0 + 50.0 * (x / 100.0).sin() * (y / 50.0).cos() * (1.0 - (-t / 20.0).exp())
        });
    AnalyticSimDataGenerator::new(case).generate_sim_data()
}

fn bench_sample_field(c: &mut Criterion) {
    let sim_data = make_sim_data(40, 20);
    let field = Field::scalar(&sim_data, "temperature", 2).unwrap();
    let positions = create_sensor_pos_array([10, 5, 1], (0.0, 100.0), (0.0, 50.0), (0.0, 0.0));
    let times = Array1::linspace(0.5, 99.5, 200);

    let mut group = c.benchmark_group("sample_field");
    group.bench_function("50_sensors_native_steps", |b| {
        b.iter(|| field.sample_field(black_box(&positions), None))
    });
    group.bench_function("50_sensors_200_times", |b| {
        b.iter(|| field.sample_field(black_box(&positions), Some(black_box(&times))))
    });
    group.finish();
}

fn bench_get_measurements(c: &mut Criterion) {
    let sim_data = make_sim_data(40, 20);
    let positions = create_sensor_pos_array([10, 5, 1], (0.0, 100.0), (0.0, 50.0), (0.0, 0.0));

    let mut group = c.benchmark_group("get_measurements");
    group.bench_function("truth_only", |b| {
        let field = Arc::new(Field::scalar(&sim_data, "temperature", 2).unwrap());
        let mut sensors = PointSensorArray::new(positions.clone(), field, None).unwrap();
        b.iter(|| sensors.get_measurements())
    });
    group.bench_function("basic_thermocouples", |b| {
        let mut sensors = SensorArrayFactory::seeded(42)
            .basic_thermocouple_array(&sim_data, positions.clone(), "temperature", 2, None)
            .unwrap();
        b.iter(|| sensors.get_measurements())
    });
    group.finish();
}

criterion_group!(benches, bench_sample_field, bench_get_measurements);
criterion_main!(benches);
