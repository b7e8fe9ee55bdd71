//! LiDAR kernel micro-benchmark.
//!
//! Measures the full sweep against a loop track plus a handful of obstacle
//! polygons — the dominant hot path of a simulation tick.

use criterion::{Criterion, criterion_group, criterion_main};

use av_common::config::{TrackConfig, TrackKind};
use av_common::types::Pose2;
use av_world::geometry::Vec2;
use av_world::geometry::polygon::Polygon;
use av_world::lidar::{LidarModel, LidarParams};
use av_world::world::WorldGeometry;

fn bench_world() -> WorldGeometry {
    WorldGeometry::from_config(&TrackConfig {
        kind: TrackKind::Loop,
        length: 0.0,
        radius: 30.0,
        half_width: 4.0,
        sample_step: 0.5,
        checkpoints: 8,
        off_track_margin: 0.3,
    })
    .unwrap()
}

fn bench_obstacles() -> Vec<Polygon> {
    (0..8)
        .map(|i| {
            let a = core::f64::consts::TAU * i as f64 / 8.0;
            Polygon::circle(Vec2::new(30.0 * a.cos(), 30.0 + 30.0 * a.sin()), 0.8)
        })
        .collect()
}

fn bench_sweep(c: &mut Criterion) {
    let world = bench_world();
    let obstacles = bench_obstacles();
    let mut model = LidarModel::new(
        LidarParams {
            n_beams: 1081,
            angle_min: -2.356,
            angle_max: 2.356,
            range_min: 0.1,
            range_max: 60.0,
            noise_sigma: 0.0,
            mount: Pose2::default(),
        },
        0,
    )
    .unwrap();
    let mut scan = model.template_scan();
    let ego = Pose2::new(0.0, 0.0, 0.0);

    c.bench_function("lidar_sweep_1081_beams", |b| {
        b.iter(|| {
            model.scan_into(&ego, &world.segments, &obstacles, 0.0, &mut scan);
            core::hint::black_box(&scan);
        })
    });
}

fn bench_sweep_no_obstacles(c: &mut Criterion) {
    let world = bench_world();
    let mut model = LidarModel::new(
        LidarParams {
            n_beams: 271,
            angle_min: -2.356,
            angle_max: 2.356,
            range_min: 0.1,
            range_max: 60.0,
            noise_sigma: 0.0,
            mount: Pose2::default(),
        },
        0,
    )
    .unwrap();
    let mut scan = model.template_scan();
    let ego = Pose2::new(0.0, 0.0, 0.0);

    c.bench_function("lidar_sweep_271_beams_walls_only", |b| {
        b.iter(|| {
            model.scan_into(&ego, &world.segments, &[], 0.0, &mut scan);
            core::hint::black_box(&scan);
        })
    });
}

criterion_group!(benches, bench_sweep, bench_sweep_no_obstacles);
criterion_main!(benches);
