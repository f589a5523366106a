use std::time::Duration;

use criterion::Criterion;
use geo::{
    CellSize, GridDescriptor, NumThreads, Point, Raster, RasterNum, RasterSize, ReprojectOptions, Reprojector, Resampling, SpatialReference,
    crs,
};
use num::NumCast;

const RASTER_SIZE: i32 = 512;

pub fn bench_name<T: RasterNum>(name: &str, resampling: Resampling) -> String {
    format!("{}_{:?}_{:?}", name, resampling, T::TYPE)
}

fn create_raster<T: RasterNum>() -> Raster<T> {
    let grid = GridDescriptor::with_top_left_origin(
        Some(SpatialReference::from_epsg(crs::epsg::BELGIAN_LAMBERT72).expect("Lambert 72")),
        RasterSize::square(RASTER_SIZE),
        Point::new(22000.0, 245000.0),
        CellSize::square(100.0),
        Some(0.0),
    )
    .expect("Invalid grid");

    let data = (0..RASTER_SIZE * RASTER_SIZE)
        .map(|v| NumCast::from(v % 100).unwrap_or_default())
        .collect();
    Raster::new(grid, data).expect("Invalid raster")
}

pub fn bench_reproject<T: RasterNum>(c: &mut Criterion) {
    let src = create_raster::<T>();
    let wgs84 = SpatialReference::from_epsg(crs::epsg::WGS84).expect("WGS84");

    let mut group = c.benchmark_group(format!("reproject_{:?}", T::TYPE));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(10);

    for resampling in [Resampling::Nearest, Resampling::Bilinear] {
        let exact = Reprojector::new(ReprojectOptions::builder().resampling(resampling).build());
        group.bench_function(bench_name::<T>("exact", resampling), |b| {
            b.iter(|| exact.reproject(&src, &wgs84).expect("Reprojection failed"));
        });

        let interpolated = Reprojector::new(
            ReprojectOptions::builder()
                .resampling(resampling)
                .error_threshold(0.125)
                .num_threads(NumThreads::AllCpus)
                .build(),
        );
        group.bench_function(bench_name::<T>("interpolated", resampling), |b| {
            b.iter(|| interpolated.reproject(&src, &wgs84).expect("Reprojection failed"));
        });
    }

    group.finish();
}

criterion::criterion_group!(benches_u8, bench_reproject<u8>);
criterion::criterion_group!(benches_f32, bench_reproject<f32>);
criterion::criterion_main!(benches_u8, benches_f32);
