use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use spatio_cluster::{BoundingBox, ClusterIndex, GeoPoint, zoom_for_viewport};

fn city_points(n: usize) -> Vec<GeoPoint<u32>> {
    // Deterministic scatter over greater Seoul.
    let mut state: u64 = 0x5eed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..n)
        .map(|i| {
            let lat = 37.4 + next() * 0.3;
            let lon = 126.8 + next() * 0.4;
            GeoPoint::from_lat_lon(format!("spot:{i}"), lat, lon, i as u32)
        })
        .collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [100, 1_000, 10_000] {
        let points = city_points(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| ClusterIndex::build(black_box(points.clone())).unwrap())
        });
    }

    group.finish();
}

fn benchmark_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_visible");
    let index = ClusterIndex::build(city_points(5_000)).unwrap();
    let bbox = BoundingBox::new(126.85, 37.45, 127.05, 37.60);

    for span in [2.0, 0.2, 0.02] {
        let zoom = zoom_for_viewport(span).unwrap();
        group.bench_with_input(BenchmarkId::new("zoom", zoom), &zoom, |b, &zoom| {
            b.iter(|| index.query_visible(black_box(&bbox), black_box(zoom)))
        });
    }

    group.finish();
}

fn benchmark_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigation");
    let index = ClusterIndex::build(city_points(5_000)).unwrap();
    let clusters: Vec<_> = index
        .query_visible(&BoundingBox::world(), 10)
        .into_iter()
        .filter_map(|item| item.as_cluster().map(|c| c.id))
        .collect();

    group.bench_function("expansion_zoom", |b| {
        b.iter(|| {
            for &id in &clusters {
                black_box(index.expansion_zoom(id).unwrap());
            }
        })
    });

    let center = spatio_cluster::Point::new(126.978, 37.5665);
    group.bench_function("within_radius_1km", |b| {
        b.iter(|| index.within_radius(black_box(&center), 1_000.0, 20).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_build,
    benchmark_query,
    benchmark_navigation
);
criterion_main!(benches);
