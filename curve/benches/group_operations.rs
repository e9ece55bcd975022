use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use curve::{double_scalar_mul_basepoint, Point, RandomField, ScalarField};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_point(rng: &mut StdRng) -> Point {
    Point::mul_generator(&ScalarField::random(rng))
}

fn bench_point_add(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let p = random_point(&mut rng);
    let q = random_point(&mut rng);
    c.bench_function("point_add", |bencher| {
        bencher.iter(|| black_box(black_box(p) + black_box(q)))
    });
}

fn bench_point_encode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let p = random_point(&mut rng);
    c.bench_function("point_encode", |bencher| {
        bencher.iter(|| black_box(black_box(p).encode()))
    });
}

fn bench_point_decode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let bytes = random_point(&mut rng).encode();
    c.bench_function("point_decode", |bencher| {
        bencher.iter(|| black_box(Point::decode(black_box(&bytes))))
    });
}

fn bench_mul_generator(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let scalar = ScalarField::random(&mut rng);
    c.bench_function("mul_generator", |bencher| {
        bencher.iter(|| black_box(Point::mul_generator(black_box(&scalar))))
    });
}

fn bench_double_scalar_mul(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let a = ScalarField::random(&mut rng);
    let b = ScalarField::random(&mut rng);
    let p = random_point(&mut rng);
    c.bench_function("double_scalar_mul_basepoint", |bencher| {
        bencher.iter(|| {
            black_box(double_scalar_mul_basepoint(
                black_box(&a),
                black_box(&b),
                black_box(&p),
            ))
        })
    });
}

// Cost of summing k points, the online step's inner loop.
fn bench_point_sum(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<Point> = (0..32).map(|_| random_point(&mut rng)).collect();

    let mut group = c.benchmark_group("point_sum");
    for k in [8usize, 16, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |bencher, &k| {
            bencher.iter(|| {
                let mut acc = points[0];
                for p in &points[1..k] {
                    acc += p;
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_point_add,
    bench_point_encode,
    bench_point_decode,
    bench_mul_generator,
    bench_double_scalar_mul,
    bench_point_sum
);
criterion_main!(benches);
