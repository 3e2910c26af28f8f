use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swarm_core::Runtime;

fn bench_worker_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_pool");
    let runtime = Runtime::new();

    for size in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("launch_and_join", size), &size, |b, &size| {
            b.iter(|| {
                runtime.worker_pool(black_box(size), |res| res.resolve()).unwrap();
                runtime.wait_all();
            });
        });
    }

    group.finish();
}

fn bench_promise(c: &mut Criterion) {
    let runtime = Runtime::new();

    c.bench_function("promise_then", |b| {
        b.iter(|| {
            runtime
                .promise(|res| res.resolve(), |res| res.resolve(), |res| res.resolve())
                .unwrap();
            runtime.wait_all();
        });
    });
}

fn bench_named_locks(c: &mut Criterion) {
    let mut group = c.benchmark_group("named_locks");
    let runtime = Runtime::new();
    runtime.init_mutex("bench");
    runtime.init_semaphore("bench", 4).unwrap();

    group.bench_function("lock_unlock", |b| {
        b.iter(|| {
            runtime.lock(black_box("bench")).unwrap();
            runtime.unlock(black_box("bench")).unwrap();
        });
    });

    group.bench_function("acquire_release", |b| {
        b.iter(|| {
            runtime.acquire(black_box("bench")).unwrap();
            runtime.release(black_box("bench")).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_worker_pool, bench_promise, bench_named_locks);
criterion_main!(benches);
