use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use holotilt::animation::QueuedScheduler;
use holotilt::scene::memory::ElementSpec;
use holotilt::scene::{MemoryScene, PointerSample, Rect, SceneQuery};
use holotilt::transform::{TiltDivisors, TransformModel};
use holotilt::util::easing::EasingFunction;
use holotilt::{Engine, Options};
use web_time::{Duration, Instant};

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::CubicInOut;
    c.bench_function("cubic_in_out_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))))
    });
}

fn transform_benchmark(c: &mut Criterion) {
    let model = TransformModel::holographic(TiltDivisors::STANDARD, [35.0, 65.0]);
    let size = Vec2::new(320.0, 180.0);
    c.bench_function("holographic_compute", |b| {
        b.iter(|| black_box(model.compute(black_box(Vec2::new(40.0, 150.0)), size, 1.0)))
    });
}

fn broadcast_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast_tick");

    for count in [10, 50, 200].iter() {
        let mut scene = MemoryScene::new(Rect::new(0.0, 0.0, 1920.0, 20_000.0));
        let root = scene.root();
        for i in 0..*count {
            let _ = scene.append(
                root,
                &ElementSpec::new("div")
                    .class("recent-post-item")
                    .rect(100.0, 120.0 * i as f32, 600.0, 100.0),
            );
        }
        let mut engine = Engine::new(scene, QueuedScheduler::new(), Options::default());
        engine.start();

        let origin = Instant::now();
        let mut step = 0u64;
        group.bench_function(format!("{count}_cards"), |b| {
            b.iter(|| {
                step += 1;
                let y = (step % 100) as f32 * 12.0;
                // one throttle window per sample so every call ticks
                engine.pointer_moved(
                    PointerSample::new(400.0, y),
                    origin + Duration::from_millis(step * 16),
                );
                black_box(engine.pump_frame(origin + Duration::from_millis(step * 16 + 8)))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, easing_benchmark, transform_benchmark, broadcast_benchmark);
criterion_main!(benches);
