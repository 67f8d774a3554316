use cgmath::Point3;
use criterion::{criterion_group, criterion_main, Criterion};
use simbox_core::prelude::*;

criterion_group!(trace, trace_benchmark);
criterion_main!(trace);

fn trace_benchmark(c: &mut Criterion) {
    let rt = ArrayRuntime::new(&RuntimeConfig::default()).expect("No array engine");
    let mut scene = Scene::new();
    for i in 0..8 {
        let x = i as f64 - 3.5;
        let sphere = Sphere::new(Point3::new(x, 0.0, 6.0 + i as f64), 0.75).expect("Bad sphere");
        scene.add_object(sphere);
    }
    let tracer = scene.add_object(RayTracer::new(1.0, 2.0).expect("Bad tracer"));
    let mut buffer = PixelBuffer::new(160, 120, 0);

    c.bench_function("trace_160x120_8_spheres", |b| {
        b.iter(|| scene.draw(tracer, &rt, &mut buffer).expect("Failed to draw"))
    });
}
