use cgmath::Point3;

use crate::colors::*;
use crate::prelude::*;

#[test]
fn test_frame_loop() {
    let rt = ArrayRuntime::new(&RuntimeConfig::default()).unwrap();
    let mut scene = Scene::new();

    // Glider in the top-left corner of an 8x8 board.
    let mut cells = vec![vec![0_u8; 8]; 8];
    for &(r, c) in &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)] {
        cells[r][c] = 1;
    }
    let life = scene.add_object(LifeSimulator::from_rows(&rt, &cells).unwrap());
    scene.add_object(Sphere::new(Point3::new(0.0, 0.0, 5.0), 1.0).unwrap());
    scene.add_object(Sphere::new(Point3::new(1.5, 0.5, 7.0), 1.0).unwrap());
    let tracer = scene.add_object(RayTracer::new(1.0, 2.0).unwrap());

    let mut board = PixelBuffer::new(50, 40, 0);
    let mut image = PixelBuffer::new(32, 24, 0);
    for _ in 0..4 {
        scene.update(1.0 / 60.0).unwrap();
        scene.draw(life, &rt, &mut board).unwrap();
        scene.draw(tracer, &rt, &mut image).unwrap();
    }
    assert!((scene.time() - 4.0 / 60.0).abs() < 1e-12);

    // Every frame was far enough apart to simulate a generation, and a
    // glider keeps its population.
    let sim = scene.get::<LifeSimulator>(life).unwrap();
    assert_eq!(4, sim.generation());
    assert_eq!(5, sim.population(&rt).unwrap());
    let alive_pixels = board.as_slice().iter().filter(|&&px| px == LIFE_ALIVE).count();
    let layout = crate::life::BoardLayout::new(50, 40, 8, 8, 1).unwrap();
    assert_eq!(5 * layout.cell_size * layout.cell_size, alive_pixels);

    // The sphere straight ahead shows up bright in the middle of the image.
    let center = image[[12, 16]];
    assert_ne!(TRACE_BACKGROUND, center);
    assert_eq!(TRACE_BACKGROUND, image[[0, 0]]);
    let [r, g, b, a] = unpack_rgba(center);
    assert!(r == g && g == b && r > 100);
    assert_eq!(255, a);
}

#[test]
fn test_tracer_ignores_objects_that_are_not_intersectable() {
    let rt = ArrayRuntime::new(&RuntimeConfig::default()).unwrap();
    let mut scene = Scene::new();
    scene.add_object(SolidCamera::new(Point3::new(0.0, 0.0, 3.0)).unwrap());
    let tracer = scene.add_object(RayTracer::new(1.0, 2.0).unwrap());
    let mut image = PixelBuffer::new(4, 4, 0);
    scene.draw(tracer, &rt, &mut image).unwrap();
    assert!(image.as_slice().iter().all(|&px| px == TRACE_BACKGROUND));

    let (tracer, _) = scene.focus(tracer).unwrap();
    let err = tracer.set_position(Point3::new(0.0, 1.0, 0.0)).unwrap_err();
    assert_eq!(ErrorKind::Validation, err.kind());
}
