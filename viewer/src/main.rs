//! Headless frame driver: builds a scene with a Game of Life board and a few
//! spheres, advances it for a fixed number of frames and writes the last
//! frame of each renderer to a PNG file.

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use anyhow::{Context, Result};
use cgmath::Point3;
use log::{info, trace};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use simbox_core::prelude::*;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const FRAME_COUNT: usize = 120;
const FRAME_DELTA: f64 = 1.0 / 60.0;

const BOARD_SIZE: usize = 64;
const SOUP_DENSITY: f64 = 0.3;

const LIFE_IMAGE: (usize, usize) = (640, 640);
const TRACE_IMAGE: (usize, usize) = (320, 240);

fn main() -> Result<()> {
    simple_logger::init().context("Failed to initialize logger")?;
    info!("Starting simbox v{} ...", env!("CARGO_PKG_VERSION"));

    let config = Config::default();
    let rt = ArrayRuntime::new(&config.runtime).context("Failed to initialize array runtime")?;
    info!(
        "Using {} backend (available: {:?})",
        rt.backend(),
        rt.available_backends(),
    );

    let mut scene = Scene::new();
    let start = random_soup(&rt).context("Failed to generate initial board")?;
    let life = LifeSimulator::new(&rt, &start, &config.life).context("Failed to create Life board")?;
    let life = scene.add_object(life);
    for &(x, y, z, r) in &[(0.0, 0.0, 5.0, 1.0), (1.5, 0.5, 7.0, 1.0), (-2.0, -1.0, 9.0, 1.5)] {
        let sphere = Sphere::new(Point3::new(x, y, z), r).context("Bad sphere")?;
        scene.add_object(sphere);
    }
    let tracer = RayTracer::with_config(&config.trace).context("Bad ray tracer")?;
    let tracer = scene.add_object(tracer);

    let mut board = PixelBuffer::new(LIFE_IMAGE.0, LIFE_IMAGE.1, 0);
    let mut image = PixelBuffer::new(TRACE_IMAGE.0, TRACE_IMAGE.1, 0);
    for frame in 0..FRAME_COUNT {
        scene.update(FRAME_DELTA)?;
        scene.draw(life, &rt, &mut board)?;
        scene.draw(tracer, &rt, &mut image)?;
        trace!("Finished frame {}", frame);
    }

    if let Some(sim) = scene.get::<LifeSimulator>(life) {
        info!(
            "Simulated {} generations; {} cells alive",
            sim.generation(),
            sim.population(&rt)?,
        );
    }

    save_png(&board, "life.png")?;
    save_png(&image, "trace.png")?;
    Ok(())
}

/// Returns a square board where each cell is alive with probability
/// `SOUP_DENSITY`. Random numbers come from the CPU engine, which is the only
/// one that generates them.
fn random_soup(rt: &ArrayRuntime) -> simbox_core::Result<NumericArray> {
    rt.with_backend(BackendKind::CpuArray, |rt| {
        let noise = rt.random_uniform(&[BOARD_SIZE, BOARD_SIZE])?;
        rt.compare(&noise, CmpOp::Lt, SOUP_DENSITY)
    })
}

fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = buffer.shape();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::RGBA);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .write_header()?
        .write_image_data(&buffer.to_rgba_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
