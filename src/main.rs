use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use digit_conv::conv::ConvolutionEngine;
use digit_conv::grid::PaddedGrid;
use digit_conv::render;
use digit_conv::stream::SampleStream;

const DEFAULT_IMAGES: &str = "train-images";
const DEFAULT_LABELS: &str = "train-labels";
const DEFAULT_SAMPLES: usize = 10;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let images = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_IMAGES.into()));
    let labels = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_LABELS.into()));
    let samples = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("sample count must be a number, got {raw:?}"))?,
        None => DEFAULT_SAMPLES,
    };

    let seed = match env::var("SEED") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("SEED must be a u64, got {raw:?}"))?,
        Err(_) => wall_clock_seed(),
    };
    let mut rng = StdRng::seed_from_u64(seed);
    info!("rng seed: {seed}");

    let engine = ConvolutionEngine::default();
    let mut stream = SampleStream::open(&images, &labels).with_context(|| {
        format!(
            "opening dataset pair {} / {}",
            images.display(),
            labels.display()
        )
    })?;

    info!("extracting features from {samples} samples");
    for index in 0..samples {
        let sample = stream
            .next_sample()
            .with_context(|| format!("reading sample {index}"))?;
        info!("sample #{index}: label {}", sample.label.digit());

        let activations = sample.activations();
        debug!("{} input activations ready", activations.len());

        println!("####### digit #######");
        println!("{}", render::sketch_pixels(&sample.pixels));

        let padded = PaddedGrid::from_pixels(&sample.pixels);
        println!("####### padded digit #######");
        println!("{}", render::sketch_padded(&padded));

        let maps = engine.feature_maps(&padded, &mut rng);
        println!("####### feature maps #######");
        println!("{}", render::sketch_stack(&maps));
    }

    Ok(())
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9e3779b97f4a7c15)
}
