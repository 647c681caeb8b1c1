//! Weight Export Tool
//!
//! Converts a training checkpoint into the compact weights record the
//! inference server loads at startup. Runs one forward pass on a
//! synthetic fixed-shape input to prove the checkpoint matches the
//! architecture before anything is written, so a bad export fails here
//! rather than at serving time.
//!
//! Usage:
//!   cargo run --release --bin export-weights -- --checkpoint best_model.mpk --output models/sketch_classifier.mpk

use std::path::PathBuf;

use anyhow::{bail, Result};
use burn::{module::Module, record::CompactRecorder, tensor::Tensor};
use clap::Parser;

use sketch_core::backend::{backend_name, default_device, InferenceBackend};
use sketch_core::config::VariantConfig;
use sketch_model::{loader::model_config, SketchClassifier};

/// Convert a training checkpoint into a serving weights record
#[derive(Parser, Debug)]
#[command(name = "export-weights")]
#[command(about = "Export trained sketch classifier weights for serving")]
struct Args {
    /// Path to the training checkpoint (.mpk file)
    #[arg(short, long)]
    checkpoint: PathBuf,

    /// Output path for the serving record
    #[arg(short, long, default_value = "models/sketch_classifier.mpk")]
    output: PathBuf,

    /// Variant preset the checkpoint was trained for
    #[arg(long, default_value = "sketch")]
    variant: String,

    /// Number of classes in the model
    #[arg(long, default_value = "30")]
    num_classes: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let variant = VariantConfig::preset(&args.variant)?;
    variant.validate()?;
    let device = default_device();

    println!("=== Sketch Weight Export Tool ===");
    println!("Backend: {}", backend_name());
    println!("Loading checkpoint from: {:?}", args.checkpoint);

    let config = model_config(&variant, args.num_classes);
    let recorder = CompactRecorder::new();
    let model: SketchClassifier<InferenceBackend> = SketchClassifier::new(&config, &device)
        .load_file(&args.checkpoint, &recorder, &device)
        .map_err(|e| anyhow::anyhow!("failed to load checkpoint: {:?}", e))?;

    // One forward pass on a synthetic input proves graph and weights agree
    let input = Tensor::<InferenceBackend, 4>::zeros(
        [
            1,
            variant.input.channels as usize,
            variant.input.height as usize,
            variant.input.width as usize,
        ],
        &device,
    );
    let dims = model.forward(input).dims();
    if dims != [1, args.num_classes] {
        bail!(
            "checkpoint produces output shape {:?}, expected [1, {}]",
            dims,
            args.num_classes
        );
    }

    println!(
        "Checkpoint verified: input {} -> {} classes",
        variant.input, args.num_classes
    );

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    model
        .save_file(&args.output, &recorder)
        .map_err(|e| anyhow::anyhow!("failed to write serving record: {:?}", e))?;

    println!();
    println!("Export complete!");
    println!("Serving record written to: {:?}", args.output);
    println!();
    println!("Next steps:");
    println!(
        "  cargo run --release --bin sketch-server -- --variant {} --weights {:?}",
        args.variant, args.output
    );

    Ok(())
}
