mod coating_analysis;
mod color_analysis;
mod config;
mod errors;
mod feature_extraction;
mod image_io;
mod image_utils;
mod output;
mod pipeline;
mod shape_analysis;
mod texture_analysis;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rayon::prelude::*;

use config::Config;
use errors::{Result, TongueScanError};
use image_io::{get_image_files_in_dir, load_image};
use output::print_report;
use pipeline::process_image;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "TongueScanR - Tongue Image Feature Extraction")]
struct Args {
    /// Path to input file or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file (defaults apply when omitted)
    #[clap(short, long)]
    config: Option<String>,

    /// Print the full analysis report (single-file input)
    #[clap(short, long)]
    report: bool,

    /// Enable debug mode (print per-analyzer metrics)
    #[clap(short, long)]
    debug: bool,
}

/// Main function
fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Override config with command-line arguments
    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }

    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }

    // Validate configuration
    config.validate()?;

    // Start timing
    let start_time = Instant::now();

    // Create output directory
    fs::create_dir_all(&config.output_base_dir)?;

    // Process input
    let input_path = PathBuf::from(&config.input_path);

    if input_path.is_file() {
        // Process single file
        println!("Processing single file: {}", input_path.display());
        let input_image = load_image(&input_path)?;
        let record = process_image(input_image, &config, args.debug)?;

        if args.report {
            print_report(&record, &input_path.display().to_string());
        } else {
            println!("Summary: {}", record.summary);
        }
    } else if input_path.is_dir() {
        // Process all supported image files in directory
        println!("Processing directory: {}", input_path.display());
        let image_files = get_image_files_in_dir(&input_path)?;

        println!("Found {} image files", image_files.len());

        if config.use_parallel {
            // Process files in parallel
            image_files
                .par_iter()
                .map(|path| {
                    println!("Processing: {}", path.display());
                    match load_image(path) {
                        Ok(input_image) => {
                            process_image(input_image, &config, args.debug).map(|_| ())
                        }
                        Err(e) => {
                            eprintln!("Error loading {}: {}", path.display(), e);
                            Err(e)
                        }
                    }
                })
                .collect::<Vec<_>>();
        } else {
            // Process files sequentially
            for path in &image_files {
                println!("Processing: {}", path.display());
                let input_image = load_image(path)?;
                process_image(input_image, &config, args.debug)?;
            }
        }
    } else {
        return Err(TongueScanError::InvalidPath(input_path));
    }

    // Report elapsed time
    let elapsed = start_time.elapsed();
    println!("Processing completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}
