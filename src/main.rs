//! monowav - Audio to Mono WAV Converter CLI

use clap::Parser;
use monowav::backend::{DecodeBackend, FfmpegBackend};
use monowav::{init_logging, batch, Args, Config, ConversionRequest, Converter, ConvertError, Result};
use std::process;

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.verbose {
        println!("{}", monowav::get_library_info());
        println!();
    }

    let config = Config::from_args_and_config(args)?;

    if !config.input_path.exists() {
        return Err(ConvertError::config(format!(
            "{} is not a valid file or directory",
            config.input_path.display()
        )));
    }

    let ffmpeg = FfmpegBackend::new(config.ffmpeg_path(), config.ffmpeg_timeout());
    if !ffmpeg.is_available() {
        println!("{}\n", FfmpegBackend::install_instructions());
    }

    let converter = Converter::new(&config);

    if config.input_path.is_file() {
        convert_single(&converter, &config)
    } else if config.input_path.is_dir() {
        convert_directory(&converter, &config)
    } else {
        Err(ConvertError::config(format!(
            "{} is not a valid file or directory",
            config.input_path.display()
        )))
    }
}

fn convert_single(converter: &Converter, config: &Config) -> Result<()> {
    println!("=== Mono WAV Converter ===");
    println!("Input: {}", config.input_path.display());
    println!("Sample rate: {} Hz", config.sample_rate());
    println!("==========================\n");

    let mut request = ConversionRequest::new(&config.input_path, config.sample_rate());
    if let Some(output) = &config.output_path {
        request = request.with_output(output);
    }

    match converter.convert(&request) {
        Ok(output) => {
            println!(
                "Converted: {} -> {}",
                config.input_path.display(),
                output.display()
            );
            Ok(())
        }
        Err(e) => {
            for attempt in e.attempts() {
                eprintln!("  {}", attempt);
            }
            Err(e)
        }
    }
}

fn convert_directory(converter: &Converter, config: &Config) -> Result<()> {
    let output_dir = config.output_path.as_deref();

    let outcomes = batch::convert_all(
        converter,
        &config.input_path,
        output_dir,
        config.sample_rate(),
    )?;

    if outcomes.is_empty() {
        println!(
            "No supported audio files found in {}",
            config.input_path.display()
        );
        return Ok(());
    }

    println!("Found {} audio files to convert...\n", outcomes.len());

    for outcome in &outcomes {
        match &outcome.result {
            Ok(output) => {
                println!(
                    "Converted: {} -> {}",
                    outcome.input.display(),
                    output.display()
                );
            }
            Err(e) => {
                eprintln!("Failed: {}: {}", outcome.input.display(), e);
                for attempt in e.attempts() {
                    eprintln!("  {}", attempt);
                }
            }
        }
    }

    let ok = batch::succeeded(&outcomes);
    let bad = batch::failed(&outcomes);
    println!("\n{} converted, {} failed", ok, bad);

    if ok == 0 {
        return Err(ConvertError::BatchFailed {
            failed: bad,
            total: outcomes.len(),
        });
    }

    Ok(())
}
