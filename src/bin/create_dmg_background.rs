// src/bin/create_dmg_background.rs
use clap::Parser;
use dmg_background::png::PngReader;
use dmg_background::{
    BackgroundParams, DEFAULT_OUTPUT, PngEncodeParams, Scale, generate, write_file,
};
use log::{error, info};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate the DMG window background with an arrow between the app and Applications.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Where to write the PNG
    #[arg(long, env = "DMG_BACKGROUND_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// 1 for 660x400, 2 for 1320x800
    #[arg(long, default_value = "2")]
    scale: Scale,

    /// Re-read the written file and check every chunk
    #[arg(long)]
    verify: bool,
}

fn run(args: &Args) -> dmg_background::Result<()> {
    let params = BackgroundParams::default().with_scale(args.scale);
    let (width, height) = params.dimensions();
    info!("Rendering {}x{} background ({})", width, height, args.scale);

    let png = generate(&params, &PngEncodeParams::default())?;
    write_file(&args.output, &png)?;

    if args.verify {
        verify(&args.output)?;
    }
    Ok(())
}

fn verify(path: &Path) -> dmg_background::Result<()> {
    let file = fs::File::open(path)?;
    let chunks = PngReader::new(BufReader::new(file))?.read_all()?;
    for chunk in &chunks {
        info!(
            "  {} {:>8} bytes  crc {:08x}",
            chunk.chunk_type,
            chunk.data.len(),
            chunk.crc
        );
    }
    info!("Verified {} chunks in {}", chunks.len(), path.display());
    Ok(())
}

fn main() -> ExitCode {
    dmg_background::init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => {
            println!("Created: {}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to create {}: {}", args.output.display(), e);
            ExitCode::FAILURE
        }
    }
}
