use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use watermarker_core::vlc_wrapper::DEFAULT_VLC_PROGRAM;
use watermarker_core::{
    BatchReport, Cvlc, DryRun, JobRequest, Layout, Transcoder, Watermarker, WizardError, check_vlc,
    start_command_wizard,
};

const ABORT_NOTICE: &str = "Application aborted, now quitting";

#[derive(Parser, Debug)]
#[command(name = "watermarker")]
#[command(about = "Batch-watermark .mp4 videos with a logo or text marquee using VLC")]
#[command(version)]
struct Args {
    /// <overlay> <task> [fileName(s)]: overlay is logo|l|marquee|m, task is
    /// batch|b|single|s|multiple|m, file names are comma-separated.
    /// Leave empty to start the interactive wizard.
    #[arg(value_name = "COMMAND")]
    command: Vec<String>,

    /// Directory holding tobewatermarked/, watermarked/, logos/ and overlays.ini
    /// (defaults to the directory of the executable)
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Override the directory of videos to watermark
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Override the directory watermarked videos are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Override the directory logo images are read from
    #[arg(long)]
    logos_dir: Option<PathBuf>,

    /// Override the overlay configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// VLC executable to run
    #[arg(long, default_value = DEFAULT_VLC_PROGRAM)]
    vlc: String,

    /// Video codec for output
    #[arg(long, default_value = "h264")]
    vcodec: String,

    /// Print the VLC commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn layout(&self) -> Result<Layout> {
        let base = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_exe()
                .context("Failed to locate the executable")?
                .parent()
                .map(PathBuf::from)
                .ok_or_else(|| anyhow::anyhow!("Executable has no parent directory"))?,
        };

        let mut layout = Layout::from_base(base);
        if let Some(dir) = &self.source_dir {
            layout.source_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            layout.output_dir = dir.clone();
        }
        if let Some(dir) = &self.logos_dir {
            layout.logos_dir = dir.clone();
        }
        if let Some(file) = &self.config {
            layout.config_file = file.clone();
        }
        Ok(layout)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    // Ctrl-C anywhere, wizard or batch, ends the program
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{}", ABORT_NOTICE);
            std::process::exit(1);
        }
    });

    let succeeded = tokio::task::spawn_blocking(move || run(args))
        .await
        .context("Watermarking task panicked")??;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: Args) -> Result<bool> {
    let request = if args.command.is_empty() {
        match start_command_wizard() {
            Ok(request) => request,
            Err(WizardError::Aborted) => {
                println!("\n{}", ABORT_NOTICE);
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        match JobRequest::from_args(args.command.as_slice()) {
            Ok(request) => request,
            Err(e) => {
                println!("{}", e);
                return Ok(false);
            }
        }
    };
    log::debug!("Job request: {:?}", request);

    let layout = args.layout()?;
    log::info!("Source directory: {:?}", layout.source_dir);
    log::info!("Output directory: {:?}", layout.output_dir);

    if args.dry_run {
        let watermarker = Watermarker::new(layout, DryRun)
            .program(&args.vlc)
            .video_codec(&args.vcodec);
        return execute(&watermarker, &request);
    }

    // Check VLC availability
    match check_vlc(&args.vlc) {
        Ok(version) => {
            log::info!("VLC version {} detected", version);
        }
        Err(e) => {
            eprintln!("Error: VLC not found!");
            eprintln!("Please install VLC to use this tool.");
            eprintln!();
            eprintln!("Installation instructions:");
            eprintln!("  Ubuntu/Debian: sudo apt install vlc");
            eprintln!("  macOS:         brew install --cask vlc");
            eprintln!("  Windows:       Download from https://www.videolan.org/vlc/");
            eprintln!();
            eprintln!("Details: {}", e);
            std::process::exit(1);
        }
    }

    let watermarker = Watermarker::new(layout, Cvlc)
        .program(&args.vlc)
        .video_codec(&args.vcodec)
        .show_progress(true);
    execute(&watermarker, &request)
}

fn execute<T: Transcoder>(watermarker: &Watermarker<T>, request: &JobRequest) -> Result<bool> {
    let report = watermarker.run(request)?;
    print_summary(&report, &watermarker.layout().output_dir);
    Ok(report.is_success())
}

fn print_summary(report: &BatchReport, output_dir: &Path) {
    if report.is_success() {
        println!(
            "\n✅ Watermarked {} video(s) into {:?}",
            report.succeeded.len(),
            output_dir
        );
    } else {
        println!(
            "\n⚠️  Watermarked {} of {} video(s); failed: {}",
            report.succeeded.len(),
            report.total(),
            report.failed.join(", ")
        );
    }
}
