use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;

use crate::config::{Layout, OverlayConfig};
use crate::overlay::Overlay;
use crate::request::{JobRequest, Task, is_video_file_name};
use crate::vlc_wrapper::{DEFAULT_VLC_PROGRAM, TranscodeOutcome, Transcoder, VlcCommand};

/// Per-file results of a job
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

pub struct Watermarker<T: Transcoder> {
    layout: Layout,
    transcoder: T,
    program: String,
    video_codec: String,
    show_progress: bool,
}

impl<T: Transcoder> Watermarker<T> {
    pub fn new(layout: Layout, transcoder: T) -> Self {
        Self {
            layout,
            transcoder,
            program: DEFAULT_VLC_PROGRAM.to_string(),
            video_codec: "h264".to_string(),
            show_progress: false,
        }
    }

    pub fn program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    pub fn video_codec(mut self, codec: &str) -> Self {
        self.video_codec = codec.to_string();
        self
    }

    /// Show a progress bar during batch jobs
    pub fn show_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The command that would watermark `file_name`
    pub fn command_for(&self, overlay: &Overlay, file_name: &str) -> VlcCommand {
        VlcCommand::new(
            self.layout.source_dir.join(file_name),
            self.layout.output_dir.join(file_name),
        )
        .program(&self.program)
        .video_codec(&self.video_codec)
        .overlay(overlay, &self.layout.logos_dir)
    }

    /// Load the overlay from configuration and run the requested task
    pub fn run(&self, request: &JobRequest) -> Result<BatchReport> {
        let overlay = OverlayConfig::load(&self.layout.config_file)?.overlay(request.overlay)?;
        log::info!(
            "Running {:?} task with {} overlay: {:?}",
            request.task.kind(),
            request.overlay.name(),
            overlay
        );

        match &request.task {
            Task::Batch => self.run_batch(&overlay),
            Task::Single(name) => Ok(self.run_files(&overlay, std::slice::from_ref(name))),
            Task::Multiple(names) => Ok(self.run_files(&overlay, names)),
        }
    }

    /// Watermark one video from the source directory
    pub fn watermark_file(&self, overlay: &Overlay, file_name: &str) -> Result<TranscodeOutcome> {
        self.watermark_one(overlay, file_name, None)
    }

    fn watermark_one(
        &self,
        overlay: &Overlay,
        file_name: &str,
        progress: Option<&ProgressBar>,
    ) -> Result<TranscodeOutcome> {
        say(progress, &format!("Processing: \"{}\"", file_name));

        let command = self.command_for(overlay, file_name);
        if !command.input().is_file() {
            log::warn!("Source video not found: {:?}", command.input());
            say(progress, &format!("Skipping \"{}\": file not found", file_name));
            return Ok(TranscodeOutcome {
                stdout: String::new(),
                success: false,
            });
        }

        fs::create_dir_all(&self.layout.output_dir).context("Failed to create output directory")?;

        log::info!("Input: {:?}", command.input());
        log::info!("Output: {:?}", command.output());

        let outcome = match progress {
            // Keep the bar off the terminal while VLC writes to it.
            Some(pb) => pb.suspend(|| self.transcoder.transcode(&command))?,
            None => self.transcoder.transcode(&command)?,
        };
        if !outcome.stdout.is_empty() {
            say(progress, outcome.stdout.trim_end());
        }
        Ok(outcome)
    }

    /// Watermark the named videos one after another
    pub fn run_files(&self, overlay: &Overlay, file_names: &[String]) -> BatchReport {
        self.run_each(overlay, file_names, None)
    }

    /// Watermark every video in the source directory, in listing order
    pub fn run_batch(&self, overlay: &Overlay) -> Result<BatchReport> {
        let file_names = self.list_videos()?;

        println!("Starting batch-watermarking\n");

        let progress = if self.show_progress {
            let pb = ProgressBar::new(file_names.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let report = self.run_each(overlay, &file_names, progress.as_ref());

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }
        println!("\nBatch-watermarking completed");
        Ok(report)
    }

    fn run_each(&self, overlay: &Overlay, file_names: &[String], progress: Option<&ProgressBar>) -> BatchReport {
        let mut report = BatchReport::default();

        for file_name in file_names {
            if let Some(pb) = progress {
                pb.set_message(file_name.clone());
            }

            // One file's failure never stops the rest of the job.
            match self.watermark_one(overlay, file_name, progress) {
                Ok(outcome) if outcome.success => report.succeeded.push(file_name.clone()),
                Ok(_) => report.failed.push(file_name.clone()),
                Err(e) => {
                    log::error!("Failed to watermark {:?}: {:#}", file_name, e);
                    report.failed.push(file_name.clone());
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        log::info!(
            "Watermarked {} of {} file(s)",
            report.succeeded.len(),
            report.total()
        );
        report
    }

    fn list_videos(&self) -> Result<Vec<String>> {
        let dir = &self.layout.source_dir;
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read source directory {:?}", dir))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to read source directory {:?}", dir))?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && is_video_file_name(name)
            {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

// Per-file output goes above the progress bar when one is drawn.
fn say(progress: Option<&ProgressBar>, message: &str) {
    match progress {
        Some(pb) => pb.println(message),
        None => println!("{}", message),
    }
}
