use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::overlay::{Overlay, OverlayContent};

/// Default VLC front-end without the graphical interface
pub const DEFAULT_VLC_PROGRAM: &str = "cvlc";

/// Build the VLC sub-source filter for an overlay
///
/// Marquee text is single-quoted so commas and braces inside it stay part of
/// the value instead of ending the option chain.
pub fn filter_expression(overlay: &Overlay, logos_dir: &Path) -> String {
    let p = &overlay.placement;
    match &overlay.content {
        OverlayContent::Marquee { text, size, color } => format!(
            "marq{{marquee={},x={},y={},position={},opacity={},size={},color={}}}",
            quote_option(text),
            p.x,
            p.y,
            p.position,
            p.opacity,
            size,
            color
        ),
        OverlayContent::Logo { file_name } => format!(
            "logo{{file={},x={},y={},position={},opacity={}}}",
            quote_option(&logos_dir.join(file_name).display().to_string()),
            p.x,
            p.y,
            p.position,
            p.opacity
        ),
    }
}

/// Wrap the filter in a transcode chain that writes to `output`
pub fn transcode_instruction(video_codec: &str, filter: Option<&str>, output: &Path) -> String {
    let mut transcode = format!("vcodec={}", video_codec);
    if let Some(filter) = filter {
        transcode.push_str(",soverlay,sfilter=");
        transcode.push_str(filter);
    }
    format!(
        "#transcode{{{}}}:std{{access=file,dst={}}}",
        transcode,
        quote_with('"', &output.display().to_string())
    )
}

fn quote_option(value: &str) -> String {
    quote_with('\'', value)
}

// VLC option-chain values: quoted, with the quote and backslash escaped inside.
fn quote_with(quote: char, value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push(quote);
    for c in value.chars() {
        if c == quote || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push(quote);
    quoted
}

/// VLC command builder with fluent interface
#[derive(Debug, Clone)]
pub struct VlcCommand {
    program: String,
    input: PathBuf,
    output: PathBuf,
    filter: Option<String>,
    video_codec: String,
}

impl VlcCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            program: DEFAULT_VLC_PROGRAM.to_string(),
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            filter: None,
            video_codec: "h264".to_string(),
        }
    }

    /// Use a different VLC executable
    pub fn program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    /// Set the sub-source filter applied while transcoding
    pub fn filter(mut self, filter: String) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Render the overlay into the filter
    pub fn overlay(self, overlay: &Overlay, logos_dir: &Path) -> Self {
        self.filter(filter_expression(overlay, logos_dir))
    }

    /// Set video codec
    pub fn video_codec(mut self, codec: &str) -> Self {
        self.video_codec = codec.to_string();
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn program_name(&self) -> &str {
        &self.program
    }

    /// The `--sout` chain
    pub fn sout(&self) -> String {
        transcode_instruction(&self.video_codec, self.filter.as_deref(), &self.output)
    }

    /// Argument vector passed to the program
    pub fn args(&self) -> Vec<String> {
        vec![
            "--no-repeat".to_string(),
            "--no-loop".to_string(),
            self.input.display().to_string(),
            format!("--sout={}", self.sout()),
            // Makes VLC exit once the input has been played through.
            "vlc://quit".to_string(),
        ]
    }

    /// Build the process command
    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args());
        cmd
    }
}

// Readable command line; arguments are not shell-quoted.
impl fmt::Display for VlcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of one transcoder run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOutcome {
    pub stdout: String,
    pub success: bool,
}

/// Something that can carry out a VLC command
pub trait Transcoder {
    fn transcode(&self, command: &VlcCommand) -> Result<TranscodeOutcome>;
}

/// Runs VLC as a child process and waits for it
#[derive(Debug, Default, Clone, Copy)]
pub struct Cvlc;

impl Transcoder for Cvlc {
    fn transcode(&self, command: &VlcCommand) -> Result<TranscodeOutcome> {
        let mut cmd = command.build();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        log::debug!("Raw command: {:?}", cmd);

        let output = cmd
            .output()
            .with_context(|| format!("Failed to run {}", command.program_name()))?;

        if !output.status.success() {
            log::error!(
                "{} exited with code {:?} for {:?}",
                command.program_name(),
                output.status.code(),
                command.input()
            );
        }

        Ok(TranscodeOutcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            success: output.status.success(),
        })
    }
}

/// Prints the command instead of running it
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

impl Transcoder for DryRun {
    fn transcode(&self, command: &VlcCommand) -> Result<TranscodeOutcome> {
        Ok(TranscodeOutcome {
            stdout: command.to_string(),
            success: true,
        })
    }
}

/// Check if VLC is available and return version info
pub fn check_vlc(program: &str) -> Result<String> {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("{} not found. Please install VLC.", program))?;

    let version = String::from_utf8_lossy(&output.stdout);

    let version_regex = Regex::new(r"VLC (?:media player|version) (\S+)")?;
    if let Some(caps) = version_regex.captures(&version) {
        Ok(caps[1].to_string())
    } else {
        Ok("unknown".to_string())
    }
}
