//! Watermarker Core - batch video watermarking through the VLC CLI
//!
//! This library builds VLC invocations that overlay a watermark on videos:
//! - Logo (image) and marquee (text) overlays loaded from an INI file
//! - Pure filter and `--sout` chain assembly
//! - Single, multiple and batch jobs over a source directory
//! - An interactive wizard for choosing the job

pub mod config;
pub mod overlay;
pub mod request;
pub mod vlc_wrapper;
pub mod watermarker;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, Layout, OverlayConfig};
pub use overlay::{Overlay, OverlayContent, OverlayKind, Placement};
pub use request::{JobRequest, RequestError, Task, TaskKind};
pub use vlc_wrapper::{Cvlc, DryRun, TranscodeOutcome, Transcoder, VlcCommand, check_vlc};
pub use watermarker::{BatchReport, Watermarker};
pub use wizard::{Wizard, WizardError, start_command_wizard};
