//! Interactive prompts that build a [`JobRequest`] step by step.
//!
//! Each prompt repeats until it gets a usable answer. End of input at any
//! prompt aborts the whole wizard.

use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::overlay::OverlayKind;
use crate::request::{
    JobRequest, RequestError, Task, TaskKind, filter_valid_file_names, is_video_file_name,
};

const OVERLAY_PROMPT: &str = "What type of watermark do you want? (logo/marquee): ";
const TASK_PROMPT: &str = "What type of task do you want performed? (batch/single/multiple): ";
const SINGLE_FILE_PROMPT: &str =
    "Enter the name of the file you want watermarked (including the extension): ";
const MULTIPLE_FILES_PROMPT: &str = "Enter a comma-separated list of the names of the files \
     (including the extensions) you want watermarked: ";

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Application aborted, now quitting")]
    Aborted,
    #[error("Failed to read answer: {0}")]
    Io(#[from] io::Error),
}

pub struct Wizard<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for overlay, task and file names, in that order
    pub fn run(&mut self) -> Result<JobRequest, WizardError> {
        let overlay = self.ask_overlay()?;
        let task = match self.ask_task()? {
            TaskKind::Batch => Task::Batch,
            TaskKind::Single => Task::Single(self.ask_single_file()?),
            TaskKind::Multiple => Task::Multiple(self.ask_multiple_files()?),
        };
        Ok(JobRequest { overlay, task })
    }

    fn ask_overlay(&mut self) -> Result<OverlayKind, WizardError> {
        loop {
            let answer = self.prompt(OVERLAY_PROMPT)?;
            if answer.is_empty() {
                return Ok(OverlayKind::DEFAULT);
            }
            match OverlayKind::from_token(&answer) {
                Some(kind) => return Ok(kind),
                None => self.report(RequestError::InvalidOverlay(answer))?,
            }
        }
    }

    fn ask_task(&mut self) -> Result<TaskKind, WizardError> {
        loop {
            let answer = self.prompt(TASK_PROMPT)?;
            if answer.is_empty() {
                return Ok(TaskKind::DEFAULT);
            }
            match TaskKind::from_token(&answer) {
                Some(kind) => return Ok(kind),
                None => self.report(RequestError::InvalidTask(answer))?,
            }
        }
    }

    fn ask_single_file(&mut self) -> Result<String, WizardError> {
        loop {
            let answer = self.prompt(SINGLE_FILE_PROMPT)?;
            if is_video_file_name(&answer) {
                return Ok(answer);
            }
            self.report(RequestError::InvalidFileName(answer))?;
        }
    }

    fn ask_multiple_files(&mut self) -> Result<Vec<String>, WizardError> {
        loop {
            let answer = self.prompt(MULTIPLE_FILES_PROMPT)?;
            let (valid, dropped) = filter_valid_file_names(&answer);
            for name in &dropped {
                self.report(RequestError::InvalidFileName(name.clone()))?;
            }
            if !valid.is_empty() {
                if !dropped.is_empty() {
                    log::warn!("Dropped invalid file names: {:?}", dropped);
                }
                return Ok(valid);
            }
            self.report(RequestError::NoValidFileNames(answer))?;
        }
    }

    fn report(&mut self, err: RequestError) -> Result<(), WizardError> {
        writeln!(self.output, "{}", err)?;
        Ok(())
    }

    fn prompt(&mut self, question: &str) -> Result<String, WizardError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(WizardError::Aborted);
        }
        Ok(line.trim().to_string())
    }
}

/// Run the wizard on the terminal
pub fn start_command_wizard() -> Result<JobRequest, WizardError> {
    let stdin = io::stdin();
    Wizard::new(stdin.lock(), io::stdout()).run()
}
