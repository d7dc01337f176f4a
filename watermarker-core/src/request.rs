use clap::ValueEnum;
use thiserror::Error;

use crate::overlay::OverlayKind;

/// Extension a video file must carry to be processed
pub const VIDEO_EXTENSION: &str = ".mp4";

/// Which files a job covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TaskKind {
    /// Every video in the source directory
    #[value(alias = "b")]
    Batch,
    /// One named video
    #[value(alias = "s")]
    Single,
    /// A comma-separated list of videos
    #[value(alias = "m")]
    Multiple,
}

impl TaskKind {
    /// Kind used when the wizard prompt is left empty
    pub const DEFAULT: TaskKind = TaskKind::Batch;

    /// Parse an exact token (`batch`, `b`, `single`, `s`, `multiple`, `m`)
    pub fn from_token(token: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(token, false).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Task {
    Batch,
    Single(String),
    Multiple(Vec<String>),
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Batch => TaskKind::Batch,
            Task::Single(_) => TaskKind::Single,
            Task::Multiple(_) => TaskKind::Multiple,
        }
    }
}

/// A validated watermarking command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobRequest {
    pub overlay: OverlayKind,
    pub task: Task,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Cannot process incomplete command")]
    Incomplete,
    #[error("The overlay \"{0}\" is invalid. Please check it and try again")]
    InvalidOverlay(String),
    #[error("The task \"{0}\" is invalid. Please check it and try again")]
    InvalidTask(String),
    #[error("The file name \"{0}\" is invalid. Please check it and try again")]
    InvalidFileName(String),
    #[error("No valid file names in \"{0}\"")]
    NoValidFileNames(String),
    #[error("Incorrect arguments for task")]
    IncorrectArguments,
}

impl JobRequest {
    /// Build a request from positional arguments: `<overlay> <task> [fileName(s)]`
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, RequestError> {
        let (overlay, task, rest) = match args {
            [overlay, task, rest @ ..] => (overlay.as_ref(), task.as_ref(), rest),
            _ => return Err(RequestError::Incomplete),
        };

        let overlay = OverlayKind::from_token(overlay)
            .ok_or_else(|| RequestError::InvalidOverlay(overlay.to_string()))?;
        let task_kind =
            TaskKind::from_token(task).ok_or_else(|| RequestError::InvalidTask(task.to_string()))?;

        let task = match (task_kind, rest) {
            (TaskKind::Batch, []) => Task::Batch,
            (TaskKind::Single, [name]) => {
                let name = name.as_ref().trim();
                if !is_video_file_name(name) {
                    return Err(RequestError::InvalidFileName(name.to_string()));
                }
                Task::Single(name.to_string())
            }
            (TaskKind::Multiple, [names]) => Task::Multiple(valid_names_or_err(names.as_ref())?),
            _ => return Err(RequestError::IncorrectArguments),
        };

        Ok(Self { overlay, task })
    }
}

pub fn is_video_file_name(name: &str) -> bool {
    name.ends_with(VIDEO_EXTENSION)
}

/// Split a comma-separated list into valid and dropped file names
pub fn filter_valid_file_names(list: &str) -> (Vec<String>, Vec<String>) {
    let (valid, dropped): (Vec<String>, Vec<String>) = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .partition(|name| is_video_file_name(name));
    (valid, dropped)
}

fn valid_names_or_err(list: &str) -> Result<Vec<String>, RequestError> {
    let (valid, dropped) = filter_valid_file_names(list);
    for name in &dropped {
        inform(&RequestError::InvalidFileName(name.clone()));
        log::warn!("Skipping invalid file name {:?}", name);
    }
    if valid.is_empty() {
        return Err(RequestError::NoValidFileNames(list.to_string()));
    }
    Ok(valid)
}

fn inform(err: &RequestError) {
    println!("{}", err);
}

/// Print a message and return true if the overlay token is not recognised
pub fn inform_if_overlay_invalid(overlay: &str) -> bool {
    if OverlayKind::from_token(overlay).is_none() {
        inform(&RequestError::InvalidOverlay(overlay.to_string()));
        return true;
    }
    false
}

/// Print a message and return true if the task token is not recognised
pub fn inform_if_task_invalid(task: &str) -> bool {
    if TaskKind::from_token(task).is_none() {
        inform(&RequestError::InvalidTask(task.to_string()));
        return true;
    }
    false
}

/// Print a message and return true if the name is not a video file name
pub fn inform_if_file_name_invalid(file_name: &str) -> bool {
    if !is_video_file_name(file_name) {
        inform(&RequestError::InvalidFileName(file_name.to_string()));
        return true;
    }
    false
}
