//! Scene generation from natural-language prompts
//!
//! Translation of a prompt into a scene description payload is delegated to
//! an external [`Translator`] and runs on a worker thread so the tick loop
//! never blocks on it. One request may be in flight at a time; callers poll
//! for the result or block with a timeout.

use std::path::PathBuf;
use std::process::Command;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Failure reported by a translator backend
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct TranslationError(pub String);

/// Turns a natural-language prompt into a scene description payload
///
/// Implementations run on the worker thread and are free to block.
pub trait Translator: Send + 'static {
    /// Translate a prompt into raw scene description JSON
    fn translate(&self, prompt: &str) -> Result<String, TranslationError>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Result<String, TranslationError> + Send + 'static,
{
    fn translate(&self, prompt: &str) -> Result<String, TranslationError> {
        self(prompt)
    }
}

/// Translator that shells out to an external program
///
/// The prompt is appended as the final argument; the program writes the
/// scene description JSON to stdout. A non-zero exit status is a
/// translation failure.
pub struct CommandTranslator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTranslator {
    /// Create a translator running the given program
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a fixed argument placed before the prompt
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Translator for CommandTranslator {
    fn translate(&self, prompt: &str) -> Result<String, TranslationError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(prompt)
            .output()
            .map_err(|err| {
                TranslationError(format!("failed to run {:?}: {err}", self.program))
            })?;

        if !output.status.success() {
            return Err(TranslationError(format!(
                "{:?} exited with {}",
                self.program, output.status
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|_| TranslationError("translator emitted invalid UTF-8".into()))
    }
}

/// Generation request errors
#[derive(Error, Debug)]
pub enum GenerateError {
    /// A previous request has not completed yet
    #[error("a generation request is already in flight")]
    AlreadyRunning,

    /// The translator reported a failure
    #[error("translation failed: {0}")]
    Translation(TranslationError),

    /// No result arrived within the allowed time
    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),

    /// The worker thread went away without delivering a result
    #[error("generation worker disappeared")]
    WorkerLost,
}

struct Pending {
    receiver: mpsc::Receiver<Result<String, TranslationError>>,
    prompt: String,
    started: Instant,
}

/// Single-slot driver for asynchronous generation requests
#[derive(Default)]
pub struct SceneGenerator {
    pending: Option<Pending>,
}

impl SceneGenerator {
    /// Create a generator with no request in flight
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is currently in flight
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a generation request on a worker thread
    ///
    /// Rejected with [`GenerateError::AlreadyRunning`] while a previous
    /// request is still pending.
    pub fn request<T: Translator>(
        &mut self,
        translator: T,
        prompt: &str,
    ) -> Result<(), GenerateError> {
        if self.pending.is_some() {
            return Err(GenerateError::AlreadyRunning);
        }

        log::info!("generation request: {prompt:?}");
        let (sender, receiver) = mpsc::channel();
        let worker_prompt = prompt.to_string();
        thread::spawn(move || {
            let result = translator.translate(&worker_prompt);
            // The requester may have timed out and dropped the receiver
            let _ = sender.send(result);
        });

        self.pending = Some(Pending {
            receiver,
            prompt: prompt.to_string(),
            started: Instant::now(),
        });
        Ok(())
    }

    /// Non-blocking check for a completed request
    ///
    /// `None` while the worker is still running. Any returned value, success
    /// or failure, clears the in-flight slot.
    pub fn poll(&mut self) -> Option<Result<String, GenerateError>> {
        let pending = self.pending.as_ref()?;
        match pending.receiver.try_recv() {
            Ok(result) => {
                if let Some(pending) = self.pending.take() {
                    log::info!(
                        "generation finished in {:?}: {:?}",
                        pending.started.elapsed(),
                        pending.prompt
                    );
                }
                Some(result.map_err(GenerateError::Translation))
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending = None;
                Some(Err(GenerateError::WorkerLost))
            }
        }
    }

    /// Block until the in-flight request completes or the timeout passes
    ///
    /// A timeout abandons the request: the worker keeps running but its
    /// result is discarded, and the slot is free for a new request. With no
    /// request in flight this reports [`GenerateError::WorkerLost`].
    pub fn wait_timeout(&mut self, timeout: Duration) -> Result<String, GenerateError> {
        let Some(pending) = self.pending.take() else {
            return Err(GenerateError::WorkerLost);
        };
        match pending.receiver.recv_timeout(timeout) {
            Ok(result) => {
                log::info!(
                    "generation finished in {:?}: {:?}",
                    pending.started.elapsed(),
                    pending.prompt
                );
                result.map_err(GenerateError::Translation)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!("generation timed out: {:?}", pending.prompt);
                Err(GenerateError::TimedOut(timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(GenerateError::WorkerLost),
        }
    }

    /// Abandon the in-flight request, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::info!("generation cancelled: {:?}", pending.prompt);
        }
    }
}
