//! Hand-off of export artifacts to a system print command.
//!
//! The artifact is written to a temporary file that is removed when the
//! spool call returns, whether the command finished, failed or hung.

use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, ExitStatus};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use tempfile::NamedTempFile;

use super::ExportArtifact;
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How a spool request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpoolOutcome {
    /// The print command exited successfully.
    Completed,
    /// The command did not finish in time and was killed.
    TimedOut,
}

/// Sends artifacts to a print command.
#[derive(Debug, Clone)]
pub struct PrintSpooler {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl PrintSpooler {
    /// Spooler running `program` with the file path as last argument.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Add an argument placed before the file path.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set how long to wait for the command.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Write the artifact to a temporary file and run the print command on it.
    pub fn spool(&self, artifact: &ExportArtifact) -> Result<SpoolOutcome> {
        let suffix = artifact
            .extension()
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        // Removed on drop, including the early returns below.
        let mut file: NamedTempFile = tempfile::Builder::new()
            .prefix("kreport-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&artifact.bytes)?;
        file.flush()?;

        let child = self.spawn(file.path())?;
        let outcome = self.wait(child);
        drop(file);
        outcome
    }

    fn spawn(&self, path: &Path) -> Result<Child> {
        log::debug!("Spooling {} with {}", path.display(), self.program);
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(path);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group, so a timeout also reaches anything it started.
            command.process_group(0);
        }
        command
            .spawn()
            .map_err(|e| Error::Spool(format!("{}: {}", self.program, e)))
    }

    fn wait(&self, child: Child) -> Result<SpoolOutcome> {
        let child = Arc::new(Mutex::new(child));
        let (tx, rx) = bounded::<std::io::Result<ExitStatus>>(1);

        let watched = Arc::clone(&child);
        thread::spawn(move || loop {
            let status = match watched.lock() {
                Ok(mut c) => c.try_wait(),
                Err(_) => return,
            };
            match status {
                Ok(Some(status)) => {
                    let _ = tx.send(Ok(status));
                    return;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = tx.send(Err(e));
                    return;
                }
            }
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(status)) if status.success() => Ok(SpoolOutcome::Completed),
            Ok(Ok(status)) => Err(Error::Spool(format!(
                "{} exited with {}",
                self.program, status
            ))),
            Ok(Err(e)) => Err(Error::Spool(e.to_string())),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "Print command {} did not finish within {:?}; killing it",
                    self.program,
                    self.timeout
                );
                if let Ok(mut c) = child.lock() {
                    kill_process_group(&mut c);
                }
                Ok(SpoolOutcome::TimedOut)
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(Error::Spool("print watcher stopped unexpectedly".to_string()))
            }
        }
    }
}

/// Kill the child and, on unix, every process in its group.
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Ok(pid) = i32::try_from(child.id()) {
            // SAFETY: signalling a process group we created has no memory effects.
            unsafe {
                libc::kill(-pid, libc::SIGKILL);
            }
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}

impl Default for PrintSpooler {
    fn default() -> Self {
        Self::new("lp")
    }
}
