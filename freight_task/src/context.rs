use std::path::{Path, PathBuf};

/// Execution-time view of one invocation, handed to function bodies.
///
/// Every path is inside the invocation's sandbox. The sandbox is
/// discarded as soon as outputs are collected, so bodies must not keep
/// paths beyond the call.
#[derive(Debug)]
pub struct TaskContext {
    /// Absolute path of the sandbox directory.
    work_dir: PathBuf,
    /// Materialized input file names, in slot order (wildcards expanded).
    input_names: Vec<String>,
    /// Captured standard output of this invocation.
    stdout: Vec<u8>,
}

impl TaskContext {
    pub(crate) fn new(work_dir: PathBuf, input_names: Vec<String>) -> Self {
        TaskContext {
            work_dir,
            input_names,
            stdout: Vec::new(),
        }
    }

    /// The sandbox directory of this invocation.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Materialized input file names, in slot order (wildcards expanded
    /// into their successive names).
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    /// Absolute path of the input or output file `name` inside the
    /// sandbox.
    pub fn file(&self, name: &str) -> PathBuf {
        self.work_dir.join(name)
    }

    /// Bytes written here are returned by a `STDOUT` output slot, the
    /// same way a command's standard output is captured. `Vec<u8>`
    /// implements `io::Write`, so `write!(ctx.stdout(), ...)` works.
    pub fn stdout(&mut self) -> &mut Vec<u8> {
        &mut self.stdout
    }

    pub(crate) fn into_stdout(self) -> Vec<u8> {
        self.stdout
    }
}
