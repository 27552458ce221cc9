use std::process::Command;

use freight_core::errors::*;
use freight_core::{FileRef, FileStore};

use context::TaskContext;
use sandbox::Sandbox;
use task::{Bound, OutputSlot, Task, TaskArg, TaskBody, TaskFn};

/// One captured output of a finished invocation.
#[derive(Clone, Debug)]
pub enum TaskOutput {
    /// A literal output slot: exactly one file.
    File(FileRef),
    /// A pattern output slot: every match, sorted by name. May be empty.
    Files(Vec<FileRef>),
    /// The `STDOUT` sentinel slot: captured standard output as text.
    Stdout(String),
}

impl TaskOutput {
    fn kind(&self) -> &'static str {
        match *self {
            TaskOutput::File(_) => "file",
            TaskOutput::Files(_) => "file tuple",
            TaskOutput::Stdout(_) => "stdout",
        }
    }

    pub fn into_file(self) -> Result<FileRef> {
        match self {
            TaskOutput::File(fref) => Ok(fref),
            other => bail!(ErrorKind::InvalidArgument(format!(
                "expected a file output, got a {} output",
                other.kind()
            ))),
        }
    }

    pub fn into_files(self) -> Result<Vec<FileRef>> {
        match self {
            TaskOutput::Files(frefs) => Ok(frefs),
            other => bail!(ErrorKind::InvalidArgument(format!(
                "expected a file tuple output, got a {} output",
                other.kind()
            ))),
        }
    }

    pub fn into_stdout(self) -> Result<String> {
        match self {
            TaskOutput::Stdout(text) => Ok(text),
            other => bail!(ErrorKind::InvalidArgument(format!(
                "expected a stdout output, got a {} output",
                other.kind()
            ))),
        }
    }
}

/// Runs task invocations, one fresh sandbox each.
///
/// Captured outputs are built through the executor's store, so they
/// inherit its staging configuration.
#[derive(Clone, Debug)]
pub struct Executor {
    store: FileStore,
}

impl Executor {
    pub fn new(store: FileStore) -> Self {
        Executor { store }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Run one invocation to completion and collect its outputs, in
    /// declared slot order.
    ///
    /// The sandbox is discarded whether the invocation succeeds or
    /// fails; a failed invocation never yields partial outputs.
    pub fn run(&self, task: &Task, args: Vec<TaskArg>) -> Result<Vec<TaskOutput>> {
        let bound = task.bind(args)?;
        let sandbox = Sandbox::new()?;
        let input_names = materialize(&sandbox, &bound)?;
        let stdout = match *task.body() {
            TaskBody::Command(ref command) => run_command(&sandbox, command)?,
            TaskBody::Function(ref body) => run_function(&sandbox, &**body, input_names)?,
        };
        self.collect(task, &sandbox, &stdout)
    }

    fn collect(&self, task: &Task, sandbox: &Sandbox, stdout: &[u8]) -> Result<Vec<TaskOutput>> {
        let mut outputs = Vec::with_capacity(task.outputs().len());
        for slot in task.outputs() {
            outputs.push(match *slot {
                OutputSlot::Stdout => {
                    TaskOutput::Stdout(String::from_utf8_lossy(stdout).into_owned())
                }
                OutputSlot::Name(ref name) => {
                    let path = sandbox.path().join(name);
                    if !path.is_file() {
                        bail!(ErrorKind::MissingOutput(name.clone()));
                    }
                    TaskOutput::File(self.store.load(&path)?)
                }
                OutputSlot::Pattern(ref pattern) => {
                    let mut captured = Vec::new();
                    for path in sandbox.matches(pattern)? {
                        captured.push(self.store.load(&path)?);
                    }
                    TaskOutput::Files(captured)
                }
            });
        }
        Ok(outputs)
    }
}

/// Put every bound input into the sandbox and return the materialized
/// names in slot order. Wildcard-bound values get successive zero-padded
/// names, so shell glob order equals call order.
fn materialize(sandbox: &Sandbox, bound: &[Bound]) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for binding in bound {
        match *binding {
            Bound::One {
                ref name,
                ref value,
            } => {
                sandbox.add_input(name, value)?;
                names.push(name.clone());
            }
            Bound::Many { ref values } => {
                for (order, value) in values.iter().enumerate() {
                    let name = format!("input-{:03}", order);
                    sandbox.add_input(&name, value)?;
                    names.push(name);
                }
            }
        }
    }
    Ok(names)
}

fn run_command(sandbox: &Sandbox, command: &str) -> Result<Vec<u8>> {
    debug!("running command {:?} in {:?}", command, sandbox.path());
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(sandbox.path())
        .output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = match output.status.code() {
            Some(code) => format!(
                "command {:?} exited with code {}\nstderr: {}",
                command, code, stderr
            ),
            None => format!(
                "command {:?} was terminated by a signal\nstderr: {}",
                command, stderr
            ),
        };
        bail!(ErrorKind::ExecutionFailure(detail));
    }
    Ok(output.stdout)
}

fn run_function(sandbox: &Sandbox, body: &TaskFn, input_names: Vec<String>) -> Result<Vec<u8>> {
    debug!("calling task function in {:?}", sandbox.path());
    let mut ctx = TaskContext::new(sandbox.path().into(), input_names);
    if let Err(e) = body(&mut ctx) {
        bail!(ErrorKind::ExecutionFailure(format!(
            "task function failed: {}",
            e
        )));
    }
    Ok(ctx.into_stdout())
}
