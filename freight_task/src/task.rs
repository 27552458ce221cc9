use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use freight_core::errors::*;
use freight_core::FileRef;

use context::TaskContext;

/// Reserved input-slot marker: binds all remaining positional arguments,
/// in call order.
pub const WILDCARD: &str = "*";

/// Reserved output-slot name: return the captured standard output of the
/// task body as text instead of a file.
pub const STDOUT: &str = "+out";

/// A function task body.
///
/// Runs inside the sandbox of one invocation: reads its inputs and writes
/// its declared output files through the [`TaskContext`](../context/struct.TaskContext.html).
pub type TaskFn = dyn Fn(&mut TaskContext) -> Result<()> + Send + Sync;

/// What a task runs: a shell command or an in-process function.
#[derive(Clone)]
pub enum TaskBody {
    /// Shell command run with the sandbox as working directory. Slot
    /// names are the filenames the command expects to find there.
    Command(String),
    /// Function called with the invocation's context.
    Function(Arc<TaskFn>),
}

impl fmt::Debug for TaskBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TaskBody::Command(ref command) => write!(f, "Command({:?})", command),
            TaskBody::Function(_) => write!(f, "Function(..)"),
        }
    }
}

/// One slot in the declared input list.
#[derive(Clone, Debug, PartialEq)]
pub enum InputSlot {
    /// The file name the task expects in its working directory.
    Name(String),
    /// `WILDCARD`: all remaining positional arguments, in call order.
    Wildcard,
}

/// One slot in the declared output list.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputSlot {
    /// Exactly one file of this name must exist after the body ran.
    Name(String),
    /// Every file matching the pattern, as an ordered tuple sorted by
    /// name. May be empty.
    Pattern(String),
    /// `STDOUT`: the captured standard output of the body.
    Stdout,
}

/// One positional argument of a task invocation.
#[derive(Clone, Debug)]
pub enum TaskArg {
    /// A portable reference, saved into the sandbox under the slot name.
    Ref(FileRef),
    /// A raw local path, linked or copied into the sandbox. Only usable
    /// while submitter and worker share a filesystem.
    Path(PathBuf),
}

impl From<FileRef> for TaskArg {
    fn from(fref: FileRef) -> TaskArg {
        TaskArg::Ref(fref)
    }
}

impl<'a> From<&'a FileRef> for TaskArg {
    fn from(fref: &'a FileRef) -> TaskArg {
        TaskArg::Ref(fref.clone())
    }
}

impl From<PathBuf> for TaskArg {
    fn from(path: PathBuf) -> TaskArg {
        TaskArg::Path(path)
    }
}

impl<'a> From<&'a Path> for TaskArg {
    fn from(path: &'a Path) -> TaskArg {
        TaskArg::Path(path.into())
    }
}

impl<'a> From<&'a str> for TaskArg {
    fn from(path: &'a str) -> TaskArg {
        TaskArg::Path(path.into())
    }
}

/// Result of resolving one input slot at call time.
#[derive(Clone, Debug)]
pub(crate) enum Bound {
    One { name: String, value: TaskArg },
    Many { values: Vec<TaskArg> },
}

/// A reusable mapping between named input/output slots and a task body.
///
/// A task is set up once (slots, constants) and then reused across many
/// invocations; it holds no per-invocation state and can be shared freely
/// between worker threads.
#[derive(Clone, Debug)]
pub struct Task {
    body: TaskBody,
    inputs: Vec<InputSlot>,
    outputs: Vec<OutputSlot>,
    constants: HashMap<String, TaskArg>,
}

impl Task {
    /// A task running a shell command inside its sandbox.
    pub fn command<S: Into<String>>(command: S) -> Task {
        Task {
            body: TaskBody::Command(command.into()),
            inputs: Vec::new(),
            outputs: Vec::new(),
            constants: HashMap::new(),
        }
    }

    /// A task calling `body` inside its sandbox.
    pub fn function<F>(body: F) -> Task
    where
        F: Fn(&mut TaskContext) -> Result<()> + Send + Sync + 'static,
    {
        Task {
            body: TaskBody::Function(Arc::new(body)),
            inputs: Vec::new(),
            outputs: Vec::new(),
            constants: HashMap::new(),
        }
    }

    /// Declare the ordered input slots. At most one entry may be
    /// `WILDCARD`.
    pub fn set_inputs(&mut self, names: &[&str]) -> Result<()> {
        let mut inputs = Vec::with_capacity(names.len());
        for name in names {
            if *name == WILDCARD {
                if inputs.contains(&InputSlot::Wildcard) {
                    bail!(ErrorKind::InvalidArgument(
                        "at most one wildcard input slot is allowed".into()
                    ));
                }
                inputs.push(InputSlot::Wildcard);
            } else {
                inputs.push(InputSlot::Name((*name).into()));
            }
        }
        self.inputs = inputs;
        Ok(())
    }

    /// Declare the ordered output slots: literal filenames, glob patterns
    /// or the `STDOUT` sentinel.
    pub fn set_outputs(&mut self, names: &[&str]) -> Result<()> {
        self.outputs = names
            .iter()
            .map(|name| {
                if *name == STDOUT {
                    OutputSlot::Stdout
                } else if name.contains(|c| c == '*' || c == '?' || c == '[') {
                    OutputSlot::Pattern((*name).into())
                } else {
                    OutputSlot::Name((*name).into())
                }
            })
            .collect();
        Ok(())
    }

    /// Permanently bind an input slot so callers never supply it.
    /// The slot must have been declared with `set_inputs` first.
    pub fn set_constant<S: Into<String>, V: Into<TaskArg>>(
        &mut self,
        name: S,
        value: V,
    ) -> Result<()> {
        let name = name.into();
        let declared = self.inputs.iter().any(|slot| match *slot {
            InputSlot::Name(ref n) => *n == name,
            InputSlot::Wildcard => false,
        });
        if !declared {
            bail!(ErrorKind::InvalidArgument(format!(
                "constant for undeclared input slot {:?}",
                name
            )));
        }
        self.constants.insert(name, value.into());
        Ok(())
    }

    pub fn body(&self) -> &TaskBody {
        &self.body
    }

    pub fn inputs(&self) -> &[InputSlot] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputSlot] {
        &self.outputs
    }

    /// Resolve the slots of one invocation.
    ///
    /// Positional arguments bind the declared, non-constant slots in
    /// order; a wildcard slot absorbs everything beyond them, preserving
    /// call order; constants fill their slots without consuming
    /// arguments.
    pub(crate) fn bind(&self, args: Vec<TaskArg>) -> Result<Vec<Bound>> {
        let open = self
            .inputs
            .iter()
            .filter(|slot| match **slot {
                InputSlot::Name(ref name) => !self.constants.contains_key(name),
                InputSlot::Wildcard => false,
            })
            .count();
        let has_wildcard = self.inputs.contains(&InputSlot::Wildcard);
        if !has_wildcard && args.len() > open {
            bail!(ErrorKind::Arity(format!(
                "{} positional arguments for {} open slots and no wildcard",
                args.len(),
                open
            )));
        }
        let wildcard_take = args.len().saturating_sub(open);

        let mut rest = args.into_iter();
        let mut bound = Vec::with_capacity(self.inputs.len());
        for slot in &self.inputs {
            match *slot {
                InputSlot::Name(ref name) => {
                    let value = match self.constants.get(name) {
                        Some(constant) => constant.clone(),
                        None => match rest.next() {
                            Some(arg) => arg,
                            None => bail!(ErrorKind::Arity(format!(
                                "no value bound for slot {:?}",
                                name
                            ))),
                        },
                    };
                    bound.push(Bound::One {
                        name: name.clone(),
                        value,
                    });
                }
                InputSlot::Wildcard => {
                    bound.push(Bound::Many {
                        values: rest.by_ref().take(wildcard_take).collect(),
                    });
                }
            }
        }
        Ok(bound)
    }
}
