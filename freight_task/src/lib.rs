//! Declarative tasks over portable file references, executed in
//! per-invocation sandboxes.
//!
//! A [`Task`](task/struct.Task.html) maps named input and output slots
//! onto the files a command or function works with. For one invocation the
//! [`Executor`](executor/struct.Executor.html) creates a fresh sandbox
//! directory, materializes every bound input under its declared name, runs
//! the task body, and collects the declared outputs back into new
//! references before discarding the sandbox.
//!
//! # Example
//!
//! ```rust,no_run
//! #[macro_use]
//! extern crate freight_task;
//! extern crate freight_core;
//!
//! use freight_core::FileStore;
//! use freight_task::{Executor, Task, WILDCARD};
//!
//! fn main() {
//!     let store = FileStore::inline();
//!     let file1 = store.load("file1.txt").unwrap();
//!     let file2 = store.load("file2.txt").unwrap();
//!
//!     // Join any number of input files into one output file.
//!     let mut joiner = Task::command("cat * > output");
//!     joiner.set_inputs(&[WILDCARD]).unwrap();
//!     joiner.set_outputs(&["output"]).unwrap();
//!
//!     let executor = Executor::new(store);
//!     let mut outputs = executor.run(&joiner, task_args![file1, file2]).unwrap();
//!     let joined = outputs.remove(0).into_file().unwrap();
//!     println!("{}", joined.read_text().unwrap());
//! }
//! ```

extern crate chrono;
#[macro_use]
extern crate error_chain;
extern crate freight_core;
extern crate glob;
#[macro_use]
extern crate log;
extern crate tempdir;

pub use freight_core::errors::{Error, ErrorKind, Result, ResultExt};
pub use freight_core::{FileRef, FileStore};

#[macro_use]
mod macros;

pub mod client;
pub mod context;
pub mod executor;
pub mod sandbox;
pub mod task;

pub use client::{Deferred, LocalClient};
pub use context::TaskContext;
pub use executor::{Executor, TaskOutput};
pub use sandbox::Sandbox;
pub use task::{InputSlot, OutputSlot, Task, TaskArg, TaskBody, TaskFn, STDOUT, WILDCARD};

#[cfg(test)]
extern crate env_logger;
