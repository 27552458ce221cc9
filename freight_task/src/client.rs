use std::thread;
use std::thread::JoinHandle;

use freight_core::errors::*;
use freight_core::{FileRef, FileStore};

use executor::{Executor, TaskOutput};
use task::{Task, TaskArg};

/// Deferred result of a submitted invocation.
pub struct Deferred {
    handle: JoinHandle<Result<Vec<TaskOutput>>>,
}

impl Deferred {
    /// Block until the invocation finishes and take its outputs, in
    /// declared slot order.
    pub fn result(self) -> Result<Vec<TaskOutput>> {
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => bail!(ErrorKind::ExecutionFailure(
                "worker thread panicked".into()
            )),
        }
    }
}

/// Thread-backed reference implementation of the dispatch contract.
///
/// Every submission runs on its own thread against the same executor
/// configuration. A distributed scheduler offers the same
/// submit/map/upload surface with remote workers behind it; references
/// built against a shared staging location work unchanged with either.
#[derive(Clone, Debug)]
pub struct LocalClient {
    executor: Executor,
}

impl LocalClient {
    pub fn new(store: FileStore) -> Self {
        LocalClient {
            executor: Executor::new(store),
        }
    }

    /// Run one invocation in the background.
    pub fn submit(&self, task: &Task, args: Vec<TaskArg>) -> Deferred {
        debug!("submitting {:?} with {} arguments", task.body(), args.len());
        let task = task.clone();
        let executor = self.executor.clone();
        Deferred {
            handle: thread::spawn(move || executor.run(&task, args)),
        }
    }

    /// Run one invocation per argument set. Result order matches
    /// submission order.
    pub fn map(&self, task: &Task, batches: Vec<Vec<TaskArg>>) -> Vec<Deferred> {
        batches
            .into_iter()
            .map(|args| self.submit(task, args))
            .collect()
    }

    /// Make a reference fetchable by workers: inline content is pushed
    /// to the client's staging location; staged references pass through.
    pub fn upload(&self, fref: &FileRef) -> Result<FileRef> {
        let mut fref = fref.clone();
        if let Some(point) = self.executor.store().stage_point() {
            fref.stage(point)?;
        }
        Ok(fref)
    }
}
