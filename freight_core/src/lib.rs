//! Portable file references for tasks running on machines that do not
//! share a filesystem.
//!
//! A [`FileRef`](fileref/struct.FileRef.html) stands in for the *content*
//! of a file rather than its path: the content is compressed and either
//! kept inline in memory or written to a staging location every worker can
//! reach. References are serializable, so a dispatch layer can ship them
//! to remote workers, where [`save`](fileref/struct.FileRef.html#method.save)
//! or [`as_local_path`](fileref/struct.FileRef.html#method.as_local_path)
//! turns them back into real files on demand.
//!
//! # Example
//!
//! ```rust,no_run
//! extern crate freight_core;
//!
//! use freight_core::FileStore;
//!
//! fn main() {
//!     let store = FileStore::with_stage_point("/mnt/shared/stage").unwrap();
//!     let input = store.load("data/config.yaml").unwrap();
//!     // ... ship `input` to a worker ...
//!     let local = input.as_local_path().unwrap();
//!     println!("materialized at {:?}", local);
//! }
//! ```

#[macro_use]
extern crate error_chain;
extern crate flate2;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate serde;
extern crate serde_bytes;
#[macro_use]
extern crate serde_derive;
extern crate uuid;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
mod macros;

pub mod errors;
pub mod fileref;
pub mod id;
pub mod pack;
pub mod store;

pub use errors::{Error, ErrorKind, Result, ResultExt};
pub use fileref::{Backing, FileRef};
pub use id::RefId;
pub use store::{default_stage_point, set_default_stage_point, FileStore};

#[cfg(test)]
extern crate serde_cbor;
#[cfg(test)]
extern crate serde_json;
#[cfg(test)]
extern crate tempdir;

#[cfg(test)]
mod tests;
