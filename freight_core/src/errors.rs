#![allow(renamed_and_removed_lints)]

use std::path::PathBuf;

// Create the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    types {
        Error, ErrorKind, ResultExt;
    }
    foreign_links {
        Io(::std::io::Error);
        Utf8(::std::string::FromUtf8Error);
    }

    errors {
        NotFound(path: PathBuf) {
            description("load target does not exist")
            display("no such file: {:?}", path)
        }
        AlreadyExists(path: PathBuf) {
            description("create target already exists")
            display("file already exists: {:?}", path)
        }
        InvalidArgument(reason: String) {
            description("invalid argument")
            display("invalid argument: {}", reason)
        }
        Arity(detail: String) {
            description("unresolved task slot")
            display("slot resolution failed: {}", detail)
        }
        MissingOutput(slot: String) {
            description("declared output not produced")
            display("declared output {:?} was not produced", slot)
        }
        ExecutionFailure(detail: String) {
            description("task execution failed")
            display("task execution failed: {}", detail)
        }
    }
}

// Explicit alias just to make the IDEs happier
pub type Result<T> = ::std::result::Result<T, Error>;
