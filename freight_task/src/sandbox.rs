use std::fs;
use std::path::{Path, PathBuf};

use chrono;
use glob;
use tempdir::TempDir;

use freight_core::errors::*;

use task::TaskArg;

/// Ephemeral working directory of one task invocation.
///
/// Created empty and unique per invocation, removed again when dropped,
/// on success and on failure alike. Only captured outputs survive.
#[derive(Debug)]
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let prefix = format!("{}-task", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let dir = TempDir::new(&prefix)?;
        debug!("sandbox created at {:?}", dir.path());
        Ok(Sandbox { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Materialize one bound input under `name`.
    ///
    /// References are decompressed into the sandbox; raw paths are hard
    /// linked, with a copy as fallback across filesystems.
    pub fn add_input(&self, name: &str, value: &TaskArg) -> Result<()> {
        let target = self.dir.path().join(name);
        match *value {
            TaskArg::Ref(ref fref) => {
                fref.save(&target)?;
            }
            TaskArg::Path(ref path) => {
                if !path.is_file() {
                    bail!(ErrorKind::NotFound(path.clone()));
                }
                if fs::hard_link(path, &target).is_err() {
                    fs::copy(path, &target)?;
                }
            }
        }
        Ok(())
    }

    /// Files inside the sandbox matching `pattern`, sorted by path.
    pub fn matches(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full = self.dir.path().join(pattern);
        let full = match full.to_str() {
            Some(s) => s.to_owned(),
            None => bail!(ErrorKind::InvalidArgument(format!(
                "output pattern {:?} is not valid UTF-8",
                pattern
            ))),
        };
        let entries = glob::glob(&full).map_err(|e| {
            ErrorKind::InvalidArgument(format!("bad output pattern {:?}: {}", pattern, e))
        })?;
        let mut found = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| e.into_error())?;
            if path.is_file() {
                found.push(path);
            }
        }
        found.sort();
        Ok(found)
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        debug!("discarding sandbox {:?}", self.dir.path());
    }
}
