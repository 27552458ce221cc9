use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use errors::*;
use fileref::FileRef;

lazy_static! {
    /// Process-wide default staging location, consulted by `FileStore::new`.
    static ref DEFAULT_STAGE_POINT: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Set the staging location adopted by stores built with `FileStore::new`.
///
/// This is deliberate process-wide shared state: call it once during
/// startup, before building stores. Pass `None` to reset. An explicit
/// per-store location always overrides the default.
pub fn set_default_stage_point<P: Into<PathBuf>>(point: Option<P>) {
    let point = point.map(Into::into);
    info!("default stage point set to {:?}", point);
    *DEFAULT_STAGE_POINT.lock().unwrap() = point;
}

/// The current process-wide default staging location, if any.
pub fn default_stage_point() -> Option<PathBuf> {
    DEFAULT_STAGE_POINT.lock().unwrap().clone()
}

/// Builds file references against one staging location.
///
/// With a stage point, loaded and written content lands as compressed
/// objects under that directory, which every worker must be able to
/// reach (typically a mounted shared filesystem). Without one, content
/// stays inline in memory, which is only safe when the dispatch layer
/// serializes references across worker boundaries.
#[derive(Clone, Debug)]
pub struct FileStore {
    stage_point: Option<PathBuf>,
}

impl FileStore {
    /// A store using the process-wide default staging location, if set.
    pub fn new() -> Self {
        FileStore {
            stage_point: default_stage_point(),
        }
    }

    /// A store staging into `point`, created if missing. Overrides any
    /// process-wide default.
    pub fn with_stage_point<P: Into<PathBuf>>(point: P) -> Result<Self> {
        let point = point.into();
        if !point.exists() {
            fs::create_dir_all(&point)?;
        }
        Ok(FileStore {
            stage_point: Some(point),
        })
    }

    /// A store keeping content inline in memory regardless of the
    /// process-wide default.
    pub fn inline() -> Self {
        FileStore { stage_point: None }
    }

    pub fn stage_point(&self) -> Option<&Path> {
        self.stage_point.as_ref().map(|p| p.as_path())
    }

    /// Reference an existing file. Fails with `NotFound` if `path` does
    /// not exist.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<FileRef> {
        FileRef::load(path.as_ref(), self.stage_point())
    }

    /// Reserve a reference for an expected future output. Fails with
    /// `AlreadyExists` if `path` is already present.
    pub fn create<P: AsRef<Path>>(&self, path: P) -> Result<FileRef> {
        FileRef::create(path.as_ref(), self.stage_point())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        FileStore::new()
    }
}
