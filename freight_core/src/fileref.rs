use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use errors::*;
use id::RefId;
use pack;

/// Where the compressed content of a reference lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Backing {
    /// Pending output slot, nothing written yet. Carries the staged-object
    /// path the first write will create, if staging is configured.
    Empty { reserved: Option<PathBuf> },
    /// Compressed bytes held in process memory. Only safe across machines
    /// when the dispatch layer serializes the whole reference.
    Inline(#[serde(with = "serde_bytes")] Vec<u8>),
    /// Compressed object at a location reachable by every worker.
    Staged(PathBuf),
}

/// Decompressed local copy of a reference, removed from disk on drop.
#[derive(Debug)]
struct CacheFile {
    path: PathBuf,
}

impl Drop for CacheFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("error removing cache file {:?}: {}", self.path, e);
            }
        }
    }
}

/// A portable stand-in for the content of one file.
///
/// The content is compressed on load and decompressed on access, so a
/// reference can be held in memory, written to a staging location, or
/// serialized and shipped to a worker without the source and target
/// machines sharing any path. Clones share the identity, backing and the
/// per-process local cache.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileRef {
    id: RefId,
    /// Path the content was loaded from, kept for diagnostics only.
    origin: Option<PathBuf>,
    backing: Backing,
    /// Lazily materialized local copy; at most one per reference per
    /// process, removed when the last clone is dropped. Never serialized.
    #[serde(skip)]
    cache: Arc<Mutex<Option<CacheFile>>>,
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.backing {
            Backing::Empty { .. } => "empty",
            Backing::Inline(_) => "inline",
            Backing::Staged(_) => "staged",
        };
        write!(f, "FileRef({}, {})", self.id, kind)
    }
}

impl FileRef {
    /// Load an existing file, compressing its content into the configured
    /// backing. Constructed through `FileStore::load`.
    pub(crate) fn load(path: &Path, stage_point: Option<&Path>) -> Result<FileRef> {
        if !path.exists() {
            bail!(ErrorKind::NotFound(path.into()));
        }
        if !path.is_file() {
            bail!(ErrorKind::InvalidArgument(format!(
                "{:?} is not a regular file",
                path
            )));
        }
        let id = RefId::for_path(path);
        let packed = pack::pack(&fs::read(path)?);
        let backing = match stage_point {
            None => Backing::Inline(packed),
            Some(point) => {
                let target = point.join(id.as_str());
                fs::write(&target, &packed)?;
                Backing::Staged(target)
            }
        };
        debug!("loaded {:?} as reference {}", path, id);
        Ok(FileRef {
            id,
            origin: Some(path.into()),
            backing,
            cache: Arc::default(),
        })
    }

    /// Reserve a reference for a file that is expected to be produced
    /// later. Constructed through `FileStore::create`.
    pub(crate) fn create(path: &Path, stage_point: Option<&Path>) -> Result<FileRef> {
        if path.exists() {
            bail!(ErrorKind::AlreadyExists(path.into()));
        }
        let id = RefId::for_path(path);
        let reserved = stage_point.map(|point| point.join(id.as_str()));
        Ok(FileRef {
            id,
            origin: None,
            backing: Backing::Empty { reserved },
            cache: Arc::default(),
        })
    }

    pub fn id(&self) -> &RefId {
        &self.id
    }

    /// The path the content was loaded from, for diagnostics.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_ref().map(|p| p.as_path())
    }

    pub fn backing(&self) -> &Backing {
        &self.backing
    }

    pub fn is_staged(&self) -> bool {
        matchvar!(self.backing, Backing::Staged(_))
    }

    /// True until the first write (or load) puts content behind the
    /// reference.
    pub fn is_empty(&self) -> bool {
        matchvar!(self.backing, Backing::Empty { .. })
    }

    /// Decompressed content. An empty reference reads as empty bytes.
    pub fn read_binary(&self) -> Result<Vec<u8>> {
        match self.backing {
            Backing::Empty { .. } => Ok(Vec::new()),
            Backing::Inline(ref packed) => pack::unpack(packed),
            Backing::Staged(ref object) => pack::unpack(&fs::read(object)?),
        }
    }

    /// Decompressed content as UTF-8 text.
    pub fn read_text(&self) -> Result<String> {
        Ok(String::from_utf8(self.read_binary()?)?)
    }

    /// Compress and store `data`, replacing any previous content. For a
    /// staged reference this (re)creates the staged object. Any local
    /// cache copy is dropped so later reads observe the new content.
    pub fn write_binary(&mut self, data: &[u8]) -> Result<()> {
        let packed = pack::pack(data);
        let target = match self.backing {
            Backing::Empty {
                reserved: Some(ref p),
            } => Some(p.clone()),
            Backing::Staged(ref p) => Some(p.clone()),
            Backing::Empty { reserved: None } | Backing::Inline(_) => None,
        };
        self.backing = match target {
            Some(object) => {
                fs::write(&object, &packed)?;
                Backing::Staged(object)
            }
            None => Backing::Inline(packed),
        };
        self.cache.lock().unwrap().take();
        Ok(())
    }

    /// Compress and store UTF-8 text, replacing any previous content.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.write_binary(text.as_bytes())
    }

    /// Decompress the content into `target`, overwriting it, and return
    /// the path. An empty reference saves an empty file.
    pub fn save<P: AsRef<Path>>(&self, target: P) -> Result<PathBuf> {
        let target = target.as_ref();
        fs::write(target, &self.read_binary()?)?;
        Ok(target.into())
    }

    /// A path on this machine holding the decompressed content.
    ///
    /// The first call materializes a cache file named after the reference
    /// identity in the system temp directory; later calls return the same
    /// path without re-decompressing, as long as the file is still there.
    /// If the file was removed externally it is recreated. The cache file
    /// is removed when the last clone of this reference is dropped.
    pub fn as_local_path(&self) -> Result<PathBuf> {
        let mut guard = self.cache.lock().unwrap();
        if let Some(ref cache) = *guard {
            if cache.path.exists() {
                return Ok(cache.path.clone());
            }
        }
        // Forget a cache entry whose file was removed under us.
        guard.take();
        let path = env::temp_dir().join(self.id.as_str());
        self.save(&path)?;
        debug!("materialized reference {} at {:?}", self.id, path);
        *guard = Some(CacheFile { path: path.clone() });
        Ok(path)
    }

    /// Push inline content into `stage_point` so other machines can fetch
    /// it. Staged references are left as they are; an empty reference only
    /// re-reserves its staged-object path.
    pub fn stage<P: AsRef<Path>>(&mut self, stage_point: P) -> Result<()> {
        let target = stage_point.as_ref().join(self.id.as_str());
        match self.backing {
            Backing::Staged(_) => return Ok(()),
            Backing::Empty { .. } => {
                self.backing = Backing::Empty {
                    reserved: Some(target),
                };
                return Ok(());
            }
            Backing::Inline(ref packed) => fs::write(&target, packed)?,
        }
        self.backing = Backing::Staged(target);
        Ok(())
    }
}
