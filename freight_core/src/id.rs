use std::fmt;
use std::path::Path;

use uuid::Uuid;

/// Globally unique identity of one file reference.
///
/// The token is random and collision-free, with the original file
/// extension appended so type-sniffing tools keep working on staged
/// objects and cache files. The rendered form is used both as the object
/// name inside a staging location and as the local cache filename.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefId(String);

impl RefId {
    /// New random identity keeping the extension of `path`, if it has one.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        RefId(format!("{}{}", Uuid::new_v4(), ext))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
