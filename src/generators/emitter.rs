use crate::analysis::ScopeIndex;
use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// The planner's decision for one output file, carrying the open handle.
///
/// The variant is threaded into the rendering step so the full-file vs
/// snippet choice is made from the same value that opened the file, with no
/// shared mode state in between.
#[derive(Debug)]
pub enum Emission {
    /// The file did not exist; it has been created and is open for writing.
    Create(File),
    /// The file existed; it is open for append-only writing.
    Append(File),
}

impl Emission {
    pub fn is_append(&self) -> bool {
        matches!(self, Emission::Append(_))
    }

    pub fn into_file(self) -> File {
        match self {
            Emission::Create(file) | Emission::Append(file) => file,
        }
    }
}

/// Emission planner for one destination module directory.
///
/// Owns the directory's scope index so the duplicate-symbol check and the
/// file-open decision stay together. One planner per generation target; the
/// index reflects the directory as it was when the planner was built.
#[derive(Debug)]
pub struct Emitter {
    dir: PathBuf,
    scope: ScopeIndex,
}

impl Emitter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let scope = ScopeIndex::scan_dir(&dir)?;
        Ok(Self { dir, scope })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decide how `file_name` will be written.
    ///
    /// Absent file: created and returned as [`Emission::Create`]. Existing
    /// file with `reject_if_exists`: [`Error::AlreadyExists`], which callers
    /// treat as "nothing to do". Existing file otherwise: opened append-only
    /// as [`Emission::Append`].
    pub fn plan(&self, file_name: &str, reject_if_exists: bool) -> Result<Emission> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            let file = File::create(&path).map_err(|e| Error::io("create", &path, e))?;
            Ok(Emission::Create(file))
        } else if reject_if_exists {
            Err(Error::AlreadyExists { path })
        } else {
            let file = OpenOptions::new()
                .append(true)
                .open(&path)
                .map_err(|e| Error::io("open", &path, e))?;
            Ok(Emission::Append(file))
        }
    }

    /// Whether `name` is already declared in the destination module's scope.
    /// Checked after the file-open decision and before any write.
    pub fn symbol_exists(&self, name: &str) -> bool {
        self.scope.contains(name)
    }
}
