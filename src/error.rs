use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The destination artifact exists and must not be appended to.
    ///
    /// Callers treat this as "nothing to do" for the one artifact, not as a
    /// failure of the run.
    #[error("{} already exists", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("could not {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template '{name}' failed: {source}")]
    Template {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid project path: {0}")]
    InvalidProjectPath(String),
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True for the benign "artifact already present" case.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    mod error_variants {
        use super::*;

        #[test]
        fn test_already_exists() {
            let err = Error::AlreadyExists {
                path: PathBuf::from("/pkg/run_tests.sh"),
            };
            assert!(err.is_already_exists());
            assert_eq!(err.to_string(), "/pkg/run_tests.sh already exists");
        }

        #[test]
        fn test_io_error_carries_operation_and_path() {
            let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
            let err = Error::io("create", "/pkg/clients.rs", io_err);
            assert!(!err.is_already_exists());
            let display = err.to_string();
            assert!(display.contains("create"));
            assert!(display.contains("/pkg/clients.rs"));
            assert!(display.contains("access denied"));
        }

        #[test]
        fn test_analysis_error() {
            let err = Error::Analysis("no RPC service traits found".to_string());
            assert_eq!(
                err.to_string(),
                "analysis failed: no RPC service traits found"
            );
        }

        #[test]
        fn test_invalid_project_path() {
            let err = Error::InvalidProjectPath("/does/not/exist".to_string());
            assert!(err.to_string().contains("/does/not/exist"));
        }
    }

    mod result_type {
        use super::*;

        #[test]
        fn test_result_with_question_mark() {
            fn inner() -> Result<()> {
                Err(Error::Analysis("boom".to_string()))?;
                Ok(())
            }
            assert!(inner().is_err());
        }

        #[test]
        fn test_io_source_kind_preserved() {
            let err = Error::io(
                "open",
                "x.rs",
                io::Error::new(io::ErrorKind::NotFound, "missing"),
            );
            if let Error::Io { source, .. } = err {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            } else {
                panic!("expected Io variant");
            }
        }
    }
}
