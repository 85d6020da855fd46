pub mod client;
pub mod emitter;
pub mod handler;
pub mod templates;

use serde::Serialize;
use std::path::PathBuf;

pub use client::{ClientGenerator, CLIENTS_FILE, RUN_TESTS_FILE};
pub use emitter::{Emission, Emitter};
pub use handler::HandlerGenerator;

/// What actually happened for one artifact.
///
/// Skips are successes: they are how repeated runs stay idempotent. The
/// variant (rather than a log line) is what lets callers tell "freshly
/// generated" apart from "nothing to do".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ArtifactOutcome {
    Written { path: PathBuf },
    SkippedExistingFile { path: PathBuf },
    SkippedExistingSymbol { name: String },
}

impl ArtifactOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ArtifactOutcome::Written { .. })
    }
}
