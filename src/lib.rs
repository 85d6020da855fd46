//! # rpc-testgen
//!
//! Generate client initializers and integration-test skeletons from RPC
//! client traits.
//!
//! This library scans Rust source for *service traits* — traits whose methods
//! all look like RPC calls:
//!
//! ```rust,ignore
//! pub trait UserApi {
//!     async fn get_user(&mut self, ctx: CallContext, request: GetUserRequest)
//!         -> Result<GetUserResponse, RpcError>;
//! }
//! ```
//!
//! and for *target bindings* — `static`/`const` items typed by such a trait
//! (or its generated `UserApiClient` companion) in the module your
//! application keeps its clients in. For every binding it then emits:
//!
//! - an `init_user_api` constructor in the module's `clients.rs`, created on
//!   first run and appended to (as a bare snippet) on later runs for other
//!   services;
//! - one `user_api_get_user_test.rs` skeleton per RPC method, with a
//!   `#[tokio::test] #[ignore]` function wired to the initializer;
//! - a `run_tests.sh` helper that runs the skeletons against a live backend.
//!
//! Generation is idempotent: a function that already exists in the
//! destination scope, or a test file that already exists on disk, is reported
//! as a skip and left untouched. Re-running after a partial or hand-edited
//! generation only appends what is missing.
//!
//! ## As a CLI tool
//!
//! ```bash
//! cargo install rpc-testgen
//!
//! # discover bindings under ./src and generate next to them
//! rpc-testgen generate --project-path . --target-path src/app
//! ```
//!
//! ## Programmatic usage
//!
//! ```rust,no_run
//! use rpc_testgen::{generate_from_config, GenerateConfig};
//!
//! let config = GenerateConfig {
//!     project_path: ".".to_string(),
//!     target_path: "src/app".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = generate_from_config(&config)?;
//! println!("{} written, {} skipped", report.written_count(), report.skipped_count());
//! # Ok::<(), rpc_testgen::Error>(())
//! ```

pub mod analysis;
mod error;
pub mod generators;
pub mod interface;
pub mod models;

pub use error::{Error, Result};
pub use models::*;

// Convenience re-exports for common use cases
pub use generators::ArtifactOutcome;
pub use interface::config::GenerateConfig;
pub use interface::output::{Logger, ProgressReporter};
pub use interface::{generate_from_config, GenerationReport};
