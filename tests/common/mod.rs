#![allow(dead_code)]
/// Common test utilities and helpers
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rpc_testgen::GenerateConfig;

/// A scratch project on disk: service traits plus a target module.
pub struct TestProject {
    pub temp_dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The standard fixture: one `UserApi` service with three methods and a
    /// matching binding under `src/app`.
    pub fn with_user_service() -> Self {
        let project = Self::new();
        project.write_file(
            "src/rpc/user_api.rs",
            r#"
pub struct CallContext;
pub struct GetUserRequest;
pub struct GetUserResponse;
pub struct ListUsersRequest;
pub struct ListUsersResponse;
pub struct DeleteUserRequest;
pub struct DeleteUserResponse;
pub struct RpcError;

pub trait UserApi {
    async fn get_user(&mut self, ctx: CallContext, request: GetUserRequest) -> Result<GetUserResponse, RpcError>;
    async fn list_users(&mut self, ctx: CallContext, request: ListUsersRequest) -> Result<ListUsersResponse, RpcError>;
    async fn delete_user(&mut self, ctx: CallContext, request: DeleteUserRequest) -> Result<DeleteUserResponse, RpcError>;
}
"#,
        );
        project.write_file(
            "src/app/state.rs",
            r#"
pub struct Config;

pub static USER_API: OnceLock<UserApiClient> = OnceLock::new();
"#,
        );
        project
    }

    /// Write a file under the project root, creating parent directories.
    pub fn write_file(&self, name: &str, content: &str) -> &Self {
        let file_path = self.temp_dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(file_path, content).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp_dir.path().join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    /// A config pointing at this project with `src/app` as the target module.
    pub fn config(&self) -> GenerateConfig {
        GenerateConfig {
            project_path: self.temp_dir.path().to_string_lossy().to_string(),
            target_path: "src/app".to_string(),
            ..Default::default()
        }
    }
}
