use crate::error::{Error, Result};
use crate::generators::client::{ClientGenerator, MethodContext};
use crate::generators::templates::render;
use crate::generators::ArtifactOutcome;
use crate::models::MethodView;

/// Generates the test skeleton for one RPC method of a target.
///
/// Test files are never appended to: generated skeletons live outside the
/// module scope, so an existing declaration cannot be detected reliably.
/// Collision avoidance therefore defaults to skipping the whole file.
pub struct HandlerGenerator<'a> {
    client: &'a ClientGenerator<'a>,
    method: MethodView<'a>,
}

impl<'a> HandlerGenerator<'a> {
    pub(crate) fn new(client: &'a ClientGenerator<'a>, method: MethodView<'a>) -> Self {
        Self { client, method }
    }

    pub fn method(&self) -> &MethodView<'a> {
        &self.method
    }

    /// Generate `<type>_<method>_test.rs` next to the target binding.
    pub fn generate_test_file(&self) -> Result<ArtifactOutcome> {
        let file_name = self.method.test_file_name();
        let emission = match self.client.emitter().plan(&file_name, true) {
            Ok(emission) => emission,
            Err(Error::AlreadyExists { path }) => {
                self.client.logger().info(&format!(
                    "{} already exists. Skipping.",
                    path.display()
                ));
                return Ok(ArtifactOutcome::SkippedExistingFile { path });
            }
            Err(err) => return Err(err),
        };

        let test_fn = self.method.test_fn_name();
        if self.client.emitter().symbol_exists(&test_fn) {
            self.client.logger().info(&format!(
                "`{}` already exists in {}. Skipping.",
                test_fn,
                self.client.emitter().dir().display()
            ));
            return Ok(ArtifactOutcome::SkippedExistingSymbol { name: test_fn });
        }

        let mut ctx = self.client.base_context();
        ctx.insert("method", &MethodContext::new(&self.method));
        let rendered = render(self.client.tera(), "handler_test_full.rs.tera", &ctx)?;
        self.client.write(emission, &rendered, &file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::templates::create_template_engine;
    use crate::interface::output::Logger;
    use crate::models::{BindingInfo, MethodInfo, ModuleId, ServiceInfo, ServiceTarget};
    use std::fs;
    use tempfile::TempDir;

    fn sample_target() -> ServiceTarget {
        ServiceTarget {
            binding: BindingInfo {
                name: "USER_API".to_string(),
                module: ModuleId {
                    name: "state".to_string(),
                    path: "src/app/state".to_string(),
                },
                file_path: "src/app/state.rs".to_string(),
                line_number: 1,
                type_names: vec!["UserApiClient".to_string()],
            },
            service: ServiceInfo {
                name: "UserApi".to_string(),
                module: ModuleId {
                    name: "user_api".to_string(),
                    path: "src/rpc/user_api".to_string(),
                },
                file_path: "src/rpc/user_api.rs".to_string(),
                line_number: 1,
                methods: vec![
                    MethodInfo {
                        name: "get_user".to_string(),
                        request_type: "GetUserRequest".to_string(),
                        response_type: "GetUserResponse".to_string(),
                        line_number: 2,
                    },
                    MethodInfo {
                        name: "list_users".to_string(),
                        request_type: "ListUsersRequest".to_string(),
                        response_type: "ListUsersResponse".to_string(),
                        line_number: 3,
                    },
                ],
            },
        }
    }

    #[test]
    fn test_skeleton_created_once_per_method() {
        let dir = TempDir::new().unwrap();
        let tera = create_template_engine().unwrap();
        let logger = Logger::new(false, false);
        let target = sample_target();

        let generator = ClientGenerator::new(&target, dir.path(), &tera, &logger).unwrap();
        for handler in generator.handlers() {
            assert!(handler.generate_test_file().unwrap().is_written());
        }

        let skeleton = dir.path().join("user_api_get_user_test.rs");
        let content = fs::read_to_string(&skeleton).unwrap();
        assert_eq!(
            content.matches("async fn test_user_api_get_user()").count(),
            1
        );
        assert!(dir.path().join("user_api_list_users_test.rs").exists());

        // Second run: both files rejected, contents untouched, no error.
        let generator = ClientGenerator::new(&target, dir.path(), &tera, &logger).unwrap();
        for handler in generator.handlers() {
            let outcome = handler.generate_test_file().unwrap();
            assert!(matches!(
                outcome,
                ArtifactOutcome::SkippedExistingFile { .. }
            ));
        }
        assert_eq!(content, fs::read_to_string(&skeleton).unwrap());
    }

    #[test]
    fn test_handler_by_index_matches_declaration_order() {
        let dir = TempDir::new().unwrap();
        let tera = create_template_engine().unwrap();
        let logger = Logger::new(false, false);
        let target = sample_target();

        let generator = ClientGenerator::new(&target, dir.path(), &tera, &logger).unwrap();
        assert_eq!(generator.handler(0).unwrap().method().name(), "get_user");
        assert_eq!(generator.handler(1).unwrap().method().name(), "list_users");
        assert!(generator.handler(2).is_none());
    }
}
