pub mod binding_parser;
pub mod scope;
pub mod service_parser;

use crate::error::{Error, Result};
use crate::models::{BindingInfo, ServiceInfo, ServiceTarget};
use std::path::Path;

pub use binding_parser::BindingParser;
pub use scope::ScopeIndex;
pub use service_parser::ServiceParser;

/// Orchestrates the analysis sub-modules: service traits from the project
/// tree, bindings from the target module, and the pairing of the two.
#[derive(Debug, Default)]
pub struct ProjectAnalyzer {
    service_parser: ServiceParser,
    binding_parser: BindingParser,
    services: Vec<ServiceInfo>,
}

impl ProjectAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the project for RPC service traits.
    pub fn analyze_project(&mut self, project_root: &Path) -> Result<&[ServiceInfo]> {
        if !project_root.exists() {
            return Err(Error::InvalidProjectPath(
                project_root.display().to_string(),
            ));
        }
        self.services = self.service_parser.parse_project(project_root)?;
        Ok(&self.services)
    }

    pub fn services(&self) -> &[ServiceInfo] {
        &self.services
    }

    /// Resolve the generation targets for a target module directory.
    ///
    /// With an explicit `bindings` list, every named binding must exist and
    /// must match a service — anything else is an analysis error. With an
    /// empty list, every binding in the directory that matches a discovered
    /// service becomes a target and the rest are ignored.
    pub fn resolve_targets(
        &self,
        project_root: &Path,
        target_dir: &Path,
        bindings: &[String],
        service_override: Option<&str>,
    ) -> Result<Vec<ServiceTarget>> {
        let found = self.binding_parser.parse_dir(project_root, target_dir)?;

        if bindings.is_empty() {
            return Ok(found
                .into_iter()
                .filter_map(|binding| {
                    let service = self.match_service(&binding, service_override)?;
                    Some(ServiceTarget {
                        binding,
                        service: service.clone(),
                    })
                })
                .collect());
        }

        let mut targets = Vec::new();
        for name in bindings {
            let binding = found
                .iter()
                .find(|b| &b.name == name)
                .cloned()
                .ok_or_else(|| {
                    Error::Analysis(format!(
                        "binding `{}` not found in {}",
                        name,
                        target_dir.display()
                    ))
                })?;
            let service = self.match_service(&binding, service_override).ok_or_else(|| {
                Error::Analysis(format!(
                    "no service trait matches binding `{}` (declared types: {})",
                    binding.scope_id(),
                    binding.type_names.join(", ")
                ))
            })?;
            targets.push(ServiceTarget {
                binding,
                service: service.clone(),
            });
        }
        Ok(targets)
    }

    /// A binding matches a service when its declared type mentions the trait
    /// itself or the `<Trait>Client` companion type.
    fn match_service(
        &self,
        binding: &BindingInfo,
        service_override: Option<&str>,
    ) -> Option<&ServiceInfo> {
        if let Some(name) = service_override {
            return self.services.iter().find(|s| s.name == name);
        }
        self.services.iter().find(|service| {
            let client = format!("{}Client", service.name);
            binding
                .type_names
                .iter()
                .any(|t| t == &service.name || t == &client)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/rpc")).unwrap();
        fs::create_dir_all(root.join("src/app")).unwrap();
        fs::write(
            root.join("src/rpc/user_api.rs"),
            r#"
pub trait UserApi {
    async fn get_user(&mut self, ctx: Ctx, request: GetUserRequest) -> Result<GetUserResponse, String>;
}
"#,
        )
        .unwrap();
        fs::write(
            root.join("src/app/state.rs"),
            r#"
pub static USER_API: OnceLock<UserApiClient> = OnceLock::new();
pub static UNRELATED: OnceLock<Config> = OnceLock::new();
"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_auto_discovery_skips_unmatched_bindings() {
        let dir = fixture();
        let root = dir.path();
        let mut analyzer = ProjectAnalyzer::new();
        analyzer.analyze_project(root).unwrap();

        let targets = analyzer
            .resolve_targets(root, &root.join("src/app"), &[], None)
            .unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].binding_name(), "USER_API");
        assert_eq!(targets[0].service.name, "UserApi");
    }

    #[test]
    fn test_explicit_binding_must_match() {
        let dir = fixture();
        let root = dir.path();
        let mut analyzer = ProjectAnalyzer::new();
        analyzer.analyze_project(root).unwrap();

        let err = analyzer
            .resolve_targets(
                root,
                &root.join("src/app"),
                &["UNRELATED".to_string()],
                None,
            )
            .unwrap_err();
        assert!(err.to_string().contains("UNRELATED"));

        let err = analyzer
            .resolve_targets(root, &root.join("src/app"), &["MISSING".to_string()], None)
            .unwrap_err();
        assert!(err.to_string().contains("MISSING"));
    }

    #[test]
    fn test_service_override_forces_pairing() {
        let dir = fixture();
        let root = dir.path();
        let mut analyzer = ProjectAnalyzer::new();
        analyzer.analyze_project(root).unwrap();

        let targets = analyzer
            .resolve_targets(
                root,
                &root.join("src/app"),
                &["UNRELATED".to_string()],
                Some("UserApi"),
            )
            .unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].service.name, "UserApi");
    }

    #[test]
    fn test_missing_project_path() {
        let mut analyzer = ProjectAnalyzer::new();
        let err = analyzer
            .analyze_project(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidProjectPath(_)));
    }
}
