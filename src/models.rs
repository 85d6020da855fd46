use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strip the module path from a `::`-qualified type name, keeping the final
/// segment. Names without a separator come back unchanged; empty input yields
/// empty output.
pub fn strip_type_path(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Strip everything up to and including a `vendor/` segment from a source
/// path, so two checkouts that differ only in vendoring resolve to the same
/// canonical path.
pub fn strip_vendor_path(path: &str) -> &str {
    path.rsplit("vendor/").next().unwrap_or(path)
}

/// Identity of the module a declaration lives in: the module name plus its
/// source path relative to the project root (slash-separated, no extension).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleId {
    pub name: String,
    pub path: String,
}

impl ModuleId {
    /// Derive the module identity for a source file.
    ///
    /// `mod.rs`, `lib.rs` and `main.rs` name their parent directory's module,
    /// every other file names its own.
    pub fn from_source_file(root: &Path, file: &Path) -> Self {
        let rel = file.strip_prefix(root).unwrap_or(file);
        let mut segments: Vec<String> = rel
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();

        if matches!(
            segments.last().map(String::as_str),
            Some("mod") | Some("lib") | Some("main")
        ) {
            segments.pop();
        }

        let path = segments.join("/");
        let name = segments.last().cloned().unwrap_or_else(|| "crate".to_string());
        ModuleId { name, path }
    }

    /// Source path with any vendoring prefix removed.
    pub fn canonical_path(&self) -> &str {
        strip_vendor_path(&self.path)
    }

    /// The `use` path for items declared in this module, e.g.
    /// `src/rpc/user_api` becomes `crate::rpc::user_api`.
    pub fn use_path(&self) -> String {
        let canonical = self.canonical_path();
        let trimmed = canonical.strip_prefix("src/").unwrap_or(canonical);
        if trimmed.is_empty() || trimmed == "src" {
            "crate".to_string()
        } else {
            format!("crate::{}", trimmed.replace('/', "::"))
        }
    }
}

/// A target binding: a top-level `static` or `const` whose declared type
/// references an RPC service, discovered in the module generation writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingInfo {
    pub name: String,
    pub module: ModuleId,
    pub file_path: String,
    pub line_number: usize,
    /// Final path segments of every type mentioned in the declared type
    /// expression, used to match the binding to a service.
    pub type_names: Vec<String>,
}

impl BindingInfo {
    /// Unique identifier of the binding as referenced from other modules.
    pub fn scope_id(&self) -> String {
        format!("{}::{}", self.module.use_path(), self.name)
    }
}

/// One RPC method of a service trait, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    /// Declared type of the request parameter (the second non-receiver
    /// formal; the first is the call context and is not surfaced).
    pub request_type: String,
    /// The `Ok` type of the method's `Result` return.
    pub response_type: String,
    pub line_number: usize,
}

/// An RPC service trait and its explicitly declared methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub module: ModuleId,
    pub file_path: String,
    pub line_number: usize,
    pub methods: Vec<MethodInfo>,
}

/// A resolved generation target: the binding (variable) paired with the
/// service (interface) it is typed by.
///
/// The two may live in different modules; both identities are tracked
/// independently and never conflated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTarget {
    pub binding: BindingInfo,
    pub service: ServiceInfo,
}

impl ServiceTarget {
    /// Qualified name of the service type, e.g. `crate::rpc::user_api::UserApi`.
    pub fn type_name(&self) -> String {
        format!("{}::{}", self.service.module.use_path(), self.service.name)
    }

    /// The service type name without its module path.
    pub fn type_name_stripped(&self) -> &str {
        strip_type_path(&self.service.name)
    }

    /// The companion concrete client type the RPC toolchain generates next to
    /// the service trait (`UserApi` -> `UserApiClient`).
    pub fn client_type_name(&self) -> String {
        format!("{}Client", self.type_name_stripped())
    }

    /// Name of the initializer function to generate, derived deterministically
    /// from the stripped type name.
    pub fn init_fn_name(&self) -> String {
        format!("init_{}", self.type_name_stripped().to_snake_case())
    }

    pub fn binding_name(&self) -> &str {
        &self.binding.name
    }

    pub fn var_module_name(&self) -> &str {
        &self.binding.module.name
    }

    pub fn var_module_path(&self) -> &str {
        &self.binding.module.path
    }

    pub fn service_module_name(&self) -> &str {
        &self.service.module.name
    }

    /// Import path of the service's module, vendoring removed.
    pub fn service_module_path(&self) -> &str {
        self.service.module.canonical_path()
    }

    pub fn num_methods(&self) -> usize {
        self.service.methods.len()
    }

    /// The i-th explicitly declared method, or `None` out of range.
    pub fn method_at(&self, index: usize) -> Option<MethodView<'_>> {
        if index < self.service.methods.len() {
            Some(MethodView {
                target: self,
                index,
            })
        } else {
            None
        }
    }

    /// All explicit methods in declaration order. The iterator is restartable:
    /// every call yields the same sequence.
    pub fn methods(&self) -> impl Iterator<Item = MethodView<'_>> {
        (0..self.service.methods.len()).map(move |index| MethodView {
            target: self,
            index,
        })
    }
}

/// Read-only view of one method, borrowing its owning target for the shared
/// fields (type name, module identities).
#[derive(Debug, Clone, Copy)]
pub struct MethodView<'a> {
    target: &'a ServiceTarget,
    index: usize,
}

impl<'a> MethodView<'a> {
    pub fn target(&self) -> &'a ServiceTarget {
        self.target
    }

    pub fn info(&self) -> &'a MethodInfo {
        &self.target.service.methods[self.index]
    }

    pub fn name(&self) -> &'a str {
        &self.info().name
    }

    pub fn request_type(&self) -> &'a str {
        &self.info().request_type
    }

    pub fn request_type_stripped(&self) -> &'a str {
        strip_type_path(self.request_type())
    }

    pub fn response_type(&self) -> &'a str {
        &self.info().response_type
    }

    pub fn response_type_stripped(&self) -> &'a str {
        strip_type_path(self.response_type())
    }

    /// Name of the test function to generate for this method.
    pub fn test_fn_name(&self) -> String {
        format!(
            "test_{}_{}",
            self.target.type_name_stripped().to_snake_case(),
            self.name().to_snake_case()
        )
    }

    /// File name of the test skeleton: the snake-case transform of
    /// `<Type>_<Method>_test` plus the source suffix.
    pub fn test_file_name(&self) -> String {
        let base = format!("{}_{}_test", self.target.type_name_stripped(), self.name());
        format!("{}.rs", base.to_snake_case())
    }
}
