use crate::error::{Error, Result};
use crate::models::{MethodInfo, ModuleId, ServiceInfo};
use quote::ToTokens;
use std::fs;
use std::path::Path;
use syn::{FnArg, ItemTrait, ReturnType, TraitItem, TraitItemFn, Type};
use walkdir::WalkDir;

/// Parser for RPC service traits.
///
/// A trait qualifies when every one of its methods is an RPC call:
/// `async fn name(&self | &mut self, ctx, request) -> Result<Response, E>`.
/// The first non-receiver parameter is the call context and is not surfaced;
/// the second is the request; the response is the `Ok` type of the return.
#[derive(Debug, Default)]
pub struct ServiceParser;

impl ServiceParser {
    pub fn new() -> Self {
        Self
    }

    /// Walk the project tree and collect every service trait, in file order.
    pub fn parse_project(&self, project_root: &Path) -> Result<Vec<ServiceInfo>> {
        let mut services = Vec::new();

        for entry in WalkDir::new(project_root) {
            let entry =
                entry.map_err(|e| Error::Analysis(format!("could not walk project: {}", e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().map_or(true, |ext| ext != "rs") {
                continue;
            }
            services.extend(self.parse_file(project_root, entry.path())?);
        }

        Ok(services)
    }

    /// Collect the service traits declared at the top level of one file.
    pub fn parse_file(&self, project_root: &Path, file_path: &Path) -> Result<Vec<ServiceInfo>> {
        let content = fs::read_to_string(file_path).map_err(|e| Error::io("read", file_path, e))?;
        let ast = syn::parse_file(&content)
            .map_err(|e| Error::Analysis(format!("{}: {}", file_path.display(), e)))?;

        let services = ast
            .items
            .iter()
            .filter_map(|item| {
                if let syn::Item::Trait(item_trait) = item {
                    self.parse_trait(item_trait, project_root, file_path)
                } else {
                    None
                }
            })
            .collect();

        Ok(services)
    }

    fn parse_trait(
        &self,
        item_trait: &ItemTrait,
        project_root: &Path,
        file_path: &Path,
    ) -> Option<ServiceInfo> {
        let mut methods = Vec::new();
        for item in &item_trait.items {
            if let TraitItem::Fn(method) = item {
                // One non-RPC method disqualifies the whole trait.
                methods.push(self.rpc_method(method)?);
            }
        }
        if methods.is_empty() {
            return None;
        }

        let rel = file_path.strip_prefix(project_root).unwrap_or(file_path);
        Some(ServiceInfo {
            name: item_trait.ident.to_string(),
            module: ModuleId::from_source_file(project_root, file_path),
            file_path: rel.to_string_lossy().to_string(),
            line_number: item_trait.ident.span().start().line,
            methods,
        })
    }

    fn rpc_method(&self, method: &TraitItemFn) -> Option<MethodInfo> {
        let sig = &method.sig;
        if sig.asyncness.is_none() {
            return None;
        }

        let mut inputs = sig.inputs.iter();
        if !matches!(inputs.next()?, FnArg::Receiver(_)) {
            return None;
        }
        // Call context; present but not surfaced.
        let FnArg::Typed(_ctx) = inputs.next()? else {
            return None;
        };
        let FnArg::Typed(request) = inputs.next()? else {
            return None;
        };
        if inputs.next().is_some() {
            return None;
        }

        let response = match &sig.output {
            ReturnType::Type(_, ty) => result_ok_type(ty)?,
            ReturnType::Default => return None,
        };

        Some(MethodInfo {
            name: sig.ident.to_string(),
            request_type: type_to_string(&request.ty),
            response_type: type_to_string(response),
            line_number: sig.ident.span().start().line,
        })
    }
}

/// The `Ok` type of a `Result<T, E>` return, by whatever path `Result` is
/// named (`Result`, `std::result::Result`, an alias re-export).
fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let last = type_path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| {
        if let syn::GenericArgument::Type(inner) = arg {
            Some(inner)
        } else {
            None
        }
    })
}

/// Render a type as the `::`-qualified name it was declared with.
fn type_to_string(ty: &Type) -> String {
    match ty {
        Type::Path(type_path) => {
            let segments: Vec<String> = type_path
                .path
                .segments
                .iter()
                .map(|segment| match &segment.arguments {
                    syn::PathArguments::None => segment.ident.to_string(),
                    syn::PathArguments::AngleBracketed(args) => {
                        let inner: Vec<String> = args
                            .args
                            .iter()
                            .filter_map(|arg| {
                                if let syn::GenericArgument::Type(inner_ty) = arg {
                                    Some(type_to_string(inner_ty))
                                } else {
                                    None
                                }
                            })
                            .collect();
                        format!("{}<{}>", segment.ident, inner.join(", "))
                    }
                    _ => segment.ident.to_string(),
                })
                .collect();
            segments.join("::")
        }
        Type::Reference(type_ref) => type_to_string(&type_ref.elem),
        _ => ty.to_token_stream().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SERVICE_SOURCE: &str = r#"
pub struct Ctx;
pub struct GetUserRequest;
pub struct GetUserResponse;

pub trait UserApi {
    async fn get_user(&mut self, ctx: Ctx, request: GetUserRequest) -> Result<GetUserResponse, String>;
    async fn list_users(&mut self, ctx: Ctx, request: proto::ListUsersRequest) -> Result<proto::ListUsersResponse, String>;
}

// Not a service: methods take no request.
pub trait Plain {
    async fn ping(&self) -> Result<(), String>;
}
"#;

    fn parse_fixture(source: &str) -> Vec<ServiceInfo> {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/rpc")).unwrap();
        fs::write(root.join("src/rpc/user_api.rs"), source).unwrap();
        ServiceParser::new().parse_project(root).unwrap()
    }

    #[test]
    fn test_finds_qualifying_traits_only() {
        let services = parse_fixture(SERVICE_SOURCE);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "UserApi");
        assert_eq!(services[0].module.use_path(), "crate::rpc::user_api");
    }

    #[test]
    fn test_methods_in_declaration_order() {
        let services = parse_fixture(SERVICE_SOURCE);
        let names: Vec<&str> = services[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["get_user", "list_users"]);
    }

    #[test]
    fn test_request_is_second_formal_response_is_ok_type() {
        let services = parse_fixture(SERVICE_SOURCE);
        let get_user = &services[0].methods[0];
        assert_eq!(get_user.request_type, "GetUserRequest");
        assert_eq!(get_user.response_type, "GetUserResponse");

        let list_users = &services[0].methods[1];
        assert_eq!(list_users.request_type, "proto::ListUsersRequest");
        assert_eq!(list_users.response_type, "proto::ListUsersResponse");
    }

    #[test]
    fn test_non_async_method_disqualifies_trait() {
        let services = parse_fixture(
            r#"
pub trait Mixed {
    async fn get(&mut self, ctx: Ctx, request: Req) -> Result<Res, String>;
    fn sync_get(&mut self, ctx: Ctx, request: Req) -> Result<Res, String>;
}
"#,
        );
        assert!(services.is_empty());
    }

    #[test]
    fn test_reference_request_type_is_unwrapped() {
        let services = parse_fixture(
            r#"
pub trait Api {
    async fn fetch(&self, ctx: Ctx, request: &FetchRequest) -> Result<FetchResponse, String>;
}
"#,
        );
        assert_eq!(services[0].methods[0].request_type, "FetchRequest");
    }
}
