use crate::error::{Error, Result};
use crate::models::{BindingInfo, ModuleId};
use std::fs;
use std::path::Path;
use syn::Type;

/// Parser for target bindings: the top-level `static` and `const` items of
/// the module that generation writes into. The binding's declared type is
/// what ties it back to a service trait.
#[derive(Debug, Default)]
pub struct BindingParser;

impl BindingParser {
    pub fn new() -> Self {
        Self
    }

    /// Collect the bindings declared across a module directory
    /// (non-recursive). `*_test.rs` files are skipped for the same reason the
    /// scope index skips them.
    pub fn parse_dir(&self, project_root: &Path, dir: &Path) -> Result<Vec<BindingInfo>> {
        let mut bindings = Vec::new();

        let entries = fs::read_dir(dir).map_err(|e| Error::io("read", dir, e))?;
        let mut paths: Vec<_> = entries
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::io("read", dir, e))?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        paths.sort();

        for path in paths {
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "rs") {
                continue;
            }
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if file_name.ends_with("_test.rs") {
                continue;
            }
            bindings.extend(self.parse_file(project_root, &path)?);
        }

        Ok(bindings)
    }

    fn parse_file(&self, project_root: &Path, file_path: &Path) -> Result<Vec<BindingInfo>> {
        let content = fs::read_to_string(file_path).map_err(|e| Error::io("read", file_path, e))?;
        let Ok(ast) = syn::parse_file(&content) else {
            // A file the compiler would reject declares no bindings.
            return Ok(Vec::new());
        };

        let rel = file_path.strip_prefix(project_root).unwrap_or(file_path);
        let module = ModuleId::from_source_file(project_root, file_path);

        let bindings = ast
            .items
            .iter()
            .filter_map(|item| {
                let (ident, ty) = match item {
                    syn::Item::Static(item_static) => (&item_static.ident, &*item_static.ty),
                    syn::Item::Const(item_const) => (&item_const.ident, &*item_const.ty),
                    _ => return None,
                };
                let mut type_names = Vec::new();
                collect_type_idents(ty, &mut type_names);
                Some(BindingInfo {
                    name: ident.to_string(),
                    module: module.clone(),
                    file_path: rel.to_string_lossy().to_string(),
                    line_number: ident.span().start().line,
                    type_names,
                })
            })
            .collect();

        Ok(bindings)
    }
}

/// Final path segments of every type named inside a type expression, in
/// source order: `OnceLock<Box<dyn UserApi>>` yields
/// `["OnceLock", "Box", "UserApi"]`.
fn collect_type_idents(ty: &Type, out: &mut Vec<String>) {
    match ty {
        Type::Path(type_path) => {
            if let Some(segment) = type_path.path.segments.last() {
                out.push(segment.ident.to_string());
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner) = arg {
                            collect_type_idents(inner, out);
                        }
                    }
                }
            }
        }
        Type::Reference(r) => collect_type_idents(&r.elem, out),
        Type::Paren(p) => collect_type_idents(&p.elem, out),
        Type::Group(g) => collect_type_idents(&g.elem, out),
        Type::Slice(s) => collect_type_idents(&s.elem, out),
        Type::Array(a) => collect_type_idents(&a.elem, out),
        Type::Tuple(t) => {
            for elem in &t.elems {
                collect_type_idents(elem, out);
            }
        }
        Type::TraitObject(obj) => {
            for bound in &obj.bounds {
                if let syn::TypeParamBound::Trait(trait_bound) = bound {
                    if let Some(segment) = trait_bound.path.segments.last() {
                        out.push(segment.ident.to_string());
                        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                            for arg in &args.args {
                                if let syn::GenericArgument::Type(inner) = arg {
                                    collect_type_idents(inner, out);
                                }
                            }
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_finds_statics_and_consts_with_type_names() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/app")).unwrap();
        fs::write(
            root.join("src/app/state.rs"),
            r#"
pub static USER_API: OnceLock<UserApiClient> = OnceLock::new();
pub const RETRIES: u32 = 3;
fn helper() {}
"#,
        )
        .unwrap();

        let bindings = BindingParser::new()
            .parse_dir(root, &root.join("src/app"))
            .unwrap();
        assert_eq!(bindings.len(), 2);

        let api = &bindings[0];
        assert_eq!(api.name, "USER_API");
        assert_eq!(api.type_names, vec!["OnceLock", "UserApiClient"]);
        assert_eq!(api.module.use_path(), "crate::app::state");
        assert_eq!(api.scope_id(), "crate::app::state::USER_API");

        assert_eq!(bindings[1].name, "RETRIES");
    }

    #[test]
    fn test_trait_object_binding() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(
            root.join("state.rs"),
            "pub static API: OnceLock<Box<dyn rpc::UserApi>> = OnceLock::new();\n",
        )
        .unwrap();

        let bindings = BindingParser::new().parse_dir(root, root).unwrap();
        assert_eq!(
            bindings[0].type_names,
            vec!["OnceLock", "Box", "UserApi"]
        );
    }

    #[test]
    fn test_skips_generated_test_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("state.rs"), "pub static A: U = U;\n").unwrap();
        fs::write(
            root.join("user_api_get_user_test.rs"),
            "pub static B: U = U;\n",
        )
        .unwrap();

        let bindings = BindingParser::new().parse_dir(root, root).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].name, "A");
    }
}
