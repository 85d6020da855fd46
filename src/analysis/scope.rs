use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Index of the top-level identifiers declared across a module directory.
///
/// This backs the duplicate-symbol check before any append: an identifier
/// already present in the destination must not be generated again.
/// `*_test.rs` files are excluded — generated skeletons sit outside the
/// module tree, so their declarations are not part of the scope, which keeps
/// skeleton idempotence at the file level rather than the symbol level.
#[derive(Debug, Default)]
pub struct ScopeIndex {
    symbols: HashSet<String>,
}

impl ScopeIndex {
    /// Build the index for one module directory (non-recursive).
    ///
    /// Files that fail to parse contribute no symbols; they cannot declare
    /// anything the compiler would accept either.
    pub fn scan_dir(dir: &Path) -> Result<Self> {
        let mut symbols = HashSet::new();

        let entries = fs::read_dir(dir).map_err(|e| Error::io("read", dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read", dir, e))?;
            let path = entry.path();
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

            let content = fs::read_to_string(&path).map_err(|e| Error::io("read", &path, e))?;
            let Ok(ast) = syn::parse_file(&content) else {
                continue;
            };
            for item in &ast.items {
                if let Some(ident) = declared_ident(item) {
                    symbols.insert(ident);
                }
            }
        }

        Ok(ScopeIndex { symbols })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The identifier a top-level item declares, if any. Imports are file-scoped
/// and deliberately not indexed.
fn declared_ident(item: &syn::Item) -> Option<String> {
    use syn::Item;
    let ident = match item {
        Item::Fn(i) => &i.sig.ident,
        Item::Struct(i) => &i.ident,
        Item::Enum(i) => &i.ident,
        Item::Trait(i) => &i.ident,
        Item::TraitAlias(i) => &i.ident,
        Item::Type(i) => &i.ident,
        Item::Const(i) => &i.ident,
        Item::Static(i) => &i.ident,
        Item::Union(i) => &i.ident,
        Item::Mod(i) => &i.ident,
        Item::Macro(i) => i.ident.as_ref()?,
        _ => return None,
    };
    Some(ident.to_string())
}
