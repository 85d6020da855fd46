use crate::error::{Error, Result};
use serde::Serialize;
use tera::{Context, Tera};

/// Provenance stamp rendered into every full-file header.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorStamp {
    pub name: String,
    pub version: String,
    pub timestamp: String,
}

impl GeneratorStamp {
    pub fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Default for GeneratorStamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the template engine with every artifact template registered from
/// its embedded source.
pub fn create_template_engine() -> Result<Tera> {
    let mut tera = Tera::default();

    macro_rules! template {
        ($name:expr, $path:expr) => {
            tera.add_raw_template($name, include_str!($path))
                .map_err(|e| Error::Template {
                    name: $name.to_string(),
                    source: e,
                })?;
        };
    }

    template!("header.tera", "templates/header.tera");
    template!("init_client_full.rs.tera", "templates/init_client_full.rs.tera");
    template!("init_client.rs.tera", "templates/init_client.rs.tera");
    template!(
        "handler_test_full.rs.tera",
        "templates/handler_test_full.rs.tera"
    );
    template!("run_tests.sh.tera", "templates/run_tests.sh.tera");

    Ok(tera)
}

/// Render a registered template against the given context.
pub fn render(tera: &Tera, template_name: &str, context: &Context) -> Result<String> {
    tera.render(template_name, context)
        .map_err(|e| Error::Template {
            name: template_name.to_string(),
            source: e,
        })
}
