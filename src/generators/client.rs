use crate::error::{Error, Result};
use crate::generators::emitter::{Emission, Emitter};
use crate::generators::templates::{render, GeneratorStamp};
use crate::generators::{ArtifactOutcome, HandlerGenerator};
use crate::interface::output::Logger;
use crate::models::{MethodView, ServiceTarget};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tera::{Context, Tera};

/// Fixed, well-known file that accumulates the client initializers of a
/// module; safe to append to across runs.
pub const CLIENTS_FILE: &str = "clients.rs";

/// Helper script running the generated skeletons; never appended to.
pub const RUN_TESTS_FILE: &str = "run_tests.sh";

/// Serializable view of one method, as the templates see it.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct MethodContext {
    name: String,
    request_type: String,
    request_type_stripped: String,
    response_type: String,
    response_type_stripped: String,
    test_fn_name: String,
    test_file_name: String,
    test_module: String,
}

impl MethodContext {
    pub(crate) fn new(method: &MethodView<'_>) -> Self {
        let test_file_name = method.test_file_name();
        let test_module = test_file_name.trim_end_matches(".rs").to_string();
        Self {
            name: method.name().to_string(),
            request_type: method.request_type().to_string(),
            request_type_stripped: method.request_type_stripped().to_string(),
            response_type: method.response_type().to_string(),
            response_type_stripped: method.response_type_stripped().to_string(),
            test_fn_name: method.test_fn_name(),
            test_file_name,
            test_module,
        }
    }
}

/// Generates the per-binding artifacts: the initializer in [`CLIENTS_FILE`]
/// and the [`RUN_TESTS_FILE`] helper. Per-method test skeletons hang off
/// [`ClientGenerator::handler`].
///
/// One generator per target: it owns the target's emitter (and with it the
/// destination scope index), so independent targets share no mutable state.
pub struct ClientGenerator<'a> {
    target: &'a ServiceTarget,
    emitter: Emitter,
    tera: &'a Tera,
    logger: &'a Logger,
}

impl<'a> ClientGenerator<'a> {
    pub fn new(
        target: &'a ServiceTarget,
        dest_dir: &Path,
        tera: &'a Tera,
        logger: &'a Logger,
    ) -> Result<Self> {
        Ok(Self {
            target,
            emitter: Emitter::new(dest_dir)?,
            tera,
            logger,
        })
    }

    pub fn target(&self) -> &ServiceTarget {
        self.target
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub(crate) fn logger(&self) -> &Logger {
        self.logger
    }

    pub(crate) fn tera(&self) -> &Tera {
        self.tera
    }

    /// The handler generator for the i-th method of the target's service.
    pub fn handler(&self, index: usize) -> Option<HandlerGenerator<'_>> {
        self.target
            .method_at(index)
            .map(|method| HandlerGenerator::new(self, method))
    }

    /// Handler generators for every explicit method, in declaration order.
    pub fn handlers(&self) -> impl Iterator<Item = HandlerGenerator<'_>> {
        self.target
            .methods()
            .map(move |method| HandlerGenerator::new(self, method))
    }

    /// Template context shared by every artifact of this target.
    pub(crate) fn base_context(&self) -> Context {
        let methods: Vec<MethodContext> =
            self.target.methods().map(|m| MethodContext::new(&m)).collect();

        let mut ctx = Context::new();
        ctx.insert("generator", &GeneratorStamp::new());
        ctx.insert("binding_name", self.target.binding_name());
        ctx.insert("binding_id", &self.target.binding.scope_id());
        ctx.insert("type_name", &self.target.type_name());
        ctx.insert("type_name_stripped", self.target.type_name_stripped());
        ctx.insert("client_type", &self.target.client_type_name());
        ctx.insert("init_fn_name", &self.target.init_fn_name());
        ctx.insert("var_module_name", self.target.var_module_name());
        ctx.insert("var_module_path", self.target.var_module_path());
        ctx.insert("service_module_name", self.target.service_module_name());
        ctx.insert("service_module_path", self.target.service_module_path());
        ctx.insert("service_use_path", &self.target.service.module.use_path());
        ctx.insert("methods", &methods);
        ctx
    }

    /// Generate the initializer for this target into [`CLIENTS_FILE`],
    /// creating the file or appending to it as needed.
    pub fn generate_clients_file(&self) -> Result<ArtifactOutcome> {
        let emission = self.emitter.plan(CLIENTS_FILE, false)?;

        // The file may exist while the function does not (partial generation,
        // hand-edited file); only the symbol decides whether to write.
        let init_fn = self.target.init_fn_name();
        if self.emitter.symbol_exists(&init_fn) {
            self.logger.info(&format!(
                "`{}` already exists in {}. Skipping.",
                init_fn,
                self.emitter.dir().display()
            ));
            return Ok(ArtifactOutcome::SkippedExistingSymbol { name: init_fn });
        }

        let template = if emission.is_append() {
            "init_client.rs.tera"
        } else {
            "init_client_full.rs.tera"
        };
        let rendered = render(self.tera, template, &self.base_context())?;
        self.write(emission, &rendered, CLIENTS_FILE)
    }

    /// Generate [`RUN_TESTS_FILE`]; skipped wholesale if it already exists.
    pub fn generate_run_tests_file(&self) -> Result<ArtifactOutcome> {
        let emission = match self.emitter.plan(RUN_TESTS_FILE, true) {
            Ok(emission) => emission,
            Err(Error::AlreadyExists { path }) => {
                self.logger.info(&format!(
                    "{} already exists. Skipping.",
                    path.display()
                ));
                return Ok(ArtifactOutcome::SkippedExistingFile { path });
            }
            Err(err) => return Err(err),
        };

        let rendered = render(self.tera, "run_tests.sh.tera", &self.base_context())?;
        let outcome = self.write(emission, &rendered, RUN_TESTS_FILE)?;
        mark_executable(&self.emitter.dir().join(RUN_TESTS_FILE))?;
        Ok(outcome)
    }

    /// Append the rendered text to the planned file. The handle is released
    /// on every exit path, write error included.
    pub(crate) fn write(
        &self,
        emission: Emission,
        text: &str,
        file_name: &str,
    ) -> Result<ArtifactOutcome> {
        let path = self.emitter.dir().join(file_name);
        let mut file = emission.into_file();
        file.write_all(text.as_bytes())
            .map_err(|e| Error::io("write", &path, e))?;
        Ok(ArtifactOutcome::Written { path })
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(|e| Error::io("stat", path, e))?;
    let mut perms = metadata.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms).map_err(|e| Error::io("chmod", path, e))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
