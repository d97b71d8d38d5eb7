// src/presentation/http/views.rs
use crate::application::error::ApplicationError;
use minijinja::Environment;
use serde::Serialize;
use std::path::Path;

/// Renders `<name>.html` templates. HTML auto-escaping follows the extension.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Load templates lazily from a directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        Self { env }
    }

    /// Register templates from in-memory sources, keyed by name without the
    /// `.html` suffix.
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, ApplicationError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = Environment::new();
        for (name, source) in sources {
            let name = format!("{}.html", name.into());
            env.add_template_owned(name.clone(), source.into())
                .map_err(|err| ApplicationError::infrastructure(format!("template {name}: {err}")))?;
        }
        Ok(Self { env })
    }

    pub fn render<C: Serialize>(&self, name: &str, ctx: C) -> Result<String, ApplicationError> {
        let file = format!("{name}.html");
        let template = self
            .env
            .get_template(&file)
            .map_err(|err| ApplicationError::infrastructure(format!("template {file}: {err}")))?;
        template
            .render(ctx)
            .map_err(|err| ApplicationError::infrastructure(format!("render {file}: {err}")))
    }
}
