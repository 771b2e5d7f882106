//! Page templates, compiled once at startup.

use minijinja::Environment;
use oncolens_common::error::{OncoLensError, Result};
use serde::Serialize;

pub const MAIN_CSS: &str = include_str!("../static/main.css");

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html",      include_str!("../templates/base.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("predict.html",   include_str!("../templates/predict.html")),
    ("batch.html",     include_str!("../templates/batch.html")),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| OncoLensError::Template(format!("{name}: {e}")))?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let tmpl = self
            .env
            .get_template(name)
            .map_err(|e| OncoLensError::Template(e.to_string()))?;
        tmpl.render(ctx)
            .map_err(|e| OncoLensError::Template(format!("{name}: {e}")))
    }
}
