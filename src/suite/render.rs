use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};

use crate::error::{RenderError, error_chain};

use super::types::{DEFAULT_METHOD, Request};

/// Name the whole render context is bound to, next to its top-level keys.
pub const CONTEXT_SCOPE: &str = "ctx";

/// Renders `template` against `context`.
///
/// A string without template syntax is returned unchanged, so static fields
/// never pay for a template parse.
///
/// # Errors
///
/// Returns an error if the template is malformed, references an undefined
/// variable, or the context cannot be serialized.
pub fn render<C>(name: &str, template: &str, context: &C) -> Result<String, RenderError>
where
    C: Serialize + ?Sized,
{
    if !has_template_syntax(template) {
        return Ok(template.to_owned());
    }
    let context = template_context(context)?;
    Tera::one_off(template, &context, false).map_err(|err| RenderError::Template {
        field: name.to_owned(),
        template: template.to_owned(),
        message: error_chain(&err),
    })
}

fn has_template_syntax(template: &str) -> bool {
    template.contains("{{") || template.contains("{%") || template.contains("{#")
}

fn template_context<C>(context: &C) -> Result<Context, RenderError>
where
    C: Serialize + ?Sized,
{
    let value = serde_json::to_value(context).map_err(|err| RenderError::Context {
        message: err.to_string(),
    })?;
    let mut tera_context = match &value {
        Value::Null => return Ok(Context::new()),
        Value::Object(_) => {
            Context::from_value(value.clone()).map_err(|err| RenderError::Context {
                message: error_chain(&err),
            })?
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => Context::new(),
    };
    if !tera_context.contains_key(CONTEXT_SCOPE) {
        tera_context.insert(CONTEXT_SCOPE, &value);
    }
    Ok(tera_context)
}

impl Request {
    /// Resolves every templated field in place.
    ///
    /// Fields are rendered in a fixed order (API, headers, body, form) and the
    /// first failure short-circuits the rest. A `bodyFromFile` replaces the
    /// body before the body is rendered, so file content is template-expanded
    /// too.
    ///
    /// # Errors
    ///
    /// Returns an error when a field fails to render or the body file cannot
    /// be read.
    pub fn render<C>(&mut self, context: &C) -> Result<(), RenderError>
    where
        C: Serialize + ?Sized,
    {
        self.api = render("api", &self.api, context)?;

        if !self.body_from_file.is_empty() {
            let data = std::fs::read_to_string(&self.body_from_file).map_err(|err| {
                RenderError::ReadBodyFile {
                    path: PathBuf::from(&self.body_from_file),
                    source: err,
                }
            })?;
            data.trim().clone_into(&mut self.body);
        }

        for value in self.header.values_mut() {
            *value = render("header", value, context)?;
        }

        self.body = render("body", &self.body, context)?;

        for value in self.form.values_mut() {
            *value = render("form", value, context)?;
        }

        if self.method.trim().is_empty() {
            DEFAULT_METHOD.clone_into(&mut self.method);
        }
        Ok(())
    }
}
