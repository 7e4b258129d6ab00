// HTML report templates with {{placeholder}} slots

use anyhow::{bail, Result};
use std::collections::HashMap;

/// A value substituted into a template slot
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    /// Plain text, HTML-escaped on substitution
    Text(String),
    /// Trusted markup built by the report itself, inserted verbatim
    Html(String),
}

impl TemplateValue {
    fn rendered(&self) -> String {
        match self {
            Self::Text(text) => escape_html(text),
            Self::Html(html) => html.clone(),
        }
    }
}

/// Values for the slots of one template
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, TemplateValue>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an escaped text value
    pub fn text(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values
            .insert(name.into(), TemplateValue::Text(value.to_string()));
        self
    }

    /// Insert a trusted HTML fragment
    pub fn html(&mut self, name: impl Into<String>, fragment: impl Into<String>) -> &mut Self {
        self.values
            .insert(name.into(), TemplateValue::Html(fragment.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Template processor for report documents
pub struct TemplateProcessor;

impl TemplateProcessor {
    /// Fill every `{{name}}` slot in `template` from `context`.
    ///
    /// Fails on the first slot without a value, or on an unterminated slot.
    pub fn render(template: &str, context: &TemplateContext) -> Result<String> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            let Some(end) = after_open.find("}}") else {
                bail!("Unterminated placeholder near '{}'", preview(&rest[start..]));
            };

            let name = after_open[..end].trim();
            match context.get(name) {
                Some(value) => output.push_str(&value.rendered()),
                None => bail!("Template placeholder '{}' has no value", name),
            }

            rest = &after_open[end + 2..];
        }

        output.push_str(rest);
        Ok(output)
    }

    /// Names of the placeholders used by a template, sorted and deduplicated
    pub fn extract_parameters(text: &str) -> Vec<String> {
        let mut params = Vec::new();
        let mut chars = text.chars().peekable();
        let mut current_param = String::new();
        let mut in_param = false;

        while let Some(c) = chars.next() {
            if c == '{' && chars.peek() == Some(&'{') {
                chars.next(); // consume second brace
                in_param = true;
                current_param.clear();
            } else if c == '}' && chars.peek() == Some(&'}') && in_param {
                chars.next(); // consume second brace
                if !current_param.trim().is_empty() {
                    params.push(current_param.trim().to_string());
                }
                in_param = false;
                current_param.clear();
            } else if in_param {
                current_param.push(c);
            }
        }

        params.sort();
        params.dedup();
        params
    }

    /// Placeholders of `template` that `context` does not provide
    pub fn missing_parameters(template: &str, context: &TemplateContext) -> Vec<String> {
        Self::extract_parameters(template)
            .into_iter()
            .filter(|name| context.get(name).is_none())
            .collect()
    }
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn preview(text: &str) -> String {
    text.chars().take(24).collect()
}
