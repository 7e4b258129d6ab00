//! HTML to PDF conversion through an external converter program.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Converts a rendered HTML report to PDF
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &Path, pdf: &Path, stylesheet: &Path) -> Result<()>;
}

/// Runs a converter program such as `weasyprint`
#[derive(Debug, Clone)]
pub struct CommandPdfRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandPdfRenderer {
    /// `args` may contain `{html}`, `{pdf}` and `{css}` placeholders
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn expand_args(&self, html: &Path, pdf: &Path, stylesheet: &Path) -> Vec<String> {
        let html = html.display().to_string();
        let pdf = pdf.display().to_string();
        let css = stylesheet.display().to_string();

        self.args
            .iter()
            .map(|arg| {
                arg.replace("{html}", &html)
                    .replace("{pdf}", &pdf)
                    .replace("{css}", &css)
            })
            .collect()
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render(&self, html: &Path, pdf: &Path, stylesheet: &Path) -> Result<()> {
        let args = self.expand_args(html, pdf, stylesheet);
        debug!(program = %self.program, ?args, "Running PDF converter");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .with_context(|| format!("Failed to run PDF converter '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "PDF converter '{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        info!(pdf = %pdf.display(), "PDF rendered");
        Ok(())
    }
}
