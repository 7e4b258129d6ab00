//! Report generation: template rendering, output files and PDF conversion.

pub mod data;
pub mod mgmt;

use crate::assets;
use crate::config::ReportConfig;
use crate::pdf::PdfRenderer;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use netreport_core::template::{TemplateContext, TemplateProcessor};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Timestamp format used in report file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Timestamp format shown inside reports
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Files written for one report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    pub html: PathBuf,
    pub pdf: Option<PathBuf>,
}

/// `<prefix>-<timestamp>` without extension
pub fn report_stem(prefix: &str, now: &DateTime<Local>) -> String {
    format!("{}-{}", prefix, now.format(FILE_TIMESTAMP_FORMAT))
}

/// Log whether `path` was created; returns whether it exists.
pub fn check_file_exists(path: &Path) -> bool {
    if path.exists() {
        info!(path = %path.display(), "File created successfully");
        true
    } else {
        error!(path = %path.display(), "File creation failed");
        false
    }
}

/// Fill a report template, naming every slot the context leaves empty.
pub fn render_template(template: &str, context: &TemplateContext, report: &str) -> Result<String> {
    let missing = TemplateProcessor::missing_parameters(template, context);
    if !missing.is_empty() {
        bail!("{} template has unfilled slots: {}", report, missing.join(", "));
    }
    TemplateProcessor::render(template, context).with_context(|| format!("Failed to render {} report", report))
}

/// Write the rendered HTML and, when a converter is given, the PDF next to it.
pub async fn write_report(
    config: &ReportConfig,
    stem: &str,
    html: &str,
    pdf_renderer: Option<&dyn PdfRenderer>,
) -> Result<ReportOutput> {
    let output_dir = &config.output.dir;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let html_path = output_dir.join(format!("{}.html", stem));
    std::fs::write(&html_path, html)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;
    check_file_exists(&html_path);

    let pdf_path = match pdf_renderer {
        Some(renderer) => {
            let stylesheet =
                assets::stylesheet_path(config.templates.stylesheet.as_deref(), output_dir)?;
            let pdf_path = output_dir.join(format!("{}.pdf", stem));
            renderer.render(&html_path, &pdf_path, &stylesheet).await?;
            check_file_exists(&pdf_path);
            Some(pdf_path)
        }
        None => None,
    };

    Ok(ReportOutput {
        html: html_path,
        pdf: pdf_path,
    })
}
