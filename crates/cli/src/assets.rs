use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct ReportAssets;

pub const MGMT_TEMPLATE: &str = "mgmt_template.html";
pub const DATA_TEMPLATE: &str = "data_template.html";
pub const STYLESHEET: &str = "style.css";

fn embedded(name: &str) -> Result<String> {
    let file = ReportAssets::get(name).with_context(|| format!("Missing embedded asset '{}'", name))?;
    String::from_utf8(file.data.into_owned())
        .with_context(|| format!("Embedded asset '{}' is not UTF-8", name))
}

/// Template text, from `override_path` when given, otherwise the embedded default
pub fn load_template(name: &str, override_path: Option<&Path>) -> Result<String> {
    match override_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display())),
        None => embedded(name),
    }
}

/// Stylesheet path for the PDF converter.
///
/// Without an override the embedded stylesheet is written to `output_dir`.
pub fn stylesheet_path(override_path: Option<&Path>, output_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = override_path {
        if !path.exists() {
            anyhow::bail!("Stylesheet {} does not exist", path.display());
        }
        return Ok(path.to_path_buf());
    }

    let path = output_dir.join(STYLESHEET);
    std::fs::write(&path, embedded(STYLESHEET)?)
        .with_context(|| format!("Failed to write stylesheet {}", path.display()))?;
    Ok(path)
}
