use anyhow::{Context, Result};
use netreport_core::DEFAULT_OTHERS_THRESHOLD;
use netreport_sdk::{InventoryClient, RetryConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub templates: TemplateConfig,

    #[serde(default)]
    pub charts: ChartConfig,

    #[serde(default)]
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    #[serde(default = "default_snapshot")]
    pub snapshot: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub max_retries: u32,

    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_true")]
    pub pdf: bool,
}

/// Optional file overrides for the embedded templates and stylesheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub mgmt: Option<PathBuf>,

    #[serde(default)]
    pub data: Option<PathBuf>,

    #[serde(default)]
    pub stylesheet: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_others_threshold")]
    pub others_threshold: f64,

    #[serde(default = "default_chart_width")]
    pub width: u32,

    #[serde(default = "default_chart_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default = "default_pdf_command")]
    pub command: String,

    /// Converter arguments; `{html}`, `{pdf}` and `{css}` are substituted
    #[serde(default = "default_pdf_args")]
    pub args: Vec<String>,
}

fn default_snapshot() -> String {
    "$last".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_api_version() -> String {
    "v6.8".to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("export")
}

fn default_true() -> bool {
    true
}

fn default_others_threshold() -> f64 {
    DEFAULT_OTHERS_THRESHOLD
}

fn default_chart_width() -> u32 {
    640
}

fn default_chart_height() -> u32 {
    480
}

fn default_pdf_command() -> String {
    "weasyprint".to_string()
}

fn default_pdf_args() -> Vec<String> {
    ["{html}", "{pdf}", "-s", "{css}"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            snapshot: default_snapshot(),
            timeout_secs: default_timeout_secs(),
            api_version: default_api_version(),
            max_retries: 0,
            accept_invalid_certs: false,
            page_size: default_page_size(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pdf: true,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            others_threshold: default_others_threshold(),
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            command: default_pdf_command(),
            args: default_pdf_args(),
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub snapshot: Option<String>,
    pub timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub no_pdf: bool,
}

impl ReportConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply command-line and environment values over the file values
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.url {
            self.api.url = Some(url);
        }
        if let Some(token) = overrides.token {
            self.api.token = Some(token);
        }
        if let Some(snapshot) = overrides.snapshot {
            self.api.snapshot = snapshot;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.api.timeout_secs = timeout;
        }
        if let Some(dir) = overrides.output_dir {
            self.output.dir = dir;
        }
        if overrides.no_pdf {
            self.output.pdf = false;
        }
    }

    /// Directory chart SVGs are written to
    pub fn chart_dir(&self) -> PathBuf {
        self.output.dir.join("charts")
    }

    /// Build the inventory client
    pub fn client(&self) -> Result<InventoryClient> {
        let url = self
            .api
            .url
            .as_deref()
            .context("Inventory URL missing: set IPF_URL, --url or api.url")?;
        let token = self
            .api
            .token
            .as_deref()
            .context("Inventory token missing: set IPF_TOKEN, --token or api.token")?;

        let retry_config = RetryConfig {
            max_retries: self.api.max_retries,
            ..RetryConfig::default()
        };

        InventoryClient::builder()
            .base_url(url)
            .api_token(token)
            .api_version(self.api.api_version.as_str())
            .snapshot_id(self.api.snapshot.as_str())
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .retry_config(retry_config)
            .accept_invalid_certs(self.api.accept_invalid_certs)
            .page_size(self.api.page_size)
            .build()
            .context("Failed to create inventory client")
    }
}
