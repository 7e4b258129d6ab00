//! Management protocols report.

use super::{render_template, report_stem, write_report, ReportOutput, DISPLAY_TIMESTAMP_FORMAT};
use crate::assets::{self, MGMT_TEMPLATE};
use crate::config::ReportConfig;
use crate::data_source::{DataSource, ManagementData};
use crate::pdf::PdfRenderer;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use netreport_core::chart::{ChartRenderer, SvgPieRenderer};
use netreport_core::report::{build_protocol_section, protocol_sections_html, ProtocolSection};
use netreport_core::template::TemplateContext;
use netreport_sdk::InventoryClient;
use tracing::info;

pub const FILE_PREFIX: &str = "MGMT-Report";

/// Build one section per management protocol.
pub fn build_sections(
    data: &ManagementData,
    renderer: &dyn ChartRenderer,
    threshold: f64,
) -> Result<Vec<ProtocolSection>> {
    data.tables
        .iter()
        .map(|(protocol, rows)| {
            build_protocol_section(protocol, rows, renderer, threshold)
                .with_context(|| format!("Failed to build section '{}'", protocol.name))
        })
        .collect()
}

pub fn build_context(
    data: &ManagementData,
    sections: &[ProtocolSection],
    threshold: f64,
    now: &DateTime<Local>,
) -> TemplateContext {
    let instance = &data.instance;
    let mut context = TemplateContext::new();
    context
        .text("formatted_time", now.format(DISPLAY_TIMESTAMP_FORMAT))
        .text("system_url", &instance.system_url)
        .text("os_version", &instance.os_version)
        .text("snapshot_name", instance.snapshot.display_name())
        .text("snapshot_id", &instance.snapshot.id)
        .text("network_sites", data.sites)
        .text("network_devices", data.devices)
        .text("others_threshold", threshold)
        .html("mgmt_protocols", protocol_sections_html(sections));
    context
}

/// Render the management report into HTML without touching the network.
pub fn render_html(
    config: &ReportConfig,
    data: &ManagementData,
    renderer: &dyn ChartRenderer,
    now: &DateTime<Local>,
) -> Result<String> {
    let threshold = config.charts.others_threshold;
    let sections = build_sections(data, renderer, threshold)?;
    let context = build_context(data, &sections, threshold, now);

    let template = assets::load_template(MGMT_TEMPLATE, config.templates.mgmt.as_deref())?;
    render_template(&template, &context, "management")
}

pub async fn run(
    config: &ReportConfig,
    client: &InventoryClient,
    pdf_renderer: Option<&dyn PdfRenderer>,
) -> Result<ReportOutput> {
    info!("Generating management protocols report");
    let data = DataSource::new(client).management().await?;

    let renderer = SvgPieRenderer::new(config.chart_dir())
        .with_size(config.charts.width, config.charts.height);
    let now = Local::now();
    let html = render_html(config, &data, &renderer, &now)?;

    let output = write_report(config, &report_stem(FILE_PREFIX, &now), &html, pdf_renderer).await?;
    info!(html = %output.html.display(), "Management report written");
    Ok(output)
}
