//! Network data report for one or more sites.

use super::{render_template, report_stem, write_report, ReportOutput, DISPLAY_TIMESTAMP_FORMAT};
use crate::assets::{self, DATA_TEMPLATE};
use crate::config::ReportConfig;
use crate::data_source::{group_keys, DataSource, MetricGroup, NetworkData, RouteProtocolShare};
use crate::pdf::PdfRenderer;
use anyhow::{bail, Result};
use chrono::{DateTime, Local};
use netreport_core::template::{escape_html, TemplateContext};
use netreport_sdk::InventoryClient;
use tracing::info;

pub const FILE_PREFIX: &str = "IPF-Report";

/// Split a comma-separated site list, trimming each name.
pub fn parse_sites(input: &str) -> Result<Vec<String>> {
    let mut sites = Vec::new();
    for raw in input.split(',') {
        let site = raw.trim();
        if site.is_empty() {
            bail!("Empty site name in '{}'", input);
        }
        sites.push(site.to_string());
    }
    Ok(sites)
}

fn route_protocol_rows(shares: &[RouteProtocolShare]) -> String {
    if shares.is_empty() {
        return "<tr><td colspan=\"3\" class=\"no-data\">No routes</td></tr>\n".to_string();
    }

    shares
        .iter()
        .map(|share| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
                escape_html(&share.protocol.label()),
                share.protocol.count,
                share.share
            )
        })
        .collect()
}

pub fn build_context(data: &NetworkData, now: &DateTime<Local>) -> TemplateContext {
    let instance = &data.instance;
    let mut context = TemplateContext::new();
    context
        .text("site", data.sites.join(", "))
        .text("formatted_time", now.format(DISPLAY_TIMESTAMP_FORMAT))
        .text("system_url", &instance.system_url)
        .text("os_version", &instance.os_version)
        .text("snapshot_id", &instance.snapshot.id)
        .text("snapshot_name", instance.snapshot.display_name());

    match &data.compare {
        Some(other) => {
            context
                .text(
                    "compare_snapshot",
                    format!("{} ({})", other.display_name(), other.id),
                )
                .html("comparison_headers", "<th>Previous</th><th>Delta</th>");
        }
        None => {
            context
                .text("compare_snapshot", "none")
                .html("comparison_headers", "");
        }
    }

    for group in MetricGroup::ALL {
        context.html(
            group.placeholder(),
            data.summary.to_html_rows(&group_keys(group)),
        );
    }

    context.html("route_protocol_rows", route_protocol_rows(&data.route_protocols));
    context
}

/// Render the data report into HTML without touching the network.
pub fn render_html(config: &ReportConfig, data: &NetworkData, now: &DateTime<Local>) -> Result<String> {
    let context = build_context(data, now);
    let template = assets::load_template(DATA_TEMPLATE, config.templates.data.as_deref())?;
    render_template(&template, &context, "data")
}

pub async fn run(
    config: &ReportConfig,
    client: &InventoryClient,
    sites: &[String],
    compare: Option<&str>,
    pdf_renderer: Option<&dyn PdfRenderer>,
) -> Result<ReportOutput> {
    info!(sites = %sites.join(","), ?compare, "Generating network data report");
    let data = DataSource::new(client).network(sites, compare).await?;

    let now = Local::now();
    let html = render_html(config, &data, &now)?;

    let output = write_report(config, &report_stem(FILE_PREFIX, &now), &html, pdf_renderer).await?;
    info!(html = %output.html.display(), "Data report written");
    Ok(output)
}
