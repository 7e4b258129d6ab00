//! Report section builders.
//!
//! Management-protocol sections pair a ranked distribution table with a pie
//! chart of the same data after small categories are bucketed.

use crate::chart::{ChartOutput, ChartRenderer};
use crate::distribution::{bucket_small_categories, compute_distribution};
use crate::template::escape_html;
use crate::types::{RankedRatios, Record};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Management protocols covered by the management report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolKind {
    Aaa,
    Ntp,
    Syslog,
    SnmpTrap,
    NetFlow,
    SFlow,
    Dns,
}

/// Presentation details of one management protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagementProtocol {
    pub kind: ProtocolKind,
    pub name: &'static str,
    pub description: &'static str,
    pub server_name: &'static str,
    /// Field holding the server address in the protocol's table
    pub field: &'static str,
    pub chart_id: &'static str,
}

pub static MANAGEMENT_PROTOCOLS: [ManagementProtocol; 7] = [
    ManagementProtocol {
        kind: ProtocolKind::Aaa,
        name: "AAA Servers",
        description: "The AAA servers configured on the network devices.",
        server_name: "Authentication server",
        field: "ip",
        chart_id: "aaa",
    },
    ManagementProtocol {
        kind: ProtocolKind::Ntp,
        name: "NTP Sources",
        description: "The NTP sources configured on the network devices.",
        server_name: "NTP source",
        field: "source",
        chart_id: "ntp",
    },
    ManagementProtocol {
        kind: ProtocolKind::Syslog,
        name: "Syslog Servers",
        description: "The logging remote servers configured on the network devices.",
        server_name: "Syslog server",
        field: "host",
        chart_id: "logging",
    },
    ManagementProtocol {
        kind: ProtocolKind::SnmpTrap,
        name: "SNMP Trap Servers",
        description: "The SNMP trap hosts configured on the network devices.",
        server_name: "SNMP trap server",
        field: "dstHost",
        chart_id: "snmp",
    },
    ManagementProtocol {
        kind: ProtocolKind::NetFlow,
        name: "NetFlow Collectors",
        description: "The NetFlow collectors configured on the network devices.",
        server_name: "NetFlow collector",
        field: "collector",
        chart_id: "netflow",
    },
    ManagementProtocol {
        kind: ProtocolKind::SFlow,
        name: "sFlow Collectors",
        description: "The sFlow collectors configured on the network devices.",
        server_name: "sFlow collector",
        field: "collector",
        chart_id: "sflow",
    },
    ManagementProtocol {
        kind: ProtocolKind::Dns,
        name: "DNS Resolvers",
        description: "The DNS resolver servers configured on the network devices.",
        server_name: "DNS resolver",
        field: "ip",
        chart_id: "dns",
    },
];

impl ManagementProtocol {
    pub fn lookup(kind: ProtocolKind) -> &'static ManagementProtocol {
        let index = match kind {
            ProtocolKind::Aaa => 0,
            ProtocolKind::Ntp => 1,
            ProtocolKind::Syslog => 2,
            ProtocolKind::SnmpTrap => 3,
            ProtocolKind::NetFlow => 4,
            ProtocolKind::SFlow => 5,
            ProtocolKind::Dns => 6,
        };
        &MANAGEMENT_PROTOCOLS[index]
    }
}

/// One rendered management-protocol section
#[derive(Debug, Clone)]
pub struct ProtocolSection {
    pub protocol: ManagementProtocol,
    pub record_count: usize,
    pub servers: RankedRatios,
    pub chart: ChartOutput,
}

/// Build a section from the protocol's table rows.
///
/// An empty table yields an empty section with no chart instead of the
/// division error the aggregator raises for zero records.
pub fn build_protocol_section(
    protocol: &ManagementProtocol,
    records: &[Record],
    renderer: &dyn ChartRenderer,
    threshold: f64,
) -> anyhow::Result<ProtocolSection> {
    if records.is_empty() {
        warn!(protocol = protocol.name, "No records, section left empty");
        return Ok(ProtocolSection {
            protocol: *protocol,
            record_count: 0,
            servers: RankedRatios::default(),
            chart: ChartOutput::NoData,
        });
    }

    let servers = compute_distribution(records, protocol.field)?;
    let bucketed = bucket_small_categories(&servers, threshold);
    let chart = renderer.render(&bucketed, protocol.chart_id)?;

    info!(
        protocol = protocol.name,
        records = records.len(),
        servers = servers.len(),
        "Protocol section built"
    );

    Ok(ProtocolSection {
        protocol: *protocol,
        record_count: records.len(),
        servers,
        chart,
    })
}

/// HTML for a list of protocol sections
pub fn protocol_sections_html(sections: &[ProtocolSection]) -> String {
    let mut html = String::new();

    for section in sections {
        let protocol = &section.protocol;
        html.push_str(&format!(
            "<section class=\"protocol\" id=\"{}\">\n<h2>{}</h2>\n<p>{}</p>\n",
            protocol.chart_id,
            escape_html(protocol.name),
            escape_html(protocol.description)
        ));

        if section.servers.is_empty() {
            html.push_str("<p class=\"no-data\">No data</p>\n</section>\n");
            continue;
        }

        html.push_str(&format!(
            "<table>\n<thead><tr><th>{}</th><th>Devices (%)</th></tr></thead>\n<tbody>\n",
            escape_html(protocol.server_name)
        ));
        for entry in &section.servers {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.2}</td></tr>\n",
                escape_html(&entry.label()),
                entry.ratio
            ));
        }
        html.push_str("</tbody>\n</table>\n");

        if let Some(uri) = section.chart.data_uri() {
            html.push_str(&format!(
                "<figure><img src=\"{}\" alt=\"{} distribution\"/></figure>\n",
                uri,
                escape_html(protocol.name)
            ));
        }

        html.push_str("</section>\n");
    }

    html
}
