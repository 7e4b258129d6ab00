//! Fetches everything a report needs from the inventory before rendering.

use anyhow::{Context, Result};
use netreport_core::distribution::{category_counts, round2};
use netreport_core::report::{ManagementProtocol, MANAGEMENT_PROTOCOLS};
use netreport_core::summary::SnapshotSummary;
use netreport_core::{CategoryCount, Record};
use netreport_sdk::{Filters, InventoryClient, SnapshotInfo, Table, TableQuery};
use tracing::{info, warn};

/// Section of the data report a count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricGroup {
    Summary,
    Interfaces,
    Addressing,
    Switching,
    Routing,
    Wireless,
}

impl MetricGroup {
    pub const ALL: [MetricGroup; 6] = [
        Self::Summary,
        Self::Interfaces,
        Self::Addressing,
        Self::Switching,
        Self::Routing,
        Self::Wireless,
    ];

    /// Template slot holding this group's rows
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Summary => "summary_rows",
            Self::Interfaces => "interfaces_rows",
            Self::Addressing => "addressing_rows",
            Self::Switching => "switching_rows",
            Self::Routing => "routing_rows",
            Self::Wireless => "wireless_rows",
        }
    }
}

/// One count shown in the data report
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub key: &'static str,
    pub label: &'static str,
    pub table: Table,
    pub group: MetricGroup,
}

const fn metric(key: &'static str, label: &'static str, table: Table, group: MetricGroup) -> MetricDef {
    MetricDef {
        key,
        label,
        table,
        group,
    }
}

pub static NETWORK_METRICS: [MetricDef; 28] = [
    metric("devices", "Devices", Table::Devices, MetricGroup::Summary),
    metric("hosts", "Hosts", Table::Hosts, MetricGroup::Summary),
    metric("interfaces", "Interfaces", Table::Interfaces, MetricGroup::Summary),
    metric("switchports", "Switchports", Table::Switchports, MetricGroup::Interfaces),
    metric("port_channels", "Port-channel members", Table::PortChannels, MetricGroup::Interfaces),
    metric("tunnels_ipv4", "IPv4 tunnels", Table::TunnelsIpv4, MetricGroup::Interfaces),
    metric("tunnels_ipv6", "IPv6 tunnels", Table::TunnelsIpv6, MetricGroup::Interfaces),
    metric("ipsec_gateways", "IPsec gateways", Table::IpsecGateways, MetricGroup::Interfaces),
    metric("ipsec_tunnels", "IPsec tunnels", Table::IpsecTunnels, MetricGroup::Interfaces),
    metric("duplex", "Interface duplex entries", Table::InterfaceDuplex, MetricGroup::Interfaces),
    metric("managed_networks", "Managed networks", Table::ManagedNetworks, MetricGroup::Addressing),
    metric("managed_ipv4", "IPv4 interfaces", Table::ManagedIpv4, MetricGroup::Addressing),
    metric("managed_ipv6", "IPv6 interfaces", Table::ManagedIpv6, MetricGroup::Addressing),
    metric("arp", "ARP entries", Table::Arp, MetricGroup::Addressing),
    metric("mac", "MAC entries", Table::Mac, MetricGroup::Addressing),
    metric("stp_bridges", "STP bridges", Table::StpBridges, MetricGroup::Switching),
    metric("stp_instances", "STP instances", Table::StpInstances, MetricGroup::Switching),
    metric("stp_neighbors", "STP neighbors", Table::StpNeighbors, MetricGroup::Switching),
    metric("stp_ports", "STP virtual ports", Table::StpVirtualPorts, MetricGroup::Switching),
    metric("stp_vlans", "STP VLANs", Table::StpVlans, MetricGroup::Switching),
    metric("vlans", "VLANs", Table::Vlans, MetricGroup::Switching),
    metric("routes_ipv4", "IPv4 routes", Table::RoutesIpv4, MetricGroup::Routing),
    metric("routes_ipv6", "IPv6 routes", Table::RoutesIpv6, MetricGroup::Routing),
    metric("multicast_routes", "Multicast routes", Table::MulticastRoutes, MetricGroup::Routing),
    metric("wireless_controllers", "Wireless controllers", Table::WirelessControllers, MetricGroup::Wireless),
    metric("wireless_aps", "Access points", Table::WirelessAccessPoints, MetricGroup::Wireless),
    metric("wireless_radios", "Radios", Table::WirelessRadios, MetricGroup::Wireless),
    metric("wireless_clients", "Wireless clients", Table::WirelessClients, MetricGroup::Wireless),
];

/// Keys of the metrics in `group`, in catalogue order
pub fn group_keys(group: MetricGroup) -> Vec<&'static str> {
    NETWORK_METRICS
        .iter()
        .filter(|m| m.group == group)
        .map(|m| m.key)
        .collect()
}

/// Instance and snapshot the report describes
#[derive(Debug, Clone)]
pub struct InstanceInfo {
    pub system_url: String,
    pub os_version: String,
    pub snapshot: SnapshotInfo,
}

#[derive(Debug, Clone)]
pub struct ManagementData {
    pub instance: InstanceInfo,
    pub sites: u64,
    pub devices: u64,
    /// Rows of each management table, in catalogue order
    pub tables: Vec<(&'static ManagementProtocol, Vec<Record>)>,
}

/// Route count of one routing protocol
#[derive(Debug, Clone, PartialEq)]
pub struct RouteProtocolShare {
    pub protocol: CategoryCount,
    /// Share of all IPv4 routes, in percent
    pub share: f64,
}

#[derive(Debug, Clone)]
pub struct NetworkData {
    pub instance: InstanceInfo,
    pub sites: Vec<String>,
    pub compare: Option<SnapshotInfo>,
    pub summary: SnapshotSummary,
    pub route_protocols: Vec<RouteProtocolShare>,
}

/// Report data loader over an inventory client
pub struct DataSource<'a> {
    client: &'a InventoryClient,
}

impl<'a> DataSource<'a> {
    pub fn new(client: &'a InventoryClient) -> Self {
        Self { client }
    }

    /// Instance URL, platform version and the resolved report snapshot
    pub async fn instance(&self) -> Result<InstanceInfo> {
        let os_version = self
            .client
            .system()
            .os_version()
            .await
            .context("Failed to read platform version")?;

        let snapshot = self
            .client
            .snapshots()
            .resolve(self.client.snapshot_id())
            .await
            .with_context(|| format!("Failed to resolve snapshot '{}'", self.client.snapshot_id()))?;

        info!(
            snapshot = %snapshot.id,
            name = snapshot.display_name(),
            version = %os_version.version,
            "Using snapshot"
        );

        Ok(InstanceInfo {
            system_url: self.client.server_url().to_string(),
            os_version: os_version.version,
            snapshot,
        })
    }

    /// Everything the management report renders
    pub async fn management(&self) -> Result<ManagementData> {
        let instance = self.instance().await?;
        let snapshot = instance.snapshot.id.as_str();
        let tables = self.client.tables();

        let devices = tables
            .count(Table::Devices, &Filters::new(), Some(snapshot))
            .await
            .context("Failed to count devices")?;
        let sites = tables
            .count(Table::Sites, &Filters::new(), Some(snapshot))
            .await
            .context("Failed to count sites")?;

        let mut protocol_tables = Vec::with_capacity(MANAGEMENT_PROTOCOLS.len());
        for protocol in MANAGEMENT_PROTOCOLS.iter() {
            let query = TableQuery::new(["hostname", protocol.field]).snapshot(snapshot);
            let rows = tables
                .fetch(Table::from(protocol.kind), &query)
                .await
                .with_context(|| format!("Failed to fetch {}", protocol.name))?;

            if rows.is_empty() {
                warn!(protocol = protocol.name, "Management table is empty");
            }
            protocol_tables.push((protocol, rows));
        }

        Ok(ManagementData {
            instance,
            sites,
            devices,
            tables: protocol_tables,
        })
    }

    /// Everything the data report renders, restricted to `sites`.
    ///
    /// With `compare`, every count is also read from that snapshot.
    pub async fn network(&self, sites: &[String], compare: Option<&str>) -> Result<NetworkData> {
        let instance = self.instance().await?;
        let snapshot = instance.snapshot.id.as_str();
        let filters = Filters::site(sites);

        let compare = match compare {
            Some(reference) => Some(
                self.client
                    .snapshots()
                    .resolve(reference)
                    .await
                    .with_context(|| format!("Failed to resolve comparison snapshot '{}'", reference))?,
            ),
            None => None,
        };

        let tables = self.client.tables();
        let mut summary = SnapshotSummary::new();
        for metric in NETWORK_METRICS.iter() {
            let current = tables
                .count(metric.table, &filters, Some(snapshot))
                .await
                .with_context(|| format!("Failed to count {}", metric.label))?;

            let previous = match &compare {
                Some(other) => Some(
                    tables
                        .count(metric.table, &filters, Some(other.id.as_str()))
                        .await
                        .with_context(|| {
                            format!("Failed to count {} in snapshot {}", metric.label, other.id)
                        })?,
                ),
                None => None,
            };

            summary.push(metric.key, metric.label, current, previous);
        }

        let routes = tables
            .fetch(
                Table::RoutesIpv4,
                &TableQuery::new(["protocol"])
                    .filters(filters.clone())
                    .snapshot(snapshot),
            )
            .await
            .context("Failed to fetch IPv4 routes")?;
        let route_protocols = route_protocol_shares(&routes);

        info!(
            sites = sites.len(),
            metrics = summary.metrics.len(),
            changed = summary.changed().count(),
            "Network data collected"
        );

        Ok(NetworkData {
            instance,
            sites: sites.to_vec(),
            compare,
            summary,
            route_protocols,
        })
    }
}

/// Routes per protocol, most common first
pub fn route_protocol_shares(routes: &[Record]) -> Vec<RouteProtocolShare> {
    if routes.is_empty() {
        return Vec::new();
    }

    let total = routes.len() as f64;
    let mut counts = category_counts(routes, "protocol");
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    counts
        .into_iter()
        .map(|protocol| RouteProtocolShare {
            share: round2(protocol.count as f64 / total * 100.0),
            protocol,
        })
        .collect()
}
