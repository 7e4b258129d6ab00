//! Table query endpoints.
//!
//! Every inventory table is queried with a `POST tables/<path>` carrying the
//! wanted columns, filters, snapshot and pagination. Rows come back as
//! [`Record`]s; counts are read from the response metadata.

use crate::client::InventoryClient;
use crate::error::InventoryResult;
use netreport_core::report::ProtocolKind;
use netreport_core::Record;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Inventory tables used by the reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    // Inventory
    Devices,
    Sites,
    Hosts,
    Interfaces,
    // Interfaces
    Switchports,
    PortChannels,
    TunnelsIpv4,
    TunnelsIpv6,
    InterfaceDuplex,
    IpsecGateways,
    IpsecTunnels,
    // Addressing
    ManagedNetworks,
    ManagedIpv4,
    ManagedIpv6,
    Arp,
    Mac,
    // Switching
    StpBridges,
    StpInstances,
    StpNeighbors,
    StpVirtualPorts,
    StpVlans,
    Vlans,
    // Routing
    RoutesIpv4,
    RoutesIpv6,
    MulticastRoutes,
    BgpNeighbors,
    OspfNeighbors,
    IsisNeighbors,
    EigrpNeighbors,
    RipNeighbors,
    // Wireless
    WirelessControllers,
    WirelessAccessPoints,
    WirelessRadios,
    WirelessClients,
    // Management
    AaaServers,
    NtpSources,
    LoggingRemote,
    SnmpTrapHosts,
    NetflowCollectors,
    SflowCollectors,
    DnsResolverServers,
}

impl Table {
    /// Endpoint path relative to the API root
    pub fn path(&self) -> &'static str {
        match self {
            Self::Devices => "tables/inventory/devices",
            Self::Sites => "tables/inventory/sites",
            Self::Hosts => "tables/addressing/hosts",
            Self::Interfaces => "tables/inventory/interfaces",
            Self::Switchports => "tables/interfaces/switchports",
            Self::PortChannels => "tables/interfaces/port-channel/member-status",
            Self::TunnelsIpv4 => "tables/interfaces/tunnels/ipv4",
            Self::TunnelsIpv6 => "tables/interfaces/tunnels/ipv6",
            Self::InterfaceDuplex => "tables/interfaces/duplex",
            Self::IpsecGateways => "tables/security/ipsec/gateways",
            Self::IpsecTunnels => "tables/security/ipsec/tunnels",
            Self::ManagedNetworks => "tables/networks",
            Self::ManagedIpv4 => "tables/addressing/managed-devs",
            Self::ManagedIpv6 => "tables/addressing/ipv6-managed-devs",
            Self::Arp => "tables/addressing/arp",
            Self::Mac => "tables/addressing/mac",
            Self::StpBridges => "tables/spanning-tree/bridges",
            Self::StpInstances => "tables/spanning-tree/instances",
            Self::StpNeighbors => "tables/spanning-tree/neighbors",
            Self::StpVirtualPorts => "tables/spanning-tree/ports",
            Self::StpVlans => "tables/spanning-tree/vlans",
            Self::Vlans => "tables/vlan/device-summary",
            Self::RoutesIpv4 => "tables/networks/routes",
            Self::RoutesIpv6 => "tables/networks/ipv6-routes",
            Self::MulticastRoutes => "tables/multicast/routes/table",
            Self::BgpNeighbors => "tables/routing/protocols/bgp/neighbors",
            Self::OspfNeighbors => "tables/routing/protocols/ospf/neighbors",
            Self::IsisNeighbors => "tables/routing/protocols/is-is/neighbors",
            Self::EigrpNeighbors => "tables/routing/protocols/eigrp/neighbors",
            Self::RipNeighbors => "tables/routing/protocols/rip/neighbors",
            Self::WirelessControllers => "tables/wireless/controllers",
            Self::WirelessAccessPoints => "tables/wireless/access-points",
            Self::WirelessRadios => "tables/wireless/radio",
            Self::WirelessClients => "tables/wireless/clients",
            Self::AaaServers => "tables/security/aaa/servers",
            Self::NtpSources => "tables/management/ntp/sources",
            Self::LoggingRemote => "tables/management/logging/remote",
            Self::SnmpTrapHosts => "tables/management/snmp/trap-hosts",
            Self::NetflowCollectors => "tables/management/flow/netflow/collectors",
            Self::SflowCollectors => "tables/management/flow/sflow/collectors",
            Self::DnsResolverServers => "tables/management/dns/resolver/servers",
        }
    }
}

impl From<ProtocolKind> for Table {
    fn from(kind: ProtocolKind) -> Self {
        match kind {
            ProtocolKind::Aaa => Self::AaaServers,
            ProtocolKind::Ntp => Self::NtpSources,
            ProtocolKind::Syslog => Self::LoggingRemote,
            ProtocolKind::SnmpTrap => Self::SnmpTrapHosts,
            ProtocolKind::NetFlow => Self::NetflowCollectors,
            ProtocolKind::SFlow => Self::SflowCollectors,
            ProtocolKind::Dns => Self::DnsResolverServers,
        }
    }
}

/// Table filter expression; top-level keys are and-combined
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(pub Map<String, Value>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given sites; several sites are or-combined.
    pub fn site<S: AsRef<str>>(sites: &[S]) -> Self {
        let mut filters = Self::new();
        match sites {
            [] => {}
            [site] => {
                filters
                    .0
                    .insert("siteName".to_string(), json!(["eq", site.as_ref()]));
            }
            many => {
                let any: Vec<Value> = many
                    .iter()
                    .map(|site| json!({ "siteName": ["eq", site.as_ref()] }))
                    .collect();
                filters.0.insert("or".to_string(), Value::Array(any));
            }
        }
        filters
    }

    /// Add a `column operator value` condition.
    pub fn with(mut self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.0
            .insert(column.to_string(), json!([operator, value.into()]));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Columns, filters and snapshot of one table query
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub columns: Vec<String>,
    pub filters: Filters,
    /// Overrides the client's snapshot when set
    pub snapshot: Option<String>,
}

impl TableQuery {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            filters: Filters::new(),
            snapshot: None,
        }
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct TableRequest<'a> {
    columns: &'a [String],
    filters: &'a Filters,
    snapshot: &'a str,
    pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Pagination {
    limit: u32,
    start: u64,
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    #[serde(default)]
    data: Vec<Record>,
    #[serde(rename = "_meta", default)]
    meta: TableMeta,
}

#[derive(Debug, Default, Deserialize)]
struct TableMeta {
    #[serde(default)]
    count: Option<u64>,
}

/// Tables API for querying inventory tables.
pub struct TablesApi<'a> {
    client: &'a InventoryClient,
}

impl<'a> TablesApi<'a> {
    pub(crate) fn new(client: &'a InventoryClient) -> Self {
        Self { client }
    }

    /// Fetch all rows of a table, page by page.
    pub async fn fetch(&self, table: Table, query: &TableQuery) -> InventoryResult<Vec<Record>> {
        let config = self.client.http.config();
        let snapshot = query.snapshot.as_deref().unwrap_or(config.snapshot_id.as_str());
        let limit = config.page_size.max(1);

        let mut rows: Vec<Record> = Vec::new();
        let mut start: u64 = 0;

        loop {
            let request = TableRequest {
                columns: &query.columns,
                filters: &query.filters,
                snapshot,
                pagination: Pagination { limit, start },
            };
            let page: TableResponse = self.client.http.post(table.path(), &request).await?;
            let page_len = page.data.len();
            rows.extend(page.data);

            let exhausted = page
                .meta
                .count
                .map_or(false, |count| rows.len() as u64 >= count);
            if page_len < limit as usize || exhausted {
                break;
            }
            start += page_len as u64;
        }

        debug!(table = table.path(), rows = rows.len(), "Table fetched");
        Ok(rows)
    }

    /// Count the rows of a table matching `filters`.
    pub async fn count(
        &self,
        table: Table,
        filters: &Filters,
        snapshot: Option<&str>,
    ) -> InventoryResult<u64> {
        let config = self.client.http.config();
        let columns = vec!["id".to_string()];
        let request = TableRequest {
            columns: &columns,
            filters,
            snapshot: snapshot.unwrap_or(config.snapshot_id.as_str()),
            pagination: Pagination { limit: 1, start: 0 },
        };

        let response: TableResponse = self.client.http.post(table.path(), &request).await?;
        let count = response
            .meta
            .count
            .unwrap_or(response.data.len() as u64);

        debug!(table = table.path(), count, "Table counted");
        Ok(count)
    }
}
