//! Domain inventory (`DomainInfo:domains_data`, unified API).

use serde::{Deserialize, Deserializer};

use crate::client::PanelClient;
use crate::context::CallContext;
use crate::error::PanelError;
use crate::transport::Args;

/// Every virtual host configured for the account.
///
/// Parked domains are omitted — they are redundant with the main vhost's
/// server aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainsData {
    /// The account's primary virtual host.
    #[serde(rename = "main_domain")]
    pub main: VhostEntry,
    /// Addon domains, each with its own document root.
    #[serde(rename = "addon_domain", default)]
    pub addons: Vec<VhostEntry>,
    /// Subdomains of the main or addon domains.
    #[serde(rename = "sub_domains", default)]
    pub subdomains: Vec<VhostEntry>,
}

/// One virtual host entry.
#[derive(Debug, Clone, Deserialize)]
pub struct VhostEntry {
    pub domain: String,
    #[serde(rename = "documentroot")]
    pub document_root: String,
    #[serde(rename = "servername")]
    pub server_name: String,
    #[serde(rename = "serveralias", default)]
    pub server_alias: ServerAliases,
}

/// The alias names of a virtual host.
///
/// The wire format carries all aliases as one space-delimited string; this
/// type normalises them into individual names on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerAliases(pub Vec<String>);

impl ServerAliases {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'de> Deserialize<'de> for ServerAliases {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let joined = String::deserialize(deserializer)?;
        Ok(Self(
            joined.split_whitespace().map(str::to_owned).collect(),
        ))
    }
}

/// Fetch the account's domain inventory.
pub async fn domains_data(
    client: &PanelClient,
    ctx: &CallContext,
) -> Result<DomainsData, PanelError> {
    client
        .uapi(ctx, "DomainInfo", "domains_data", &Args::new())
        .await
}
