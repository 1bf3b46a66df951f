//! Directory creation (`Fileman:mkdir`, legacy API).

use crate::client::PanelClient;
use crate::context::CallContext;
use crate::error::PanelError;
use crate::transport::Args;

/// Result entries from a `Fileman::mkdir` call.
///
/// The legacy API reports one entry per affected path; callers rarely need
/// more than "it worked", so the entries are kept as raw JSON.
#[derive(Debug, Clone, Default)]
pub struct MkdirOutcome {
    pub entries: Vec<serde_json::Value>,
}

/// Create a directory under the account's home.
pub async fn mkdir(
    client: &PanelClient,
    ctx: &CallContext,
    path: &str,
    name: &str,
    permissions: &str,
) -> Result<MkdirOutcome, PanelError> {
    let args = Args::from([
        ("path".to_owned(), path.to_owned()),
        ("name".to_owned(), name.to_owned()),
        ("permissions".to_owned(), permissions.to_owned()),
    ]);

    let entries: Option<Vec<serde_json::Value>> =
        client.api2(ctx, "Fileman", "mkdir", &args).await?;
    Ok(MkdirOutcome {
        entries: entries.unwrap_or_default(),
    })
}
