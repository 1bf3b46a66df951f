//! Account feature lookup (`Features:list_features`, unified API).

use std::collections::BTreeMap;

use crate::client::PanelClient;
use crate::context::CallContext;
use crate::error::PanelError;
use crate::transport::Args;

/// The features enabled for the account.
///
/// The panel reports a flag per feature name; a feature counts as enabled
/// only when present with the value 1.
#[derive(Debug, Clone, Default)]
pub struct FeatureList {
    features: BTreeMap<String, i64>,
}

impl FeatureList {
    /// Whether the named feature is enabled for this account.
    pub fn has(&self, feature: &str) -> bool {
        self.features.get(feature) == Some(&1)
    }

    /// Number of feature flags the panel reported.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the panel reported no feature flags at all.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over `(feature name, enabled)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.features.iter().map(|(name, v)| (name.as_str(), *v == 1))
    }
}

impl FromIterator<(String, i64)> for FeatureList {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

/// Fetch the account's feature flags.
pub async fn list_features(
    client: &PanelClient,
    ctx: &CallContext,
) -> Result<FeatureList, PanelError> {
    let features: BTreeMap<String, i64> = client
        .uapi(ctx, "Features", "list_features", &Args::new())
        .await?;
    Ok(FeatureList { features })
}

/// Failure modes of the certificate-issuance prerequisite check.
#[derive(Debug, thiserror::Error)]
pub enum PrereqError {
    #[error(transparent)]
    Api(#[from] PanelError),

    #[error("account feature {feature:?} is disabled: {hint}")]
    MissingFeature {
        feature: &'static str,
        hint: &'static str,
    },
}

/// Verify the account can install certificates and manage files.
///
/// Both features must be enabled before any issuance workflow is worth
/// starting; a missing feature is reported with the operator-facing hint.
pub async fn ensure_issuance_prereqs(
    client: &PanelClient,
    ctx: &CallContext,
) -> Result<(), PrereqError> {
    let features = list_features(client, ctx).await?;

    if !features.has("sslinstall") {
        return Err(PrereqError::MissingFeature {
            feature: "sslinstall",
            hint: "the account may not install SSL certificates",
        });
    }
    if !features.has("filemanager") {
        return Err(PrereqError::MissingFeature {
            feature: "filemanager",
            hint: "the account may not use the file manager",
        });
    }
    Ok(())
}
