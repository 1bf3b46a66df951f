//! Typed call-site bindings for individual panel operations.
//!
//! Each binding fixes a module/function pair and the typed shape of its
//! payload, leaving transport and envelope concerns to the
//! [`PanelClient`](crate::PanelClient) facade. Bindings stay thin: they
//! build arguments, call the facade, and only add interpretation where a
//! caller needs more than the raw payload (feature presence, alias
//! normalisation).

pub mod domains;
pub mod features;
pub mod fileman;

pub use domains::{domains_data, DomainsData, ServerAliases, VhostEntry};
pub use features::{ensure_issuance_prereqs, list_features, FeatureList, PrereqError};
pub use fileman::{mkdir, MkdirOutcome};
