use snafu::OptionExt;

use crate::common::{Backend, DnsChange, Frontend, ResolutionSnafu, Result};
use crate::unifi::{extract_wan1, extract_wan2, GatewayMatcher};

use super::{
    Reconciliation, ReconciliationResult, WanRecord, MESSAGE_DRY_RUN, MESSAGE_UPDATED,
    WARNING_WAN2_UNRESOLVED,
};

type DynBackend = Box<dyn Backend>;
type DynFrontend = Box<dyn Frontend>;

/// Builds the upsert batch for the resolved addresses.
///
/// The primary record is always present. The secondary record is only added
/// when it is configured and WAN2 resolved.
pub fn build_change_batch(
    wan1_ip: &str,
    wan2_ip: Option<&str>,
    config: &super::Config,
) -> Vec<DnsChange> {
    let mut changes = vec![DnsChange::a_record(&config.record_name, config.ttl, wan1_ip)];
    if let (Some(record_name), Some(ip)) = (&config.record_name_wan2, wan2_ip) {
        changes.push(DnsChange::a_record(record_name, config.ttl, ip));
    }
    changes
}

pub struct DNSSync {
    config: super::Config,
    matcher: GatewayMatcher,
    backend: DynBackend,
    frontend: DynFrontend,
}

impl DNSSync {
    pub fn new(
        config: super::Config,
        matcher: GatewayMatcher,
        backend: DynBackend,
        frontend: DynFrontend,
    ) -> Self {
        Self {
            config,
            matcher,
            backend,
            frontend,
        }
    }

    /// Runs one pass, stopping at the first error.
    pub fn sync(&self, dry_run: bool) -> Result<Reconciliation> {
        let hosts = self.backend.fetch_hosts()?;
        let devices = self.backend.fetch_devices()?;

        let wan1_ip = extract_wan1(&devices, &self.matcher).context(ResolutionSnafu)?;
        let wan2_ip = extract_wan2(&hosts);

        tracing::info!(
            wan1 = wan1_ip.as_str(),
            wan2 = wan2_ip.as_deref().unwrap_or("-"),
            "Resolved WAN addresses",
        );

        let changes = build_change_batch(&wan1_ip, wan2_ip.as_deref(), &self.config);

        let wan2 = match (&self.config.record_name_wan2, wan2_ip) {
            (Some(record), Some(ip)) => Some(WanRecord {
                record: record.clone(),
                ip,
            }),
            _ => None,
        };
        let warning = match (&self.config.record_name_wan2, &wan2) {
            (Some(record), None) => {
                tracing::warn!(record = record.as_str(), "{WARNING_WAN2_UNRESOLVED}");
                Some(WARNING_WAN2_UNRESOLVED.to_string())
            }
            _ => None,
        };

        let (message, change_id) = if dry_run {
            for change in &changes {
                tracing::info!(
                    name = change.name.as_str(),
                    kind = change.kind.as_str(),
                    ttl = change.ttl,
                    content = change.content.as_str(),
                    "Would upsert record",
                );
            }
            tracing::info!(changes = changes.len(), "Dry run completed");
            (MESSAGE_DRY_RUN, None)
        } else {
            tracing::info!(
                zone_id = self.config.zone_id.as_str(),
                changes = changes.len(),
                "Applying changes",
            );
            let change_id = self.frontend.apply_changes(&self.config.zone_id, &changes)?;
            tracing::info!(change_id = change_id.as_str(), "Changes submitted");
            (MESSAGE_UPDATED, Some(change_id))
        };

        Ok(Reconciliation {
            message: message.to_string(),
            wan1: WanRecord {
                record: self.config.record_name.clone(),
                ip: wan1_ip,
            },
            change_id,
            wan2,
            warning,
            changes,
        })
    }

    /// Runs one pass and folds any error into a failure result.
    pub fn run(&self, dry_run: bool) -> ReconciliationResult {
        let result = self.sync(dry_run);
        if let Err(err) = &result {
            tracing::error!("Error: {err}");
        }
        result.into()
    }
}
