// Teardown driver
//
// Reverses a provisioning run for demo/lab environments: deletes the
// preconfigs uploaded for the CSV's hostnames, removes the matching
// appliances from management so they re-enter discovery, and deletes the
// local output tree. Each destructive phase is independently skippable;
// declining one never blocks the next.

use std::fs;
use std::io;
use std::path::PathBuf;

use edgeprov_api::{Appliance, OrchClient, Preconfig};
use tracing::{info, warn};

use crate::error::CoreError;
use crate::record::SiteRecord;

/// Everything a teardown run would delete, computed up front so the
/// operator can review it before confirming each phase.
#[derive(Debug, Clone, Default)]
pub struct TeardownPlan {
    /// `(preconfig id, name)` pairs matched by hostname.
    pub preconfigs: Vec<(i64, String)>,
    /// `(nePk, hostname)` pairs for managed appliances matched by hostname.
    pub appliances: Vec<(String, String)>,
    /// Local output directory to remove.
    pub output_dir: PathBuf,
}

impl TeardownPlan {
    pub fn is_empty(&self) -> bool {
        self.preconfigs.is_empty() && self.appliances.is_empty()
    }
}

/// Which destructive phases the operator confirmed.
#[derive(Debug, Clone, Copy)]
pub struct TeardownPhases {
    pub delete_preconfigs: bool,
    pub delete_appliances: bool,
    pub remove_local_outputs: bool,
}

/// Counts of what actually happened.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub preconfigs_deleted: usize,
    pub appliances_deleted: usize,
    pub failures: usize,
    pub local_outputs_removed: bool,
}

/// Select teardown targets by cross-referencing record hostnames against
/// the orchestrator's current preconfigs (by name) and managed appliances
/// (by reported hostname).
pub fn select_targets(
    records: &[SiteRecord],
    preconfigs: &[Preconfig],
    appliances: &[Appliance],
) -> (Vec<(i64, String)>, Vec<(String, String)>) {
    let hostnames: Vec<&str> = records
        .iter()
        .map(SiteRecord::hostname)
        .filter(|h| !h.is_empty())
        .collect();

    let preconfig_targets = preconfigs
        .iter()
        .filter(|p| hostnames.contains(&p.name.as_str()))
        .map(|p| (p.id, p.name.clone()))
        .collect();

    let appliance_targets = appliances
        .iter()
        .filter_map(|a| {
            let host = a.host_name.as_deref()?;
            hostnames
                .contains(&host)
                .then(|| (a.ne_pk.clone(), host.to_owned()))
        })
        .collect();

    (preconfig_targets, appliance_targets)
}

/// Fetch current remote state and build the teardown plan.
pub async fn plan_teardown(
    client: &OrchClient,
    records: &[SiteRecord],
    output_dir: PathBuf,
) -> Result<TeardownPlan, CoreError> {
    let preconfigs = client.list_preconfigs().await?;
    let appliances = client.list_appliances().await?;
    let (preconfigs, appliances) = select_targets(records, &preconfigs, &appliances);
    Ok(TeardownPlan {
        preconfigs,
        appliances,
        output_dir,
    })
}

/// Execute the confirmed phases of a teardown plan.
///
/// Per-target failures are logged and counted; later targets and later
/// phases still proceed.
pub async fn run_teardown(
    client: &OrchClient,
    plan: &TeardownPlan,
    phases: TeardownPhases,
) -> Result<TeardownReport, CoreError> {
    let mut report = TeardownReport::default();

    if phases.delete_preconfigs {
        for (id, name) in &plan.preconfigs {
            match client.delete_preconfig(*id).await {
                Ok(()) => {
                    info!(id, name, "deleted preconfig");
                    report.preconfigs_deleted += 1;
                }
                Err(e) => {
                    warn!(id, name, "failed to delete preconfig: {e}");
                    report.failures += 1;
                }
            }
        }
    } else {
        info!("preconfig deletion skipped");
    }

    if phases.delete_appliances {
        for (ne_pk, hostname) in &plan.appliances {
            match client.delete_for_rediscovery(ne_pk).await {
                Ok(()) => {
                    info!(ne_pk, hostname, "removed appliance for rediscovery");
                    report.appliances_deleted += 1;
                }
                Err(e) => {
                    warn!(ne_pk, hostname, "failed to remove appliance: {e}");
                    report.failures += 1;
                }
            }
        }
    } else {
        info!("appliance removal skipped");
    }

    if phases.remove_local_outputs {
        match fs::remove_dir_all(&plan.output_dir) {
            Ok(()) => {
                info!(dir = %plan.output_dir.display(), "removed local output directory");
                report.local_outputs_removed = true;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(dir = %plan.output_dir.display(), "no local output directory to remove");
            }
            Err(e) => {
                warn!(dir = %plan.output_dir.display(), "failed to remove output directory: {e}");
                report.failures += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::record::parse_site_records;
    use serde_json::json;

    #[test]
    fn selects_only_matching_targets() {
        let records = parse_site_records(
            "hostname,serial_number\nsite-A,SN1\n,\nsite-B,SN2\n",
        )
        .unwrap();
        let preconfigs: Vec<Preconfig> = serde_json::from_value(json!([
            { "id": 1, "name": "site-A" },
            { "id": 2, "name": "site-X" },
            { "id": 3, "name": "site-B" }
        ]))
        .unwrap();
        let appliances: Vec<Appliance> = serde_json::from_value(json!([
            { "nePk": "1.NE", "hostName": "site-B" },
            { "nePk": "2.NE", "hostName": "other" },
            { "nePk": "3.NE" }
        ]))
        .unwrap();

        let (preconfig_targets, appliance_targets) =
            select_targets(&records, &preconfigs, &appliances);

        assert_eq!(
            preconfig_targets,
            vec![(1, "site-A".to_owned()), (3, "site-B".to_owned())]
        );
        assert_eq!(appliance_targets, vec![("1.NE".to_owned(), "site-B".to_owned())]);
    }
}
