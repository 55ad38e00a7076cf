// Reconciliation pass
//
// Runs once after the batch, only when the operator asked to auto-apply
// against denied appliances. Correlates the submitted hostnames with the
// orchestrator's current preconfig and denied-appliance sets, then issues
// one approve-and-apply call per match. No transactionality: a failed
// approval is logged and the remaining matches still proceed.

use edgeprov_api::{DeniedAppliance, OrchClient, Preconfig};
use tracing::{info, warn};

use crate::error::CoreError;

/// A transient association between a submitted hostname, the preconfig
/// uploaded for it, and a denied appliance reporting that hostname as its
/// site. Valid only within one reconciliation pass; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub hostname: String,
    pub preconfig_id: i64,
    pub discovered_id: i64,
}

/// Result of one approval call.
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub matched: Match,
    /// `None` on success, the error message otherwise.
    pub error: Option<String>,
}

/// Compute the matches for a set of submitted hostnames.
///
/// A match requires the three-way equality
/// `hostname == preconfig.name == appliance.site` AND the appliance to be
/// reachable. At most one match is kept per hostname; when several
/// preconfigs share a name or several reachable denied appliances report
/// the same site, the last one encountered wins and a warning names the
/// duplicated set -- both are expected to be unique, so duplicates mean
/// something is off in the lab.
pub fn plan_matches(
    hostnames: &[String],
    preconfigs: &[Preconfig],
    denied: &[DeniedAppliance],
) -> Vec<Match> {
    let mut matches = Vec::new();

    for hostname in hostnames {
        let mut selected: Option<Match> = None;

        for preconfig in preconfigs {
            if preconfig.name != *hostname {
                continue;
            }
            for appliance in denied {
                if appliance.site() != hostname || !appliance.is_reachable() {
                    continue;
                }
                let candidate = Match {
                    hostname: hostname.clone(),
                    preconfig_id: preconfig.id,
                    discovered_id: appliance.id,
                };
                if let Some(ref previous) = selected {
                    if previous.preconfig_id != candidate.preconfig_id {
                        warn!(
                            hostname,
                            previous = previous.preconfig_id,
                            replacement = candidate.preconfig_id,
                            "multiple preconfigs share this name, keeping the last"
                        );
                    }
                    if previous.discovered_id != candidate.discovered_id {
                        warn!(
                            hostname,
                            previous = previous.discovered_id,
                            replacement = candidate.discovered_id,
                            "multiple reachable denied appliances share this site tag, keeping the last"
                        );
                    }
                }
                selected = Some(candidate);
            }
        }

        if let Some(m) = selected {
            matches.push(m);
        }
    }

    matches
}

/// Fetch current state, plan matches, and approve each one.
///
/// Fetching either snapshot is a precondition -- if that fails there is
/// nothing to reconcile and the error propagates. Individual approval
/// failures are folded into the outcomes.
pub async fn run_reconciliation(
    client: &OrchClient,
    submitted: &[String],
) -> Result<Vec<ApprovalOutcome>, CoreError> {
    let denied = client.list_denied_appliances().await?;
    let preconfigs = client.list_preconfigs().await?;

    let matches = plan_matches(submitted, &preconfigs, &denied);
    info!(matches = matches.len(), "reconciliation planned");

    let mut outcomes = Vec::with_capacity(matches.len());
    for matched in matches {
        let error = match client
            .approve_and_apply(matched.preconfig_id, matched.discovered_id)
            .await
        {
            Ok(()) => {
                info!(
                    hostname = matched.hostname,
                    preconfig_id = matched.preconfig_id,
                    discovered_id = matched.discovered_id,
                    "approved and applied preconfig"
                );
                None
            }
            Err(e) => {
                warn!(
                    hostname = matched.hostname,
                    "approve-and-apply failed: {e}"
                );
                Some(e.to_string())
            }
        };
        outcomes.push(ApprovalOutcome { matched, error });
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn preconfig(id: i64, name: &str) -> Preconfig {
        serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
    }

    fn denied(id: i64, site: &str, reachability: i64) -> DeniedAppliance {
        serde_json::from_value(json!({
            "id": id,
            "applianceInfo": { "site": site, "reachabilityStatus": reachability }
        }))
        .unwrap()
    }

    #[test]
    fn reachable_three_way_match_produces_one_match() {
        let matches = plan_matches(
            &["site-A".into()],
            &[preconfig(42, "site-A")],
            &[denied(7, "site-A", 1)],
        );
        assert_eq!(
            matches,
            vec![Match {
                hostname: "site-A".into(),
                preconfig_id: 42,
                discovered_id: 7,
            }]
        );
    }

    #[test]
    fn unreachable_appliance_never_matches() {
        let matches = plan_matches(
            &["site-A".into()],
            &[preconfig(42, "site-A")],
            &[denied(7, "site-A", 0)],
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn name_mismatch_never_matches() {
        let matches = plan_matches(
            &["site-A".into()],
            &[preconfig(42, "site-B")],
            &[denied(7, "site-A", 1)],
        );
        assert!(matches.is_empty());

        let matches = plan_matches(
            &["site-A".into()],
            &[preconfig(42, "site-A")],
            &[denied(7, "site-B", 1)],
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn unsubmitted_hostname_never_matches() {
        let matches = plan_matches(
            &[],
            &[preconfig(42, "site-A")],
            &[denied(7, "site-A", 1)],
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn duplicate_site_keeps_last_reachable_appliance() {
        let matches = plan_matches(
            &["site-A".into()],
            &[preconfig(42, "site-A")],
            &[denied(7, "site-A", 1), denied(8, "site-A", 1)],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].discovered_id, 8);
    }

    #[test]
    fn duplicate_preconfig_names_keep_last_preconfig() {
        let matches = plan_matches(
            &["site-A".into()],
            &[preconfig(42, "site-A"), preconfig(43, "site-A")],
            &[denied(7, "site-A", 1)],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].preconfig_id, 43);
        assert_eq!(matches[0].discovered_id, 7);
    }

    #[test]
    fn matches_follow_submission_order() {
        let matches = plan_matches(
            &["site-B".into(), "site-A".into()],
            &[preconfig(1, "site-A"), preconfig(2, "site-B")],
            &[denied(7, "site-A", 1), denied(8, "site-B", 1)],
        );
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].hostname, "site-B");
        assert_eq!(matches[1].hostname, "site-A");
    }
}
