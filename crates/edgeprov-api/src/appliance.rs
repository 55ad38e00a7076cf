// Appliance endpoints
//
// Read-only observation of the orchestrator's appliance inventory plus
// the two teardown-era mutations: delete-for-rediscovery and broadcast
// CLI fan-out.

use serde_json::json;
use tracing::debug;

use crate::client::OrchClient;
use crate::error::Error;
use crate::models::{Appliance, DeniedAppliance};

impl OrchClient {
    /// List all managed (approved) appliances.
    ///
    /// `GET /appliance`
    pub async fn list_appliances(&self) -> Result<Vec<Appliance>, Error> {
        let url = self.api_url("/appliance");
        debug!("listing appliances");
        self.get(url).await
    }

    /// List all discovered-but-denied appliances.
    ///
    /// `GET /appliance/denied`
    pub async fn list_denied_appliances(&self) -> Result<Vec<DeniedAppliance>, Error> {
        let url = self.api_url("/appliance/denied");
        debug!("listing denied appliances");
        self.get(url).await
    }

    /// Remove an appliance from management so it re-enters discovery.
    ///
    /// `DELETE /appliance/deleteForDiscovery/{nePk}`
    pub async fn delete_for_rediscovery(&self, ne_pk: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("/appliance/deleteForDiscovery/{ne_pk}"));
        debug!(ne_pk, "deleting appliance for rediscovery");
        self.delete(url).await
    }

    /// Fan CLI commands out to multiple appliances in one call.
    ///
    /// `POST /broadcastCli` with `{neList, cmdList}`. The orchestrator
    /// reports one all-or-nothing result; per-appliance outcomes are not
    /// decomposed.
    pub async fn broadcast_cli(&self, ne_list: &[String], cmd_list: &[String]) -> Result<(), Error> {
        let url = self.api_url("/broadcastCli");
        debug!(appliances = ne_list.len(), commands = cmd_list.len(), "broadcasting CLI");
        self.post_unit(url, &json!({ "neList": ne_list, "cmdList": cmd_list }))
            .await
    }
}
