// Preconfig endpoints
//
// Upload lifecycle: validate (dry run) -> create -> apply/delete.
// Create is NOT idempotent on the orchestrator side -- repeated creates
// with the same name produce duplicate objects, so callers track what
// they have already submitted.

use tracing::debug;

use crate::client::OrchClient;
use crate::error::Error;
use crate::models::{Preconfig, PreconfigUpload};

impl OrchClient {
    /// List all preconfigs (metadata only, no document bodies).
    ///
    /// `GET /gms/appliance/preconfiguration?filter=metadata`
    ///
    /// The whole set comes back in one response; the endpoint does not
    /// paginate.
    pub async fn list_preconfigs(&self) -> Result<Vec<Preconfig>, Error> {
        let url = self.api_url("/gms/appliance/preconfiguration?filter=metadata");
        debug!("listing preconfigs");
        self.get(url).await
    }

    /// Dry-run validation of a rendered document.
    ///
    /// `POST /gms/appliance/preconfiguration/validate`
    ///
    /// Must be called before `create_preconfig` for the same data. A
    /// rejection comes back as `Error::Rejected` carrying the
    /// orchestrator's explanation; the caller logs it and moves on to the
    /// next record.
    pub async fn validate_preconfig(
        &self,
        name: &str,
        serial: &str,
        document: &str,
        auto_apply: bool,
    ) -> Result<(), Error> {
        let url = self.api_url("/gms/appliance/preconfiguration/validate");
        let body = PreconfigUpload::new(name, serial, document, auto_apply);
        debug!(name, "validating preconfig");
        match self.post_unit(url, &body).await {
            Err(Error::Api { message, .. }) => Err(Error::Rejected { message }),
            other => other,
        }
    }

    /// Create a preconfig from a rendered document.
    ///
    /// `POST /gms/appliance/preconfiguration/`
    ///
    /// Only call after a successful `validate_preconfig` with the same
    /// arguments.
    pub async fn create_preconfig(
        &self,
        name: &str,
        serial: &str,
        document: &str,
        auto_apply: bool,
    ) -> Result<(), Error> {
        let url = self.api_url("/gms/appliance/preconfiguration/");
        let body = PreconfigUpload::new(name, serial, document, auto_apply);
        debug!(name, "creating preconfig");
        self.post_unit(url, &body).await
    }

    /// Delete a preconfig by id.
    ///
    /// `DELETE /gms/appliance/preconfiguration/{id}`
    pub async fn delete_preconfig(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("/gms/appliance/preconfiguration/{id}"));
        debug!(id, "deleting preconfig");
        self.delete(url).await
    }

    /// Approve a discovered appliance and apply a preconfig to it.
    ///
    /// `POST /gms/appliance/preconfiguration/{id}/apply/discovered/{discoveredId}`
    /// (empty body)
    pub async fn approve_and_apply(&self, preconfig_id: i64, discovered_id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!(
            "/gms/appliance/preconfiguration/{preconfig_id}/apply/discovered/{discovered_id}"
        ));
        debug!(preconfig_id, discovered_id, "approving and applying preconfig");
        self.post_empty(url).await
    }

    /// Apply a preconfig to an already-managed appliance.
    ///
    /// `POST /gms/appliance/preconfiguration/{id}/apply/{nePk}` (empty body)
    pub async fn apply_to_existing(&self, preconfig_id: i64, ne_pk: &str) -> Result<(), Error> {
        let url = self.api_url(&format!(
            "/gms/appliance/preconfiguration/{preconfig_id}/apply/{ne_pk}"
        ));
        debug!(preconfig_id, ne_pk, "applying preconfig to existing appliance");
        self.post_empty(url).await
    }
}
