// Orchestrator API request/response types
//
// Models for the orchestrator's JSON API. List endpoints return bare
// arrays (no envelope). Fields use `#[serde(default)]` liberally because
// the API is inconsistent about field presence across releases; anything
// not modeled explicitly lands in `extra`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

// ── Preconfig ────────────────────────────────────────────────────────

/// Preconfig metadata from `GET /gms/appliance/preconfiguration?filter=metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preconfig {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default, rename = "serialNum")]
    pub serial_num: Option<String>,
    #[serde(default, rename = "autoApply")]
    pub auto_apply: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body for preconfig validate/create calls.
///
/// The orchestrator expects the rendered document base64-encoded in
/// `configData`. `tag` mirrors `name` so discovered appliances reporting
/// the hostname as their site tag match the preconfig.
#[derive(Debug, Clone, Serialize)]
pub struct PreconfigUpload {
    pub name: String,
    #[serde(rename = "configData")]
    pub config_data: String,
    #[serde(rename = "autoApply")]
    pub auto_apply: bool,
    pub tag: String,
    #[serde(rename = "serialNum")]
    pub serial_num: String,
}

impl PreconfigUpload {
    /// Build an upload body from a rendered document.
    pub fn new(name: &str, serial: &str, document: &str, auto_apply: bool) -> Self {
        Self {
            name: name.to_owned(),
            config_data: BASE64.encode(document.as_bytes()),
            auto_apply,
            tag: name.to_owned(),
            serial_num: serial.to_owned(),
        }
    }
}

// ── Appliances ───────────────────────────────────────────────────────

/// A managed (approved) appliance from `GET /appliance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appliance {
    /// Network element primary key, e.g. `"77.NE"`.
    #[serde(rename = "nePk")]
    pub ne_pk: String,
    #[serde(default, rename = "hostName")]
    pub host_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A discovered-but-denied appliance from `GET /appliance/denied`.
///
/// Not owned by this tooling; read-only observation of devices that
/// attempted discovery and were not approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeniedAppliance {
    pub id: i64,
    #[serde(rename = "applianceInfo")]
    pub appliance_info: ApplianceInfo,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Nested device detail on a denied appliance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplianceInfo {
    #[serde(default)]
    pub site: String,
    /// `1` means the appliance is currently contactable.
    #[serde(default, rename = "reachabilityStatus")]
    pub reachability_status: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeniedAppliance {
    /// The site tag the appliance reported at discovery time.
    pub fn site(&self) -> &str {
        &self.appliance_info.site
    }

    /// Whether the orchestrator can currently reach the appliance.
    pub fn is_reachable(&self) -> bool {
        self.appliance_info.reachability_status == 1
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn upload_body_base64_encodes_document() {
        let upload = PreconfigUpload::new("site-A", "SN1", "hostname: site-A\n", true);
        assert_eq!(upload.name, "site-A");
        assert_eq!(upload.tag, "site-A");
        assert_eq!(upload.serial_num, "SN1");
        assert_eq!(
            BASE64.decode(&upload.config_data).unwrap(),
            b"hostname: site-A\n"
        );
    }

    #[test]
    fn denied_appliance_reachability() {
        let reachable: DeniedAppliance = serde_json::from_value(serde_json::json!({
            "id": 10,
            "applianceInfo": { "site": "site-A", "reachabilityStatus": 1 }
        }))
        .unwrap();
        assert!(reachable.is_reachable());
        assert_eq!(reachable.site(), "site-A");

        let unreachable: DeniedAppliance = serde_json::from_value(serde_json::json!({
            "id": 11,
            "applianceInfo": { "site": "site-B", "reachabilityStatus": 0 }
        }))
        .unwrap();
        assert!(!unreachable.is_reachable());
    }
}
