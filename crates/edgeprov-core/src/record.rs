// Site records
//
// One record per CSV data row, keyed by the header row. The schema is
// checked once at load time instead of failing field-by-field at render
// time: `hostname` and `serial_number` columns must exist, and the two
// list-valued columns are split into trimmed sequences up front.
// Records are immutable once read.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::CoreError;

/// Required identity column. A row with an empty hostname is skipped by
/// the drivers, never treated as an error.
pub const FIELD_HOSTNAME: &str = "hostname";

/// Required serial number column (may be empty per row).
pub const FIELD_SERIAL_NUMBER: &str = "serial_number";

/// Comma-separated list column: orchestrator template groups.
pub const FIELD_TEMPLATE_GROUPS: &str = "templateGroups";

/// Comma-separated list column: business intent overlays.
pub const FIELD_OVERLAYS: &str = "businessIntentOverlays";

/// One row of input data.
#[derive(Debug, Clone)]
pub struct SiteRecord {
    hostname: String,
    serial_number: String,
    template_groups: Vec<String>,
    business_intent_overlays: Vec<String>,
    /// All raw columns by header name, in header order.
    fields: IndexMap<String, String>,
}

impl SiteRecord {
    /// The site hostname. Empty means "skip this record".
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn template_groups(&self) -> &[String] {
        &self.template_groups
    }

    pub fn business_intent_overlays(&self) -> &[String] {
        &self.business_intent_overlays
    }

    /// Whether the record carries a column of this name.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Raw string value of a column.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Template substitution value: every column as a string, except the
    /// two list columns which appear as pre-split sequences.
    pub fn template_value(&self) -> minijinja::Value {
        let mut data = IndexMap::new();
        for (name, raw) in &self.fields {
            let value = match name.as_str() {
                FIELD_TEMPLATE_GROUPS => minijinja::Value::from(self.template_groups.clone()),
                FIELD_OVERLAYS => {
                    minijinja::Value::from(self.business_intent_overlays.clone())
                }
                _ => minijinja::Value::from(raw.clone()),
            };
            data.insert(name.clone(), value);
        }
        minijinja::Value::from_iter(data)
    }
}

/// Split a comma-separated cell into trimmed, non-empty tokens.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Load site records from a delimited file.
///
/// The header row defines the field names. Decoding tolerates a UTF-8
/// byte-order mark (spreadsheet exports routinely carry one). The
/// `hostname` and `serial_number` columns must be present in the header;
/// their per-row values may be empty.
pub fn load_site_records(path: &Path) -> Result<Vec<SiteRecord>, CoreError> {
    let raw = fs::read_to_string(path)?;
    parse_site_records(&raw)
}

/// Parse site records from in-memory CSV text.
pub fn parse_site_records(raw: &str) -> Result<Vec<SiteRecord>, CoreError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    // Spreadsheet exports leave ragged short rows behind; missing cells
    // read as absent fields rather than a parse error.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    for required in [FIELD_HOSTNAME, FIELD_SERIAL_NUMBER] {
        if !headers.iter().any(|h| h == required) {
            return Err(CoreError::Schema {
                message: format!("missing required column '{required}'"),
            });
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut fields = IndexMap::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            fields.insert(name.clone(), value.to_owned());
        }

        let hostname = fields
            .get(FIELD_HOSTNAME)
            .cloned()
            .unwrap_or_default()
            .trim()
            .to_owned();
        let serial_number = fields
            .get(FIELD_SERIAL_NUMBER)
            .cloned()
            .unwrap_or_default()
            .trim()
            .to_owned();
        let template_groups = fields
            .get(FIELD_TEMPLATE_GROUPS)
            .map(|v| split_list(v))
            .unwrap_or_default();
        let business_intent_overlays = fields
            .get(FIELD_OVERLAYS)
            .map(|v| split_list(v))
            .unwrap_or_default();

        records.push(SiteRecord {
            hostname,
            serial_number,
            template_groups,
            business_intent_overlays,
            fields,
        });
    }

    debug!(count = records.len(), "loaded site records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const CSV: &str = "\
hostname,serial_number,templateGroups,businessIntentOverlays,lan_ip
site-A,SN1,\"g1, g2\",\"ov1,ov2\",10.0.0.1
,,,
site-B,SN2,solo,,10.0.0.2
";

    #[test]
    fn parses_rows_and_splits_lists() {
        let records = parse_site_records(CSV).unwrap();
        assert_eq!(records.len(), 3);

        let a = &records[0];
        assert_eq!(a.hostname(), "site-A");
        assert_eq!(a.serial_number(), "SN1");
        assert_eq!(a.template_groups(), ["g1", "g2"]);
        assert_eq!(a.business_intent_overlays(), ["ov1", "ov2"]);
        assert_eq!(a.get("lan_ip"), Some("10.0.0.1"));

        // Row with no hostname is kept; the drivers decide to skip it.
        assert_eq!(records[1].hostname(), "");
        assert!(records[1].template_groups().is_empty());

        assert_eq!(records[2].template_groups(), ["solo"]);
        assert!(records[2].business_intent_overlays().is_empty());
    }

    #[test]
    fn tolerates_byte_order_mark() {
        let bom_csv = format!("\u{feff}{CSV}");
        let records = parse_site_records(&bom_csv).unwrap();
        assert_eq!(records[0].hostname(), "site-A");
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let result = parse_site_records("hostname,templateGroups\nsite-A,g1\n");
        assert!(
            matches!(result, Err(CoreError::Schema { ref message }) if message.contains("serial_number"))
        );
    }

    #[test]
    fn template_value_exposes_lists_as_sequences() {
        let records = parse_site_records(CSV).unwrap();
        let value = records[0].template_value();
        let groups = value.get_attr("templateGroups").unwrap();
        assert_eq!(groups.len(), Some(2));
        let ip = value.get_attr("lan_ip").unwrap();
        assert_eq!(ip.as_str(), Some("10.0.0.1"));
    }
}
