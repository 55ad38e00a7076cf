// Template renderer
//
// Expands one site record against a Jinja-style document template. The
// record is exposed to the template as `data`, so templates reference
// fields as `{{ data['hostname'] }}`. Rendering is pure: no I/O, no
// network, and byte-identical output for identical inputs. Document
// validity is the orchestrator's call, made later via the validate
// endpoint -- nothing is checked locally beyond field presence.

use minijinja::{Environment, UndefinedBehavior, context};
use regex_lite::Regex;

use crate::error::CoreError;
use crate::record::SiteRecord;

/// Renderer over a strict minijinja environment.
///
/// Strict undefined behavior turns any stray template lookup into an
/// error instead of rendering empty strings into a device config.
pub struct Renderer {
    env: Environment<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Render `template` with `record` as `data`.
    ///
    /// Every field the template references must exist on the record; the
    /// first missing one fails with `MissingField` naming it. The two
    /// list-valued fields arrive pre-split -- the template sees sequences,
    /// never the raw comma-joined cell.
    pub fn render(&self, template: &str, record: &SiteRecord) -> Result<String, CoreError> {
        for field in referenced_fields(template) {
            if !record.has_field(&field) {
                return Err(CoreError::MissingField { field });
            }
        }

        self.env
            .render_str(template, context! { data => record.template_value() })
            .map_err(|e| CoreError::Template {
                message: e.to_string(),
            })
    }
}

/// Field names a template references via `data['name']` subscripts,
/// deduplicated in order of first appearance.
///
/// Doubles as the source of truth for the `template skeleton` command
/// that emits a CSV header matching a template.
pub fn referenced_fields(template: &str) -> Vec<String> {
    // The subscript form is the house style for these templates, so a
    // quoted-subscript scan finds every field.
    #[allow(clippy::unwrap_used)]
    let re = Regex::new(r#"\[\s*['"]([^'"]+)['"]\s*\]"#).unwrap();

    let mut fields = Vec::new();
    for capture in re.captures_iter(template) {
        let name = capture[1].to_owned();
        if !fields.contains(&name) {
            fields.push(name);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::record::parse_site_records;

    fn record(csv: &str) -> SiteRecord {
        parse_site_records(csv).unwrap().remove(0)
    }

    #[test]
    fn render_is_deterministic() {
        let rec = record("hostname,serial_number\nsite-A,SN1\n");
        let template = "hostname: {{ data['hostname'] }}\nserial: {{ data['serial_number'] }}\n";
        let renderer = Renderer::new();
        let first = renderer.render(template, &rec).unwrap();
        let second = renderer.render(template, &rec).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "hostname: site-A\nserial: SN1\n");
    }

    #[test]
    fn missing_field_names_the_field() {
        let rec = record("hostname,serial_number\nsite-A,SN1\n");
        let result = Renderer::new().render("ip: {{ data['lan_ip'] }}", &rec);
        assert!(
            matches!(result, Err(CoreError::MissingField { ref field }) if field == "lan_ip"),
            "got: {result:?}"
        );
    }

    #[test]
    fn list_fields_embed_as_separate_items() {
        let rec = record(
            "hostname,serial_number,templateGroups\nsite-A,SN1,\"g1, g2\"\n",
        );
        let template = "\
templateGroups:
{% for group in data['templateGroups'] %}  - {{ group }}
{% endfor %}";
        let output = Renderer::new().render(template, &rec).unwrap();
        assert!(output.contains("- g1\n"));
        assert!(output.contains("- g2\n"));
        assert!(!output.contains("g1, g2"));
    }

    #[test]
    fn referenced_fields_dedupes_in_order() {
        let template = "{{ data['hostname'] }} {{ data[\"lan_ip\"] }} {{ data['hostname'] }}";
        assert_eq!(referenced_fields(template), ["hostname", "lan_ip"]);
    }
}
