#![allow(clippy::unwrap_used)]
// Integration tests for the batch driver and reconciliation pass,
// driving a real `OrchClient` against wiremock.

use std::fs;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edgeprov_api::OrchClient;
use edgeprov_core::{
    RowStatus, RunOptions, Renderer, document_filename, parse_site_records, run_batch,
    run_reconciliation,
};

const TEMPLATE: &str = "\
hostname: {{ data['hostname'] }}
serial: {{ data['serial_number'] }}
templateGroups:
{% for group in data['templateGroups'] %}  - {{ group }}
{% endfor %}";

async fn setup() -> (MockServer, OrchClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = OrchClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn options(dir: &std::path::Path, upload: bool) -> RunOptions {
    RunOptions {
        upload,
        auto_apply: false,
        auto_apply_denied: false,
        output_dir: dir.to_path_buf(),
    }
}

#[tokio::test]
async fn empty_hostname_rows_touch_nothing() {
    let (server, client) = setup().await;
    let out = tempfile::tempdir().unwrap();

    // Only site-A may reach the validate endpoint.
    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/validate"))
        .and(body_partial_json(json!({ "name": "site-A" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let records = parse_site_records(
        "hostname,serial_number,templateGroups\nsite-A,SN1,g1\n,,\n",
    )
    .unwrap();

    let report = run_batch(
        &client,
        &Renderer::new(),
        TEMPLATE,
        &records,
        &options(out.path(), false),
    )
    .await
    .unwrap();

    assert_eq!(report.submitted, vec!["site-A".to_owned()]);
    assert_eq!(report.outcomes[1].status, RowStatus::SkippedNoHostname);

    // One document on disk, none for the skipped row.
    let entries: Vec<_> = fs::read_dir(out.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let content = fs::read_to_string(out.path().join(document_filename("site-A"))).unwrap();
    assert!(content.contains("hostname: site-A"));
}

#[tokio::test]
async fn upload_creates_preconfig_after_validate() {
    let (server, client) = setup().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/validate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/"))
        .and(body_partial_json(json!({ "name": "site-A", "tag": "site-A" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let records =
        parse_site_records("hostname,serial_number,templateGroups\nsite-A,SN1,\"g1, g2\"\n")
            .unwrap();

    let report = run_batch(
        &client,
        &Renderer::new(),
        TEMPLATE,
        &records,
        &options(out.path(), true),
    )
    .await
    .unwrap();

    assert_eq!(report.outcomes[0].status, RowStatus::Uploaded);
    assert_eq!(report.submitted, vec!["site-A".to_owned()]);

    // The two list tokens land as separate items in the document.
    let content = fs::read_to_string(out.path().join(document_filename("site-A"))).unwrap();
    assert!(content.contains("- g1"));
    assert!(content.contains("- g2"));
    assert!(!content.contains("g1, g2"));
}

#[tokio::test]
async fn rejected_document_skips_row_and_continues() {
    let (server, client) = setup().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/validate"))
        .and(body_partial_json(json!({ "name": "site-A" })))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad overlay name"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/validate"))
        .and(body_partial_json(json!({ "name": "site-B" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let records = parse_site_records(
        "hostname,serial_number,templateGroups\nsite-A,SN1,g1\nsite-B,SN2,g1\n",
    )
    .unwrap();

    let report = run_batch(
        &client,
        &Renderer::new(),
        TEMPLATE,
        &records,
        &options(out.path(), false),
    )
    .await
    .unwrap();

    assert!(matches!(
        report.outcomes[0].status,
        RowStatus::Rejected { ref message } if message.contains("bad overlay")
    ));
    assert_eq!(report.outcomes[1].status, RowStatus::Written);
    assert_eq!(report.submitted, vec!["site-B".to_owned()]);

    // Rejected rows leave no document behind.
    assert!(!out.path().join(document_filename("site-A")).exists());
    assert!(out.path().join(document_filename("site-B")).exists());
}

#[tokio::test]
async fn missing_template_field_skips_row_without_remote_calls() {
    // No validate mock is mounted: any remote call would 404 and fail the
    // row with a different status than the one asserted below.
    let (_server, client) = setup().await;
    let out = tempfile::tempdir().unwrap();

    let records = parse_site_records("hostname,serial_number\nsite-A,SN1\n").unwrap();
    let template = "ip: {{ data['lan_ip'] }}";

    let report = run_batch(
        &client,
        &Renderer::new(),
        template,
        &records,
        &options(out.path(), false),
    )
    .await
    .unwrap();

    assert!(matches!(
        report.outcomes[0].status,
        RowStatus::SkippedMissingField { ref field } if field == "lan_ip"
    ));
    assert!(report.submitted.is_empty());
}

#[tokio::test]
async fn reconciliation_approves_matches_and_survives_failures() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/gms/rest/appliance/denied"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "applianceInfo": { "site": "site-A", "reachabilityStatus": 1 } },
            { "id": 8, "applianceInfo": { "site": "site-B", "reachabilityStatus": 1 } },
            { "id": 9, "applianceInfo": { "site": "site-C", "reachabilityStatus": 0 } }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gms/rest/gms/appliance/preconfiguration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "site-A" },
            { "id": 2, "name": "site-B" },
            { "id": 3, "name": "site-C" }
        ])))
        .mount(&server)
        .await;

    // First approval blows up server-side; the second must still go out.
    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/1/apply/discovered/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gms/rest/gms/appliance/preconfiguration/2/apply/discovered/8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let submitted = vec!["site-A".to_owned(), "site-B".to_owned(), "site-C".to_owned()];
    let outcomes = run_reconciliation(&client, &submitted).await.unwrap();

    // site-C's appliance is unreachable, so only two approvals happen.
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].error.is_some());
    assert!(outcomes[1].error.is_none());
    assert_eq!(outcomes[1].matched.hostname, "site-B");
}
