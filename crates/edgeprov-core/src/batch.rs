// Batch driver
//
// Sequences one provisioning run: for every site record with a hostname,
// render -> remote validate -> write the local document -> optionally
// create the remote preconfig. Rows are processed strictly sequentially;
// remote failures are logged per row and never abort the batch. The only
// fatal local failure is being unable to create the output directory.

use std::fs;
use std::path::PathBuf;

use edgeprov_api::{Error as ApiError, OrchClient};
use tracing::{info, warn};

use crate::error::CoreError;
use crate::record::SiteRecord;
use crate::render::Renderer;

/// Run-wide decisions, made once for the whole batch (never per record).
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Create remote preconfigs after local rendering.
    pub upload: bool,
    /// Mark uploaded preconfigs for auto-approval of matching discovered
    /// appliances.
    pub auto_apply: bool,
    /// After the batch, also approve matching denied appliances.
    pub auto_apply_denied: bool,
    /// Where rendered documents land, one file per record.
    pub output_dir: PathBuf,
}

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Document rendered, validated, and written locally.
    Written,
    /// `Written`, plus the remote preconfig was created.
    Uploaded,
    /// Row had no hostname; nothing was done.
    SkippedNoHostname,
    /// The template referenced a field this row does not supply.
    SkippedMissingField { field: String },
    /// The orchestrator rejected the rendered document.
    Rejected { message: String },
    /// A remote call failed (connection, auth, other API error).
    Failed { message: String },
}

/// Per-row outcome, 1-indexed to match the spreadsheet the operator is
/// looking at.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub row: usize,
    pub hostname: Option<String>,
    pub status: RowStatus,
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RowOutcome>,
    /// Hostnames whose documents passed validation (and upload, when
    /// enabled). Feeds the reconciliation pass -- this is deliberately not
    /// a dedup mechanism, since the remote create is not idempotent.
    pub submitted: Vec<String>,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RowStatus::Written | RowStatus::Uploaded))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o.status,
                    RowStatus::SkippedNoHostname | RowStatus::SkippedMissingField { .. }
                )
            })
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RowStatus::Rejected { .. } | RowStatus::Failed { .. }))
            .count()
    }
}

/// Filename for a rendered document: `{hostname}_preconfig.yml`.
pub fn document_filename(hostname: &str) -> String {
    format!("{hostname}_preconfig.yml")
}

/// Run the batch over `records`, rendering each against `template`.
///
/// The client must already be logged in; the caller owns login/logout
/// pairing so logout happens on every exit path. Returns `Err` only for
/// fatal local I/O -- everything remote is folded into the report.
pub async fn run_batch(
    client: &OrchClient,
    renderer: &Renderer,
    template: &str,
    records: &[SiteRecord],
    opts: &RunOptions,
) -> Result<RunReport, CoreError> {
    fs::create_dir_all(&opts.output_dir)?;

    let mut report = RunReport::default();

    for (index, record) in records.iter().enumerate() {
        let row = index + 1;

        if record.hostname().is_empty() {
            warn!(row, "no hostname in row, no preconfig created");
            report.outcomes.push(RowOutcome {
                row,
                hostname: None,
                status: RowStatus::SkippedNoHostname,
            });
            continue;
        }

        let hostname = record.hostname().to_owned();
        info!(row, hostname, "rendering preconfig");

        let document = match renderer.render(template, record) {
            Ok(doc) => doc,
            Err(CoreError::MissingField { field }) => {
                warn!(row, hostname, field, "record missing template field, skipping row");
                report.outcomes.push(RowOutcome {
                    row,
                    hostname: Some(hostname),
                    status: RowStatus::SkippedMissingField { field },
                });
                continue;
            }
            Err(e) => {
                warn!(row, hostname, "render failed: {e}");
                report.outcomes.push(RowOutcome {
                    row,
                    hostname: Some(hostname),
                    status: RowStatus::Failed {
                        message: e.to_string(),
                    },
                });
                continue;
            }
        };

        // Remote dry run before anything is persisted.
        match client
            .validate_preconfig(
                &hostname,
                record.serial_number(),
                &document,
                opts.auto_apply,
            )
            .await
        {
            Ok(()) => {}
            Err(ApiError::Rejected { message }) => {
                warn!(row, hostname, "preconfig failed validation: {message}");
                report.outcomes.push(RowOutcome {
                    row,
                    hostname: Some(hostname),
                    status: RowStatus::Rejected { message },
                });
                continue;
            }
            Err(e) => {
                warn!(row, hostname, "validate call failed: {e}");
                report.outcomes.push(RowOutcome {
                    row,
                    hostname: Some(hostname),
                    status: RowStatus::Failed {
                        message: e.to_string(),
                    },
                });
                continue;
            }
        }

        let path = opts.output_dir.join(document_filename(&hostname));
        fs::write(&path, &document)?;

        let status = if opts.upload {
            match client
                .create_preconfig(
                    &hostname,
                    record.serial_number(),
                    &document,
                    opts.auto_apply,
                )
                .await
            {
                Ok(()) => {
                    info!(row, hostname, "posted preconfig");
                    RowStatus::Uploaded
                }
                Err(e) => {
                    warn!(row, hostname, "create call failed: {e}");
                    report.outcomes.push(RowOutcome {
                        row,
                        hostname: Some(hostname),
                        status: RowStatus::Failed {
                            message: e.to_string(),
                        },
                    });
                    continue;
                }
            }
        } else {
            RowStatus::Written
        };

        report.submitted.push(hostname.clone());
        report.outcomes.push(RowOutcome {
            row,
            hostname: Some(hostname),
            status,
        });
    }

    Ok(report)
}
