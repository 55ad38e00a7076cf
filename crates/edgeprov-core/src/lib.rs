//! edgeprov-core: provisioning logic for bulk SD-WAN edge rollouts.
//!
//! Site records (CSV rows), the template renderer, the batch driver, the
//! post-batch reconciliation pass, and the teardown driver. All remote
//! traffic goes through [`edgeprov_api::OrchClient`]; everything here is
//! single-logical-threaded sequencing on top of it.

pub mod batch;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod render;
pub mod teardown;

pub use batch::{RowOutcome, RowStatus, RunOptions, RunReport, document_filename, run_batch};
pub use error::CoreError;
pub use reconcile::{ApprovalOutcome, Match, plan_matches, run_reconciliation};
pub use record::{SiteRecord, load_site_records, parse_site_records};
pub use render::{Renderer, referenced_fields};
pub use teardown::{
    TeardownPhases, TeardownPlan, TeardownReport, plan_teardown, run_teardown, select_targets,
};
