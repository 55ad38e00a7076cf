//! Teardown command: reverse a provisioning run.
//!
//! Each destructive phase is confirmed separately (unless `--yes`), and
//! declining one never blocks the next.

use edgeprov_core::{TeardownPhases, TeardownPlan, load_site_records, plan_teardown, run_teardown};

use crate::cli::{GlobalOpts, TeardownArgs};
use crate::error::CliError;

use super::util::{Session, confirm, logout_best_effort};

pub async fn handle(
    session: &Session,
    args: &TeardownArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let records = load_site_records(&args.csv)?;

    // Local-only cleanup needs no orchestrator session at all.
    if args.local_only {
        let plan = TeardownPlan {
            output_dir: session.settings.output_dir.clone(),
            ..TeardownPlan::default()
        };
        let phases = TeardownPhases {
            delete_preconfigs: false,
            delete_appliances: false,
            remove_local_outputs: confirm_local(&plan, global)?,
        };
        let report = run_teardown(&session.client, &plan, phases).await?;
        print_summary(&report, global);
        return Ok(());
    }

    session
        .client
        .login(&session.settings.username, &session.settings.password)
        .await?;
    let result = run(session, &records, args, global).await;
    logout_best_effort(&session.client).await;
    result
}

async fn run(
    session: &Session,
    records: &[edgeprov_core::SiteRecord],
    args: &TeardownArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let plan = plan_teardown(
        &session.client,
        records,
        session.settings.output_dir.clone(),
    )
    .await?;

    let want_preconfigs = !args.appliances_only;
    let want_appliances = !args.preconfigs_only;
    let want_local = !args.preconfigs_only && !args.appliances_only;

    if plan.is_empty() && !global.quiet {
        println!("No matching preconfigs or appliances on the orchestrator");
    }

    let phases = TeardownPhases {
        delete_preconfigs: want_preconfigs
            && !plan.preconfigs.is_empty()
            && confirm(
                &format!("Delete {} preconfig(s) from the orchestrator?", plan.preconfigs.len()),
                global.yes,
            )?,
        delete_appliances: want_appliances
            && !plan.appliances.is_empty()
            && confirm(
                &format!(
                    "Remove {} appliance(s) from management for rediscovery?",
                    plan.appliances.len()
                ),
                global.yes,
            )?,
        remove_local_outputs: want_local && confirm_local(&plan, global)?,
    };

    let report = run_teardown(&session.client, &plan, phases).await?;
    print_summary(&report, global);
    Ok(())
}

fn confirm_local(plan: &TeardownPlan, global: &GlobalOpts) -> Result<bool, CliError> {
    if !plan.output_dir.exists() {
        return Ok(false);
    }
    confirm(
        &format!("Remove local output directory {}?", plan.output_dir.display()),
        global.yes,
    )
}

fn print_summary(report: &edgeprov_core::TeardownReport, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    println!(
        "{} preconfig(s) deleted, {} appliance(s) removed, {} failure(s){}",
        report.preconfigs_deleted,
        report.appliances_deleted,
        report.failures,
        if report.local_outputs_removed {
            ", local outputs removed"
        } else {
            ""
        }
    );
}
