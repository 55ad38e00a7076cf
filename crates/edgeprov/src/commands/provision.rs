//! Provision command: render, validate, upload, and reconcile.

use std::io::IsTerminal;

use edgeprov_core::{Renderer, RunOptions, load_site_records, run_batch, run_reconciliation};

use crate::cli::{GlobalOpts, ProvisionArgs};
use crate::error::CliError;
use crate::output;

use super::util::{Session, confirm, logout_best_effort};

pub async fn handle(
    session: &Session,
    args: &ProvisionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let records = load_site_records(&args.csv)?;
    let template = std::fs::read_to_string(&args.template)?;

    if records.is_empty() {
        return Err(CliError::Validation {
            field: "csv".into(),
            reason: format!("{} contains no data rows", args.csv.display()),
        });
    }

    let opts = resolve_options(session, args, global)?;

    // Validation runs against the orchestrator even when nothing is
    // uploaded, so every run needs a session.
    session
        .client
        .login(&session.settings.username, &session.settings.password)
        .await?;
    let result = run(session, &template, &records, &opts, global).await;
    logout_best_effort(&session.client).await;
    result
}

/// Turn decision flags into run options, asking interactively for any the
/// operator omitted. Prompts only fire on a terminal, and `--yes` or
/// `--quiet` locks in the flags as given.
fn resolve_options(
    session: &Session,
    args: &ProvisionArgs,
    global: &GlobalOpts,
) -> Result<RunOptions, CliError> {
    let interactive = std::io::stdin().is_terminal() && !global.yes && !global.quiet;

    let upload = args.upload
        || (interactive
            && confirm("Upload rendered preconfigs to the orchestrator?", false)?);

    let auto_apply = upload
        && (args.auto_apply
            || (interactive
                && confirm("Mark preconfigs for automatic application on discovery?", false)?));

    let auto_apply_denied = upload
        && (args.auto_apply_denied
            || (interactive
                && confirm("Approve denied appliances matching an uploaded preconfig?", false)?));

    Ok(RunOptions {
        upload,
        auto_apply,
        auto_apply_denied,
        output_dir: session.settings.output_dir.clone(),
    })
}

async fn run(
    session: &Session,
    template: &str,
    records: &[edgeprov_core::SiteRecord],
    opts: &RunOptions,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let renderer = Renderer::new();

    if !global.quiet {
        println!(
            "Provisioning {} site(s) into {}",
            records.len(),
            opts.output_dir.display()
        );
    }

    let report = run_batch(&session.client, &renderer, template, records, opts).await?;

    if !global.quiet {
        for outcome in &report.outcomes {
            output::print_row(outcome);
        }
        output::print_batch_summary(&report);
    }

    if opts.auto_apply_denied {
        if report.submitted.is_empty() {
            if !global.quiet {
                println!("No submitted preconfigs; skipping approval pass");
            }
            return Ok(());
        }

        if !global.quiet {
            println!("Approving denied appliances that match a submitted preconfig");
        }
        let approvals = run_reconciliation(&session.client, &report.submitted).await?;

        if !global.quiet {
            if approvals.is_empty() {
                println!("No denied appliance matched a submitted preconfig");
            }
            for approval in &approvals {
                output::print_approval(approval);
            }
        }
    }

    Ok(())
}
