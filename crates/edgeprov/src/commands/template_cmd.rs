//! Template inspection commands; no orchestrator connection involved.

use edgeprov_core::record::{FIELD_HOSTNAME, FIELD_SERIAL_NUMBER};
use edgeprov_core::referenced_fields;

use crate::cli::{TemplateCommand, TemplateSkeletonArgs, TemplateVarsArgs};
use crate::error::CliError;

pub fn handle(cmd: &TemplateCommand) -> Result<(), CliError> {
    match cmd {
        TemplateCommand::Vars(args) => vars(args),
        TemplateCommand::Skeleton(args) => skeleton(args),
    }
}

/// Print each CSV field the template references, one per line.
fn vars(args: &TemplateVarsArgs) -> Result<(), CliError> {
    let template = std::fs::read_to_string(&args.template)?;
    for field in referenced_fields(&template) {
        println!("{field}");
    }
    Ok(())
}

/// Emit a CSV header row covering the required columns plus every field
/// the template references.
fn skeleton(args: &TemplateSkeletonArgs) -> Result<(), CliError> {
    let template = std::fs::read_to_string(&args.template)?;

    let mut columns = vec![FIELD_HOSTNAME.to_owned(), FIELD_SERIAL_NUMBER.to_owned()];
    for field in referenced_fields(&template) {
        if !columns.contains(&field) {
            columns.push(field);
        }
    }
    let header = columns.join(",");

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{header}\n"))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{header}"),
    }
    Ok(())
}
