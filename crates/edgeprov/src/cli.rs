//! Clap derive structures for the `edgeprov` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// edgeprov -- bulk provisioning for SD-WAN edge appliances
#[derive(Debug, Parser)]
#[command(
    name = "edgeprov",
    version,
    about = "Provision fleets of SD-WAN edge appliances from a CSV and a template",
    long_about = "Renders per-site configuration documents from a CSV of site records\n\
        and a Jinja-style template, uploads them to the orchestrator as\n\
        preconfigs, and approves matching discovered appliances.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Orchestrator profile to use
    #[arg(long, short = 'p', env = "EDGEPROV_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Orchestrator URL or hostname (overrides profile)
    #[arg(long, short = 'c', env = "ORCH_URL", global = true)]
    pub orchestrator: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Verify the orchestrator's TLS certificate (self-signed certs are
    /// accepted by default)
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EDGEPROV_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render, validate, and optionally upload preconfigs for every CSV row
    #[command(alias = "prov")]
    Provision(ProvisionArgs),

    /// Reverse a provisioning run: delete preconfigs, remove appliances,
    /// clean local outputs
    Teardown(TeardownArgs),

    /// Inspect a template without touching the orchestrator
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Manage configuration profiles
    #[command(subcommand)]
    Config(ConfigCommand),
}

// ── Provision ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// CSV of site records (columns: hostname, serial_number, ...)
    #[arg(long)]
    pub csv: PathBuf,

    /// Jinja-style template for the per-site document
    #[arg(long)]
    pub template: PathBuf,

    /// Upload each validated document to the orchestrator
    #[arg(long, short = 'u')]
    pub upload: bool,

    /// Mark uploaded preconfigs for automatic application on discovery
    #[arg(long, requires = "upload")]
    pub auto_apply: bool,

    /// After the batch, approve denied appliances that match an uploaded
    /// preconfig by site name
    #[arg(long, requires = "upload")]
    pub auto_apply_denied: bool,

    /// Directory for rendered documents
    #[arg(long, short = 'd')]
    pub output_dir: Option<PathBuf>,
}

// ── Teardown ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TeardownArgs {
    /// CSV of site records whose provisioning should be reversed
    #[arg(long)]
    pub csv: PathBuf,

    /// Directory of rendered documents to remove
    #[arg(long, short = 'd')]
    pub output_dir: Option<PathBuf>,

    /// Only delete preconfigs; skip appliance removal and local cleanup
    #[arg(long, conflicts_with_all = ["appliances_only", "local_only"])]
    pub preconfigs_only: bool,

    /// Only remove appliances for rediscovery
    #[arg(long, conflicts_with = "local_only")]
    pub appliances_only: bool,

    /// Only remove the local output directory
    #[arg(long)]
    pub local_only: bool,
}

// ── Template ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List the CSV fields a template references
    Vars(TemplateVarsArgs),

    /// Emit a CSV header row covering every field a template references
    Skeleton(TemplateSkeletonArgs),
}

#[derive(Debug, Args)]
pub struct TemplateVarsArgs {
    /// Template file to scan
    #[arg(long)]
    pub template: PathBuf,
}

#[derive(Debug, Args)]
pub struct TemplateSkeletonArgs {
    /// Template file to scan
    #[arg(long)]
    pub template: PathBuf,

    /// Write the header row to this CSV file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Write a starter config with one profile
    Init(ConfigInitArgs),
}

#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Orchestrator URL or hostname
    pub orchestrator: String,

    /// Username for session login
    #[arg(long)]
    pub username: Option<String>,

    /// Profile name to create
    #[arg(long, default_value = "default")]
    pub name: String,
}
