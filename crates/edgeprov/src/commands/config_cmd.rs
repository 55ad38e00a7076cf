//! Config file commands: show the path, write a starter profile.

use edgeprov_config::{Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigCommand, ConfigInitArgs, GlobalOpts};
use crate::error::CliError;

pub fn handle(cmd: ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
        ConfigCommand::Init(args) => init(args, global),
    }
}

fn init(args: ConfigInitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();

    cfg.profiles.insert(
        args.name.clone(),
        Profile {
            orchestrator: args.orchestrator,
            username: args.username,
            password: None,
            auth_mode: "local".into(),
            verify_tls: global.verify_tls,
            timeout: global.timeout,
            output_dir: None,
        },
    );
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(args.name.clone());
    }

    save_config(&cfg)?;
    println!("Wrote profile '{}' to {}", args.name, config_path().display());
    println!("Set ORCH_PASSWORD in the environment before provisioning.");
    Ok(())
}
