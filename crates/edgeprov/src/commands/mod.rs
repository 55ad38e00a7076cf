//! Command dispatch: bridges CLI args to the core drivers.

pub mod config_cmd;
pub mod provision;
pub mod teardown;
pub mod template_cmd;
pub mod util;
