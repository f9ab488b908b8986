//! Information display

use crate::cli::output::print_config;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
