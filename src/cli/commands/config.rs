//! Config Command
//!
//! Manage RepoWiki configuration.
//!
//! Usage:
//!   repowiki config show [-f json]
//!   repowiki config path
//!   repowiki config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::Result;

/// Show the effective configuration (all sources merged)
pub fn show(config: &Config, format: &str) -> Result<()> {
    let rendered = ConfigLoader::render(config, format == "json")?;
    if format != "json" {
        println!("# Effective configuration\n");
    }
    println!("{}", rendered);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let path = ConfigLoader::init_global(force)?;
    Output::new().success("Initialized global configuration");
    println!("  Config: {}", path.display());
    Ok(())
}

/// Initialize project configuration
pub fn init_project(force: bool) -> Result<()> {
    let path = ConfigLoader::project_config_path();
    let out = Output::new();
    if ConfigLoader::init_at(&path, force)? {
        out.success("Initialized project configuration");
    } else {
        out.warning("Project configuration already exists (use --force to overwrite)");
    }
    println!("  Config: {}", path.display());
    Ok(())
}
