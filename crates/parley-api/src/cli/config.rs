//! `parley config`: show where the client looks and what it resolved.

use anyhow::Result;
use console::style;

use crate::state::AppState;

pub fn show_config(state: &AppState, json: bool) -> Result<()> {
    let config_path = state.data_dir.join("config.toml");

    if json {
        let out = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "config_file": config_path.display().to_string(),
            "config_file_exists": config_path.exists(),
            "base_url": state.config.base_url,
            "request_timeout_secs": state.config.request_timeout_secs,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Data dir:").bold(), state.data_dir.display());
    println!(
        "  {} {}{}",
        style("Config:").bold(),
        config_path.display(),
        if config_path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("  {} {}", style("Backend:").bold(), style(&state.config.base_url).cyan());
    println!(
        "  {} {}s",
        style("Timeout:").bold(),
        state.config.request_timeout_secs
    );
    println!();

    Ok(())
}
