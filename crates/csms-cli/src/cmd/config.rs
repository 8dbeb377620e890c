use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use csms_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration, defaults filled in
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }

    let p = &config.policy;
    println!("Commission: {}", config.commission.name);
    println!("Port:       {}", config.server.port);
    println!("Policy:");
    println!("  promotion_min_service_years:      {}", p.promotion_min_service_years);
    println!("  probation_months:                 {}", p.probation_months);
    println!("  retirement_notice_months:         {}", p.retirement_notice_months);
    println!("  compulsory_retirement_age:        {}", p.compulsory_retirement_age);
    println!("  voluntary_retirement_age:         {}", p.voluntary_retirement_age);
    println!("  nearing_retirement_window_months: {}", p.nearing_retirement_window_months);
    println!("  notification_limit:               {}", p.notification_limit);
    println!("  employee_search_limit:            {}", p.employee_search_limit);
    println!("  recent_activity_limit:            {}", p.recent_activity_limit);
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
