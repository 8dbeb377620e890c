use crate::output::print_json;
use anyhow::Context;
use csms_core::init::{init, InitOptions};
use std::path::Path;

pub fn run(
    root: &Path,
    name: &str,
    admin_username: &str,
    admin_password: &str,
    json: bool,
) -> anyhow::Result<()> {
    let opts = InitOptions {
        commission_name: name.to_string(),
        admin_username: admin_username.to_string(),
        admin_password: admin_password.to_string(),
    };
    let report = init(root, &opts)
        .with_context(|| format!("failed to initialise {}", root.display()))?;

    if json {
        return print_json(&report);
    }

    println!("Initializing CSMS in: {}", root.display());
    let status = |created: bool| if created { "created:" } else { "exists: " };
    println!("  {} .csms/config.yaml", status(report.created_config));
    println!("  {} .csms/state.yaml", status(report.created_state));
    println!("  seeded:  {} institutions", report.institutions_seeded);
    match &report.admin_created {
        Some(_) => println!("  created: ADMIN account '{admin_username}'"),
        None => println!("  exists:  account '{admin_username}'"),
    }
    Ok(())
}
