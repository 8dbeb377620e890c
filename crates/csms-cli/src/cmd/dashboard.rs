use crate::cmd::{resolve_actor, today};
use crate::output::{print_json, print_table};
use anyhow::Context;
use csms_core::dashboard;
use std::path::Path;

pub fn run(root: &Path, username: &str, json: bool) -> anyhow::Result<()> {
    let actor = resolve_actor(root, username)?;
    let summary = dashboard::summary(root, &actor, today()).context("failed to build dashboard")?;

    if json {
        return print_json(&summary);
    }

    let s = &summary.stats;
    println!("Dashboard for {} ({})", actor.name, actor.role);
    println!("  Employees:              {}", s.total_employees);
    println!("  Pending confirmations:  {}", s.pending_confirmations);
    println!("  Pending promotions:     {}", s.pending_promotions);
    println!("  On LWOP:                {}", s.employees_on_lwop);
    println!("  Pending terminations:   {}", s.pending_terminations);
    println!("  Open complaints:        {}", s.open_complaints);
    if let Some(n) = s.urgent_actions {
        println!("  Urgent actions:         {n}");
    }

    if summary.recent_activities.is_empty() {
        return Ok(());
    }
    println!();
    let rows: Vec<Vec<String>> = summary
        .recent_activities
        .iter()
        .map(|a| {
            vec![
                a.request_type.to_string(),
                a.employee.clone(),
                a.status.clone(),
                a.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["TYPE", "EMPLOYEE", "STATUS", "UPDATED"], rows);
    Ok(())
}
