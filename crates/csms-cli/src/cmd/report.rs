use crate::cmd::resolve_actor;
use crate::output::{print_json, print_table};
use anyhow::Context;
use csms_core::report::{self, ReportFilter, ReportKind};
use serde_json::Value;
use std::path::Path;

pub fn run(
    root: &Path,
    kind: &str,
    username: &str,
    filter: ReportFilter,
    json: bool,
) -> anyhow::Result<()> {
    let kind: ReportKind = kind.parse()?;
    let actor = resolve_actor(root, username)?;
    let report = report::generate(root, &actor, kind, &filter)
        .with_context(|| format!("failed to generate {kind} report"))?;

    if json {
        return print_json(&report);
    }

    println!("{}", report.title);
    println!();
    if report.rows.is_empty() {
        println!("No data.");
        return Ok(());
    }

    let headers: Vec<&str> = report.headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            report
                .data_keys
                .iter()
                .map(|k| cell(row.get(k)))
                .collect()
        })
        .collect();
    print_table(&headers, rows);

    if !report.totals.is_empty() {
        println!();
        for (k, v) in &report.totals {
            println!("{k}: {}", cell(Some(v)));
        }
    }
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
