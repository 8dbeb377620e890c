use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use csms_core::institution::Institution;
use std::path::Path;

#[derive(Subcommand)]
pub enum InstitutionSubcommand {
    /// List all institutions
    List,
    /// Register a new institution
    Create { name: String },
    /// Rename an institution
    Rename { id: String, name: String },
    /// Delete an institution that no user or employee references
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: InstitutionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        InstitutionSubcommand::List => list(root, json),
        InstitutionSubcommand::Create { name } => {
            let inst = Institution::create(root, &name)
                .with_context(|| format!("failed to create institution '{name}'"))?;
            show(&inst, "Created", json)
        }
        InstitutionSubcommand::Rename { id, name } => {
            let inst = Institution::rename(root, &id, &name)
                .with_context(|| format!("failed to rename institution '{id}'"))?;
            show(&inst, "Renamed", json)
        }
        InstitutionSubcommand::Delete { id } => {
            Institution::delete(root, &id)
                .with_context(|| format!("failed to delete institution '{id}'"))?;
            if json {
                print_json(&serde_json::json!({ "deleted": id }))
            } else {
                println!("Deleted institution '{id}'.");
                Ok(())
            }
        }
    }
}

fn show(inst: &Institution, verb: &str, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(inst)
    } else {
        println!("{verb} institution '{}' ({}).", inst.name, inst.id);
        Ok(())
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let institutions = Institution::list(root).context("failed to list institutions")?;

    if json {
        return print_json(&institutions);
    }
    if institutions.is_empty() {
        println!("No institutions.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = institutions
        .iter()
        .map(|i| vec![i.id.clone(), i.name.clone()])
        .collect();
    print_table(&["ID", "NAME"], rows);
    Ok(())
}
