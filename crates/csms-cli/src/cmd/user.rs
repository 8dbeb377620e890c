use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use csms_core::types::Role;
use csms_core::user::{NewUser, User, UserUpdate, UserView};
use std::path::Path;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// List all accounts
    List,
    /// Create an account
    Create {
        #[arg(long)]
        username: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// HRO, HHRMD, HRMO, DO, EMPLOYEE, CSCS, HRRP, PO or ADMIN
        #[arg(long)]
        role: String,
        /// Institution id
        #[arg(long)]
        institution: String,
        /// Employee id, required for EMPLOYEE accounts
        #[arg(long)]
        employee: Option<String>,
    },
    /// Block an account from logging in
    Deactivate { username: String },
}

pub fn run(root: &Path, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::List => list(root, json),
        UserSubcommand::Create {
            username,
            name,
            password,
            role,
            institution,
            employee,
        } => {
            let role: Role = role.parse()?;
            let user = User::create(
                root,
                NewUser {
                    name,
                    username: username.clone(),
                    password,
                    role,
                    institution_id: institution,
                    employee_id: employee,
                },
            )
            .with_context(|| format!("failed to create user '{username}'"))?;
            if json {
                print_json(&user.view())
            } else {
                println!("Created {} account '{}' ({}).", user.role, user.username, user.id);
                Ok(())
            }
        }
        UserSubcommand::Deactivate { username } => {
            let user = User::find_by_username(root, &username)
                .context("failed to load users")?
                .with_context(|| format!("no user named '{username}'"))?;
            let user = User::update(
                root,
                &user.id,
                UserUpdate {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .with_context(|| format!("failed to deactivate '{username}'"))?;
            if json {
                print_json(&user.view())
            } else {
                println!("Deactivated '{username}'.");
                Ok(())
            }
        }
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let users: Vec<UserView> = User::list(root)
        .context("failed to list users")?
        .iter()
        .map(UserView::from)
        .collect();

    if json {
        return print_json(&users);
    }
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.username.clone(),
                u.name.clone(),
                u.role.to_string(),
                u.institution_id.clone(),
                or_dash(u.employee_id.as_deref()),
                if u.active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["USERNAME", "NAME", "ROLE", "INSTITUTION", "EMPLOYEE", "ACTIVE"],
        rows,
    );
    Ok(())
}
