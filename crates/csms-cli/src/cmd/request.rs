use crate::cmd::resolve_actor;
use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use csms_core::request::{Request, RequestFilter, RequestView};
use csms_core::track::{self, TrackQuery};
use csms_core::types::RequestType;
use std::path::Path;

#[derive(Subcommand)]
pub enum RequestSubcommand {
    /// Requests visible to a user, newest first
    List {
        #[arg(long = "as", value_name = "USERNAME")]
        actor: String,
        /// Request type, e.g. confirmation, lwop, cadre-change
        #[arg(long = "type")]
        request_type: Option<String>,
        /// Only requests waiting on this user
        #[arg(long)]
        mine: bool,
    },
    /// Show one request with its history
    Show {
        id: String,
        #[arg(long = "as", value_name = "USERNAME")]
        actor: String,
    },
    /// Flat tracking view with optional filters
    Track {
        #[arg(long = "as", value_name = "USERNAME")]
        actor: String,
        #[arg(long)]
        zan_id: Option<String>,
        /// Institution name
        #[arg(long)]
        institution: Option<String>,
        /// Status label, e.g. "Pending HRMO Review"
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: RequestSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        RequestSubcommand::List {
            actor,
            request_type,
            mine,
        } => {
            let request_type = request_type
                .as_deref()
                .map(str::parse::<RequestType>)
                .transpose()?;
            let filter = RequestFilter {
                request_type,
                assigned_to_me: mine,
                ..Default::default()
            };
            list(root, &actor, &filter, json)
        }
        RequestSubcommand::Show { id, actor } => show(root, &id, &actor, json),
        RequestSubcommand::Track {
            actor,
            zan_id,
            institution,
            status,
            from,
            to,
        } => {
            let query = TrackQuery {
                zan_id,
                institution_name: institution,
                status,
                from,
                to,
            };
            track_requests(root, &actor, &query, json)
        }
    }
}

fn list(root: &Path, username: &str, filter: &RequestFilter, json: bool) -> anyhow::Result<()> {
    let actor = resolve_actor(root, username)?;
    let views: Vec<RequestView> = Request::list_visible(root, &actor, filter)
        .context("failed to list requests")?
        .into_iter()
        .map(RequestView::from)
        .collect();

    if json {
        return print_json(&views);
    }
    if views.is_empty() {
        println!("No requests.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|v| {
            vec![
                v.request.id.clone(),
                v.request.request_type.short_label().to_string(),
                v.request.employee_id.clone(),
                v.status_label.clone(),
                v.request.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "TYPE", "EMPLOYEE", "STATUS", "UPDATED"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, username: &str, json: bool) -> anyhow::Result<()> {
    let actor = resolve_actor(root, username)?;
    let view = RequestView::from(
        Request::get_visible(root, &actor, id).with_context(|| format!("cannot show request '{id}'"))?,
    );

    if json {
        return print_json(&view);
    }

    let r = &view.request;
    println!("Request:   {} ({})", r.id, view.type_label);
    println!("Employee:  {}", r.employee_id);
    println!("Status:    {}", view.status_label);
    println!("Stage:     {}", view.stage);
    println!("Version:   {}", r.version);
    println!("History:");
    for h in &r.history {
        println!(
            "  {}  {:<9} {:<7} -> {}{}",
            h.at.format("%Y-%m-%d %H:%M"),
            h.action,
            h.actor_role.as_str(),
            h.to.label(r.request_type),
            h.reason.as_deref().map(|s| format!(" ({s})")).unwrap_or_default()
        );
    }
    Ok(())
}

fn track_requests(root: &Path, username: &str, query: &TrackQuery, json: bool) -> anyhow::Result<()> {
    let actor = resolve_actor(root, username)?;
    let rows = track::track(root, &actor, query).context("failed to track requests")?;

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No matching requests.");
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|t| {
            vec![
                t.zan_id.clone(),
                t.employee_name.clone(),
                t.request_type.to_string(),
                t.status.clone(),
                t.employee_institution.clone(),
                t.submission_date.format("%Y-%m-%d").to_string(),
                or_dash(t.rejection_reason.as_deref()),
            ]
        })
        .collect();
    print_table(
        &["ZAN-ID", "EMPLOYEE", "TYPE", "STATUS", "INSTITUTION", "SUBMITTED", "REASON"],
        table,
    );
    Ok(())
}
