mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, employee::EmployeeSubcommand, institution::InstitutionSubcommand,
    request::RequestSubcommand, user::UserSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "csms",
    about = "Civil service management: employees, HR requests and commission decisions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: nearest directory containing .csms/)
    #[arg(long, global = true, env = "CSMS_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data tree, seed institutions and an ADMIN account
    Init {
        /// Commission name written to config.yaml
        #[arg(long, default_value = "Civil Service Commission")]
        name: String,
        #[arg(long, default_value = "admin")]
        admin_username: String,
        #[arg(long, env = "CSMS_ADMIN_PASSWORD", default_value = "admin123")]
        admin_password: String,
    },

    /// Run the JSON API server
    Serve {
        /// Port to listen on (default: server.port from config.yaml)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage institutions
    Institution {
        #[command(subcommand)]
        subcommand: InstitutionSubcommand,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Manage employee records
    Employee {
        #[command(subcommand)]
        subcommand: EmployeeSubcommand,
    },

    /// Inspect HR requests
    Request {
        #[command(subcommand)]
        subcommand: RequestSubcommand,
    },

    /// Dashboard counters and recent activity for a user
    Dashboard {
        /// Username whose view to show
        #[arg(long = "as", value_name = "USERNAME")]
        actor: String,
    },

    /// Generate a report: confirmation, promotion, contractual or request-status
    Report {
        kind: String,
        #[arg(long = "as", value_name = "USERNAME")]
        actor: String,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Institution id
        #[arg(long)]
        institution: Option<String>,
    },

    /// Show or validate config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init {
            name,
            admin_username,
            admin_password,
        } => cmd::init::run(&root, &name, &admin_username, &admin_password, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
        Commands::Institution { subcommand } => cmd::institution::run(&root, subcommand, cli.json),
        Commands::User { subcommand } => cmd::user::run(&root, subcommand, cli.json),
        Commands::Employee { subcommand } => cmd::employee::run(&root, subcommand, cli.json),
        Commands::Request { subcommand } => cmd::request::run(&root, subcommand, cli.json),
        Commands::Dashboard { actor } => cmd::dashboard::run(&root, &actor, cli.json),
        Commands::Report {
            kind,
            actor,
            from,
            to,
            institution,
        } => cmd::report::run(
            &root,
            &kind,
            &actor,
            csms_core::report::ReportFilter {
                from,
                to,
                institution_id: institution,
            },
            cli.json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
