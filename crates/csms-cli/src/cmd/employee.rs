use crate::cmd::today;
use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use csms_core::config::Config;
use csms_core::employee::{Employee, NewEmployee};
use csms_core::types::{EmployeeStatus, Gender};
use std::path::Path;

#[derive(Subcommand)]
pub enum EmployeeSubcommand {
    /// List employees, optionally filtered by name, ZAN-ID or cadre
    List {
        #[arg(long)]
        q: Option<String>,
    },
    /// Show one employee by ZAN-ID
    Show { zan_id: String },
    /// Register an employee
    Add {
        #[arg(long)]
        zan_id: String,
        #[arg(long)]
        name: String,
        /// male or female
        #[arg(long)]
        gender: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,
        /// Institution id
        #[arg(long)]
        institution: String,
        #[arg(long)]
        cadre: Option<String>,
        /// Employment date (YYYY-MM-DD)
        #[arg(long)]
        employment_date: Option<String>,
        /// e.g. Full-time, Contract
        #[arg(long)]
        contract_type: Option<String>,
        /// Mark the employee as already confirmed
        #[arg(long)]
        confirmed: bool,
    },
    /// Overdue probations and upcoming retirements in one institution
    Urgent {
        #[arg(long)]
        institution: String,
    },
}

pub fn run(root: &Path, subcmd: EmployeeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        EmployeeSubcommand::List { q } => list(root, q.as_deref(), json),
        EmployeeSubcommand::Show { zan_id } => show(root, &zan_id, json),
        EmployeeSubcommand::Add {
            zan_id,
            name,
            gender,
            dob,
            institution,
            cadre,
            employment_date,
            contract_type,
            confirmed,
        } => {
            let new = NewEmployee {
                zan_id: zan_id.clone(),
                name,
                gender: parse_gender(gender.as_deref())?,
                date_of_birth: parse_date("dob", &dob)?,
                institution_id: institution,
                place_of_birth: None,
                region: None,
                phone_number: None,
                zssf_number: None,
                payroll_number: None,
                cadre,
                salary_scale: None,
                ministry: None,
                department: None,
                appointment_type: None,
                contract_type,
                employment_date: employment_date
                    .as_deref()
                    .map(|d| parse_date("employment-date", d))
                    .transpose()?,
                confirmation_date: None,
                retirement_date: None,
                status: confirmed.then_some(EmployeeStatus::Confirmed),
                certificates: Vec::new(),
            };
            let employee = Employee::create(root, new)
                .with_context(|| format!("failed to add employee '{zan_id}'"))?;
            if json {
                print_json(&employee)
            } else {
                println!("Added {} ({}), id {}.", employee.name, employee.zan_id, employee.id);
                Ok(())
            }
        }
        EmployeeSubcommand::Urgent { institution } => urgent(root, &institution, json),
    }
}

fn parse_date(field: &str, s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("--{field} must be YYYY-MM-DD, got '{s}'"))
}

fn parse_gender(s: Option<&str>) -> anyhow::Result<Gender> {
    match s.map(|g| g.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("n/a") => Ok(Gender::NotApplicable),
        Some("male") | Some("m") => Ok(Gender::Male),
        Some("female") | Some("f") => Ok(Gender::Female),
        Some(other) => anyhow::bail!("unknown gender '{other}' (expected male or female)"),
    }
}

fn rows(employees: &[Employee]) -> Vec<Vec<String>> {
    employees
        .iter()
        .map(|e| {
            vec![
                e.zan_id.clone(),
                e.name.clone(),
                or_dash(e.cadre.as_deref()),
                e.institution_id.clone(),
                e.status.to_string(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 5] = ["ZAN-ID", "NAME", "CADRE", "INSTITUTION", "STATUS"];

fn list(root: &Path, q: Option<&str>, json: bool) -> anyhow::Result<()> {
    let limit = Config::load(root)
        .context("failed to load config")?
        .policy
        .employee_search_limit;
    let needle = q.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    let mut employees: Vec<Employee> = Employee::list(root)
        .context("failed to list employees")?
        .into_iter()
        .filter(|e| {
            needle.as_deref().map_or(true, |n| {
                e.name.to_lowercase().contains(n)
                    || e.zan_id.to_lowercase().contains(n)
                    || e.cadre.as_deref().is_some_and(|c| c.to_lowercase().contains(n))
            })
        })
        .collect();
    employees.truncate(limit);

    if json {
        return print_json(&employees);
    }
    if employees.is_empty() {
        println!("No employees.");
        return Ok(());
    }
    print_table(&HEADERS, rows(&employees));
    Ok(())
}

fn show(root: &Path, zan_id: &str, json: bool) -> anyhow::Result<()> {
    let employee = Employee::find_by_zan_id(root, zan_id)
        .context("failed to load employees")?
        .with_context(|| format!("no employee with ZAN-ID '{zan_id}'"))?;

    if json {
        return print_json(&employee);
    }

    println!("Employee:    {} ({})", employee.name, employee.zan_id);
    println!("Id:          {}", employee.id);
    println!("Gender:      {}", employee.gender);
    println!("Born:        {}", employee.date_of_birth);
    println!("Institution: {}", employee.institution_id);
    println!("Cadre:       {}", or_dash(employee.cadre.as_deref()));
    println!("Status:      {}", employee.status);
    if let Some(d) = employee.employment_date {
        println!("Employed:    {d}");
    }
    if let Some(d) = employee.confirmation_date {
        println!("Confirmed:   {d}");
    }
    if let Some(d) = employee.retirement_date {
        println!("Retirement:  {d}");
    }
    Ok(())
}

fn urgent(root: &Path, institution: &str, json: bool) -> anyhow::Result<()> {
    let policy = Config::load(root).context("failed to load config")?.policy;
    let urgent = Employee::urgent_actions(root, institution, &policy, today())
        .with_context(|| format!("failed to compute urgent actions for '{institution}'"))?;

    if json {
        return print_json(&urgent);
    }

    println!("Probation overdue ({}):", urgent.probation_overdue.len());
    if !urgent.probation_overdue.is_empty() {
        print_table(&HEADERS, rows(&urgent.probation_overdue));
    }
    println!();
    println!("Nearing retirement ({}):", urgent.nearing_retirement.len());
    if !urgent.nearing_retirement.is_empty() {
        print_table(&HEADERS, rows(&urgent.nearing_retirement));
    }
    Ok(())
}
