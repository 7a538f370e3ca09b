use std::path::Path;

use colored::Colorize;

use roster_journal::ConflictJournal;
use roster_store::{check_branch, BranchStore, Resolution};
use roster_sync::{run_dismissal_sync, run_reconciliation_cycle, CycleReport, DismissalReport};
use roster_types::{BranchId, ConflictId};

use crate::cli::*;
use crate::snapshot;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        branch_a,
        branch_b,
        format,
    } = cli;
    match command {
        Command::Seed(args) => cmd_seed(&branch_a, &branch_b, args),
        Command::Cycle(_) => cmd_cycle(&branch_a, &branch_b, &format),
        Command::Dismissals(_) => cmd_dismissals(&branch_a, &branch_b, &format),
        Command::Conflicts(_) => cmd_conflicts(&branch_a, &branch_b, &format),
        Command::Resolve(args) => cmd_resolve(&branch_a, &branch_b, args),
        Command::Status(_) => cmd_status(&branch_a, &branch_b, &format),
        Command::Verify(_) => cmd_verify(&branch_a, &branch_b, &format),
    }
}

fn cmd_seed(branch_a: &str, branch_b: &str, args: SeedArgs) -> anyhow::Result<()> {
    for path in [branch_a, branch_b] {
        if Path::new(path).exists() && !args.force {
            anyhow::bail!("{path} already exists, pass --force to overwrite");
        }
    }
    let (a, b) = snapshot::seed_branches();
    snapshot::save_branch(branch_a, &a)?;
    snapshot::save_branch(branch_b, &b)?;
    println!(
        "{} Seeded {} and {}",
        "✓".green().bold(),
        branch_a.bold(),
        branch_b.bold()
    );
    for (path, store) in [(branch_a, &a), (branch_b, &b)] {
        println!(
            "  {} ({}): {} employees, {} positions",
            store.branch_id().to_string().yellow(),
            path,
            store.employee_count(),
            store.positions()?.len()
        );
    }
    Ok(())
}

fn cmd_cycle(branch_a: &str, branch_b: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let a = snapshot::load_branch(branch_a)?;
    let b = snapshot::load_branch(branch_b)?;
    let report = run_reconciliation_cycle(&a, &b)?;
    snapshot::save_branch(branch_a, &a)?;
    snapshot::save_branch(branch_b, &b)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_cycle_report(&report),
    }
    Ok(())
}

fn print_cycle_report(report: &CycleReport) {
    println!(
        "{} Cycle {} complete",
        "✓".green().bold(),
        report.cycle.short_id().yellow()
    );
    println!("  Records processed: {}", report.records_processed);
    println!("  Synced: {}", report.synced.to_string().green());
    println!("  Unchanged: {}", report.unchanged);
    println!("  Conflicts opened: {}", warn_count(report.conflicts_opened));
    println!(
        "  Duplicate conflicts skipped: {}",
        report.conflicts_skipped_duplicate
    );
    println!("  Failed: {}", warn_count(report.failed));
    if report.cancelled {
        println!("  {}", "Cancelled between records".yellow());
    }
}

fn cmd_dismissals(branch_a: &str, branch_b: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let a = snapshot::load_branch(branch_a)?;
    let b = snapshot::load_branch(branch_b)?;
    let report = run_dismissal_sync(&a, &b)?;
    snapshot::save_branch(branch_a, &a)?;
    snapshot::save_branch(branch_b, &b)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_dismissal_report(&report, a.branch_id(), b.branch_id()),
    }
    Ok(())
}

fn print_dismissal_report(report: &DismissalReport, id_a: BranchId, id_b: BranchId) {
    println!("{} Dismissal sync complete", "✓".green().bold());
    println!(
        "  Updated in {}: {}",
        id_a.to_string().yellow(),
        report.updated_a.to_string().green()
    );
    println!(
        "  Updated in {}: {}",
        id_b.to_string().yellow(),
        report.updated_b.to_string().green()
    );
    println!("  Failed: {}", warn_count(report.failed));
    if report.cancelled {
        println!("  {}", "Cancelled between records".yellow());
    }
}

fn cmd_conflicts(branch_a: &str, branch_b: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let a = snapshot::load_branch(branch_a)?;
    let b = snapshot::load_branch(branch_b)?;
    match format {
        OutputFormat::Json => {
            let mut all = serde_json::Map::new();
            for store in [&a, &b] {
                let open = store.unresolved_conflicts()?;
                all.insert(store.branch_id().to_string(), serde_json::to_value(open)?);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(all))?
            );
        }
        OutputFormat::Text => {
            for store in [&a, &b] {
                let open = store.unresolved_conflicts()?;
                println!(
                    "{} ({} open)",
                    store.branch_id().to_string().bold(),
                    open.len()
                );
                for conflict in &open {
                    println!(
                        "  {} {}  {}",
                        format!("#{}", conflict.id).yellow().bold(),
                        conflict
                            .detected_at
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                            .dimmed(),
                        conflict.description
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_resolve(branch_a: &str, branch_b: &str, args: ResolveArgs) -> anyhow::Result<()> {
    let a = snapshot::load_branch(branch_a)?;
    let b = snapshot::load_branch(branch_b)?;
    let (store, path) = if a.branch_id() == args.branch {
        (&a, branch_a)
    } else if b.branch_id() == args.branch {
        (&b, branch_b)
    } else {
        anyhow::bail!(
            "no loaded branch has id {} (loaded: {}, {})",
            args.branch,
            a.branch_id(),
            b.branch_id()
        );
    };

    let id = ConflictId::new(args.conflict);
    match ConflictJournal::resolve(store, id)? {
        Resolution::Resolved => println!(
            "{} Conflict {} resolved in {}",
            "✓".green().bold(),
            format!("#{id}").yellow(),
            store.branch_id().to_string().bold()
        ),
        Resolution::AlreadyResolved => println!(
            "Conflict {} was already resolved",
            format!("#{id}").yellow()
        ),
    }
    snapshot::save_branch(path, store)?;
    Ok(())
}

fn cmd_status(branch_a: &str, branch_b: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let a = snapshot::load_branch(branch_a)?;
    let b = snapshot::load_branch(branch_b)?;
    match format {
        OutputFormat::Json => {
            let mut all = serde_json::Map::new();
            for store in [&a, &b] {
                all.insert(
                    store.branch_id().to_string(),
                    serde_json::json!({
                        "employees": store.employee_count(),
                        "active": store.active_employees()?.len(),
                        "fired": store.fired_employees()?.len(),
                        "positions": store.positions()?.len(),
                        "history_entries": store.history()?.len(),
                        "open_conflicts": store.unresolved_conflicts()?.len(),
                    }),
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(all))?
            );
        }
        OutputFormat::Text => {
            for store in [&a, &b] {
                println!("{}", store.branch_id().to_string().bold());
                println!(
                    "  Employees: {} ({} active, {} fired)",
                    store.employee_count(),
                    store.active_employees()?.len().to_string().green(),
                    store.fired_employees()?.len()
                );
                println!("  Positions: {}", store.positions()?.len());
                println!("  History entries: {}", store.history()?.len());
                println!(
                    "  Open conflicts: {}",
                    warn_count(store.unresolved_conflicts()?.len())
                );
            }
        }
    }
    Ok(())
}

fn cmd_verify(branch_a: &str, branch_b: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let a = snapshot::load_branch(branch_a)?;
    let b = snapshot::load_branch(branch_b)?;
    let reports = [check_branch(&a)?, check_branch(&b)?];
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                if report.is_clean() {
                    println!(
                        "{} {}: {} employees checked, no violations",
                        "✓".green().bold(),
                        report.branch.to_string().bold(),
                        report.employees_checked
                    );
                } else {
                    println!(
                        "{} {}: {} violation(s)",
                        "✗".red().bold(),
                        report.branch.to_string().bold(),
                        report.violations.len()
                    );
                    for violation in &report.violations {
                        println!("  {}", violation.description.red());
                    }
                }
            }
        }
    }
    Ok(())
}

fn warn_count(count: usize) -> colored::ColoredString {
    let text = count.to_string();
    if count > 0 {
        text.red().bold()
    } else {
        text.normal()
    }
}
