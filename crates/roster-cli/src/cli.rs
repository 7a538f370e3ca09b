use clap::{Args, Parser, Subcommand};
use roster_types::BranchId;

#[derive(Parser)]
#[command(
    name = "rosterctl",
    about = "Cross-branch employee roster reconciliation",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot file backing the first branch
    #[arg(long, global = true, default_value = "filial1.json")]
    pub branch_a: String,

    /// Snapshot file backing the second branch
    #[arg(long, global = true, default_value = "filial2.json")]
    pub branch_b: String,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write demo rosters for both branches
    Seed(SeedArgs),
    /// Run one full reconciliation cycle
    Cycle(CycleArgs),
    /// Run the standalone dismissal pass
    Dismissals(DismissalsArgs),
    /// List unresolved conflicts in both branches
    Conflicts(ConflictsArgs),
    /// Mark a journaled conflict resolved
    Resolve(ResolveArgs),
    /// Show per-branch roster counts
    Status(StatusArgs),
    /// Check per-branch roster invariants
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct SeedArgs {
    /// Overwrite existing snapshot files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CycleArgs {}
#[derive(Args)]
pub struct DismissalsArgs {}
#[derive(Args)]
pub struct ConflictsArgs {}

#[derive(Args)]
pub struct ResolveArgs {
    /// Branch holding the conflict, e.g. "1" or "branch-1"
    #[arg(long)]
    pub branch: BranchId,
    /// Conflict id to resolve
    pub conflict: u64,
}

#[derive(Args)]
pub struct StatusArgs {}
#[derive(Args)]
pub struct VerifyArgs {}
