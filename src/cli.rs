use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-hemostasis",
    version,
    about = "Coagulation-factor network and lab-panel interpretation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Batch(BatchArgs),
    Factors(FactorsArgs),
    Validate(ValidateArgs),
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, num_args = 1.., help = "Lab panel JSON (repeatable with --timecourse)")]
    pub input: Vec<PathBuf>,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, help = "Scenario preset overriding lab-derived activities")]
    pub scenario: Option<String>,

    #[arg(long, help = "Lab range TSV to overlay on the built-in ranges")]
    pub ranges: Option<PathBuf>,

    #[arg(long, help = "Scenario TSV to overlay on the built-in presets")]
    pub scenarios: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub timecourse: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[arg(long, num_args = 1.., help = "Lab panel JSON files")]
    pub input: Vec<PathBuf>,

    #[arg(long, help = "Output TSV, one row per panel")]
    pub out: PathBuf,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(long)]
    pub ranges: Option<PathBuf>,

    #[arg(long)]
    pub scenarios: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FactorsArgs {
    #[command(subcommand)]
    pub command: FactorsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FactorsCommand {
    Show(FactorsShowArgs),
}

#[derive(Debug, Args)]
pub struct FactorsShowArgs {
    #[arg(long, help = "Show the activity map this scenario produces")]
    pub scenario: Option<String>,

    #[arg(long, help = "Optional scenario TSV to overlay on built-in presets")]
    pub scenarios: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Lab panel JSON")]
    pub input: PathBuf,

    #[arg(long)]
    pub ranges: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    #[arg(long, default_value = "normal")]
    pub scenario: String,

    #[arg(long, default_value_t = 600.0, help = "Simulated time (s)")]
    pub t_end: f64,

    #[arg(long, default_value_t = 0.005, help = "Integration step (s)")]
    pub dt: f64,

    #[arg(long, default_value_t = 25.0, help = "Tissue factor trigger (nM)")]
    pub tf: f64,

    #[arg(long, default_value_t = 1000, help = "Recorded samples")]
    pub t_points: usize,

    #[arg(long, help = "Write decimated trajectories as JSON")]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = 10, help = "Export every Nth sample")]
    pub time_step: usize,

    #[arg(long)]
    pub scenarios: Option<PathBuf>,
}
