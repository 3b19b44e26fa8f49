//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use alchemist::{EntityKind, ProviderChoice, RuleDraft, WeightPreset};

/// Data Alchemist: clean client, worker and task tables and configure
/// allocation rules
#[derive(Parser)]
#[command(name = "alchemist")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (environment variables still apply on top)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Where the three tables come from.
///
/// Tables not given explicitly start from the samples directory, or the
/// bundled samples when no directory is configured.
#[derive(Args, Clone, Debug, Default)]
pub struct DataArgs {
    /// Clients CSV
    #[arg(long, value_name = "FILE")]
    pub clients: Option<PathBuf>,

    /// Workers CSV
    #[arg(long, value_name = "FILE")]
    pub workers: Option<PathBuf>,

    /// Tasks CSV
    #[arg(long, value_name = "FILE")]
    pub tasks: Option<PathBuf>,

    /// Directory holding clients.csv, workers.csv and tasks.csv
    #[arg(long, value_name = "DIR")]
    pub samples_dir: Option<PathBuf>,
}

impl DataArgs {
    /// Explicit table files, paired with their entity.
    pub fn files(&self) -> Vec<(EntityKind, PathBuf)> {
        [
            (EntityKind::Clients, &self.clients),
            (EntityKind::Workers, &self.workers),
            (EntityKind::Tasks, &self.tasks),
        ]
        .into_iter()
        .filter_map(|(entity, path)| path.clone().map(|p| (entity, p)))
        .collect()
    }
}

/// AI gateway selection.
#[derive(Args, Clone, Debug, Default)]
pub struct LlmArgs {
    /// AI provider (none, mock, gemini, anthropic)
    #[arg(long)]
    pub llm: Option<ProviderChoice>,

    /// Model to use (provider-specific, e.g., "gemini-1.5-flash")
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the tables and list every error
    Validate {
        #[command(flatten)]
        data: DataArgs,

        /// Only show one table
        #[arg(short, long)]
        entity: Option<EntityKind>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter a table with a query like "Duration > 2"
    Search {
        /// Table to search (clients, workers, tasks)
        #[arg(value_name = "ENTITY")]
        entity: EntityKind,

        /// Single comparison: <field> <op> <integer>
        #[arg(value_name = "QUERY")]
        query: String,

        #[command(flatten)]
        data: DataArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the cleaned CSVs and rules.json
    Export {
        #[command(flatten)]
        data: DataArgs,

        /// Output directory (default: configured export dir, or ".")
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Existing rules.json whose rules and weights are carried over
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Apply a weight preset before exporting
        #[arg(long)]
        preset: Option<WeightPreset>,
    },

    /// Manage allocation rules in a rules.json file
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Start the JSON HTTP API
    Serve {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        llm: LlmArgs,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Subcommand)]
pub enum RuleAction {
    /// Add a rule from one of the four templates
    Add {
        /// Rule template
        #[arg(value_enum)]
        template: RuleTemplate,

        /// Comma-separated task IDs (co-run)
        #[arg(long)]
        tasks: Option<String>,

        /// Worker group (slot-restriction, load-limit)
        #[arg(long)]
        group: Option<String>,

        /// Min common slots (slot-restriction) or max slots per phase (load-limit)
        #[arg(long)]
        slots: Option<String>,

        /// Task ID (phase-window)
        #[arg(long)]
        task: Option<String>,

        /// Comma-separated allowed phases (phase-window)
        #[arg(long)]
        phases: Option<String>,

        /// Rules file to update
        #[arg(long, default_value = "rules.json", value_name = "FILE")]
        rules: PathBuf,
    },

    /// Turn a plain-English description into a rule
    FromText {
        /// Rule description, e.g. "T1 and T2 must run together"
        #[arg(value_name = "TEXT")]
        text: String,

        #[command(flatten)]
        llm: LlmArgs,

        /// Rules file to update
        #[arg(long, default_value = "rules.json", value_name = "FILE")]
        rules: PathBuf,

        /// Print the rule without saving it
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the AI gateway for rule recommendations
    Recommend {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        llm: LlmArgs,

        /// Rules file to read (and update with --apply)
        #[arg(long, default_value = "rules.json", value_name = "FILE")]
        rules: PathBuf,

        /// Add every recommendation to the rules file
        #[arg(long)]
        apply: bool,
    },

    /// List the rules and weights in a rules file
    List {
        /// Rules file to read
        #[arg(long, default_value = "rules.json", value_name = "FILE")]
        rules: PathBuf,
    },
}

/// The four manual rule templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuleTemplate {
    CoRun,
    SlotRestriction,
    LoadLimit,
    PhaseWindow,
}

impl RuleTemplate {
    /// Turn the template and its form fields into a draft. Missing fields are
    /// passed through blank so the draft reports them.
    pub fn draft(
        self,
        tasks: Option<String>,
        group: Option<String>,
        slots: Option<String>,
        task: Option<String>,
        phases: Option<String>,
    ) -> RuleDraft {
        match self {
            RuleTemplate::CoRun => RuleDraft::CoRun {
                tasks: tasks.unwrap_or_default(),
            },
            RuleTemplate::SlotRestriction => RuleDraft::SlotRestriction {
                worker_group: group.unwrap_or_default(),
                min_slots: slots.unwrap_or_default(),
            },
            RuleTemplate::LoadLimit => RuleDraft::LoadLimit {
                worker_group: group.unwrap_or_default(),
                max_slots: slots.unwrap_or_default(),
            },
            RuleTemplate::PhaseWindow => RuleDraft::PhaseWindow {
                task_id: task.unwrap_or_default(),
                allowed_phases: phases.unwrap_or_default(),
            },
        }
    }
}
