//! BusLog - business logic documentation for your codebase.
//!
//! Scans a project, generates an AI analysis prompt and manages the workflow
//! documents stored in `.business-logic/`.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use buslog::{analysis_report, assemble_prompt, StoreError, WorkflowStore};

/// Business logic documentation tool
#[derive(Parser)]
#[command(name = "buslog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Project root
    #[arg(short, long, global = true, env = "BUSLOG_ROOT", default_value = ".")]
    root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the .business-logic folder in the project
    Init {
        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Re-initialize even if already initialized
        #[arg(short, long)]
        force: bool,
    },

    /// Create a new workflow document
    Add {
        /// Name of the workflow (e.g. "User Authentication")
        name: String,
    },

    /// List documented workflows
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a workflow document
    Show {
        /// Workflow identifier
        name: String,
    },

    /// Generate an AI prompt to analyze the codebase
    Analyze {
        /// Write the prompt to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show detected languages, frameworks and entry points
    Report {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the project configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let root = cli.root.as_path();

    match cli.command {
        Commands::Init { name, force } => cmd_init(root, name.as_deref(), force)?,
        Commands::Add { name } => cmd_add(root, &name)?,
        Commands::List { format } => cmd_list(root, &format)?,
        Commands::Show { name } => cmd_show(root, &name)?,
        Commands::Analyze { output } => cmd_analyze(root, output.as_deref())?,
        Commands::Report { format } => cmd_report(root, &format)?,
        Commands::Config => cmd_config(root)?,
        Commands::Completions { shell } => cmd_completions(shell),
    }

    Ok(())
}

/// Open the store, failing when it has not been initialized.
fn open_store(root: &Path) -> Result<WorkflowStore> {
    let store = WorkflowStore::new(root);
    if !store.is_initialized() {
        anyhow::bail!(StoreError::NotInitialized);
    }
    Ok(store)
}

/// Initialize the store.
fn cmd_init(root: &Path, name: Option<&str>, force: bool) -> Result<()> {
    let store = WorkflowStore::new(root);

    match store.initialize(name, force) {
        Ok(config) => {
            println!("✓ BusLog initialized for '{}'", config.name);
            if !config.workflow_names.is_empty() {
                println!("  Indexed {} existing workflow(s)", config.workflow_names.len());
            }
            println!("\nNext steps:");
            println!("  1. Run 'buslog analyze' to generate an AI prompt");
            println!("  2. Use the prompt with your AI assistant");
            println!("  3. Use 'buslog add <workflow-name>' to add workflows manually");
            Ok(())
        }
        Err(StoreError::AlreadyInitialized) => {
            println!("! BusLog is already initialized in this project.");
            println!("Use --force to re-initialize");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to initialize BusLog"),
    }
}

/// Create a workflow document.
fn cmd_add(root: &Path, name: &str) -> Result<()> {
    let store = open_store(root)?;

    match store.add_workflow(name) {
        Ok(doc) => {
            let path = store.workflows_path().join(doc.file_name());
            println!("✓ Workflow created: {}", path.display());
            println!("\nEdit the file to document your workflow.");
            Ok(())
        }
        Err(StoreError::DocumentAlreadyExists(id)) => {
            println!("! Workflow '{id}' already exists.");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to create workflow"),
    }
}

/// List workflows.
fn cmd_list(root: &Path, format: &str) -> Result<()> {
    let store = open_store(root)?;
    let workflows = store.list_workflows()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&workflows)?);
        return Ok(());
    }

    if workflows.is_empty() {
        println!("No workflows found. Use 'buslog add <name>' to create one.");
        return Ok(());
    }

    let width = workflows.iter().map(|w| w.name.len()).max().unwrap_or(0);
    for workflow in &workflows {
        println!("{:<width$}  {}", workflow.name, workflow.file);
    }
    println!("\nTotal: {} workflow(s)", workflows.len());

    Ok(())
}

/// Print one workflow document.
fn cmd_show(root: &Path, name: &str) -> Result<()> {
    let store = open_store(root)?;
    let doc = store.read_workflow(name)?;
    print!("{}", doc.body);
    Ok(())
}

/// Generate the analysis prompt.
fn cmd_analyze(root: &Path, output: Option<&Path>) -> Result<()> {
    let store = open_store(root)?;

    let prompt = assemble_prompt(store.project_root()).context("Failed to generate prompt")?;

    match output {
        Some(path) => {
            std::fs::write(path, &prompt)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Prompt saved to: {}", path.display());
        }
        None => print!("{prompt}"),
    }

    Ok(())
}

/// Show the analysis report.
fn cmd_report(root: &Path, format: &str) -> Result<()> {
    let report = analysis_report(root);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(root: &Path) -> Result<()> {
    let value = WorkflowStore::new(root).config_value()?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "buslog", &mut io::stdout());
}
