mod compile_cmd;
mod config;
mod functions_cmd;
#[cfg(test)]
mod test_util;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use compile_cmd::OutputFormat;
use config::SeqplanConfig;

#[derive(Parser)]
#[command(name = "seqplan", about = "Compile language-model plan markup into sequential plans")]
struct Cli {
    /// Config file path (defaults to ~/.config/seqplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a seqplan config file
    Init {
        /// Path to the function registry TOML file
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Turn unknown functions into placeholder steps by default
        #[arg(long)]
        allow_missing: bool,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Compile model output into a plan
    Compile {
        /// File holding the model output, or `-` for stdin
        input: String,
        /// Goal the plan was generated for
        #[arg(long)]
        goal: String,
        /// Function registry (overrides SEQPLAN_REGISTRY and the config file)
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Turn unknown functions into placeholder steps
        #[arg(long)]
        allow_missing: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List every plugin and function in the registry
    Functions {
        /// Function registry (overrides SEQPLAN_REGISTRY and the config file)
        #[arg(long)]
        registry: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Execute the `seqplan init` command: write config file.
fn cmd_init(
    path: &Path,
    registry: Option<PathBuf>,
    allow_missing: bool,
    force: bool,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        registry: config::RegistrySection {
            path: registry.clone(),
        },
        compiler: config::CompilerSection { allow_missing },
    };

    config::save_config(path, &cfg)?;

    println!("Config written to {}", path.display());
    match registry {
        Some(registry) => println!("  registry.path = {}", registry.display()),
        None => println!("  registry.path is unset; pass --registry to `seqplan compile`"),
    }
    println!("  compiler.allow_missing = {allow_missing}");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::config_path);

    match cli.command {
        Commands::Init {
            registry,
            allow_missing,
            force,
        } => {
            cmd_init(&config_path, registry, allow_missing, force)?;
        }
        Commands::Compile {
            input,
            goal,
            registry,
            allow_missing,
            format,
        } => {
            let resolved =
                SeqplanConfig::resolve(&config_path, registry.as_deref(), allow_missing)?;
            compile_cmd::run_compile(
                &input,
                &goal,
                resolved.require_registry()?,
                resolved.allow_missing,
                format,
            )
            .await?;
        }
        Commands::Functions { registry } => {
            let resolved = SeqplanConfig::resolve(&config_path, registry.as_deref(), false)?;
            functions_cmd::run_functions(resolved.require_registry()?).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "seqplan", &mut std::io::stdout());
        }
    }

    Ok(())
}
