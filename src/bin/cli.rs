use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use actionscope::catalog::PatternCatalog;
use actionscope::config::Config;
use actionscope::error::ScopeError;
use actionscope::output::{self, OutputFormat};
use actionscope::{analyze, input};

#[derive(Parser)]
#[command(
    name = "actionscope",
    about = "Least-privilege permission advisor for GitHub Actions workflows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a captured request log and print the permission manifest
    Analyze {
        /// Request log file (JSON array or one JSON object per line);
        /// reads stdin when omitted
        file: Option<PathBuf>,

        /// Repository under analysis (owner/repo)
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repository: Option<String>,

        /// GitHub API base URL
        #[arg(long, env = "GITHUB_API_URL")]
        api_url: Option<String>,

        /// Token for disambiguation lookups
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (json, console)
        #[arg(long, short = 'f', default_value = "json")]
        format: String,

        /// Include endpoints that matched no rule in the output
        #[arg(long)]
        show_unmatched: bool,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List the built-in endpoint pattern catalog
    ListRules {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .actionscope.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            file,
            repository,
            api_url,
            token,
            config,
            format,
            show_unmatched,
            output,
        } => cmd_analyze(
            file,
            repository,
            api_url,
            token,
            config,
            format,
            show_unmatched,
            output,
        ),
        Commands::ListRules { format } => cmd_list_rules(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    file: Option<PathBuf>,
    repository: Option<String>,
    api_url: Option<String>,
    token: Option<String>,
    config_path: Option<PathBuf>,
    format_str: String,
    show_unmatched: bool,
    output_path: Option<PathBuf>,
) -> Result<i32, ScopeError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using json", format_str);
        OutputFormat::Json
    });

    let mut config = Config::load(
        &config_path.unwrap_or_else(|| PathBuf::from(".actionscope.toml")),
    )?;
    // CLI flags (with their env fallbacks) win over the file.
    if repository.is_some() {
        config.repository = repository;
    }
    if api_url.is_some() {
        config.api_url = api_url;
    }
    if token.is_some() {
        config.token = token;
    }

    let content = match file {
        Some(path) => std::fs::read_to_string(&path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let records = input::parse_records(&content)?;

    let report = analyze(&records, &config)?;
    let unmatched = show_unmatched.then_some(report.unmatched.as_slice());
    let rendered = output::render(&report.manifest, unmatched, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    Ok(0)
}

fn cmd_list_rules(format_str: String) -> Result<i32, ScopeError> {
    let rules = PatternCatalog::builtin().describe();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&rules)?;
            println!("{}", json);
        }
        _ => {
            println!("{:<8} {:<48} {:<28} LEVEL", "METHOD", "PATTERN", "PERMISSIONS");
            println!("{}", "-".repeat(92));
            for rule in &rules {
                let permissions = rule
                    .permissions
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join("+");
                println!(
                    "{:<8} {:<48} {:<28} {}",
                    rule.method, rule.pattern, permissions, rule.level
                );
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, ScopeError> {
    let path = PathBuf::from(".actionscope.toml");

    if path.exists() && !force {
        eprintln!(".actionscope.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .actionscope.toml");

    Ok(0)
}
