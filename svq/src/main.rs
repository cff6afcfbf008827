//! svq: Sieve Query - CLI for parsing, checking, and rewriting sieve query strings.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "svq")]
#[command(about = "Sieve Query - parse, check, and rewrite sieve query strings")]
#[command(version)]
struct Cli {
    /// Capability configuration file (TOML). Open mode when omitted.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string or URL and show the outcome
    #[command(visible_alias = "p")]
    Parse {
        /// Query string (page=2&sorts=-createdAt) or URL (/items?page=2)
        query: String,

        /// Output format: text, json
        #[arg(short = 'f', long = "format", default_value = "text")]
        format: String,
    },

    /// Validate a query string or URL; exits 1 when it has errors
    Check {
        /// Query string or URL
        query: String,

        /// Suppress warnings on stderr
        #[arg(short = 'q', long = "quiet")]
        quiet: bool,
    },

    /// Merge changes into a URL's query parameters and print the new URL
    #[command(visible_alias = "u")]
    Update {
        /// Base URL whose query string will be rewritten
        url: String,

        /// New page number
        #[arg(short = 'p', long = "page")]
        page: Option<u64>,

        /// New page size
        #[arg(short = 's', long = "page-size")]
        page_size: Option<u64>,

        /// Replacement sort list (e.g. "-createdAt,price")
        #[arg(long = "sorts", allow_hyphen_values = true)]
        sorts: Option<String>,

        /// Replacement filter list (e.g. "status==active,price>=10")
        #[arg(long = "filters", allow_hyphen_values = true)]
        filters: Option<String>,
    },

    /// Write a starter capability configuration file
    Init {
        /// Destination path
        #[arg(default_value = "sieve.toml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long = "force")]
        force: bool,
    },

    /// List the operator grammar
    Operators,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Parse { query, format } => commands::parse(&query, config, &format),
        Commands::Check { query, quiet } => commands::check(&query, config, quiet),
        Commands::Update { url, page, page_size, sorts, filters } => {
            commands::update(&url, config, page, page_size, sorts.as_deref(), filters.as_deref())
        }
        Commands::Init { path, force } => commands::init(&path, force),
        Commands::Operators => commands::operators(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
