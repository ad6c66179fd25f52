//! ronbun CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ronbun",
    version,
    about = "Rubric-based scoring for timed Japanese entrance-exam essays"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single essay
    Score {
        /// Essay text file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Prompt the essay was written against
        #[arg(long, default_value = "")]
        theme: String,

        /// Output format: json, text
        #[arg(long, default_value = "json")]
        format: String,

        /// Include the extracted features
        #[arg(long)]
        features: bool,
    },

    /// Predict a prompt for a department from its past prompts
    Predict {
        /// University id or name
        #[arg(long)]
        university: String,

        /// Faculty id or name
        #[arg(long)]
        faculty: String,

        /// Department id or name
        #[arg(long)]
        department: String,

        /// Catalog file or directory (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Seed for reproducible predictions
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List AO departments whose university, faculty, or department matches
    Search {
        /// Name or id fragment (lists everything when omitted)
        #[arg(default_value = "")]
        query: String,

        /// Catalog file or directory (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score every essay in an essay set
    Batch {
        /// Path to .toml essay set or directory
        #[arg(long)]
        essays: PathBuf,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Max essays scored concurrently (overrides config)
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate catalog or essay-set TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long, required_unless_present = "essays")]
        catalog: Option<PathBuf>,

        /// Path to essay set file or directory
        #[arg(long)]
        essays: Option<PathBuf>,
    },

    /// Compare two batch reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Point change that counts as significant
        #[arg(long, default_value = "5")]
        threshold: u32,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config, catalog, and essay set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ronbun=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            file,
            theme,
            format,
            features,
        } => commands::score::execute(file, theme, format, features),
        Commands::Predict {
            university,
            faculty,
            department,
            catalog,
            seed,
            config,
        } => commands::predict::execute(university, faculty, department, catalog, seed, config),
        Commands::Search {
            query,
            catalog,
            config,
        } => commands::search::execute(query, catalog, config),
        Commands::Batch {
            essays,
            output,
            format,
            parallelism,
            config,
        } => commands::batch::execute(essays, output, format, parallelism, config).await,
        Commands::Validate { catalog, essays } => commands::validate::execute(catalog, essays),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
