//! CLI for randlab: generate random samples and put them through a
//! chi-square, runs and autocorrelation battery.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "randlab")]
#[command(about = "randlab: random number generators under the microscope")]
#[command(version = randlab_core::VERSION)]
struct Cli {
    /// JSON config file (max_sample_count, default_seed, chi_square_bins, ...)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate samples in [0, 1) and print them
    Generate {
        /// Generator: mt, lcg, csprng, trng
        #[arg(long, default_value = "mt")]
        kind: String,

        /// Seed (ignored by csprng/trng); defaults to the configured seed
        #[arg(long, allow_negative_numbers = true)]
        seed: Option<i64>,

        /// Number of samples; defaults to the configured count
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Draw one sample per step instead of a single batch
        #[arg(long)]
        incremental: bool,

        /// Pause between incremental steps, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },

    /// Run the randomness test battery and print a summary table
    Report {
        /// Generator: mt, lcg, csprng, trng
        #[arg(long, default_value = "mt")]
        kind: String,

        #[arg(long, allow_negative_numbers = true)]
        seed: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Chi-square bins (overrides config)
        #[arg(long)]
        bins: Option<usize>,

        /// Autocorrelation lag (overrides config)
        #[arg(long)]
        lag: Option<usize>,

        /// Write the full results as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Watch samples arrive, then reveal each test step by step. Ctrl-C cancels.
    Lab {
        /// Generator: mt, lcg, csprng, trng
        #[arg(long, default_value = "mt")]
        kind: String,

        #[arg(long, allow_negative_numbers = true)]
        seed: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Pause between animation steps, in milliseconds
        #[arg(long, default_value = "5")]
        delay_ms: u64,
    },

    /// Start the HTTP API server
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8042")]
        port: u16,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref());

    match cli.command {
        Commands::Generate {
            kind,
            seed,
            count,
            format,
            incremental,
            delay_ms,
        } => commands::generate::run(config, &kind, seed, count, &format, incremental, delay_ms),
        Commands::Report {
            kind,
            seed,
            count,
            bins,
            lag,
            output,
        } => commands::report::run(config, &kind, seed, count, bins, lag, output.as_deref()),
        Commands::Lab {
            kind,
            seed,
            count,
            delay_ms,
        } => commands::lab::run(config, &kind, seed, count, delay_ms),
        Commands::Server { host, port } => commands::server::run(config, &host, port),
    }
}
