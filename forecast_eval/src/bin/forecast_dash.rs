//! Command-line dashboard for store forecast accuracy.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use forecast_eval::config::ActualsSource;
use forecast_eval::synthetic::{generate_demo, DemoConfig};
use forecast_eval::{
    etl, ActualSalesTable, DashboardConfig, DataLoader, DenominatorPolicy, Evaluator, ForecastStore,
    ForecastTable,
};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_CONFIG: &str = r#"[data]
forecasts = "forecasts.json"
actuals = "actuals.json"
outlook = "outlook.json"

[evaluation]
history_window = 90
exclude_dates = ["2023-11-23", "2023-12-25"]
denominator_policy = "skip"
"#;

#[derive(Parser)]
#[command(name = "forecast_dash")]
#[command(about = "Compare store sales forecasts with actual sales", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Forecast store (CSV or JSON)
    #[arg(long, global = true)]
    forecasts: Option<PathBuf>,

    /// Actual sales store (CSV or JSON)
    #[arg(long, global = true, conflicts_with = "transactions")]
    actuals: Option<PathBuf>,

    /// Raw transaction CSV to derive actual sales from
    #[arg(long, global = true)]
    transactions: Option<PathBuf>,

    /// Second-horizon forecast store (CSV or JSON)
    #[arg(long, global = true)]
    outlook: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the store keys that have a forecast
    Keys,

    /// Evaluate one store, or every store when no key is given
    Evaluate {
        /// Store key to evaluate
        #[arg(short, long)]
        store: Option<String>,

        /// Number of most recent actual days to compare
        #[arg(short, long)]
        window: Option<usize>,

        /// Treatment of zero denominators
        #[arg(short, long, value_enum)]
        policy: Option<PolicyArg>,

        /// Write the aligned table to this CSV file (needs --store)
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write synthetic demo stores and a matching config file
    Demo {
        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Number of stores
        #[arg(long, default_value = "3")]
        stores: usize,

        /// Days of actual sales history
        #[arg(long, default_value = "180")]
        days: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Skip,
    Propagate,
}

impl From<PolicyArg> for DenominatorPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Skip => DenominatorPolicy::Skip,
            PolicyArg::Propagate => DenominatorPolicy::Propagate,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_eval=info,forecast_dash=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Keys => {
            let config = load_config(&cli)?;
            let path = config
                .data
                .forecasts
                .context("no forecast store configured")?;
            let forecasts = DataLoader::forecasts_from_path(&path)
                .with_context(|| format!("loading forecasts from {}", path.display()))?;
            for key in forecasts.keys() {
                println!("{}", key);
            }
        }
        Commands::Evaluate {
            store,
            window,
            policy,
            export_csv,
            json,
        } => {
            let mut config = load_config(&cli)?;
            if let Some(window) = window {
                config.evaluation.history_window = *window;
            }
            if let Some(policy) = policy {
                config.evaluation.denominator_policy = (*policy).into();
            }
            if export_csv.is_some() && store.is_none() {
                bail!("--export-csv needs --store");
            }

            let evaluator = build_evaluator(&config)?;
            let keys: Vec<String> = match store {
                Some(key) => vec![key.clone()],
                None => evaluator.store_keys().into_iter().map(String::from).collect(),
            };

            let mut failures = 0;
            for key in &keys {
                match evaluator.evaluate(key) {
                    Ok(evaluation) => {
                        if *json {
                            println!("{}", evaluation.to_json()?);
                        } else {
                            println!("{}", evaluation);
                        }
                        if let Some(path) = export_csv {
                            evaluation.export_csv(path)?;
                            info!(path = %path.display(), "aligned table written");
                        }
                    }
                    Err(err) => {
                        failures += 1;
                        error!(store_key = %key, "{}", err);
                    }
                }
            }

            if failures > 0 {
                bail!("{} of {} store evaluations failed", failures, keys.len());
            }
        }
        Commands::Demo {
            out_dir,
            stores,
            days,
            seed,
        } => {
            let demo = DemoConfig {
                stores: *stores,
                days: *days,
                seed: *seed,
                ..DemoConfig::default()
            };
            write_demo(out_dir, &demo)?;
        }
    }

    Ok(())
}

/// Config file values, overridden by command-line paths
fn load_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(path) = &cli.forecasts {
        config.data.forecasts = Some(path.clone());
    }
    if let Some(path) = &cli.actuals {
        config.data.actuals = Some(path.clone());
        config.data.transactions = None;
    }
    if let Some(path) = &cli.transactions {
        config.data.transactions = Some(path.clone());
        config.data.actuals = None;
    }
    if let Some(path) = &cli.outlook {
        config.data.outlook = Some(path.clone());
    }

    Ok(config)
}

fn build_evaluator(
    config: &DashboardConfig,
) -> anyhow::Result<Evaluator<ForecastTable, ActualSalesTable>> {
    let (forecast_path, actuals_source) = config.data.resolve()?;

    let forecasts = DataLoader::forecasts_from_path(&forecast_path)
        .with_context(|| format!("loading forecasts from {}", forecast_path.display()))?;
    let actuals = match actuals_source {
        ActualsSource::Store(path) => DataLoader::actuals_from_path(&path)
            .with_context(|| format!("loading actual sales from {}", path.display()))?,
        ActualsSource::Transactions(path) => etl::build_actuals_from_path(&path, &config.etl)
            .with_context(|| format!("deriving actual sales from {}", path.display()))?,
    };

    let mut evaluator = Evaluator::new(forecasts, actuals, config.evaluation.clone())?;
    if let Some(path) = &config.data.outlook {
        let outlook = DataLoader::forecasts_from_path(path)
            .with_context(|| format!("loading outlook from {}", path.display()))?;
        evaluator = evaluator.with_outlook(outlook);
    }

    Ok(evaluator)
}

fn write_demo(out_dir: &Path, demo: &DemoConfig) -> anyhow::Result<()> {
    let data = generate_demo(demo)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    DataLoader::write_actuals_json(
        &data.actuals,
        BufWriter::new(File::create(out_dir.join("actuals.json"))?),
    )?;
    DataLoader::write_forecasts_json(
        &data.forecasts,
        BufWriter::new(File::create(out_dir.join("forecasts.json"))?),
    )?;
    DataLoader::write_forecasts_json(
        &data.outlook,
        BufWriter::new(File::create(out_dir.join("outlook.json"))?),
    )?;
    fs::write(out_dir.join("dashboard.toml"), DEMO_CONFIG)?;

    info!(
        out_dir = %out_dir.display(),
        stores = demo.stores,
        "demo data written; run `forecast_dash -c {}/dashboard.toml evaluate`",
        out_dir.display()
    );
    Ok(())
}
