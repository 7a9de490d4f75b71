//! co2watch CLI - CO₂ exceedance analytics over sensor spreadsheets
//!
//! # Main Commands
//!
//! ```bash
//! co2watch serve                    # Start HTTP server (port 3000)
//! co2watch analyze readings.xlsx    # Analyze a local spreadsheet
//! co2watch fetch --url https://...  # Fetch and analyze a remote sheet
//! ```

use clap::{Parser, Subcommand};
use co2watch::{
    charts::render_all, AppConfig, DataSource, FileSource, PipelineConfig, RemoteSource,
    run_from_source,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "co2watch")]
#[command(about = "Flag CO2 threshold exceedances across AHU sensor spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a local spreadsheet (.xlsx or delimited text)
    Analyze {
        /// Input spreadsheet file
        input: PathBuf,

        /// Exceedance threshold in ppm (overrides CO2_THRESHOLD_PPM)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output file for artifact JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory to write the four SVG charts into
        #[arg(short, long)]
        charts: Option<PathBuf>,
    },

    /// Fetch the remote spreadsheet and analyze it (one attempt)
    Fetch {
        /// Remote URL (overrides CO2_REMOTE_URL)
        #[arg(short, long)]
        url: Option<String>,

        /// Exceedance threshold in ppm (overrides CO2_THRESHOLD_PPM)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output file for artifact JSON (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (overrides CO2_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let result = match cli.command {
        Commands::Analyze {
            input,
            threshold,
            output,
            charts,
        } => {
            cmd_analyze(
                &input,
                threshold.unwrap_or(config.threshold_ppm),
                output.as_deref(),
                charts.as_deref(),
            )
            .await
        }

        Commands::Fetch {
            url,
            threshold,
            output,
        } => {
            cmd_fetch(
                url.or(config.remote_url),
                threshold.unwrap_or(config.threshold_ppm),
                output.as_deref(),
            )
            .await
        }

        Commands::Serve { port } => {
            let config = AppConfig {
                port: port.unwrap_or(config.port),
                ..config
            };
            co2watch::server::start_server(config).await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_analyze(
    input: &Path,
    threshold_ppm: f64,
    output: Option<&Path>,
    charts_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Analyzing: {}", input.display());

    let source = FileSource::new(input);
    run_and_report(&source, threshold_ppm, output, charts_dir).await
}

async fn cmd_fetch(
    url: Option<String>,
    threshold_ppm: f64,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = url.ok_or("no URL given; pass --url or set CO2_REMOTE_URL")?;
    eprintln!("🌐 Fetching: {}", url);

    let source = RemoteSource::new(url);
    run_and_report(&source, threshold_ppm, output, None).await
}

/// Shared body of `analyze` and `fetch`: both variants run the same
/// pipeline over their data source.
async fn run_and_report<S: DataSource>(
    source: &S,
    threshold_ppm: f64,
    output: Option<&Path>,
    charts_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline_config = PipelineConfig { threshold_ppm };
    let (parsed, artifacts) = run_from_source(source, &pipeline_config).await?;

    eprintln!("   Format: {:?}", parsed.info.format);
    if let Some(delim) = parsed.info.delimiter {
        eprintln!(
            "   Encoding: {}, delimiter: '{}'",
            parsed.info.encoding,
            match delim {
                '\t' => "\\t".to_string(),
                c => c.to_string(),
            }
        );
    }
    eprintln!("   Rows: {}", parsed.info.row_count);
    eprintln!("   AHUs: {}", parsed.info.ahu_ids.join(", "));

    eprintln!(
        "\n⚙️  {} tidy observations, {} exceedances over {} ppm",
        artifacts.long.len(),
        artifacts.exceedances.len(),
        threshold_ppm
    );

    if artifacts.summary.is_empty() {
        eprintln!("   ✅ No exceedances; all units within threshold");
    } else {
        eprintln!("\n📊 Management summary:");
        for row in &artifacts.summary {
            eprintln!(
                "   {}  max {:.0} ppm, avg {:.1} ppm, {} exceedances",
                row.ahu, row.max_co2, row.avg_co2, row.exceed_count
            );
        }
    }

    if let Some(dir) = charts_dir {
        let charts = render_all(&artifacts)?;
        fs::create_dir_all(dir)?;
        fs::write(dir.join("trend.svg"), &charts.line_svg)?;
        fs::write(dir.join("exceedance_count.svg"), &charts.bar_svg)?;
        fs::write(dir.join("distribution.svg"), &charts.box_svg)?;
        fs::write(dir.join("hourly_heatmap.svg"), &charts.heatmap_svg)?;
        eprintln!("   💾 Charts written to: {}", dir.display());
    }

    let json = serde_json::to_string_pretty(&artifacts)?;
    write_output(&json, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
