//! TubeFilter CLI
//!
//! Developer tool for checking settings blobs and filtering captured
//! payloads offline.

use std::fs;
use std::time::Instant;

use clap::{Parser, Subcommand};

use tf_core::{CriteriaSnapshot, Engine, FilterField, PageContext, Settings};

#[derive(Parser)]
#[command(name = "tf-cli")]
#[command(about = "TubeFilter settings checker and payload filter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a settings blob and report the resulting criteria
    Check {
        /// Settings JSON file
        #[arg(short, long)]
        settings: String,
    },

    /// Filter a captured payload with a settings blob
    Filter {
        /// Settings JSON file
        #[arg(short, long)]
        settings: String,

        /// Payload JSON file
        #[arg(short, long)]
        input: String,

        /// Routing key (endpoint pathname or global slot name)
        #[arg(short, long, default_value = "/youtubei/v1/browse")]
        key: String,

        /// Page pathname for path-dependent criteria
        #[arg(long, default_value = "/")]
        pathname: String,

        /// Page query string
        #[arg(long, default_value = "")]
        search: String,

        /// Mobile page layout
        #[arg(long)]
        mobile: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Timing and effect details
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { settings } => cmd_check(&settings),
        Commands::Filter {
            settings,
            input,
            key,
            pathname,
            search,
            mobile,
            output,
            verbose,
        } => cmd_filter(
            &settings, &input, &key, &pathname, &search, mobile, output.as_deref(), verbose,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_settings(path: &str) -> Result<Settings, String> {
    let blob =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{path}': {e}"))?;
    Settings::from_json(&blob).map_err(|e| format!("Failed to parse '{path}': {e}"))
}

fn cmd_check(settings_path: &str) -> Result<(), String> {
    let settings = load_settings(settings_path)?;
    let snapshot = CriteriaSnapshot::compile(&settings);

    let regex_fields = [
        FilterField::VideoId,
        FilterField::ChannelId,
        FilterField::ChannelName,
        FilterField::Title,
        FilterField::Comment,
    ];
    for field in regex_fields {
        println!(
            "  {:<12} {} patterns",
            field.as_str(),
            snapshot.patterns_for(field).len()
        );
    }
    println!(
        "  {:<12} {:?} ({:?})",
        "vidLength",
        snapshot.vid_length,
        snapshot.options.vid_length_type
    );
    println!("  {:<12} {}", "predicate", snapshot.js_enabled());
    println!(
        "  {:<12} {}",
        "effective",
        if snapshot.is_empty() { "no (criteria empty)" } else { "yes" }
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_filter(
    settings_path: &str,
    input: &str,
    key: &str,
    pathname: &str,
    search: &str,
    mobile: bool,
    output: Option<&str>,
    verbose: bool,
) -> Result<(), String> {
    let settings = load_settings(settings_path)?;
    let payload_text =
        fs::read_to_string(input).map_err(|e| format!("Failed to read '{input}': {e}"))?;
    let mut payload: serde_json::Value = serde_json::from_str(&payload_text)
        .map_err(|e| format!("Failed to parse '{input}': {e}"))?;

    let mut engine = Engine::new(PageContext::new(pathname, search, mobile));
    engine.on_settings_received(&settings);

    let start = Instant::now();
    let outcome = engine.filter_payload(key, &mut payload);
    let elapsed = start.elapsed();

    if verbose {
        eprintln!("Filtered in {elapsed:?}");
        if let Some(target) = &outcome.redirect {
            eprintln!("Redirect: {target}");
        }
        if outcome.censor_title {
            eprintln!("Title censored");
        }
        if engine.current_block() {
            eprintln!("Page block pending");
        }
    }

    let rendered = serde_json::to_string_pretty(&payload)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    match output {
        Some(path) => fs::write(path, rendered)
            .map_err(|e| format!("Failed to write '{path}': {e}"))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
