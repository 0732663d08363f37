use anyhow::{Context, Result};
use clap::{Arg, Command};
use climb_status::models::{Config, DataSourceMode};
use climb_status::report::{format_summary, write_status_csv};
use climb_status::source::{DataSource, FallbackSource, HttpCsvSource, LocalCsvSource};
use climb_status::StageAnalyzer;
use std::fs;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("climb-status")
        .version("0.1")
        .about("Classifies live climbing competition results")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("stage")
                .short('s')
                .long("stage")
                .value_name("ID")
                .help("Only process the stage with this id"),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");
    let only_stage = matches.get_one::<String>("stage").map(String::as_str);

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)
            .with_context(|| format!("Failed to load configuration from {}", config_file))?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!("⚠️  Please edit {} to point at your result sheets, then run the program again.", config_file);
        return Ok(());
    };

    if config.stages.is_empty() {
        println!("❌ Error: no stages configured in {}", config_file);
        return Ok(());
    }

    let output_dir = config.output_directory.as_deref().unwrap_or("output");
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir))?;

    let processed = match config.data_source_mode {
        DataSourceMode::Local => {
            let source = LocalCsvSource::from_config(&config);
            run_stages(&source, &config, only_stage, output_dir).await?
        }
        DataSourceMode::Internet => {
            let source = HttpCsvSource::from_config(&config);
            run_stages(&source, &config, only_stage, output_dir).await?
        }
        DataSourceMode::Both => {
            let source = FallbackSource {
                primary: LocalCsvSource::from_config(&config),
                secondary: HttpCsvSource::from_config(&config),
            };
            run_stages(&source, &config, only_stage, output_dir).await?
        }
    };

    if processed == 0 {
        println!("❌ No stage could be processed");
        return Ok(());
    }

    println!("\n✅ Classification complete! {} stage(s) processed", processed);
    println!("📂 Results: {}", output_dir);
    Ok(())
}

/// Fetch, classify and report every configured stage. A stage that fails to
/// load is reported and skipped.
async fn run_stages<S: DataSource>(
    source: &S,
    config: &Config,
    only_stage: Option<&str>,
    output_dir: &str,
) -> Result<usize> {
    let mut processed = 0;

    for stage_config in &config.stages {
        if only_stage.is_some_and(|id| id != stage_config.id) {
            continue;
        }

        println!("\n📄 Processing stage: {}", stage_config.id);
        let table = match source.fetch(&stage_config.id).await {
            Ok(table) => table,
            Err(e) => {
                println!("   ❌ Error loading stage: {}", e);
                continue;
            }
        };
        println!("   ✅ Loaded {} rows", table.rows.len());

        let stage = stage_config.competition_stage();
        let analysis = StageAnalyzer::new(&stage).analyze(&table);

        print!("{}", format_summary(&analysis));
        let csv_path = write_status_csv(&analysis, Path::new(output_dir), &stage_config.id)?;
        println!("   💾 Wrote {}", csv_path.display());

        processed += 1;
    }

    Ok(processed)
}
