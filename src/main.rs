use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use phish_triage::{detect, export_report, parse_email_file, score, Config, ReportFormat};
use std::path::Path;
use std::process;

const BANNER_WIDTH: usize = 60;
const DEFAULT_CONFIG_PATH: &str = "phish-triage.yaml";

fn build_cli() -> Command {
    Command::new("phish-triage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing triage for a single email message")
        .arg(
            Arg::new("email")
                .value_name("EMAIL_FILE")
                .help("Email file (.eml) to analyze"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Report file path (overrides configuration)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Report format: text or json (overrides configuration)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let Some(email_file) = matches.get_one::<String>("email") else {
        eprintln!("Usage: phish-triage [OPTIONS] <EMAIL_FILE>");
        eprintln!("Run with --help for details.");
        process::exit(2);
    };

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH);

    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if let Some(output) = matches.get_one::<String>("output") {
        config.report.path = output.clone();
    }
    if let Some(format) = matches.get_one::<String>("format") {
        match format.parse::<ReportFormat>() {
            Ok(format) => config.report.format = format,
            Err(e) => {
                eprintln!("❌ Error: {e}");
                process::exit(2);
            }
        }
    }

    print_banner();

    if !Path::new(email_file).is_file() {
        eprintln!("❌ File not found: {email_file}");
        process::exit(1);
    }

    if let Err(e) = run_analysis(email_file, &config) {
        eprintln!("❌ Error: {e:#}");
        process::exit(1);
    }
}

fn print_banner() {
    println!();
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("  🔒 PHISH TRIAGE");
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!();
}

fn run_analysis(email_file: &str, config: &Config) -> anyhow::Result<()> {
    println!("📂 Analyzing: {email_file}");
    println!();

    println!("[1/4] Parsing message...");
    let record = parse_email_file(email_file)?;
    println!("      ✓ Sender: {}", record.sender);

    println!("[2/4] Running detection rules...");
    let anomalies = detect(&record);
    println!("      ✓ {} anomalies found", anomalies.len());

    println!("[3/4] Computing risk score...");
    let assessment = score(&anomalies);
    println!("      ✓ Score: {}/100", assessment.score);

    println!("[4/4] Exporting report...");
    let report_path = export_report(
        Path::new(&config.report.path),
        config.report.format,
        &record,
        &anomalies,
        &assessment,
    )?;
    println!("      ✓ Report: {}", report_path.display());

    log::info!(
        "{}: score {}/100, tier {}, {} anomalies",
        email_file,
        assessment.score,
        assessment.tier,
        assessment.anomaly_count
    );

    println!();
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!(
        "🎯 RESULT: {}/100 - {}",
        assessment.score,
        assessment.tier.as_str().to_uppercase()
    );
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!();

    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if !Path::new(path).exists() {
        log::warn!("No config at {path}, reporting with built-in defaults");
        return Ok(Config::default());
    }
    let config = Config::from_file(path)?;
    log::debug!(
        "Loaded {path}: {} report to {}",
        config.report.format,
        config.report.path
    );
    Ok(config)
}

fn generate_default_config(path: &str) {
    if let Err(e) = Config::default().to_file(path) {
        eprintln!("❌ Could not write {path}: {e:#}");
        process::exit(1);
    }
    println!("📝 Wrote default triage settings to {path}");
    println!("   Set report.path and report.format (text or json) there.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_defaults_once() {
        let matches = build_cli().get_matches_from(["phish-triage", "message.eml"]);
        assert_eq!(
            matches.get_one::<String>("config").map(String::as_str),
            Some(DEFAULT_CONFIG_PATH)
        );

        let matches =
            build_cli().get_matches_from(["phish-triage", "-c", "custom.yaml", "message.eml"]);
        assert_eq!(
            matches.get_one::<String>("config").map(String::as_str),
            Some("custom.yaml")
        );
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let config = load_config("/nonexistent/phish-triage.yaml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_existing_config_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "phish-triage-cli-{}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, "report:\n  format: json\n").unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.report.format, ReportFormat::Json);

        std::fs::remove_file(&path).ok();
    }
}
