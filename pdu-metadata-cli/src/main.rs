//! PDU Metadata CLI Application
//!
//! This is the command-line interface for the pdu-metadata library.
//! It adds:
//! - Input selection from flags or config.toml
//! - Text tables for service interfaces, PDUs and compu methods
//! - The metadata JSON artifact
//! - A persistent diagnostic log

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use pdu_metadata::{
    correlate, infer_cycle_time, parse_rbs_pdus, parse_service_interfaces, ExtractorConfig,
    MetadataExtractor, PduMetadata,
};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod diagnostics;
mod report;

use config::AppConfig;
use diagnostics::{DiagnosticLog, FileDiagnosticLog};

/// PDU Metadata Extractor - correlate AUTOSAR PDUs with SOME/IP services
#[derive(Parser, Debug)]
#[command(name = "pdu-metadata")]
#[command(about = "Extract PDU and service interface metadata from ARXML files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Diagnostic log file (default: debug_log.txt)
    #[arg(long, value_name = "FILE", global = true)]
    debug_log: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Args, Debug, Default)]
struct InputArgs {
    /// Service-definition ARXML file
    #[arg(short, long, value_name = "FILE")]
    service: Option<PathBuf>,

    /// RBS ARXML file
    #[arg(short, long, value_name = "FILE")]
    rbs: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Correlate both files and write the metadata JSON
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Output JSON file (".json" is appended when missing)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the JSON to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// List the service interfaces of the service file
    Services {
        #[command(flatten)]
        input: InputArgs,
    },
    /// List the PDUs of the RBS file with their signals and cycle times
    Pdus {
        #[command(flatten)]
        input: InputArgs,
    },
    /// List compu-method scales and the compu method of every signal
    Compu {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show every section; a failing section does not stop the others
    Inspect {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print the diagnostic log
    Log,
}

/// Settings shared by all subcommands
struct Session {
    config: AppConfig,
    log: FileDiagnosticLog,
}

impl Session {
    fn service_path(&self, input: &InputArgs) -> Result<PathBuf> {
        input_path(&input.service, &self.config.input.service, "service")
    }

    fn rbs_path(&self, input: &InputArgs) -> Result<PathBuf> {
        input_path(&input.rbs, &self.config.input.rbs, "rbs")
    }

    fn extraction(&self) -> &ExtractorConfig {
        &self.config.extraction
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    log::info!("PDU Metadata CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using extractor library v{}", pdu_metadata::VERSION);

    let app_config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let log_path = cli
        .debug_log
        .clone()
        .unwrap_or_else(|| app_config.diagnostics.log_file.clone());

    let session = Session {
        config: app_config,
        log: FileDiagnosticLog::new(log_path),
    };

    match &cli.command {
        Command::Generate { input, output, stdout } => {
            generate_command(&session, input, output.as_deref(), *stdout)
        }
        Command::Services { input } => single_section(&session, "Service Interfaces", || {
            services_section(&session, input)
        }),
        Command::Pdus { input } => {
            single_section(&session, "PDU Data", || pdus_section(&session, input))
        }
        Command::Compu { input } => {
            single_section(&session, "Compu Methods", || compu_section(&session, input))
        }
        Command::Inspect { input } => inspect_command(&session, input),
        Command::Log => log_command(&session),
    }
}

/// Parse both files in parallel and correlate them
fn generate_metadata(service: &Path, rbs: &Path, extraction: &ExtractorConfig) -> Result<PduMetadata> {
    let (services, pdus) = rayon::join(
        || parse_service_interfaces(service, extraction),
        || parse_rbs_pdus(rbs, extraction),
    );

    let services =
        services.with_context(|| format!("Failed to parse service interfaces from {:?}", service))?;
    let pdus = pdus.with_context(|| format!("Failed to parse PDUs from {:?}", rbs))?;

    log::info!(
        "Correlating {} PDUs with {} service interfaces",
        pdus.len(),
        services.len()
    );
    Ok(correlate(&services, &pdus))
}

fn metadata_json(metadata: &PduMetadata, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(metadata)
    } else {
        serde_json::to_string(metadata)
    };
    json.context("Failed to serialize metadata")
}

fn write_metadata(metadata: &PduMetadata, path: &Path, pretty: bool) -> Result<()> {
    let json = metadata_json(metadata, pretty)?;
    fs::write(path, json + "\n").with_context(|| format!("Failed to write metadata to {:?}", path))
}

fn generate_command(
    session: &Session,
    input: &InputArgs,
    output: Option<&Path>,
    stdout: bool,
) -> Result<()> {
    let result = (|| -> Result<()> {
        let service = session.service_path(input)?;
        let rbs = session.rbs_path(input)?;
        let metadata = generate_metadata(&service, &rbs, session.extraction())?;
        let pretty = session.config.output.pretty;

        if stdout {
            println!("{}", metadata_json(&metadata, pretty)?);
            return Ok(());
        }

        let path = config::json_output_path(output.unwrap_or(session.config.output.file.as_path()));
        write_metadata(&metadata, &path, pretty)?;

        print!("{}", report::heading("Generated PDU Metadata"));
        println!("{}", report::render_summary(&metadata));
        println!("✓ Metadata written to {:?}", path);

        log::info!("Wrote {} messages to {:?}", metadata.len(), path);
        session
            .log
            .record(&format!("Metadata JSON generated and written to {}", path.display()));
        Ok(())
    })();

    if let Err(e) = &result {
        session
            .log
            .record(&format!("Error: Metadata generation failed - {:#}", e));
    }
    result
}

fn services_section(session: &Session, input: &InputArgs) -> Result<String> {
    let path = session.service_path(input)?;
    let services = parse_service_interfaces(&path, session.extraction())?;
    Ok(report::render_services(&services))
}

fn pdus_section(session: &Session, input: &InputArgs) -> Result<String> {
    let path = session.rbs_path(input)?;
    let pdus = parse_rbs_pdus(&path, session.extraction())?;

    let cycle_times: Vec<_> = pdus
        .keys()
        .map(|name| (name.clone(), infer_cycle_time(name)))
        .collect();

    Ok(format!(
        "{}\n{}{}",
        report::render_pdus(&pdus),
        report::heading("Cycle Time Computation Details"),
        report::render_cycle_times(&cycle_times)
    ))
}

fn compu_section(session: &Session, input: &InputArgs) -> Result<String> {
    let mut extractor = MetadataExtractor::with_config(session.extraction().clone());
    extractor.load_rbs(&session.rbs_path(input)?)?;
    let (entries, signals) = extractor.compu_methods()?;
    Ok(report::render_compu_methods(&entries, &signals))
}

fn summary_section(session: &Session, input: &InputArgs) -> Result<String> {
    let service = session.service_path(input)?;
    let rbs = session.rbs_path(input)?;
    let metadata = generate_metadata(&service, &rbs, session.extraction())?;
    Ok(report::render_summary(&metadata))
}

/// Run one section; a failure is reported and recorded instead of propagated
fn run_section<F>(title: &str, log: &dyn DiagnosticLog, section: F) -> Option<String>
where
    F: FnOnce() -> Result<String>,
{
    match section() {
        Ok(text) => Some(text),
        Err(e) => {
            eprintln!("✗ {}: {:#}", title, e);
            log.record(&format!("Error: {} failed - {:#}", title, e));
            None
        }
    }
}

fn print_section(title: &str, text: &str) {
    print!("{}", report::heading(title));
    println!("{}", text);
}

fn single_section<F>(session: &Session, title: &str, section: F) -> Result<()>
where
    F: FnOnce() -> Result<String>,
{
    let text = run_section(title, &session.log, section)
        .ok_or_else(|| anyhow!("{} failed (recorded in {:?})", title, session.log.path()))?;
    print_section(title, &text);
    Ok(())
}

fn inspect_command(session: &Session, input: &InputArgs) -> Result<()> {
    let sections: [(&str, fn(&Session, &InputArgs) -> Result<String>); 4] = [
        ("Generated PDU Metadata", summary_section),
        ("Service Interfaces", services_section),
        ("PDU Data", pdus_section),
        ("Compu Methods", compu_section),
    ];

    let mut failed = 0;
    for (title, section) in sections {
        match run_section(title, &session.log, || section(session, input)) {
            Some(text) => print_section(title, &text),
            None => failed += 1,
        }
    }

    if failed > 0 {
        return Err(anyhow!(
            "{} of {} sections failed (recorded in {:?})",
            failed,
            sections.len(),
            session.log.path()
        ));
    }
    Ok(())
}

fn log_command(session: &Session) -> Result<()> {
    match session.log.read()? {
        Some(content) => print!("{}", content),
        None => println!("No debug log available yet."),
    }
    Ok(())
}

/// Command-line path first, then the config file
fn input_path(flag: &Option<PathBuf>, configured: &Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    flag.clone().or_else(|| configured.clone()).ok_or_else(|| {
        anyhow!(
            "No {} ARXML file given (use --{} or set [input] {} in the config file)",
            kind,
            kind,
            kind
        )
    })
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagnostics::MemoryDiagnosticLog;

    const SERVICE: &str = r#"<AUTOSAR xmlns="http://autosar.org/schema/r4.0">
        <SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
          <SHORT-NAME>SomeIp_SI_EngineStatus</SHORT-NAME>
          <SERVICE-INTERFACE-ID>42</SERVICE-INTERFACE-ID>
          <EVENT-DEPLOYMENTS>
            <SOMEIP-EVENT-DEPLOYMENT><EVENT-ID>7</EVENT-ID></SOMEIP-EVENT-DEPLOYMENT>
          </EVENT-DEPLOYMENTS>
        </SOMEIP-SERVICE-INTERFACE-DEPLOYMENT>
      </AUTOSAR>"#;

    const RBS: &str = r#"<AUTOSAR xmlns="http://autosar.org/schema/r4.0">
        <I-SIGNAL><SHORT-NAME>Engine_RPM</SHORT-NAME><LENGTH>16</LENGTH></I-SIGNAL>
        <I-SIGNAL-I-PDU>
          <SHORT-NAME>EngineStatus_100</SHORT-NAME>
          <LENGTH>64</LENGTH>
          <I-SIGNAL-TO-PDU-MAPPINGS>
            <I-SIGNAL-TO-I-PDU-MAPPING>
              <I-SIGNAL-REF>/Signals/Engine_RPM</I-SIGNAL-REF>
              <START-POSITION>8</START-POSITION>
            </I-SIGNAL-TO-I-PDU-MAPPING>
          </I-SIGNAL-TO-PDU-MAPPINGS>
        </I-SIGNAL-I-PDU>
      </AUTOSAR>"#;

    fn session_in(dir: &Path) -> (Session, InputArgs) {
        let service = dir.join("service.arxml");
        let rbs = dir.join("rbs.arxml");
        fs::write(&service, SERVICE).unwrap();
        fs::write(&rbs, RBS).unwrap();

        let session = Session {
            config: AppConfig::default(),
            log: FileDiagnosticLog::new(dir.join("debug_log.txt")),
        };
        let input = InputArgs {
            service: Some(service),
            rbs: Some(rbs),
        };
        (session, input)
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pdu-metadata",
            "generate",
            "--service",
            "s.arxml",
            "-r",
            "r.arxml",
            "-o",
            "out",
            "--debug-log",
            "trace.txt",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.debug_log, Some(PathBuf::from("trace.txt")));
        match cli.command {
            Command::Generate { input, output, stdout } => {
                assert_eq!(input.service, Some(PathBuf::from("s.arxml")));
                assert_eq!(input.rbs, Some(PathBuf::from("r.arxml")));
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!stdout);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_input_path_precedence() {
        let flag = Some(PathBuf::from("flag.arxml"));
        let configured = Some(PathBuf::from("config.arxml"));

        assert_eq!(input_path(&flag, &configured, "rbs").unwrap(), PathBuf::from("flag.arxml"));
        assert_eq!(input_path(&None, &configured, "rbs").unwrap(), PathBuf::from("config.arxml"));

        let err = input_path(&None, &None, "rbs").unwrap_err();
        assert!(err.to_string().contains("--rbs"));
    }

    #[test]
    fn test_run_section_records_failures() {
        let log = MemoryDiagnosticLog::default();

        let ok = run_section("Services", &log, || Ok("table".to_string()));
        assert_eq!(ok.as_deref(), Some("table"));

        let failed = run_section("PDU Data", &log, || Err(anyhow!("broken file")));
        assert!(failed.is_none());
        assert_eq!(log.entries(), vec!["Error: PDU Data failed - broken file"]);
    }

    #[test]
    fn test_generate_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let (session, input) = session_in(dir.path());
        let output = dir.path().join("metadata");

        generate_command(&session, &input, Some(&output), false).unwrap();

        let written = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
        assert!(written.starts_with("{\n  \"Messages\": {\n    \"EngineStatus_100\": {"));

        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        let message = &value["Messages"]["EngineStatus_100"];
        assert_eq!(message["service_id"], "42");
        assert_eq!(message["cycle_time"], "0.1");
        assert_eq!(message["signals"]["Engine_RPM"]["start_bit"], 8);

        let log = session.log.read().unwrap().unwrap();
        assert!(log.contains("Metadata JSON generated and written to"));
    }

    #[test]
    fn test_generate_failure_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (session, mut input) = session_in(dir.path());
        input.rbs = Some(dir.path().join("missing.arxml"));

        assert!(generate_command(&session, &input, None, false).is_err());

        let log = session.log.read().unwrap().unwrap();
        assert!(log.contains("Error: Metadata generation failed - Failed to parse PDUs from"));
    }

    #[test]
    fn test_inspect_continues_after_failed_section() {
        let dir = tempfile::tempdir().unwrap();
        let (session, mut input) = session_in(dir.path());
        fs::write(dir.path().join("broken.arxml"), "<AUTOSAR>").unwrap();
        input.service = Some(dir.path().join("broken.arxml"));

        let err = inspect_command(&session, &input).unwrap_err();
        assert!(err.to_string().starts_with("2 of 4 sections failed"));

        let log = session.log.read().unwrap().unwrap();
        assert!(log.contains("Error: Generated PDU Metadata failed"));
        assert!(log.contains("Error: Service Interfaces failed"));
        assert!(!log.contains("Error: PDU Data failed"));
        assert!(!log.contains("Error: Compu Methods failed"));
    }

    #[test]
    fn test_sections_render_tables() {
        let dir = tempfile::tempdir().unwrap();
        let (session, input) = session_in(dir.path());

        let services = services_section(&session, &input).unwrap();
        assert!(services.contains("SomeIp_SI_EngineStatus"));

        let pdus = pdus_section(&session, &input).unwrap();
        assert!(pdus.contains("PDU: EngineStatus_100"));
        assert!(pdus.contains("Cycle Time Computation Details"));

        let compu = compu_section(&session, &input).unwrap();
        assert!(compu.contains("0.NoCompuMethod"));

        let summary = summary_section(&session, &input).unwrap();
        assert!(summary.contains("1 messages, 1 matched to a service interface."));
    }
}
