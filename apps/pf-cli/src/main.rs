mod error;
mod request;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pf_core::UnitSystem;
use pf_props::{AshraeModel, Property, PsychrometricState, convert_state, resolve, standard_pressure};
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::request::Request;

#[derive(Serialize)]
struct StateReport<'a> {
    state: &'a PsychrometricState,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted: Option<&'a PsychrometricState>,
}

#[derive(Parser)]
#[command(name = "pf-cli")]
#[command(about = "Psychroflow CLI - psychrometric states and air-handling processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a state point from two independent properties
    State {
        /// Property pair, e.g. Tdb,RH
        #[arg(long, value_delimiter = ',', num_args = 2)]
        pair: Vec<Property>,
        /// Values for the pair, e.g. 75,50
        #[arg(long, value_delimiter = ',', num_args = 2, allow_hyphen_values = true)]
        values: Vec<f64>,
        #[arg(long, default_value = "IP")]
        units: UnitSystem,
        /// Total pressure (psia or Pa)
        #[arg(long, conflicts_with = "altitude")]
        pressure: Option<f64>,
        /// Altitude (ft or m) for a standard-atmosphere pressure
        #[arg(long, allow_hyphen_values = true)]
        altitude: Option<f64>,
        #[arg(long)]
        label: Option<String>,
        /// Also show the state in this unit system
        #[arg(long)]
        to: Option<UnitSystem>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run a YAML request (process, coil, shr_line, gshr, airflow, condensation)
    Run {
        /// Path to the request YAML file
        request_path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Standard-atmosphere pressure at an altitude
    Pressure {
        /// Altitude in ft (IP) or m (SI)
        #[arg(allow_hyphen_values = true)]
        altitude: f64,
        #[arg(long, default_value = "IP")]
        units: UnitSystem,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::State {
            pair,
            values,
            units,
            pressure,
            altitude,
            label,
            to,
            json,
        } => cmd_state(&pair, &values, units, pressure, altitude, label.as_deref(), to, json),
        Commands::Run { request_path, json } => cmd_run(&request_path, json),
        Commands::Pressure { altitude, units } => cmd_pressure(altitude, units),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_state(
    pair: &[Property],
    values: &[f64],
    units: UnitSystem,
    pressure: Option<f64>,
    altitude: Option<f64>,
    label: Option<&str>,
    to: Option<UnitSystem>,
    json: bool,
) -> CliResult<()> {
    let (&[first, second], &[a, b]) = (pair, values) else {
        return Err(CliError::InvalidArgs(
            "--pair and --values each take exactly two entries".to_string(),
        ));
    };

    let model = AshraeModel;
    let pressure = match (pressure, altitude) {
        (Some(p), _) => p,
        (None, Some(z)) => standard_pressure(&model, z, units)?,
        (None, None) => units.default_pressure(),
    };
    let state = resolve(&model, (first, second), (a, b), pressure, units, label)?;
    let converted = to
        .filter(|&target| target != units)
        .map(|target| convert_state(&model, &state, target))
        .transpose()?;

    if json {
        let report = StateReport {
            state: &state,
            converted: converted.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", state.summary());
        println!(
            "  v = {:.4}, Pv = {:.4}, mu = {:.4}, P = {:.4} {}",
            state.v(),
            state.pv(),
            state.mu(),
            state.pressure(),
            units.pressure_label()
        );
        if let Some(other) = converted {
            println!("{}", other.summary());
        }
    }
    Ok(())
}

fn cmd_run(request_path: &Path, json: bool) -> CliResult<()> {
    let text = std::fs::read_to_string(request_path).map_err(|source| CliError::RequestRead {
        path: request_path.to_path_buf(),
        source,
    })?;
    let request = Request::from_yaml(&text)?;
    debug!(path = %request_path.display(), "running request");
    let response = request.run(&AshraeModel)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{response}");
    }
    Ok(())
}

fn cmd_pressure(altitude: f64, units: UnitSystem) -> CliResult<()> {
    let p = standard_pressure(&AshraeModel, altitude, units)?;
    println!("{p:.4} {}", units.pressure_label());
    Ok(())
}
