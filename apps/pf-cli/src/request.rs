//! YAML request documents, tagged by `kind`.

use std::fmt;

use pf_analysis::{
    AirflowInput, AirflowOutput, CoilInput, CoilOutput, CondensationInput, CondensationOutput, GshrInput,
    GshrOutput, ShrLineInput, ShrLineOutput, analyze_coil, calculate_airflow, calculate_gshr, calculate_shr_line,
    check_condensation,
};
use pf_process::{ProcessInput, ProcessResult};
use pf_props::PropertyModel;
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    Process(ProcessInput),
    Coil(CoilInput),
    ShrLine(ShrLineInput),
    Gshr(GshrInput),
    Airflow(AirflowInput),
    Condensation(CondensationInput),
}

/// Tagged by `request`; process results carry their own `kind`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Response {
    Process(ProcessResult),
    Coil(CoilOutput),
    ShrLine(ShrLineOutput),
    Gshr(GshrOutput),
    Airflow(AirflowOutput),
    Condensation(CondensationOutput),
}

impl Request {
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn run(&self, model: &dyn PropertyModel) -> CliResult<Response> {
        Ok(match self {
            Request::Process(input) => Response::Process(input.solve(model)?),
            Request::Coil(input) => Response::Coil(analyze_coil(model, input)?),
            Request::ShrLine(input) => Response::ShrLine(calculate_shr_line(model, input)?),
            Request::Gshr(input) => Response::Gshr(calculate_gshr(model, input)?),
            Request::Airflow(input) => Response::Airflow(calculate_airflow(model, input)?),
            Request::Condensation(input) => Response::Condensation(check_condensation(model, input)?),
        })
    }
}


impl Response {
    pub fn warnings(&self) -> &[String] {
        match self {
            Response::Process(r) => &r.warnings,
            Response::Coil(r) => &r.warnings,
            Response::ShrLine(r) => &r.warnings,
            Response::Gshr(r) => &r.warnings,
            Response::Airflow(_) | Response::Condensation(_) => &[],
        }
    }
}

/// Plain-text report.
impl fmt::Display for Response {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Process(r) => {
                writeln!(out, "Process: {:?}", r.kind)?;
                writeln!(out, "  start: {}", r.start.summary())?;
                writeln!(out, "  end:   {}", r.end.summary())?;
                for s in &r.reference_states {
                    writeln!(out, "  {}: {}", s.label().unwrap_or("reference"), s.summary())?;
                }
                for (k, v) in &r.metadata {
                    writeln!(out, "  {k} = {v:.4}")?;
                }
            }
            Response::Coil(r) => {
                writeln!(out, "Coil ({})", r.mode)?;
                writeln!(out, "  entering: {}", r.entering.summary())?;
                writeln!(out, "  leaving:  {}", r.leaving.summary())?;
                writeln!(out, "  ADP:      {}", r.adp.summary())?;
                writeln!(out, "  BF = {:.4}, CF = {:.4}", r.bypass_factor, r.contact_factor)?;
                writeln!(
                    out,
                    "  Qs = {:.2}, Ql = {:.2}, Qt = {:.2} {}  SHR = {:.4}",
                    r.qs, r.ql, r.qt, r.load_unit, r.shr
                )?;
                if let (Some(flow), Some(unit)) = (r.water_flow, r.water_flow_unit) {
                    writeln!(out, "  water flow = {flow:.2} {unit}")?;
                }
            }
            Response::ShrLine(r) => {
                writeln!(out, "SHR line (SHR = {:.3})", r.line.shr)?;
                writeln!(out, "  room: {}", r.room.summary())?;
                writeln!(out, "  slope dW/dTdb = {:.6e}", r.line.slope)?;
                writeln!(out, "  ADP:  {}", r.line.adp.summary())?;
                writeln!(out, "  {} line points", r.line.points.len())?;
            }
            Response::Gshr(r) => {
                writeln!(out, "Grand SHR")?;
                writeln!(out, "  room:    {}", r.room.summary())?;
                writeln!(out, "  outdoor: {}", r.outdoor.summary())?;
                writeln!(out, "  mixed:   {}", r.mixed.summary())?;
                writeln!(out, "  RSHR = {:.4}  ADP {:.2}", r.room_shr, r.room_line.adp.tdb())?;
                writeln!(out, "  GSHR = {:.4}  ADP {:.2}", r.gshr, r.gshr_line.adp.tdb())?;
                if let (Some(eshr), Some(line)) = (r.eshr, &r.eshr_line) {
                    writeln!(out, "  ESHR = {eshr:.4}  ADP {:.2}", line.adp.tdb())?;
                }
            }
            Response::Airflow(r) => {
                writeln!(out, "{}", r.formula)?;
                writeln!(
                    out,
                    "  C = {:.4}, air density = {:.5}",
                    r.c_factor, r.air_density
                )?;
            }
            Response::Condensation(r) => {
                let verdict = if r.is_condensing { "CONDENSING" } else { "dry" };
                writeln!(
                    out,
                    "Surface {:.2} vs dew point {:.2}: margin {:+.2} ({verdict})",
                    r.surface_temperature, r.dew_point, r.margin
                )?;
            }
        }
        for w in self.warnings() {
            writeln!(out, "  ! {w}")?;
        }
        Ok(())
    }
}
