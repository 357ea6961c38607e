// Python-bindinger (bygges med `--features python`).
// Tynt lag: all logikk ligger i kjernen, her konverteres bare typer og feil.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::analyze_tour::{analyze_tour, date_from_path, TourInputs};
use crate::error::PerfError;
use crate::geo;
use crate::track::load_gpx;
use crate::types::PerfConfig;
use crate::wind::WindArchive;

fn to_py(e: PerfError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyfunction]
fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    geo::bearing(lat1, lon1, lat2, lon2)
}

#[pyfunction]
fn angular_difference(a: f64, b: f64) -> f64 {
    geo::angular_difference(a, b)
}

/// Kjører hele turen og returnerer datasettet som JSON-liste.
#[pyfunction]
#[pyo3(signature = (gpx_path, wind_path, cfg_json=None))]
fn analyze_tour_json(gpx_path: &str, wind_path: &str, cfg_json: Option<&str>) -> PyResult<String> {
    let cfg: PerfConfig = match cfg_json {
        Some(s) => serde_json::from_str(s).map_err(|e| PyValueError::new_err(format!("cfg_json: {e}")))?,
        None => PerfConfig::default(),
    };
    let archive = WindArchive::load(wind_path).map_err(to_py)?;
    let segments = load_gpx(gpx_path).map_err(to_py)?;

    let out = analyze_tour(TourInputs {
        segments: &segments,
        date: date_from_path(gpx_path),
        wind: Some(&archive),
        cfg: &cfg,
    })
    .map_err(to_py)?;

    serde_json::to_string(&out.records).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pymodule]
fn sailperf_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(bearing, m)?)?;
    m.add_function(wrap_pyfunction!(angular_difference, m)?)?;
    m.add_function(wrap_pyfunction!(analyze_tour_json, m)?)?;
    Ok(())
}
