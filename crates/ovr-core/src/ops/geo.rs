//! Geometry extension: WKT and GeoJSON codecs, centroid, reverse geocoding
//!
//! Merged into a registry only when `RegistryConfig::geometry` is set.

use super::{as_str, text};
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments};
use crate::error::{ActionError, DecodeError};
use crate::format::{Format, Value};
use country_boundaries::{CountryBoundaries, LatLon, BOUNDARIES_ODBL_360X180};
use geo::Centroid;
use geo_types::{Geometry, Point};
use geojson::GeoJson;
use once_cell::sync::OnceCell;
use std::process::{Child, Command, ExitStatus};
use std::thread::JoinHandle;
use wkt::{ToWkt, TryFromWkt};

const GEOJSON_IO_URL: &str = "http://geojson.io/#data=data:application/json,";

/// Country boundaries, decoded on first use
static BOUNDARIES: OnceCell<CountryBoundaries> = OnceCell::new();

pub(super) fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new(
            &["wkt"],
            "Parse a WKT into a Geometry",
            Format::Geometry,
            ActionFn::Text(from_wkt),
        )
        .parse(),
        ActionDef::new(
            &["geojson"],
            "Parse a GeoJSON into a Geometry",
            Format::Geometry,
            ActionFn::Text(from_geojson),
        )
        .parse(),
        ActionDef::new(
            &["towkt"],
            "Transforms a geometry to WKT",
            Format::Text,
            ActionFn::Geometry(to_wkt),
        ),
        ActionDef::new(
            &["togeojson"],
            "Transforms a geometry to GeoJSON",
            Format::Text,
            ActionFn::Geometry(to_geojson),
        ),
        ActionDef::new(
            &["centroid"],
            "Output the centroid of a geometry",
            Format::Text,
            ActionFn::Geometry(centroid_wkt),
        ),
        ActionDef::new(
            &["country"],
            "Returns the centroid's country of the geometry",
            Format::Text,
            ActionFn::Geometry(country),
        ),
        ActionDef::new(
            &["geojsonio"],
            "Open a browser to geojson.io with the geometry",
            Format::Text,
            ActionFn::Geometry(to_geojson),
        )
        .with_effect(open_geojson_io),
    ]
}

fn from_wkt(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let g = Geometry::<f64>::try_from_wkt_str(as_str(input).trim())
        .map_err(|e| DecodeError::Wkt(e.to_string()))?;
    Ok(Value::Geometry(g))
}

fn from_geojson(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let parsed: GeoJson = as_str(input)
        .parse()
        .map_err(|e: geojson::Error| DecodeError::GeoJson(e.to_string()))?;
    let g = Geometry::<f64>::try_from(parsed).map_err(|e| DecodeError::GeoJson(e.to_string()))?;
    Ok(Value::Geometry(g))
}

fn to_wkt(g: &Geometry<f64>, _: &Arguments<'_>) -> ActionResult {
    Ok(text(g.wkt_string()))
}

fn to_geojson(g: &Geometry<f64>, _: &Arguments<'_>) -> ActionResult {
    let geometry = geojson::Geometry::new(geojson::Value::from(g));
    let out = serde_json::to_string(&geometry).map_err(DecodeError::from)?;
    Ok(text(out))
}

fn centroid(g: &Geometry<f64>) -> Result<Point<f64>, DecodeError> {
    g.centroid()
        .ok_or_else(|| DecodeError::Malformed("no coordinates for centroid".to_string()))
}

fn centroid_wkt(g: &Geometry<f64>, _: &Arguments<'_>) -> ActionResult {
    Ok(text(Geometry::Point(centroid(g)?).wkt_string()))
}

/// Comma separated names of the countries containing the centroid
fn country(g: &Geometry<f64>, _: &Arguments<'_>) -> ActionResult {
    let point = centroid(g)?;
    let boundaries = BOUNDARIES
        .get_or_try_init(|| CountryBoundaries::from_reader(BOUNDARIES_ODBL_360X180))
        .map_err(|e| DecodeError::Malformed(format!("country boundaries unavailable: {e}")))?;
    let location =
        LatLon::new(point.y(), point.x()).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let names: Vec<&str> = boundaries
        .ids(location)
        .into_iter()
        .filter(|id| id.len() == 2)
        .filter_map(|id| isocountry::CountryCode::for_alpha2(id).ok())
        .map(|code| code.name())
        .collect();
    tracing::trace!(x = point.x(), y = point.y(), countries = names.len(), "country lookup");
    Ok(text(names.join(",")))
}

fn open_geojson_io(output: &Value) -> Result<(), ActionError> {
    let url = format!("{GEOJSON_IO_URL}{}", urlencoding::encode(&output.to_string()));
    tracing::debug!(len = url.len(), "opening geojson.io");
    let child = open_command().arg(&url).spawn().map_err(|e| ActionError::Effect {
        action: "geojsonio".to_string(),
        reason: format!("failed to open browser: {e}"),
    })?;
    reap(child);
    Ok(())
}

/// Wait for an opener in the background so it does not linger as a zombie
fn reap(mut child: Child) -> JoinHandle<Option<ExitStatus>> {
    std::thread::spawn(move || match child.wait() {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::warn!(error = %e, "opener could not be reaped");
            None
        }
    })
}

#[cfg(target_os = "macos")]
fn open_command() -> Command {
    Command::new("open")
}

#[cfg(target_os = "linux")]
fn open_command() -> Command {
    Command::new("xdg-open")
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn open_command() -> Command {
    Command::new("open")
}
