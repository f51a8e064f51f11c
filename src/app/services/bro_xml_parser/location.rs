//! Delivered location and reprojection to RD New

use super::metadata::{find_element, find_text};
use crate::constants::{TARGET_EPSG, bro_ns};
use crate::{Error, Result};
use proj4rs::Proj;
use roxmltree::Document;
use tracing::warn;

/// EPSG code after the last `::` of an srsName, if it names an EPSG system
pub fn epsg_code(srs_name: &str) -> Option<String> {
    if !srs_name.contains("EPSG") {
        return None;
    }
    srs_name
        .rsplit("::")
        .next()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
}

/// proj4 definition of an EPSG code, if the registry knows it
fn proj4_definition(epsg: &str) -> Option<&'static str> {
    let code = epsg.parse::<u16>().ok()?;
    crs_definitions::from_code(code).map(|def| def.proj4)
}

fn projection(epsg: &str) -> Result<(Proj, bool)> {
    let definition = proj4_definition(epsg).ok_or_else(|| Error::unsupported_crs(epsg))?;
    let proj = Proj::from_proj_string(definition).map_err(|e| {
        Error::projection(format!("Cannot build projection for EPSG:{}: {}", epsg, e))
    })?;
    Ok((proj, definition.contains("+proj=longlat")))
}

/// Reproject a position written in `epsg` axis order into RD New
///
/// Geographic systems list latitude first, in degrees.
pub fn reproject_to_rd(epsg: &str, first: f64, second: f64) -> Result<[f64; 2]> {
    let (source, geographic) = projection(epsg)?;
    let (target, _) = projection(TARGET_EPSG)?;

    let mut point = if geographic {
        (second.to_radians(), first.to_radians(), 0.0)
    } else {
        (first, second, 0.0)
    };
    proj4rs::transform::transform(&source, &target, &mut point).map_err(|e| {
        Error::projection(format!("Reprojection from EPSG:{} failed: {}", epsg, e))
    })?;

    if !point.0.is_finite() || !point.1.is_finite() {
        return Err(Error::projection(format!(
            "Reprojection from EPSG:{} gave no finite position",
            epsg
        )));
    }
    Ok([point.0, point.1])
}

/// `[x, y]` of the delivered location in RD New
pub fn extract_location(doc: &Document) -> Result<[f64; 2]> {
    let delivered = find_element(doc.root(), bro_ns::DS_CPT, "deliveredLocation")
        .ok_or_else(|| Error::xml_format("No deliveredLocation found"))?;

    let crs = find_element(delivered, bro_ns::GML, "Point")
        .and_then(|point| point.attribute("srsName"))
        .and_then(epsg_code);

    let pos = find_text(delivered, bro_ns::GML, "pos")
        .ok_or_else(|| Error::xml_format("No gml:pos found in deliveredLocation"))?;
    let coordinates: Vec<f64> = pos
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::xml_format(format!("Invalid position '{}'", pos)))?;
    if coordinates.len() < 2 || coordinates.iter().any(|v| !v.is_finite()) {
        return Err(Error::xml_format(format!("Invalid position '{}'", pos)));
    }
    let (first, second) = (coordinates[0], coordinates[1]);

    match crs.as_deref() {
        None | Some(TARGET_EPSG) => Ok([first, second]),
        Some(code) => {
            warn!("Reprojecting from epsg::{}", code);
            reproject_to_rd(code, first, second)
        }
    }
}
