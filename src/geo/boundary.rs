use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use geojson::{Feature, GeoJson, Value};
use tracing::{info, warn};

use super::albers::AlbersUsa;

/// One closed ring of `(longitude, latitude)` vertices.
pub type GeoRing = Vec<[f64; 2]>;

/// A projected ring with its bounding box, ready to be drawn.
#[derive(Clone, Debug)]
pub struct ProjectedRing {
    pub points: Vec<[f32; 2]>,
    pub min: [f32; 2],
    pub max: [f32; 2],
}

fn to_ring(raw: Vec<Vec<f64>>) -> GeoRing {
    raw.into_iter()
        .filter_map(|position| match position.as_slice() {
            [longitude, latitude, ..] => Some([*longitude, *latitude]),
            _ => None,
        })
        .collect()
}

/// Appends the polygon rings of `value`; returns false for other geometry.
fn collect_rings(value: Value, rings: &mut Vec<GeoRing>) -> bool {
    match value {
        Value::Polygon(polygon) => rings.extend(polygon.into_iter().map(to_ring)),
        Value::MultiPolygon(polygons) => {
            rings.extend(polygons.into_iter().flatten().map(to_ring));
        }
        Value::GeometryCollection(geometries) => {
            let mut found = false;
            for geometry in geometries {
                found |= collect_rings(geometry.value, rings);
            }
            return found;
        }
        _ => return false,
    }
    true
}

/// Extracts every polygon ring from a GeoJSON document. Features with other
/// geometry types are ignored.
pub fn parse_boundaries(raw: &str) -> Result<Vec<GeoRing>> {
    let document: GeoJson = serde_json::from_str(raw).context("invalid GeoJSON document")?;
    let features: Vec<Feature> = match document {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
    };

    let mut rings = Vec::new();
    let mut unsupported = 0usize;
    for feature in features {
        let found = feature
            .geometry
            .is_some_and(|geometry| collect_rings(geometry.value, &mut rings));
        if !found {
            unsupported += 1;
        }
    }

    if unsupported > 0 {
        warn!(unsupported, "skipped boundary features without polygon geometry");
    }

    rings.retain(|ring| ring.len() >= 3);
    if rings.is_empty() {
        return Err(anyhow!("boundary GeoJSON contains no polygon rings"));
    }

    Ok(rings)
}

/// Reads boundary geometry from disk. Census files are not always UTF-8, so
/// invalid bytes are replaced rather than rejected.
pub fn load_boundaries(path: &Path) -> Result<Vec<GeoRing>> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read boundary file {}", path.display()))?;
    let raw = String::from_utf8_lossy(&bytes);
    let rings = parse_boundaries(&raw)
        .with_context(|| format!("failed to parse boundary file {}", path.display()))?;
    info!(path = %path.display(), rings = rings.len(), "loaded boundary geometry");
    Ok(rings)
}

/// Projects each ring with the inset chosen by its first vertex. Rings that
/// start outside every inset are dropped.
pub fn project_rings(rings: &[GeoRing], projection: &AlbersUsa) -> Vec<ProjectedRing> {
    let mut projected = Vec::with_capacity(rings.len());
    let mut dropped = 0usize;

    for ring in rings {
        let Some(&[longitude, latitude]) = ring.first() else {
            continue;
        };
        let Some(region) = projection.region_of(longitude, latitude) else {
            dropped += 1;
            continue;
        };

        let mut min = [f32::INFINITY, f32::INFINITY];
        let mut max = [f32::NEG_INFINITY, f32::NEG_INFINITY];
        let points = ring
            .iter()
            .map(|&[longitude, latitude]| {
                let [x, y] = projection.project_in(region, longitude, latitude);
                let point = [x as f32, y as f32];
                min[0] = min[0].min(point[0]);
                min[1] = min[1].min(point[1]);
                max[0] = max[0].max(point[0]);
                max[1] = max[1].max(point[1]);
                point
            })
            .collect::<Vec<_>>();

        if min.iter().chain(max.iter()).all(|value| value.is_finite()) {
            projected.push(ProjectedRing { points, min, max });
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!(dropped, "dropped boundary rings outside the projection insets");
    }

    projected
}
