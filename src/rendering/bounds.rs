/// Extent and center of a set of placed markers

use crate::catalog::LngLat;
use crate::rendering::RenderInstruction;
use serde::Serialize;

/// Axis-aligned lng/lat box, serialized as `[[min_lng, min_lat], [max_lng, max_lat]]`
/// which is what the widget's `fitBounds` takes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds(pub LngLat, pub LngLat);

impl Bounds {
    pub fn min(&self) -> LngLat {
        self.0
    }

    pub fn max(&self) -> LngLat {
        self.1
    }

    pub fn contains(&self, p: LngLat) -> bool {
        p.lng >= self.0.lng && p.lng <= self.1.lng && p.lat >= self.0.lat && p.lat <= self.1.lat
    }
}

/// Smallest box holding every instruction's position; `None` when empty.
pub fn bounds(instructions: &[RenderInstruction]) -> Option<Bounds> {
    let first = instructions.first()?.position;
    let (mut min, mut max) = (first, first);
    for p in instructions.iter().map(|i| i.position) {
        min.lng = min.lng.min(p.lng);
        min.lat = min.lat.min(p.lat);
        max.lng = max.lng.max(p.lng);
        max.lat = max.lat.max(p.lat);
    }
    Some(Bounds(min, max))
}

/// Arithmetic mean of positions; `None` when empty.
pub fn centroid(instructions: &[RenderInstruction]) -> Option<LngLat> {
    if instructions.is_empty() {
        return None;
    }
    let n = instructions.len() as f64;
    let (lng, lat) = instructions
        .iter()
        .fold((0.0, 0.0), |(x, y), i| (x + i.position.lng, y + i.position.lat));
    Some(LngLat {
        lng: lng / n,
        lat: lat / n,
    })
}
