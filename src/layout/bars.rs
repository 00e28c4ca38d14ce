//! Resource gauge geometry: reserved outline, request band, used band.

use serde::{Deserialize, Serialize};

use crate::resources::ResourceRecord;

/// Full width of one gauge column; request and used bands take half each.
pub const BAR_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Ok,
    Warning,
    Critical,
}

/// Lower bounds (inclusive) of the warning and critical tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_warning")]
    pub warning: f64,
    #[serde(default = "default_critical")]
    pub critical: f64,
}

fn default_warning() -> f64 {
    0.7
}

fn default_critical() -> f64 {
    0.9
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: default_warning(),
            critical: default_critical(),
        }
    }
}

impl Thresholds {
    pub fn classify(&self, value: f64, effective_capacity: f64) -> Tier {
        let ratio = if effective_capacity > 0.0 {
            value / effective_capacity
        } else {
            0.0
        };
        if ratio >= self.critical {
            Tier::Critical
        } else if ratio >= self.warning {
            Tier::Warning
        } else {
            Tier::Ok
        }
    }
}

/// Rectangle in gauge-local coordinates: x from the column's left edge, y
/// from the top of the gauge, baseline at `y + height == gauge height`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn from_baseline(x: f64, width: f64, baseline: f64, height: f64) -> Self {
        let height = height.max(0.0);
        Self {
            x,
            y: baseline - height,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub height: f64,
    /// Outline of the withheld capacity.
    pub reserved: Rect,
    /// Requested plus reserved, filled.
    pub requested: Rect,
    pub used: Rect,
    pub request_tier: Tier,
    pub used_tier: Tier,
    /// y of each whole capacity unit, bottom up. Only filled for cpu, and
    /// left empty when units would be closer than one pixel.
    pub gridlines: Vec<f64>,
    /// Pixel height of one capacity unit.
    pub unit_height: f64,
}

/// Scale a record into a gauge of `height` pixels. Zero capacity yields
/// zero-height bands.
pub fn bar_geometry(
    record: &ResourceRecord,
    height: f64,
    thresholds: &Thresholds,
    with_gridlines: bool,
) -> BarGeometry {
    let height = height.max(0.0);
    let to_pixels = |value: f64| {
        if record.capacity > 0.0 {
            value * height / record.capacity
        } else {
            0.0
        }
    };
    let half = BAR_WIDTH / 2.0;

    let unit_height = if record.capacity > 0.0 {
        height / record.capacity
    } else {
        0.0
    };
    let gridlines = if with_gridlines && record.capacity > 0.0 && record.capacity <= height {
        (1..=record.capacity.floor() as u64)
            .map(|unit| height - unit as f64 * unit_height)
            .collect()
    } else {
        Vec::new()
    };

    BarGeometry {
        height,
        reserved: Rect::from_baseline(0.0, BAR_WIDTH, height, to_pixels(record.reserved)),
        requested: Rect::from_baseline(
            0.0,
            half,
            height,
            to_pixels(record.requested + record.reserved),
        ),
        used: Rect::from_baseline(half, half, height, to_pixels(record.used)),
        request_tier: thresholds.classify(record.requested, record.capacity - record.reserved),
        used_tier: thresholds.classify(record.used, record.capacity),
        gridlines,
        unit_height,
    }
}
