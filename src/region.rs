// Department lookup from free-text addresses, plus the fixed table placing
// each metropolitan department on the reference map of France.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-9]{5}\b").expect("postal code pattern"));

pub const UNKNOWN_REGION: &str = "Unknown";

/// Approximate position on the map, in percent of width (x) and height (y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapPoint {
    pub x: u8,
    pub y: u8,
}

/// Department code from the first postal code in `address`, or
/// [`UNKNOWN_REGION`].
pub fn department(address: &str) -> String {
    POSTAL_CODE
        .find(address)
        .map(|m| m.as_str().chars().take(2).collect())
        .unwrap_or_else(|| UNKNOWN_REGION.to_string())
}

pub fn map_point(department: &str) -> Option<MapPoint> {
    DEPARTMENT_MAP
        .binary_search_by(|(code, _)| (*code).cmp(department))
        .ok()
        .map(|i| DEPARTMENT_MAP[i].1)
}

/// Sorted by department code.
pub const DEPARTMENT_MAP: &[(&str, MapPoint)] = &[
    ("01", MapPoint { x: 73, y: 55 }), ("02", MapPoint { x: 62, y: 18 }), ("03", MapPoint { x: 58, y: 50 }),
    ("04", MapPoint { x: 85, y: 78 }), ("05", MapPoint { x: 86, y: 70 }), ("06", MapPoint { x: 92, y: 80 }),
    ("07", MapPoint { x: 70, y: 68 }), ("08", MapPoint { x: 68, y: 15 }), ("09", MapPoint { x: 45, y: 90 }),
    ("10", MapPoint { x: 68, y: 30 }), ("11", MapPoint { x: 55, y: 88 }), ("12", MapPoint { x: 55, y: 75 }),
    ("13", MapPoint { x: 78, y: 85 }), ("14", MapPoint { x: 35, y: 20 }), ("15", MapPoint { x: 55, y: 65 }),
    ("16", MapPoint { x: 38, y: 58 }), ("17", MapPoint { x: 30, y: 55 }), ("18", MapPoint { x: 55, y: 45 }),
    ("19", MapPoint { x: 50, y: 60 }), ("21", MapPoint { x: 70, y: 42 }), ("22", MapPoint { x: 18, y: 30 }),
    ("23", MapPoint { x: 50, y: 55 }), ("24", MapPoint { x: 40, y: 65 }), ("25", MapPoint { x: 85, y: 45 }),
    ("26", MapPoint { x: 72, y: 70 }), ("27", MapPoint { x: 45, y: 22 }), ("28", MapPoint { x: 48, y: 30 }),
    ("29", MapPoint { x: 10, y: 32 }), ("30", MapPoint { x: 70, y: 80 }), ("31", MapPoint { x: 42, y: 88 }),
    ("32", MapPoint { x: 40, y: 82 }), ("33", MapPoint { x: 30, y: 68 }), ("34", MapPoint { x: 60, y: 85 }),
    ("35", MapPoint { x: 28, y: 32 }), ("36", MapPoint { x: 48, y: 50 }), ("37", MapPoint { x: 40, y: 42 }),
    ("38", MapPoint { x: 78, y: 62 }), ("39", MapPoint { x: 78, y: 48 }), ("40", MapPoint { x: 30, y: 80 }),
    ("41", MapPoint { x: 48, y: 40 }), ("42", MapPoint { x: 68, y: 58 }), ("43", MapPoint { x: 65, y: 65 }),
    ("44", MapPoint { x: 25, y: 45 }), ("45", MapPoint { x: 52, y: 35 }), ("46", MapPoint { x: 50, y: 72 }),
    ("47", MapPoint { x: 38, y: 75 }), ("48", MapPoint { x: 62, y: 75 }), ("49", MapPoint { x: 32, y: 42 }),
    ("50", MapPoint { x: 28, y: 22 }), ("51", MapPoint { x: 65, y: 25 }), ("52", MapPoint { x: 75, y: 32 }),
    ("53", MapPoint { x: 32, y: 35 }), ("54", MapPoint { x: 82, y: 25 }), ("55", MapPoint { x: 75, y: 22 }),
    ("56", MapPoint { x: 18, y: 40 }), ("57", MapPoint { x: 85, y: 20 }), ("58", MapPoint { x: 60, y: 45 }),
    ("59", MapPoint { x: 58, y: 8 }), ("60", MapPoint { x: 52, y: 18 }), ("61", MapPoint { x: 38, y: 28 }),
    ("62", MapPoint { x: 52, y: 10 }), ("63", MapPoint { x: 60, y: 60 }), ("64", MapPoint { x: 28, y: 88 }),
    ("65", MapPoint { x: 38, y: 90 }), ("66", MapPoint { x: 58, y: 92 }), ("67", MapPoint { x: 92, y: 22 }),
    ("68", MapPoint { x: 90, y: 35 }), ("69", MapPoint { x: 70, y: 58 }), ("70", MapPoint { x: 80, y: 40 }),
    ("71", MapPoint { x: 70, y: 50 }), ("72", MapPoint { x: 40, y: 35 }), ("73", MapPoint { x: 85, y: 62 }),
    ("74", MapPoint { x: 85, y: 55 }), ("75", MapPoint { x: 54, y: 26 }), ("76", MapPoint { x: 45, y: 15 }),
    ("77", MapPoint { x: 58, y: 28 }), ("78", MapPoint { x: 50, y: 26 }), ("79", MapPoint { x: 32, y: 52 }),
    ("80", MapPoint { x: 55, y: 15 }), ("81", MapPoint { x: 52, y: 82 }), ("82", MapPoint { x: 45, y: 78 }),
    ("83", MapPoint { x: 82, y: 85 }), ("84", MapPoint { x: 75, y: 80 }), ("85", MapPoint { x: 25, y: 52 }),
    ("86", MapPoint { x: 40, y: 50 }), ("87", MapPoint { x: 45, y: 58 }), ("88", MapPoint { x: 82, y: 32 }),
    ("89", MapPoint { x: 62, y: 35 }), ("90", MapPoint { x: 88, y: 42 }), ("91", MapPoint { x: 52, y: 28 }),
    ("92", MapPoint { x: 53, y: 26 }), ("93", MapPoint { x: 55, y: 25 }), ("94", MapPoint { x: 55, y: 27 }),
    ("95", MapPoint { x: 52, y: 24 }),
];
