//! Verification conditions and state checks for scenarios

use grainfall_core::MaterialKind;
use grainfall_core::world::{Grid, World};
use serde::{Deserialize, Serialize};

/// Conditions that can be verified against world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VerificationCondition {
    // === MATERIAL CHECKS ===
    /// Assert material at a specific cell
    MaterialAt {
        x: i32,
        y: i32,
        material: MaterialKind,
    },

    /// Assert exact material count in region
    MaterialCount {
        material: MaterialKind,
        region: Region,
        expected: usize,
        /// Allow ±N variance
        #[serde(default)]
        tolerance: Option<usize>,
    },

    /// Assert material count within range
    MaterialCountRange {
        material: MaterialKind,
        region: Region,
        min: usize,
        max: usize,
    },

    /// Assert no material in region
    RegionEmpty { region: Region },

    /// Assert region has no empty cells
    RegionFilled { region: Region },

    // === TEMPERATURE ===
    /// Assert average temperature in region
    TemperatureRange { region: Region, min: f32, max: f32 },

    // === LOGICAL OPERATORS ===
    /// All conditions must pass
    All {
        conditions: Vec<VerificationCondition>,
    },

    /// Any condition must pass
    Any {
        conditions: Vec<VerificationCondition>,
    },

    /// Condition must NOT pass
    Not {
        condition: Box<VerificationCondition>,
    },
}

/// Cell region for verification, clipped to the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Region {
    /// Inclusive rectangle
    Rect {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    },

    /// Disk of cells within `radius` of the center
    Circle {
        center_x: i32,
        center_y: i32,
        radius: u32,
    },

    /// Entire grid
    Whole,
}

impl Region {
    /// Indices of the in-bounds cells covered by this region
    pub fn cells(&self, grid: &Grid) -> Vec<usize> {
        match *self {
            Region::Rect {
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                let (x0, x1) = (min_x.max(0), max_x.min(grid.width() - 1));
                let (y0, y1) = (min_y.max(0), max_y.min(grid.height() - 1));
                let mut cells = Vec::new();
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        cells.extend(grid.index(x, y));
                    }
                }
                cells
            }
            Region::Circle {
                center_x,
                center_y,
                radius,
            } => {
                let r = i64::from(radius);
                let mut cells = Vec::new();
                for dy in -r..=r {
                    for dx in -r..=r {
                        if dx * dx + dy * dy > r * r {
                            continue;
                        }
                        let (x, y) = (i64::from(center_x) + dx, i64::from(center_y) + dy);
                        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
                            cells.extend(grid.index(x, y));
                        }
                    }
                }
                cells
            }
            Region::Whole => (0..grid.len()).collect(),
        }
    }
}

/// Result of a verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
    pub actual_value: Option<String>, // For debugging
}

impl VerificationCondition {
    /// Evaluate condition against world state
    pub fn evaluate(&self, world: &World) -> VerificationResult {
        let grid = world.grid();

        match self {
            VerificationCondition::MaterialAt { x, y, material } => match grid.get(*x, *y) {
                Some(actual) => VerificationResult {
                    passed: actual == *material,
                    message: format!(
                        "Material at ({}, {}): expected {}, got {}",
                        x, y, material, actual
                    ),
                    actual_value: Some(actual.to_string()),
                },
                None => VerificationResult {
                    passed: false,
                    message: format!("Material at ({}, {}): out of bounds", x, y),
                    actual_value: None,
                },
            },

            VerificationCondition::MaterialCount {
                material,
                region,
                expected,
                tolerance,
            } => {
                let actual = count_material_in_region(grid, *material, region);
                let tol = tolerance.unwrap_or(0);
                let passed = actual >= expected.saturating_sub(tol) && actual <= expected + tol;

                VerificationResult {
                    passed,
                    message: format!(
                        "Material {} count in {:?}: expected {}±{}, got {}",
                        material, region, expected, tol, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::MaterialCountRange {
                material,
                region,
                min,
                max,
            } => {
                let actual = count_material_in_region(grid, *material, region);
                let passed = actual >= *min && actual <= *max;

                VerificationResult {
                    passed,
                    message: format!(
                        "Material {} count in {:?}: expected {}-{}, got {}",
                        material, region, min, max, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            VerificationCondition::RegionEmpty { region } => {
                let empty = count_material_in_region(grid, MaterialKind::Empty, region);
                let total = region.cells(grid).len();

                VerificationResult {
                    passed: empty == total,
                    message: format!(
                        "Region {:?} empty: {} empty / {} total cells",
                        region, empty, total
                    ),
                    actual_value: Some(format!("{}/{}", empty, total)),
                }
            }

            VerificationCondition::RegionFilled { region } => {
                let empty = count_material_in_region(grid, MaterialKind::Empty, region);

                VerificationResult {
                    passed: empty == 0,
                    message: format!("Region {:?} filled: {} empty cells", region, empty),
                    actual_value: Some(empty.to_string()),
                }
            }

            VerificationCondition::TemperatureRange { region, min, max } => {
                match average_temperature(grid, region) {
                    Some(avg) => VerificationResult {
                        passed: avg >= *min && avg <= *max,
                        message: format!(
                            "Temperature in {:?}: expected {:.1}-{:.1}, got {:.1}",
                            region, min, max, avg
                        ),
                        actual_value: Some(format!("{:.2}", avg)),
                    },
                    None => VerificationResult {
                        passed: false,
                        message: format!("Temperature in {:?}: region has no cells", region),
                        actual_value: None,
                    },
                }
            }

            VerificationCondition::All { conditions } => {
                let mut all_passed = true;
                let mut messages = Vec::new();

                for cond in conditions {
                    let result = cond.evaluate(world);
                    if !result.passed {
                        all_passed = false;
                    }
                    messages.push(format!("  - {}", result.message));
                }

                VerificationResult {
                    passed: all_passed,
                    message: format!("All conditions:\n{}", messages.join("\n")),
                    actual_value: None,
                }
            }

            VerificationCondition::Any { conditions } => {
                let mut any_passed = false;
                let mut messages = Vec::new();

                for cond in conditions {
                    let result = cond.evaluate(world);
                    if result.passed {
                        any_passed = true;
                    }
                    messages.push(format!("  - {}", result.message));
                }

                VerificationResult {
                    passed: any_passed,
                    message: format!("Any condition:\n{}", messages.join("\n")),
                    actual_value: None,
                }
            }

            VerificationCondition::Not { condition } => {
                let result = condition.evaluate(world);
                VerificationResult {
                    passed: !result.passed,
                    message: format!("NOT ({})", result.message),
                    actual_value: result.actual_value,
                }
            }
        }
    }
}

// Helper functions

fn count_material_in_region(grid: &Grid, material: MaterialKind, region: &Region) -> usize {
    region
        .cells(grid)
        .into_iter()
        .filter(|&index| grid.kind_at(index) == material)
        .count()
}

fn average_temperature(grid: &Grid, region: &Region) -> Option<f32> {
    let cells = region.cells(grid);
    if cells.is_empty() {
        return None;
    }
    let total: f32 = cells
        .iter()
        .map(|&index| grid.metadata_at(index).temperature)
        .sum();
    Some(total / cells.len() as f32)
}
