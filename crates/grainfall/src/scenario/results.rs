//! Execution results and reporting

use anyhow::{Context, Result};
use grainfall_core::MaterialKind;
use grainfall_core::world::{Grid, TickStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::verification::VerificationResult;

/// Performance metrics for a scenario execution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Total wall-clock time (milliseconds)
    pub total_duration_ms: f64,

    /// Setup phase duration (milliseconds)
    pub setup_duration_ms: f64,

    /// Main action phase duration (milliseconds)
    pub action_duration_ms: f64,

    /// Verification phase duration (milliseconds)
    pub verification_duration_ms: f64,

    /// Average time per engine call, one tick or one frame (milliseconds)
    pub avg_update_time_ms: f64,

    /// Peak engine call time (milliseconds)
    pub peak_update_time_ms: f64,

    /// Number of engine calls
    pub update_count: usize,

    /// Number of simulation ticks across all engine calls
    pub tick_count: usize,
}

impl PerformanceMetrics {
    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.1}ms | Avg update: {:.3}ms | Peak: {:.3}ms | Ticks: {}",
            self.total_duration_ms,
            self.avg_update_time_ms,
            self.peak_update_time_ms,
            self.tick_count
        )
    }
}

/// Report from scenario execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Scenario name
    pub scenario_name: String,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Seed the scenario's RNG was started from
    pub seed: u64,

    /// Overall pass/fail status
    pub passed: bool,

    /// Total frames executed
    pub frames_executed: usize,

    /// Number of actions executed
    pub actions_executed: usize,

    /// Verification failures (empty if all passed)
    pub verification_failures: Vec<VerificationResult>,

    /// Cells of each material at the end of the run
    pub material_counts: BTreeMap<String, usize>,

    /// Movement, phase change and reaction counts over the run
    pub stats: TickStats,

    /// Execution log messages
    pub log: Vec<String>,

    /// Snapshot file paths
    pub snapshots: Vec<String>,

    /// Performance metrics (timing, throughput)
    pub performance: PerformanceMetrics,
}

impl ExecutionReport {
    /// Create new execution report
    pub fn new(scenario_name: String, seed: u64) -> Self {
        Self {
            scenario_name,
            timestamp: chrono::Utc::now().to_rfc3339(),
            seed,
            passed: false,
            frames_executed: 0,
            actions_executed: 0,
            verification_failures: Vec::new(),
            material_counts: BTreeMap::new(),
            stats: TickStats::default(),
            log: Vec::new(),
            snapshots: Vec::new(),
            performance: PerformanceMetrics::default(),
        }
    }

    /// Check if all verifications passed
    pub fn success(&self) -> bool {
        self.verification_failures.is_empty()
    }

    /// Record how many cells of each non-empty material `grid` holds
    pub fn record_material_counts(&mut self, grid: &Grid) {
        self.material_counts = MaterialKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_empty())
            .map(|kind| (kind.name().to_string(), grid.count(kind)))
            .filter(|(_, count)| *count > 0)
            .collect();
    }

    /// Save report to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize execution report to JSON")?;

        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path.as_ref(), json).with_context(|| {
            format!(
                "Failed to write execution report: {}",
                path.as_ref().display()
            )
        })?;

        Ok(())
    }

    /// Load report from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read report file: {}", path.as_ref().display()))?;

        let report = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON report: {}", path.as_ref().display()))?;

        Ok(report)
    }
}
