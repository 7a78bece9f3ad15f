//! Execution results and reporting

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::verification::VerificationResult;

/// Report from scenario execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Scenario name
    pub scenario_name: String,

    /// Overall pass/fail status
    pub passed: bool,

    /// Simulation ticks advanced by the scenario
    pub ticks_run: u64,

    /// Number of actions executed
    pub actions_executed: usize,

    /// Particles alive when verification ran
    pub final_particle_count: usize,

    /// Verification failures (empty if all passed)
    pub verification_failures: Vec<VerificationResult>,

    /// Execution log messages
    pub log: Vec<String>,

    /// Capture file paths
    pub captures: Vec<String>,

    /// Total wall-clock time (milliseconds)
    pub duration_ms: f64,
}

impl ExecutionReport {
    /// Create new execution report
    pub fn new(scenario_name: String) -> Self {
        Self {
            scenario_name,
            passed: false,
            ticks_run: 0,
            actions_executed: 0,
            final_particle_count: 0,
            verification_failures: Vec::new(),
            log: Vec::new(),
            captures: Vec::new(),
            duration_ms: 0.0,
        }
    }

    /// Check if all verifications passed
    pub fn success(&self) -> bool {
        self.verification_failures.is_empty()
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}: {} | {} ticks | {} actions | {} particles | {} failed checks | {:.1}ms",
            self.scenario_name,
            if self.passed { "PASSED" } else { "FAILED" },
            self.ticks_run,
            self.actions_executed,
            self.final_particle_count,
            self.verification_failures.len(),
            self.duration_ms
        )
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
