//! Cluster report rendering
//!
//! Turns a [`Clustering`] into a ranked report with per-cluster average
//! intra-cluster distance, and renders it as JSON and plain text.

use crate::cluster::Clustering;
use crate::distance::distance;
use crate::motif::MotifRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

/// One cluster of the report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// 1-based rank in the report
    pub rank: usize,
    /// Number of members
    pub num_entries: usize,
    /// Mean pairwise distance between members (0 for singletons)
    pub avg_distance: f64,
    /// Members in join order
    pub entries: Vec<MotifRecord>,
}

/// Ranked cluster report
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Clusters, largest first
    pub clusters: Vec<ClusterSummary>,
}

impl ClusterReport {
    /// Build the report from a finished clustering
    pub fn from_clustering(clustering: &Clustering) -> Self {
        let weights = clustering.params().weights;
        let clusters = clustering
            .ranked()
            .enumerate()
            .map(|(i, cluster)| {
                let entries: Vec<MotifRecord> = clustering.members(cluster).cloned().collect();
                let avg_distance = average_pairwise_distance(&entries, |a, b| distance(a, b, &weights));
                ClusterSummary {
                    rank: i + 1,
                    num_entries: entries.len(),
                    avg_distance,
                    entries,
                }
            })
            .collect();
        Self { clusters }
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether the report holds no clusters
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Render the human-readable report
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if self.clusters.is_empty() {
            out.push_str("No clusters (no motif records were found)\n");
            return out;
        }

        for cluster in &self.clusters {
            // Writing into a String cannot fail
            let _ = writeln!(out, "Cluster {}", cluster.rank);
            let _ = writeln!(out, "Number of Entries: {}", cluster.num_entries);
            let _ = writeln!(out, "Average Distance: {:.2}", cluster.avg_distance);
            out.push_str("Entries:\n");
            for entry in &cluster.entries {
                let _ = writeln!(
                    out,
                    "  Sequence ID: {}, Start: {}, End: {}, Codons: {}..{}, Sequence: {}",
                    entry.sequence_id(),
                    entry.start_position(),
                    entry.end_position(),
                    entry.start_codon(),
                    entry.stop_codon(),
                    entry.content()
                );
            }
            out.push('\n');
        }
        out
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize cluster report")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write cluster report: {}", path.display()))
    }

    /// Read a report previously written by [`ClusterReport::write_json`]
    pub fn read_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cluster report: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse cluster report: {}", path.display()))
    }

    /// Write the plain-text report
    pub fn write_text(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render_text())
            .with_context(|| format!("Failed to write cluster report: {}", path.display()))
    }

    /// Write `clusters.txt` and `clusters.json` into a folder, creating it if needed
    pub fn write_folder(&self, folder: &Path) -> Result<()> {
        fs::create_dir_all(folder)
            .with_context(|| format!("Failed to create folder: {}", folder.display()))?;
        self.write_text(&folder.join("clusters.txt"))?;
        self.write_json(&folder.join("clusters.json"))?;
        info!("Saved {} clusters to {}", self.clusters.len(), folder.display());
        Ok(())
    }
}

/// Mean of `dist` over all unordered member pairs, 0 for fewer than two members
pub fn average_pairwise_distance<F>(members: &[MotifRecord], dist: F) -> f64
where
    F: Fn(&MotifRecord, &MotifRecord) -> f64,
{
    let n = members.len();
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            total += dist(a, b);
        }
    }
    total / (n * (n - 1) / 2) as f64
}
