//! Greedy first-fit single-linkage clustering of motif records
//!
//! Records are taken one at a time in input order. A record joins the first
//! cluster (in creation order) that has at least one member within the
//! threshold, comparing against every member. A record with no such cluster
//! opens a new one. The comparison is inclusive: a distance equal to the
//! threshold joins.
//!
//! Clusters live in an arena addressed by [`ClusterId`], and every record
//! maps to the id of its owning cluster. Ranking happens once, after the last
//! record: descending member count, then the smallest member `sequence_id`,
//! then creation order.

use crate::constants::{CLUSTER_PROGRESS_INTERVAL, DEFAULT_THRESHOLD};
use crate::distance::{distance, DistanceWeights};
use crate::error::{MotifError, Result};
use crate::motif::MotifRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, info, warn};

/// Index of a cluster in the arena (creation order)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub usize);

/// Threshold and weights for clustering
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterParams {
    /// Inclusive distance threshold
    pub threshold: f64,
    /// Distance term weights
    pub weights: DistanceWeights,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            weights: DistanceWeights::default(),
        }
    }
}

impl ClusterParams {
    /// Create validated parameters
    pub fn new(threshold: f64, weights: DistanceWeights) -> Result<Self> {
        let params = Self { threshold, weights };
        params.validate()?;
        Ok(params)
    }

    /// Reject a negative or non-finite threshold and invalid weights
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(MotifError::InvalidConfiguration(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        self.weights.validate()
    }
}

/// A group of records, stored as indices into the record pool
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    id: ClusterId,
    members: Vec<usize>,
}

impl Cluster {
    fn new(id: ClusterId, first: usize) -> Self {
        Self {
            id,
            members: vec![first],
        }
    }

    /// Arena id (creation order)
    #[inline]
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Indices of the member records, in join order
    #[inline]
    pub fn member_indices(&self) -> &[usize] {
        &self.members
    }

    /// Number of members
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Never true for a cluster produced by the clusterer
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Incremental first-fit clusterer
///
/// Records can be pushed as soon as they are produced; the result depends
/// only on the order of the pushes.
pub struct Clusterer {
    params: ClusterParams,
    records: Vec<MotifRecord>,
    clusters: Vec<Cluster>,
    assignment: Vec<ClusterId>,
    comparisons: u64,
}

impl Clusterer {
    /// Create an empty clusterer
    pub fn new(params: ClusterParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            records: Vec::new(),
            clusters: Vec::new(),
            assignment: Vec::new(),
            comparisons: 0,
        })
    }

    /// Assign one record and return the id of the cluster it joined
    pub fn push(&mut self, record: MotifRecord) -> ClusterId {
        let index = self.records.len();
        let id = match self.first_fit(&record) {
            Some(id) => {
                self.clusters[id.0].members.push(index);
                id
            }
            None => {
                let id = ClusterId(self.clusters.len());
                self.clusters.push(Cluster::new(id, index));
                id
            }
        };
        self.records.push(record);
        self.assignment.push(id);

        if self.records.len() % CLUSTER_PROGRESS_INTERVAL == 0 {
            debug!(
                "  Clustered {} records into {} clusters ({} pairs checked)",
                self.records.len(),
                self.clusters.len(),
                self.comparisons
            );
        }
        id
    }

    /// Assign records in iteration order
    pub fn extend<I: IntoIterator<Item = MotifRecord>>(&mut self, records: I) {
        for record in records {
            self.push(record);
        }
    }

    /// Number of records assigned so far
    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Number of clusters opened so far
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of record pairs compared so far
    pub fn num_comparisons(&self) -> u64 {
        self.comparisons
    }

    /// First cluster, in creation order, with a member within the threshold
    fn first_fit(&mut self, record: &MotifRecord) -> Option<ClusterId> {
        let weights = &self.params.weights;
        let threshold = self.params.threshold;
        let records = &self.records;
        let mut checked = 0u64;
        let found = self
            .clusters
            .iter()
            .find(|cluster| {
                cluster.members.iter().any(|&member| {
                    checked += 1;
                    distance(record, &records[member], weights) <= threshold
                })
            })
            .map(Cluster::id);
        self.comparisons += checked;
        found
    }

    /// Rank the clusters and hand over the result
    pub fn finish(self) -> Clustering {
        let Self {
            params,
            records,
            clusters,
            assignment,
            comparisons,
        } = self;

        let mut ranking: Vec<ClusterId> = clusters.iter().map(Cluster::id).collect();
        ranking.sort_by_cached_key(|id| {
            let cluster = &clusters[id.0];
            let smallest_id = cluster
                .members
                .iter()
                .map(|&i| records[i].sequence_id().to_string())
                .min()
                .unwrap_or_default();
            (Reverse(cluster.len()), smallest_id, *id)
        });

        if clusters.is_empty() {
            warn!("No motif records to cluster; result is empty");
        } else {
            info!(
                "Clustered {} records into {} clusters (threshold = {}, {} pairs checked)",
                records.len(),
                clusters.len(),
                params.threshold,
                comparisons
            );
            if let Some(top) = ranking.first() {
                debug!("  largest cluster has {} members", clusters[top.0].len());
            }
        }

        Clustering {
            params,
            records,
            clusters,
            assignment,
            ranking,
        }
    }
}

/// The finished, ranked clustering
#[derive(Clone, Debug)]
pub struct Clustering {
    params: ClusterParams,
    records: Vec<MotifRecord>,
    clusters: Vec<Cluster>,
    assignment: Vec<ClusterId>,
    ranking: Vec<ClusterId>,
}

impl Clustering {
    /// Parameters the clustering was computed with
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// All records, in input order
    pub fn records(&self) -> &[MotifRecord] {
        &self.records
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether there are no clusters (and so no records)
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Look up a cluster by arena id
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    /// Owning cluster of the record at `record_index` (input order)
    pub fn cluster_of(&self, record_index: usize) -> Option<ClusterId> {
        self.assignment.get(record_index).copied()
    }

    /// Cluster ids of all records, in input order
    pub fn assignments(&self) -> &[ClusterId] {
        &self.assignment
    }

    /// Clusters in rank order
    pub fn ranked(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.ranking.iter().map(move |id| &self.clusters[id.0])
    }

    /// Member records of a cluster, in join order
    pub fn members<'a>(&'a self, cluster: &'a Cluster) -> impl Iterator<Item = &'a MotifRecord> + 'a {
        cluster.members.iter().map(move |&i| &self.records[i])
    }
}

/// Cluster records in iteration order
pub fn cluster<I>(records: I, params: &ClusterParams) -> Result<Clustering>
where
    I: IntoIterator<Item = MotifRecord>,
{
    let mut clusterer = Clusterer::new(*params)?;
    clusterer.extend(records);
    Ok(clusterer.finish())
}
