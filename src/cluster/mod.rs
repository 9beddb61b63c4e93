pub mod kmeans;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vectorizer::FeatureMatrix;

pub use kmeans::{ClusterSeed, KMeans, KMeansFit, DEFAULT_SEED};

/// クラスタ数を決める除数
/// k = floor(n / 5)
pub const DEFAULT_CLUSTER_DIVISOR: usize = 5;

/// 行番号 -> クラスタ番号
/// 番号は単なるラベルで、実行間で意味を持たない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    n_clusters: usize,
}

impl ClusterAssignment {
    pub fn new(labels: Vec<usize>, n_clusters: usize) -> Self {
        debug_assert!(labels.iter().all(|&l| l < n_clusters));
        Self { labels, n_clusters }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    #[inline]
    pub fn label(&self, row: usize) -> Option<usize> {
        self.labels.get(row).copied()
    }

    #[inline]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// クラスタに属する行番号 (昇順)
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }
}

/// 行数からクラスタ数を求める
/// floor(rows / divisor)、最低1
#[inline]
pub fn cluster_count(rows: usize, divisor: usize) -> usize {
    (rows / divisor.max(1)).max(1)
}

/// クラスタ割り当てのパラメータ
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignParams {
    pub divisor: usize,
    pub max_iter: usize,
    pub n_init: usize,
    pub tol: f64,
    pub seed: ClusterSeed,
}

impl Default for AssignParams {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_CLUSTER_DIVISOR,
            max_iter: 300,
            n_init: 10,
            tol: 1e-4,
            seed: ClusterSeed::default(),
        }
    }
}

/// 既定パラメータで行列をクラスタに分ける
///
/// # Errors
/// * `InsufficientData` - 行数が2未満
pub fn assign_clusters(matrix: &FeatureMatrix) -> Result<ClusterAssignment> {
    assign_clusters_with(matrix, &AssignParams::default())
}

pub fn assign_clusters_with(matrix: &FeatureMatrix, params: &AssignParams) -> Result<ClusterAssignment> {
    let k = cluster_count(matrix.n_rows(), params.divisor);
    let fit = KMeans::new(k)
        .with_max_iter(params.max_iter)
        .with_n_init(params.n_init)
        .with_tol(params.tol)
        .with_seed(params.seed)
        .fit(matrix)?;
    Ok(ClusterAssignment::new(fit.labels, k))
}
