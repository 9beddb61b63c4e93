use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::utils::vector::ZeroSpVec;
use crate::vectorizer::FeatureMatrix;

/// 既定のシード
/// 固定シードで同じ入力なら同じ割り当てになる
pub const DEFAULT_SEED: u64 = 42;

/// 初期化に使う乱数の種
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterSeed {
    /// 再現可能
    Fixed(u64),
    /// 実行ごとにOSの乱数から種を取る
    Entropy,
}

impl Default for ClusterSeed {
    fn default() -> Self {
        ClusterSeed::Fixed(DEFAULT_SEED)
    }
}

impl ClusterSeed {
    fn resolve(self) -> u64 {
        match self {
            ClusterSeed::Fixed(seed) => seed,
            ClusterSeed::Entropy => rand::random::<u64>(),
        }
    }
}

/// K-Means (Lloyd法 + k-means++初期化)
///
/// # Algorithm
/// 1. k-means++で重心を初期化
/// 2. 各行を最も近い重心に割り当てる (二乗ユークリッド距離、同距離は小さい番号)
/// 3. 割り当てられた行の平均で重心を更新
/// 4. 重心の移動量が`tol`以下か`max_iter`に達するまで繰り返す
///
/// `n_init`回の初期化のうち慣性(inertia)が最小のものを採用します。
/// メンバーを失ったクラスタは、自分の重心から最も遠い行で埋め直します。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    n_init: usize,
    tol: f64,
    seed: ClusterSeed,
}

/// 学習結果
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub inertia: f64,
    pub n_iter: usize,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters: n_clusters.max(1),
            max_iter: 300,
            n_init: 10,
            tol: 1e-4,
            seed: ClusterSeed::default(),
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol.max(0.0);
        self
    }

    pub fn with_seed(mut self, seed: ClusterSeed) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// 行列をクラスタリングする
    ///
    /// # Errors
    /// * `InsufficientData` - 行数が2未満
    pub fn fit(&self, matrix: &FeatureMatrix) -> Result<KMeansFit> {
        let n = matrix.n_rows();
        if n < 2 {
            return Err(RecommendError::InsufficientData { rows: n });
        }
        let k = self.n_clusters.min(n);
        let base_seed = self.seed.resolve();

        let run_once = |run: usize| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(run as u64));
            let fit = self.lloyd(matrix, k, &mut rng);
            tracing::trace!(run, inertia = fit.inertia, n_iter = fit.n_iter, "k-means run finished");
            fit
        };

        let mut best = run_once(0);
        for run in 1..self.n_init {
            let fit = run_once(run);
            if fit.inertia < best.inertia {
                best = fit;
            }
        }
        tracing::debug!(k, inertia = best.inertia, n_iter = best.n_iter, "k-means converged");
        Ok(best)
    }

    fn lloyd(&self, matrix: &FeatureMatrix, k: usize, rng: &mut StdRng) -> KMeansFit {
        let rows = matrix.rows();
        let dim = matrix.n_features();
        let mut centroids = plus_plus_init(rows, dim, k, rng);
        let (mut labels, mut dists) = assign(rows, &centroids);

        let mut n_iter = 0;
        while n_iter < self.max_iter {
            n_iter += 1;
            let next = update(rows, dim, k, &mut labels, &mut dists);
            let shift: f64 = centroids
                .iter()
                .zip(next.iter())
                .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f64>())
                .sum();
            centroids = next;
            (labels, dists) = assign(rows, &centroids);
            if shift <= self.tol {
                break;
            }
        }

        KMeansFit {
            inertia: dists.iter().sum(),
            labels,
            centroids,
            n_iter,
        }
    }
}

/// k-means++ 初期化
/// 既存の重心からの二乗距離に比例した確率で次の重心を選ぶ
fn plus_plus_init(rows: &[ZeroSpVec<f64>], dim: usize, k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = rows.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(densify(&rows[rng.gen_range(0..n)], dim));

    let first_norm = norm_sq(&centroids[0]);
    let mut closest: Vec<f64> = rows
        .iter()
        .map(|r| r.sq_distance_to_dense(&centroids[0], first_norm))
        .collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();
        let pick = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = n - 1;
            for (i, &d) in closest.iter().enumerate() {
                acc += d;
                if acc > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // 全点が既存の重心と一致
            rng.gen_range(0..n)
        };
        let centroid = densify(&rows[pick], dim);
        let c_norm = norm_sq(&centroid);
        for (d, row) in closest.iter_mut().zip(rows.iter()) {
            *d = d.min(row.sq_distance_to_dense(&centroid, c_norm));
        }
        centroids.push(centroid);
    }
    centroids
}

/// 各行の最近傍重心と、その二乗距離
fn assign(rows: &[ZeroSpVec<f64>], centroids: &[Vec<f64>]) -> (Vec<usize>, Vec<f64>) {
    let norms: Vec<f64> = centroids.iter().map(|c| norm_sq(c)).collect();
    rows.par_iter()
        .map(|row| {
            let mut best = (0, f64::INFINITY);
            for (c, (centroid, &c_norm)) in centroids.iter().zip(norms.iter()).enumerate() {
                let d = row.sq_distance_to_dense(centroid, c_norm);
                if d < best.1 {
                    best = (c, d);
                }
            }
            best
        })
        .unzip()
}

/// 重心を割り当て行の平均で更新する
/// 空になったクラスタには最も遠い行を移す
fn update(
    rows: &[ZeroSpVec<f64>],
    dim: usize,
    k: usize,
    labels: &mut [usize],
    dists: &mut [f64],
) -> Vec<Vec<f64>> {
    let mut counts = vec![0usize; k];
    for &l in labels.iter() {
        counts[l] += 1;
    }

    for c in 0..k {
        if counts[c] > 0 {
            continue;
        }
        let far = (0..rows.len())
            .filter(|&i| counts[labels[i]] > 1)
            .max_by(|&a, &b| dists[a].total_cmp(&dists[b]).then(b.cmp(&a)));
        if let Some(i) = far {
            counts[labels[i]] -= 1;
            labels[i] = c;
            counts[c] = 1;
            dists[i] = 0.0;
        }
    }

    let mut sums = vec![vec![0.0; dim]; k];
    for (row, &l) in rows.iter().zip(labels.iter()) {
        row.add_into(&mut sums[l]);
    }
    for (sum, &count) in sums.iter_mut().zip(counts.iter()) {
        if count > 0 {
            let inv = 1.0 / count as f64;
            sum.iter_mut().for_each(|v| *v *= inv);
        }
    }
    sums
}

#[inline]
fn densify(row: &ZeroSpVec<f64>, dim: usize) -> Vec<f64> {
    let mut dense = vec![0.0; dim];
    row.add_into(&mut dense);
    dense
}

#[inline]
fn norm_sq(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}
