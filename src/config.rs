use serde::{Deserialize, Serialize};

use crate::cluster::{AssignParams, ClusterSeed, DEFAULT_CLUSTER_DIVISOR};

/// シードを上書きする環境変数
pub const SEED_ENV: &str = "RECIPE_SEED";

/// レコメンダの設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub seed: ClusterSeed,
    pub max_iter: usize,
    pub n_init: usize,
    pub tol: f64,
    /// k = floor(n / cluster_divisor)
    pub cluster_divisor: usize,
    /// 絞り込み後に考慮する最大件数 (ターゲットは常に残る)
    pub max_corpus: Option<usize>,
    /// コース絞り込み後が小さすぎた場合に全件で再試行するか
    pub fallback_to_full_corpus: bool,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        let params = AssignParams::default();
        Self {
            seed: params.seed,
            max_iter: params.max_iter,
            n_init: params.n_init,
            tol: params.tol,
            cluster_divisor: DEFAULT_CLUSTER_DIVISOR,
            max_corpus: None,
            fallback_to_full_corpus: false,
        }
    }
}

impl RecommenderConfig {
    pub fn assign_params(&self) -> AssignParams {
        AssignParams {
            divisor: self.cluster_divisor,
            max_iter: self.max_iter,
            n_init: self.n_init,
            tol: self.tol,
            seed: self.seed,
        }
    }

    /// 環境変数`RECIPE_SEED`でシードを上書きする
    /// "random" なら実行ごとの乱数、数値なら固定シード
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(SEED_ENV) {
            match parse_seed(&raw) {
                Some(seed) => self.seed = seed,
                None => tracing::warn!(value = %raw, "ignoring unparsable {}", SEED_ENV),
            }
        }
        self
    }
}

pub fn parse_seed(raw: &str) -> Option<ClusterSeed> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("random") {
        return Some(ClusterSeed::Entropy);
    }
    raw.parse::<u64>().ok().map(ClusterSeed::Fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = RecommenderConfig::default();
        assert_eq!(c.seed, ClusterSeed::Fixed(42));
        assert_eq!(c.cluster_divisor, 5);
        assert_eq!(c.n_init, 10);
        assert!(!c.fallback_to_full_corpus);
    }

    #[test]
    fn seed_parsing() {
        assert_eq!(parse_seed(" 7 "), Some(ClusterSeed::Fixed(7)));
        assert_eq!(parse_seed("RANDOM"), Some(ClusterSeed::Entropy));
        assert_eq!(parse_seed("x"), None);
    }

    #[test]
    fn config_survives_cbor_encoding() {
        let c = RecommenderConfig { n_init: 3, ..Default::default() };
        let bytes = serde_cbor::to_vec(&c).unwrap();
        let back: RecommenderConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.assign_params().n_init, 3);
    }
}
