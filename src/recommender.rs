use serde::{Deserialize, Serialize};

use crate::cluster::assign_clusters_with;
use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::matcher::{match_peers, position_of};
use crate::recipe::{dedup_records, filter_by_course, RecipeRecord};
use crate::text::TextNormalizer;
use crate::vectorizer::build_features;

/// 1リクエスト分の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// クラスタリングに使われたターゲット
    pub target: RecipeRecord,
    pub target_cluster: usize,
    pub cluster_count: usize,
    /// ターゲットを除く同一クラスタのレシピ (コーパス順)
    pub peers: Vec<RecipeRecord>,
}

/// 正規化 -> 特徴量 -> クラスタ -> マッチのパイプライン
///
/// 呼び出し側のポリシー (重複除去、コース絞り込み、ターゲットの追加) もここで適用する。
/// 中間データはリクエストごとに作って捨てるので、共有状態は持たない。
#[derive(Debug)]
pub struct Recommender {
    config: RecommenderConfig,
    normalizer: TextNormalizer,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// `link`でターゲットを探す
    pub fn find_by_link<'a>(records: &'a [RecipeRecord], link: &str) -> Option<&'a RecipeRecord> {
        records.iter().find(|r| r.link == link)
    }

    /// ターゲットに似たレシピを返す
    ///
    /// # Arguments
    /// * `records` - レシピ表のスナップショット
    /// * `target` - ユーザーが指定したレシピ (表に無ければ追加される)
    pub fn recommend(&self, records: &[RecipeRecord], target: &RecipeRecord) -> Result<Recommendation> {
        let deduped = dedup_records(records);
        let filtered = filter_by_course(&deduped, target);
        tracing::debug!(
            records = records.len(),
            deduped = deduped.len(),
            filtered = filtered.len(),
            "prepared corpus"
        );

        match self.recommend_in(filtered, target) {
            Err(RecommendError::InsufficientData { rows })
                if self.config.fallback_to_full_corpus && target.has_course() =>
            {
                tracing::warn!(rows, "course-filtered corpus too small, retrying on full corpus");
                self.recommend_in(deduped, target)
            }
            other => other,
        }
    }

    fn recommend_in(&self, mut corpus: Vec<RecipeRecord>, target: &RecipeRecord) -> Result<Recommendation> {
        if let Some(max) = self.config.max_corpus {
            corpus.truncate(max);
        }
        let target_index = match position_of(&corpus, &target.link) {
            Some(idx) => idx,
            None => {
                corpus.push(target.clone());
                corpus.len() - 1
            }
        };

        let ingredients: Vec<&str> = corpus.iter().map(|r| r.all_ingredients.as_str()).collect();
        let normalized = self.normalizer.normalize_all(&ingredients);
        let (matrix, _vocabulary) = build_features(&normalized)?;
        let assignment = assign_clusters_with(&matrix, &self.config.assign_params())?;
        let peers = match_peers(&corpus, &assignment, target_index)?;
        let target_cluster = assignment.label(target_index).ok_or_else(|| RecommendError::InvalidTarget {
            reason: format!("no cluster for row {}", target_index),
        })?;

        tracing::info!(
            recipe = %corpus[target_index].link,
            corpus = corpus.len(),
            clusters = assignment.n_clusters(),
            cluster = target_cluster,
            peers = peers.len(),
            "recommendation ready"
        );
        Ok(Recommendation {
            target: corpus.swap_remove(target_index),
            target_cluster,
            cluster_count: assignment.n_clusters(),
            peers,
        })
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize, ingredients: &str, courses: &str) -> RecipeRecord {
        RecipeRecord::new(format!("https://example.com/{}", i), format!("Recipe {}", i), ingredients)
            .with_courses(courses)
    }

    #[test]
    fn target_is_added_when_missing() {
        let records: Vec<RecipeRecord> = (0..4).map(|i| record(i, "chicken rice", "")).collect();
        let target = record(99, "chicken rice garlic", "");
        let rec = Recommender::default().recommend(&records, &target).unwrap();
        assert_eq!(rec.cluster_count, 1);
        assert_eq!(rec.peers.len(), 4);
        assert_eq!(rec.target.link, target.link);
    }

    #[test]
    fn course_filter_then_fallback() {
        let mut records: Vec<RecipeRecord> = (0..6).map(|i| record(i, "sugar flour", "Dessert")).collect();
        let target = record(99, "chicken rice", "Dinner");
        records.push(target.clone());

        let strict = Recommender::default().recommend(&records, &target);
        assert!(matches!(strict, Err(RecommendError::InsufficientData { rows: 1 })));

        let config = RecommenderConfig { fallback_to_full_corpus: true, ..Default::default() };
        let rec = Recommender::new(config).recommend(&records, &target).unwrap();
        assert_eq!(rec.cluster_count, 1);
        assert_eq!(rec.peers.len(), 6);
    }

    #[test]
    fn max_corpus_keeps_target() {
        let records: Vec<RecipeRecord> = (0..20).map(|i| record(i, "chicken rice", "")).collect();
        let target = records[19].clone();
        let config = RecommenderConfig { max_corpus: Some(5), ..Default::default() };
        let rec = Recommender::new(config).recommend(&records, &target).unwrap();
        assert_eq!(rec.cluster_count, 1);
        assert_eq!(rec.peers.len(), 5);
        assert!(rec.peers.iter().all(|p| p.link != target.link));
    }

    #[test]
    fn duplicate_rows_collapse() {
        let base = record(1, "garlic onion", "");
        let records = vec![base.clone(), base.clone(), record(2, "garlic onion ginger", "")];
        let rec = Recommender::default().recommend(&records, &base).unwrap();
        assert_eq!(rec.peers.len(), 1);
        assert_eq!(rec.peers[0].link, "https://example.com/2");
    }

    #[test]
    fn find_by_link() {
        let records = vec![record(1, "", ""), record(2, "", "")];
        assert_eq!(
            Recommender::find_by_link(&records, "https://example.com/2").map(|r| r.name.as_str()),
            Some("Recipe 2")
        );
    }
}
