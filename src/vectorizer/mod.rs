pub mod corpus;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::utils::vector::ZeroSpVec;
use crate::vectorizer::{
    corpus::DocumentFrequency,
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    token::TermFrequency,
};

/// TF-IDF特徴行列
/// 行はコーパスと同じ順序、列は語彙の順序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    rows: Vec<ZeroSpVec<f64>>,
    n_features: usize,
}

impl FeatureMatrix {
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&ZeroSpVec<f64>> {
        self.rows.get(index)
    }

    #[inline]
    pub fn rows(&self) -> &[ZeroSpVec<f64>] {
        &self.rows
    }

    /// 行をそのまま並べて作る
    /// 全行の論理長は`n_features`と一致していなければならない
    pub fn from_rows(rows: Vec<ZeroSpVec<f64>>, n_features: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == n_features));
        Self { rows, n_features }
    }
}

/// 正規化済みテキスト列からTF-IDF行列を作るビルダー
///
/// ユニグラムとバイグラムを語として数え、語彙は観測された語そのもの(辞書順)。
/// 各行はL2正規化される。
///
/// `E`でTF/IDFの計算式を差し替えられる
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureSpaceBuilder<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    _marker: PhantomData<E>,
}

impl<E> FeatureSpaceBuilder<E>
where
    E: TFIDFEngine,
{
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }

    /// 特徴行列と語彙を構築する
    ///
    /// # Arguments
    /// * `corpus` - 正規化済みテキスト (1文書1要素)
    ///
    /// # Returns
    /// * `(FeatureMatrix, Vec<String>)` - 行列と列順の語彙
    ///
    /// # Errors
    /// * `EmptyCorpus` - 文書が0件
    /// * `DegenerateCorpus` - 語が1つも取れない
    pub fn build<T>(&self, corpus: &[T]) -> Result<(FeatureMatrix, Vec<String>)>
    where
        T: AsRef<str>,
    {
        if corpus.is_empty() {
            return Err(RecommendError::EmptyCorpus);
        }

        let freqs: Vec<TermFrequency> = corpus
            .iter()
            .map(|doc| TermFrequency::from_text(doc.as_ref()))
            .collect();
        let mut df = DocumentFrequency::new();
        for freq in &freqs {
            df.add_doc(freq);
        }
        if df.vocab_size() == 0 {
            return Err(RecommendError::DegenerateCorpus);
        }

        let vocabulary = df.sorted_vocabulary();
        let dims: IndexMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();
        let idf = E::idf_vec(&df, &vocabulary);

        let rows = freqs
            .iter()
            .map(|freq| {
                let pairs = freq
                    .iter()
                    .filter_map(|(term, count)| {
                        dims.get(term).map(|&dim| (dim, E::tf(freq, count) * idf[dim]))
                    })
                    .collect();
                let mut row = ZeroSpVec::from_pairs(vocabulary.len(), pairs);
                row.l2_normalize();
                row.shrink_to_fit();
                row
            })
            .collect();

        tracing::debug!(
            rows = corpus.len(),
            vocabulary = vocabulary.len(),
            "built tf-idf feature space"
        );
        Ok((FeatureMatrix::from_rows(rows, vocabulary.len()), vocabulary))
    }
}

/// デフォルトエンジンで特徴空間を作るショートカット
pub fn build_features<T>(corpus: &[T]) -> Result<(FeatureMatrix, Vec<String>)>
where
    T: AsRef<str>,
{
    FeatureSpaceBuilder::<DefaultTFIDFEngine>::new().build(corpus)
}
