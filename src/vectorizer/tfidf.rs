use crate::vectorizer::{corpus::DocumentFrequency, token::TermFrequency};

/// TF-IDFの計算方式を差し替えるためのトレイト
pub trait TFIDFEngine {
    /// IDFベクトルを生成するメソッド
    /// # Arguments
    /// * `df` - 文書頻度
    /// * `vocabulary` - 次元順の語彙
    /// # Returns
    /// * `Vec<f64>` - 語彙と同じ順序のIDF
    fn idf_vec(df: &DocumentFrequency, vocabulary: &[String]) -> Vec<f64>;

    /// 1文書のTF値
    fn tf(freq: &TermFrequency, count: u32) -> f64;
}

/// デフォルトのTF-IDFエンジン
///
/// - TF: 生の出現回数
/// - IDF: ln((1 + n) / (1 + df)) + 1 (smooth idf)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(df: &DocumentFrequency, vocabulary: &[String]) -> Vec<f64> {
        let doc_num = df.doc_num() as f64;
        vocabulary
            .iter()
            .map(|term| {
                let doc_freq = df.doc_count(term) as f64;
                ((1.0 + doc_num) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect()
    }

    #[inline]
    fn tf(_freq: &TermFrequency, count: u32) -> f64 {
        count as f64
    }
}
