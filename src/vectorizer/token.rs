use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 1文書内の語(ユニグラム/バイグラム)の出現回数を管理する構造体
/// 出現順を保持するためIndexMapを使う
///
/// # Examples
/// ```
/// use recipe_recommender::vectorizer::token::TermFrequency;
///
/// let freq = TermFrequency::from_text("chicken rice chicken");
/// assert_eq!(freq.term_count("chicken"), 2);
/// assert_eq!(freq.term_count("chicken rice"), 1);
/// assert_eq!(freq.term_count("rice chicken"), 1);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// 特徴量として扱う最小文字数
/// 1文字の断片は語として扱わない
pub const MIN_TOKEN_CHARS: usize = 2;

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// 正規化済みテキストからユニグラムとバイグラムを数える
    ///
    /// # Arguments
    /// * `text` - 空白区切りの正規化済みテキスト
    pub fn from_text(text: &str) -> Self {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
            .collect();
        let mut freq = Self::new();
        freq.add_terms(&tokens);
        for pair in tokens.windows(2) {
            freq.add_term(&format!("{} {}", pair[0], pair[1]));
        }
        freq
    }

    /// termを追加する
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        *self.term_count.entry(term.to_string()).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// あるtermの出現回数を取得します
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// (term, 出現回数)を出現順に返す
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.term_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// ユニークなterm数
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }
}
