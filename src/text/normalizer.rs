use std::fmt;

use rayon::prelude::*;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

use crate::text::stopwords::StopWords;

/// 材料テキストの正規化器
///
/// 処理順序は固定です
/// 1. ストップワード除去 (空白区切り、大文字小文字を無視)
/// 2. 記号の除去
/// 3. 数字の除去
/// 4. UAX #29 による単語分割
/// 5. 小文字化してSnowball(English)でステミング
/// 6. 記号付きで残った語やステムがストップワードなら落とす (`tops` -> `top` など)
/// 7. 空白1つで連結
///
/// 6があるので出力をもう一度通しても変わらない
///
/// ステマーとストップワード集合は生成時に一度だけ確保し、呼び出し間で再利用します。
/// 失敗することはなく、入力が全て除去対象なら空文字列を返します。
///
/// # Examples
/// ```
/// use recipe_recommender::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(normalizer.normalize("2 cups of Chopped onions!"), "cup chop onion");
/// ```
pub struct TextNormalizer {
    stop_words: StopWords,
    stemmer: Stemmer,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::with_stop_words(StopWords::english())
    }

    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// 1件のテキストを正規化する
    ///
    /// # Arguments
    /// * `raw` - 空白区切りの材料名
    ///
    /// # Returns
    /// * `String` - ステムを空白1つで連結した文字列 (空もありうる)
    pub fn normalize(&self, raw: &str) -> String {
        let kept = self.stop_words.remove_from(raw);
        let stripped = strip_digits(&strip_punctuation(&kept));
        stripped
            .unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| !self.stop_words.contains(word))
            .map(|word| self.stemmer.stem(&word).into_owned())
            .filter(|stem| !stem.is_empty() && !self.stop_words.contains(stem))
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// コーパス全体を正規化する
    /// 入力順は保持される
    pub fn normalize_all<T>(&self, raws: &[T]) -> Vec<String>
    where
        T: AsRef<str> + Sync,
    {
        raws.par_iter()
            .map(|raw| self.normalize(raw.as_ref()))
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("stop_words", &self.stop_words.len())
            .field("stemmer", &"snowball-english")
            .finish()
    }
}

/// 英数字と空白以外を全て落とす
#[inline]
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

#[inline]
fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_numeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_yield_empty() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \t\n "), "");
    }

    #[test]
    fn only_stopwords_punctuation_digits() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize("the and of 123 ,.;!"), "");
    }

    #[test]
    fn stems_and_lowercases() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize("Chopped Onions"), "chop onion");
        assert_eq!(n.normalize("eggs"), "egg");
    }

    #[test]
    fn stopwords_dropped_after_punctuation_and_stemming() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize("the, rice"), "rice");
        assert_eq!(n.normalize("beet tops"), "beet");
        assert_eq!(n.normalize("chicken parts"), "chicken");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let n = TextNormalizer::new();
        for raw in ["beet tops", "The, chicken parts", "2 cups of Chopped onions!", "fills"] {
            let once = n.normalize(raw);
            assert_eq!(n.normalize(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn digits_inside_words_are_dropped() {
        let n = TextNormalizer::new();
        assert_eq!(n.normalize("rice2 100g"), "rice g");
    }

    #[test]
    fn normalize_all_keeps_order() {
        let n = TextNormalizer::new();
        let out = n.normalize_all(&["garlic", "", "sugar"]);
        assert_eq!(out, vec!["garlic".to_string(), String::new(), "sugar".to_string()]);
    }
}
