use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::token::TermFrequency;

/// 文書数と、各termが出現した文書数を保持する
/// IDF計算の元データ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFrequency {
    doc_num: u64,
    #[serde(with = "indexmap::map::serde_seq")]
    term_docs: IndexMap<String, u64>,
}

impl DocumentFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文書1件分のterm集合を加える
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.doc_num += 1;
        for (term, _) in freq.iter() {
            *self.term_docs.entry(term.to_string()).or_insert(0) += 1;
        }
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// termを含む文書数
    #[inline]
    pub fn doc_count(&self, term: &str) -> u64 {
        self.term_docs.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_docs.len()
    }

    /// 語彙を辞書順で返す
    pub fn sorted_vocabulary(&self) -> Vec<String> {
        let mut vocab: Vec<String> = self.term_docs.keys().cloned().collect();
        vocab.sort_unstable();
        vocab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_documents_not_occurrences() {
        let mut df = DocumentFrequency::new();
        df.add_doc(&TermFrequency::from_text("rice rice"));
        df.add_doc(&TermFrequency::from_text("rice beans"));
        assert_eq!(df.doc_num(), 2);
        assert_eq!(df.doc_count("rice"), 2);
        assert_eq!(df.doc_count("beans"), 1);
        assert_eq!(df.doc_count("rice rice"), 1);
        assert_eq!(df.sorted_vocabulary(), vec!["beans", "rice", "rice beans", "rice rice"]);
    }
}
