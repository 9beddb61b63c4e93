use std::path::PathBuf;

/// レコメンド処理で発生するエラー
/// どれもリクエスト単位で終端的なもので、内部で回復はしない
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// コーパスが空
    #[error("corpus is empty")]
    EmptyCorpus,

    /// 全ドキュメントが空文字列に正規化され、語彙が作れない
    #[error("corpus has no extractable terms")]
    DegenerateCorpus,

    /// クラスタリングには2行以上必要
    #[error("insufficient data for clustering: {rows} row(s), at least 2 required")]
    InsufficientData { rows: usize },

    /// ターゲットがコーパス/割り当てのペアに存在しない
    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    #[error("recipe store error at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("recipe table codec error: {0}")]
    Codec(#[from] serde_cbor::Error),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
