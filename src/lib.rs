/// This crate is a recipe recommendation engine built on TF-IDF and k-means.
pub mod cluster;
pub mod config;
pub mod error;
pub mod matcher;
pub mod recipe;
pub mod recommender;
pub mod store;
pub mod text;
pub mod utils;
pub mod vectorizer;

/// Recipe Record
/// One row of the recipe table.
/// `link` is the identity key; `name` is only a display attribute and may repeat.
pub use recipe::RecipeRecord;

/// Text Normalizer
/// Turns raw ingredient text into a canonical stem stream:
/// stopword removal, punctuation/digit stripping, word segmentation,
/// lowercasing and Snowball stemming.
///
/// The stemmer is created once per instance and reused across calls.
pub use text::TextNormalizer;

/// Feature Space Builder
/// Builds a TF-IDF matrix over unigrams and bigrams of the normalized corpus.
/// The vocabulary is exactly the observed terms, sorted.
/// Rows are L2-normalized.
///
/// `build_features` uses the default engine:
/// - TF: raw count
/// - IDF: ln((1 + n) / (1 + df)) + 1
pub use vectorizer::{build_features, FeatureMatrix, FeatureSpaceBuilder};

/// TF IDF Calculation Engine Trait
/// Plug a different TF/IDF formula into `FeatureSpaceBuilder<E>`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Cluster Assignor
/// Partitions feature rows with seeded k-means, k = max(1, floor(n / 5)).
///
/// # Determinism
/// `ClusterSeed::Fixed(42)` is the default and is part of the public contract:
/// the same corpus gives the same labels.
/// `ClusterSeed::Entropy` draws a fresh seed per run.
pub use cluster::{assign_clusters, ClusterAssignment, ClusterSeed, KMeans};

/// Recommendation Matcher
/// Returns every record sharing the target's cluster, excluding the target by `link`.
pub use matcher::match_peers;

/// Recommender pipeline
/// Applies dedup and course pre-filtering, then runs normalize -> features -> clusters -> match.
pub use recommender::{Recommendation, Recommender};

/// Recommender Configuration
/// Clustering knobs (seed, iteration cap, restarts, tolerance, divisor) and
/// corpus policy (`max_corpus`, `fallback_to_full_corpus`).
/// Every field has a default, so partial serialized configs are accepted.
pub use config::RecommenderConfig;

/// Error type and Result alias
/// `EmptyCorpus`, `DegenerateCorpus`, `InsufficientData` and `InvalidTarget`
/// end the current request; `Store` and `Codec` come from the table file.
pub use error::{RecommendError, Result};

/// Recipe Table Store
/// Handle-based persistence for the recipe table, kept outside the core.
/// `CborFileStore` writes a CBOR file at a caller-supplied path and reports
/// whether it is younger than `DEFAULT_MAX_AGE` (one day).
pub use store::{CborFileStore, RecipeStore, DEFAULT_MAX_AGE};
