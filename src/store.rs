use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{RecommendError, Result};
use crate::recipe::RecipeRecord;

/// 既定の鮮度 (1日)
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// レシピ表の永続化ハンドル
/// コアはこれを知らず、境界層にだけ渡される
pub trait RecipeStore {
    fn load(&self) -> Result<Vec<RecipeRecord>>;
    fn save(&self, records: &[RecipeRecord]) -> Result<()>;
    /// 保存物が`max_age`より新しいか
    fn is_fresh(&self, max_age: Duration) -> bool;
}

/// CBORでエンコードしたレシピ表ファイル
#[derive(Debug, Clone)]
pub struct CborFileStore {
    path: PathBuf,
}

impl CborFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> RecommendError {
        RecommendError::Store {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecipeStore for CborFileStore {
    fn load(&self) -> Result<Vec<RecipeRecord>> {
        let file = File::open(&self.path).map_err(|e| self.io_err(e))?;
        let records: Vec<RecipeRecord> = serde_cbor::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "loaded recipe table");
        Ok(records)
    }

    fn save(&self, records: &[RecipeRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let file = File::create(&self.path).map_err(|e| self.io_err(e))?;
        let mut writer = BufWriter::new(file);
        serde_cbor::to_writer(&mut writer, &records)?;
        writer.flush().map_err(|e| self.io_err(e))?;
        tracing::debug!(path = %self.path.display(), records = records.len(), "saved recipe table");
        Ok(())
    }

    fn is_fresh(&self, max_age: Duration) -> bool {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .map(|modified| SystemTime::now().duration_since(modified).unwrap_or(Duration::ZERO))
            .map_or(false, |age| age < max_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CborFileStore::new(dir.path().join("nested").join("recipes.cbor"));
        assert!(!store.is_fresh(DEFAULT_MAX_AGE));

        let records = vec![
            RecipeRecord::new("a", "A", "chicken rice").with_courses("Dinner, Main Course"),
            RecipeRecord::new("b", "B", "").with_cuisine("Italian"),
        ];
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
        assert!(store.is_fresh(DEFAULT_MAX_AGE));
        assert!(!store.is_fresh(Duration::ZERO));
    }

    #[test]
    fn slice_of_records_is_written_as_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let store = CborFileStore::new(dir.path().join("recipes.cbor"));
        let table = vec![
            RecipeRecord::new("a", "A", "beet tops"),
            RecipeRecord::new("b", "B", "rice"),
            RecipeRecord::new("c", "C", "garlic"),
        ];
        store.save(&table[1..]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, table[1..].to_vec());
    }

    #[test]
    fn missing_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CborFileStore::new(dir.path().join("absent.cbor"));
        assert!(matches!(store.load(), Err(RecommendError::Store { .. })));
    }

    #[test]
    fn garbage_is_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cbor");
        fs::write(&path, b"\xff\xff not cbor").unwrap();
        assert!(matches!(CborFileStore::new(path).load(), Err(RecommendError::Codec(_))));
    }
}
