use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// レシピ1件分のメタデータ
///
/// `link`が同一性のキー。`name`は表示用で、重複しうる。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub link: String,
    pub name: String,
    /// コース (複数可)
    pub course: BTreeSet<String>,
    /// 空の場合あり
    pub cuisine: String,
    /// 新しいレシピにのみ入っている
    /// ベクトル化には使わない
    pub key_ingredients: String,
    /// 材料名を空白で連結したもの
    pub all_ingredients: String,
}

impl RecipeRecord {
    pub fn new(link: impl Into<String>, name: impl Into<String>, all_ingredients: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            name: name.into(),
            all_ingredients: all_ingredients.into(),
            ..Default::default()
        }
    }

    /// カンマ区切りのコース文字列を設定する
    pub fn with_courses(mut self, courses: &str) -> Self {
        self.course = parse_courses(courses);
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = cuisine.into();
        self
    }

    pub fn with_key_ingredients(mut self, key_ingredients: impl Into<String>) -> Self {
        self.key_ingredients = key_ingredients.into();
        self
    }

    #[inline]
    pub fn has_course(&self) -> bool {
        !self.course.is_empty()
    }

    /// 少なくとも1つのコースを共有するか
    #[inline]
    pub fn shares_course_with(&self, other: &RecipeRecord) -> bool {
        self.course.iter().any(|c| other.course.contains(c))
    }
}

/// "Main Course, Dinner" -> {"Dinner", "Main Course"}
/// 空白はトリムし、空要素は捨てる
pub fn parse_courses(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// (link, name)の組で重複を除く
/// 最初に現れたものを残し、順序は保持する
pub fn dedup_records(records: &[RecipeRecord]) -> Vec<RecipeRecord> {
    let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|r| seen.insert((r.link.as_str(), r.name.as_str())))
        .cloned()
        .collect()
}

/// ターゲットのコースによる事前絞り込み
///
/// ターゲットにコースが無ければ全件、あれば1つ以上コースを共有するものだけを返す
pub fn filter_by_course(records: &[RecipeRecord], target: &RecipeRecord) -> Vec<RecipeRecord> {
    if !target.has_course() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.shares_course_with(target))
        .cloned()
        .collect()
}
