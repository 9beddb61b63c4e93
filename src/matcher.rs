use crate::cluster::ClusterAssignment;
use crate::error::{RecommendError, Result};
use crate::recipe::RecipeRecord;

/// ターゲットと同じクラスタに属するレシピを返す
///
/// ターゲット自身は`link`で比較して除外する (同名の別レシピは残る)。
/// 順序はコーパス順。ターゲットが単独のクラスタなら空。
///
/// # Arguments
/// * `corpus` - 割り当てを計算したのと同じコーパス
/// * `assignment` - `corpus`に対するクラスタ割り当て
/// * `target_index` - コーパス内のターゲット行
///
/// # Errors
/// * `InvalidTarget` - 範囲外、またはコーパスと割り当ての長さが食い違う
pub fn match_peers(
    corpus: &[RecipeRecord],
    assignment: &ClusterAssignment,
    target_index: usize,
) -> Result<Vec<RecipeRecord>> {
    if corpus.len() != assignment.len() {
        return Err(RecommendError::InvalidTarget {
            reason: format!(
                "assignment covers {} rows but corpus has {}",
                assignment.len(),
                corpus.len()
            ),
        });
    }
    let (target, cluster) = corpus
        .get(target_index)
        .zip(assignment.label(target_index))
        .ok_or_else(|| RecommendError::InvalidTarget {
            reason: format!("index {} out of range for {} rows", target_index, corpus.len()),
        })?;

    Ok(corpus
        .iter()
        .zip(assignment.labels())
        .filter(|(r, &l)| l == cluster && r.link != target.link)
        .map(|(r, _)| r.clone())
        .collect())
}

/// `link`でコーパス内の行を探す
#[inline]
pub fn position_of(corpus: &[RecipeRecord], link: &str) -> Option<usize> {
    corpus.iter().position(|r| r.link == link)
}
