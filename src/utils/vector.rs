use std::ops::AddAssign;

use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVecは0要素を疎とした過疎ベクトルです
/// indices と valuesを持ち
/// indicesは要素のインデックスを保持し、
/// valuesは要素の値を保持します
///
/// 要素はindicesの昇順でソートされていることを保証します
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num + Copy,
{
    inds: Vec<usize>,
    vals: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inds: Vec::new(),
            vals: Vec::new(),
            len: 0,
        }
    }

    /// 論理長`len`の空ベクトル
    /// nnzの見積もりとして`cap`を確保する
    #[inline]
    pub fn with_capacity(len: usize, cap: usize) -> Self {
        Self {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
            len,
        }
    }

    /// (index, value)の組から作成します
    /// 0の値は捨てられ、同じindexは加算されます
    ///
    /// # Arguments
    /// * `len` - 論理長
    /// * `pairs` - 任意順の(index, value)
    pub fn from_pairs(len: usize, mut pairs: Vec<(usize, N)>) -> Self {
        pairs.sort_by_key(|(idx, _)| *idx);
        let mut vec = Self::with_capacity(len, pairs.len());
        for (idx, val) in pairs {
            debug_assert!(idx < len, "index out of bounds");
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    let slot = vec.vals.len() - 1;
                    vec.vals[slot] = vec.vals[slot] + val;
                }
                _ => {
                    vec.inds.push(idx);
                    vec.vals.push(val);
                }
            }
        }
        vec.drop_zeros();
        vec
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&index) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// 非ゼロ要素のみを(index, &value)で返す
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, &N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter())
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }

    fn drop_zeros(&mut self) {
        let mut w = 0;
        for r in 0..self.vals.len() {
            if self.vals[r] != N::zero() {
                self.inds[w] = self.inds[r];
                self.vals[w] = self.vals[r];
                w += 1;
            }
        }
        self.inds.truncate(w);
        self.vals.truncate(w);
    }
}

impl<N> Default for ZeroSpVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy + AddAssign,
{
    #[inline]
    pub fn norm_sq<R>(&self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        let mut result = R::zero();
        for &v in &self.vals {
            let v: R = v.into();
            result += v * v;
        }
        result
    }
}

impl ZeroSpVec<f64> {
    /// L2ノルムで割って単位ベクトルにする
    /// ゼロベクトルはそのまま
    pub fn l2_normalize(&mut self) {
        let norm = self.norm_sq::<f64>().sqrt();
        if norm > 0.0 {
            for v in self.vals.iter_mut() {
                *v /= norm;
            }
        }
    }

    /// 密なベクトルとの二乗ユークリッド距離
    ///
    /// `dense_norm_sq`は`dense`の二乗ノルム(事前計算済み)
    /// ||a - c||^2 = ||a||^2 - 2 a·c + ||c||^2
    #[inline]
    pub fn sq_distance_to_dense(&self, dense: &[f64], dense_norm_sq: f64) -> f64 {
        debug_assert_eq!(self.len, dense.len());
        let mut self_sq = 0.0;
        let mut cross = 0.0;
        for (idx, &v) in self.inds.iter().zip(self.vals.iter()) {
            self_sq += v * v;
            cross += v * dense[*idx];
        }
        (self_sq - 2.0 * cross + dense_norm_sq).max(0.0)
    }

    /// 密なベクトルへ加算する
    #[inline]
    pub fn add_into(&self, dense: &mut [f64]) {
        for (idx, &v) in self.inds.iter().zip(self.vals.iter()) {
            dense[*idx] += v;
        }
    }
}
