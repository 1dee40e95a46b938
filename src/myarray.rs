//! ユーザー定義型でインデックスアクセスできる配列。

use std::marker::PhantomData;

/// 指定した型でインデックスアクセスできるジェネリック 1 次元配列。
///
/// 主に `Side` でインデックスアクセスする陣営ごとのデータ(玉位置、手駒、対局者)に使う。
/// インデックス型が `usize` に変換可能なことを想定している。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct MyArray1<V, K, const N: usize> {
    inner: [V; N],
    _phantom: PhantomData<fn() -> K>,
}

impl<V, K, const N: usize> MyArray1<V, K, N> {
    /// 要素を順に列挙する。
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.inner.iter()
    }
}

impl<V, K, const N: usize> From<[V; N]> for MyArray1<V, K, N> {
    fn from(inner: [V; N]) -> Self {
        Self {
            inner,
            _phantom: PhantomData,
        }
    }
}

impl<V, K: Into<usize>, const N: usize> std::ops::Index<K> for MyArray1<V, K, N> {
    type Output = V;

    fn index(&self, index: K) -> &Self::Output {
        &self.inner[index.into()]
    }
}

impl<V, K: Into<usize>, const N: usize> std::ops::IndexMut<K> for MyArray1<V, K, N> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.inner[index.into()]
    }
}

impl<V: Copy + Default, K, const N: usize> Default for MyArray1<V, K, N> {
    fn default() -> Self {
        Self::from([V::default(); N])
    }
}
