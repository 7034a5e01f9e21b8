//! 数値サンプル列の要約統計。

use serde::{Deserialize, Serialize};

/// ソート済みサンプルから導出する five-number 風の要約。
///
/// 契約:
/// - 欠損値は呼び出し側で除外済み（ここには実測値のみ渡る）
/// - 四分位は Tukey ヒンジ方式（奇数長では中央値を両半分に含める）
/// - 同一サンプル集合なら投入順に依らず同一の値を返す
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub n: u64,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    /// サンプル列を要約する。空列は `None`。
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        // 平均もソート後に畳むことで、マージ順の違いが最下位ビットに出ない
        let sum: f64 = sorted.iter().sum();
        let n = sorted.len();
        let lower = &sorted[..n.div_ceil(2)];
        let upper = &sorted[n / 2..];
        Some(Self {
            n: n as u64,
            mean: sum / n as f64,
            median: median_of(&sorted),
            q1: median_of(lower),
            q3: median_of(upper),
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}

/// ソート済みスライスの中央値。偶数長は中央2点の平均。
fn median_of(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_samples_yield_none() {
        assert_eq!(NumericSummary::from_samples(&[]), None);
    }

    #[test]
    fn singleton_collapses_to_one_value() {
        let s = NumericSummary::from_samples(&[42.0]).unwrap();
        assert_eq!(s.n, 1);
        assert_eq!(s.mean, 42.0);
        assert_eq!(s.median, 42.0);
        assert_eq!(s.q1, 42.0);
        assert_eq!(s.q3, 42.0);
        assert_eq!(s.min, 42.0);
        assert_eq!(s.max, 42.0);
    }

    #[test]
    fn odd_length_uses_tukey_hinges() {
        // 中央値 3 は両半分に含まれる: 下半分 [1,2,3] / 上半分 [3,4,5]
        let s = NumericSummary::from_samples(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 4.0);
    }

    #[test]
    fn even_length_averages_middle_pair() {
        let s = NumericSummary::from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q1, 1.5);
        assert_eq!(s.q3, 3.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn summary_is_order_independent() {
        let forward = NumericSummary::from_samples(&[10.0, 25.0, 25.0, 40.0, 18.0]).unwrap();
        let shuffled = NumericSummary::from_samples(&[25.0, 18.0, 40.0, 10.0, 25.0]).unwrap();
        assert_eq!(forward, shuffled);
    }
}
