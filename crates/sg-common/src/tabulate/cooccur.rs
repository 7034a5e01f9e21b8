//! タグ共起ペアの列挙。

use std::collections::BTreeSet;

/// タグ集合から非順序ペアを辞書順で列挙する。
///
/// 契約:
/// - 返るタプルは常に `a < b`（(a,b) と (b,a) を同一ペアとして数えるため）
/// - 要素数 k に対して k*(k-1)/2 ペア
pub fn ordered_pairs(tags: &BTreeSet<String>) -> Vec<(String, String)> {
    let list: Vec<&String> = tags.iter().collect();
    let mut pairs = Vec::with_capacity(list.len() * list.len().saturating_sub(1) / 2);
    for (i, a) in list.iter().enumerate() {
        for b in &list[i + 1..] {
            pairs.push(((*a).clone(), (*b).clone()));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn pairs_are_lexicographic_and_exhaustive() {
        let pairs = ordered_pairs(&set(&["b", "c", "a"]));
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn fewer_than_two_tags_yield_no_pairs() {
        assert!(ordered_pairs(&set(&[])).is_empty());
        assert!(ordered_pairs(&set(&["単独"])).is_empty());
    }

    #[test]
    fn pair_count_is_k_choose_two() {
        let pairs = ordered_pairs(&set(&["a", "b", "c", "d", "e"]));
        assert_eq!(pairs.len(), 10);
    }
}
