use std::collections::BTreeSet;

use regex::{Regex, RegexSet};

use crate::Record;
use crate::dictionary::SegmentDictionary;
use crate::error::DictionaryError;
use crate::normalize::normalize_for_match;

/// 全タグの正規表現を1つの RegexSet に畳んだ照合器
///
/// テキスト欄1つにつき1回の走査で全タグを判定し、当たったパターン番号を
/// 所有タグへ引き戻す。タグ抽出は単調: テキストを足してもタグは減らない。
pub struct TagMatcher {
    set: RegexSet,
    /// RegexSet のパターン番号 → names のタグ番号
    owner: Vec<usize>,
    names: Vec<String>,
}

impl TagMatcher {
    pub fn new(dict: &SegmentDictionary) -> Result<Self, DictionaryError> {
        let mut patterns: Vec<&str> = Vec::new();
        let mut owner: Vec<usize> = Vec::new();
        let mut names: Vec<String> = Vec::with_capacity(dict.tags.len());

        for (tag_index, rule) in dict.tags.iter().enumerate() {
            names.push(rule.name.clone());
            for pattern in &rule.patterns {
                patterns.push(pattern);
                owner.push(tag_index);
            }
        }

        let set = match RegexSet::new(&patterns) {
            Ok(set) => set,
            Err(err) => {
                // RegexSet のエラーはどのパターンか言わないので、個別コンパイルで特定し直す
                for (i, pattern) in patterns.iter().enumerate() {
                    if let Err(source) = Regex::new(pattern) {
                        return Err(DictionaryError::BadRegex {
                            tag: names[owner[i]].clone(),
                            pattern: (*pattern).to_string(),
                            source: Box::new(source),
                        });
                    }
                }
                return Err(DictionaryError::BadRegex {
                    tag: "(combined set)".into(),
                    pattern: String::new(),
                    source: Box::new(err),
                });
            }
        };

        Ok(Self { set, owner, names })
    }

    pub fn tag_count(&self) -> usize {
        self.names.len()
    }

    /// レコードの全テキスト欄からタグ集合を抽出する
    pub fn extract(&self, record: &Record) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for text in record.text_fields().into_iter().flatten() {
            self.match_into(text, &mut tags);
        }
        tags
    }

    /// 単一テキストを正規化して照合し、当たったタグを集合へ足す
    pub fn match_into(&self, text: &str, tags: &mut BTreeSet<String>) {
        let normalized = normalize_for_match(text);
        if normalized.is_empty() {
            return;
        }
        for index in self.set.matches(&normalized) {
            tags.insert(self.names[self.owner[index]].clone());
        }
    }
}
