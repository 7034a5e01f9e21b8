pub mod builtin;

use std::collections::{BTreeMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Axis;
use crate::error::DictionaryError;
use crate::fields::EmploymentType;

/// タグ定義: 正規化済みテキストに対する正規表現の束。どれか1本でも当たればタグが立つ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRule {
    pub name: String,
    pub patterns: Vec<String>,
}

/// スコア項: レコードの観測1つに重みを与える。負の重みも許す。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreTerm {
    /// タグが立っていれば weight を加算
    Tag { tag: String, weight: f64 },
    /// 月給中点が man_yen 万円以上なら加算
    SalaryAtLeast { man_yen: u32, weight: f64 },
    /// 年間休日が days 日以上なら加算
    HolidaysAtLeast { days: u32, weight: f64 },
    /// 補正済み雇用形態が一致すれば加算
    EmploymentTypeIs {
        employment_type: EmploymentType,
        weight: f64,
    },
}

impl ScoreTerm {
    pub fn weight(&self) -> f64 {
        match self {
            ScoreTerm::Tag { weight, .. }
            | ScoreTerm::SalaryAtLeast { weight, .. }
            | ScoreTerm::HolidaysAtLeast { weight, .. }
            | ScoreTerm::EmploymentTypeIs { weight, .. } => *weight,
        }
    }

    fn referenced_tag(&self) -> Option<&str> {
        match self {
            ScoreTerm::Tag { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// 第3層の詳細パターン。必須タグが全部立ち、禁止タグが1つも立たないとき成立。
/// 同一中分類内では宣言順に評価し、最初に成立したものを採用する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required_tags: Vec<String>,
    #[serde(default)]
    pub forbidden_tags: Vec<String>,
}

/// 第2層の中分類。軸内の候補選定はスコア最大 → priority 最小で決まる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidCategoryConfig {
    pub id: String,
    pub label: String,
    /// 同点タイブレーク用。軸内で一意、小さいほど優先。
    pub priority: u32,
    /// スコアがこの値以上（同値含む）で分類候補になる
    pub min_score: f64,
    pub terms: Vec<ScoreTerm>,
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

/// 第1層の軸と、その配下の中分類
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub axis: Axis,
    pub categories: Vec<MidCategoryConfig>,
}

/// セグメント辞書。ロード時に validate() を通った後は不変として扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDictionary {
    pub version: String,
    pub tags: Vec<TagRule>,
    pub axes: Vec<AxisConfig>,
}

impl SegmentDictionary {
    /// JSON からロードして検証する。壊れた辞書で分類を走らせないための唯一の入口。
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        let dict: SegmentDictionary = serde_json::from_str(json)?;
        dict.validate()?;
        Ok(dict)
    }

    pub fn axis(&self, axis: Axis) -> Option<&AxisConfig> {
        self.axes.iter().find(|cfg| cfg.axis == axis)
    }

    pub fn category_count(&self) -> usize {
        self.axes.iter().map(|a| a.categories.len()).sum()
    }

    pub fn pattern_count(&self) -> usize {
        self.axes
            .iter()
            .flat_map(|a| &a.categories)
            .map(|c| c.patterns.len())
            .sum()
    }

    /// 構造検証。重複ID/重複priority/未定義タグ参照/矛盾パターン/非有限重み/壊れた正規表現を拒否する。
    pub fn validate(&self) -> Result<(), DictionaryError> {
        if self.axes.is_empty() || self.tags.is_empty() {
            return Err(DictionaryError::Empty(self.version.clone()));
        }

        let mut tag_names: HashSet<&str> = HashSet::new();
        for tag in &self.tags {
            if !tag_names.insert(tag.name.as_str()) {
                return Err(DictionaryError::DuplicateTag(tag.name.clone()));
            }
            for pattern in &tag.patterns {
                if let Err(err) = Regex::new(pattern) {
                    return Err(DictionaryError::BadRegex {
                        tag: tag.name.clone(),
                        pattern: pattern.clone(),
                        source: Box::new(err),
                    });
                }
            }
        }

        let mut axes_seen: HashSet<Axis> = HashSet::new();
        let mut category_ids: HashSet<&str> = HashSet::new();
        let mut pattern_ids: HashSet<&str> = HashSet::new();

        for axis_cfg in &self.axes {
            if !axes_seen.insert(axis_cfg.axis) {
                return Err(DictionaryError::DuplicateAxis(
                    axis_cfg.axis.as_ref().to_string(),
                ));
            }

            let mut priorities: BTreeMap<u32, &str> = BTreeMap::new();
            for category in &axis_cfg.categories {
                if !category_ids.insert(category.id.as_str()) {
                    return Err(DictionaryError::DuplicateCategory(category.id.clone()));
                }
                if let Some(first) = priorities.insert(category.priority, category.id.as_str()) {
                    return Err(DictionaryError::DuplicatePriority {
                        axis: axis_cfg.axis.as_ref().to_string(),
                        priority: category.priority,
                        first: first.to_string(),
                        second: category.id.clone(),
                    });
                }
                if !category.min_score.is_finite() {
                    return Err(DictionaryError::BadWeight(format!(
                        "category {} min_score",
                        category.id
                    )));
                }

                for term in &category.terms {
                    if !term.weight().is_finite() {
                        return Err(DictionaryError::BadWeight(format!(
                            "category {} terms",
                            category.id
                        )));
                    }
                    if let Some(tag) = term.referenced_tag() {
                        if !tag_names.contains(tag) {
                            return Err(DictionaryError::UnknownTag {
                                tag: tag.to_string(),
                                referrer: format!("category {}", category.id),
                            });
                        }
                    }
                }

                for pattern in &category.patterns {
                    if !pattern_ids.insert(pattern.id.as_str()) {
                        return Err(DictionaryError::DuplicatePattern(pattern.id.clone()));
                    }
                    for tag in pattern
                        .required_tags
                        .iter()
                        .chain(pattern.forbidden_tags.iter())
                    {
                        if !tag_names.contains(tag.as_str()) {
                            return Err(DictionaryError::UnknownTag {
                                tag: tag.clone(),
                                referrer: format!("pattern {}", pattern.id),
                            });
                        }
                    }
                    if let Some(tag) = pattern
                        .required_tags
                        .iter()
                        .find(|t| pattern.forbidden_tags.contains(t))
                    {
                        return Err(DictionaryError::ConflictingPatternTags {
                            pattern: pattern.id.clone(),
                            tag: tag.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
