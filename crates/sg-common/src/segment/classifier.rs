use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::scoring::select_category;
use super::tags::TagMatcher;
use crate::dictionary::{MidCategoryConfig, SegmentDictionary, builtin};
use crate::error::DictionaryError;
use crate::{Axis, AxisAssignment, ClassifiedRecord, Record};

/// 決定的セグメント分類器
///
/// 辞書は構築時に検証・コンパイルし、以後は共有・不変。同じ辞書と同じ
/// レコードに対して常に同じ結果を返す。
pub struct Classifier {
    dict: Arc<SegmentDictionary>,
    matcher: TagMatcher,
}

impl Classifier {
    pub fn new(dict: Arc<SegmentDictionary>) -> Result<Self, DictionaryError> {
        dict.validate()?;
        let matcher = TagMatcher::new(&dict)?;
        Ok(Self { dict, matcher })
    }

    /// 組み込み辞書（dictionary::builtin）で構築する
    pub fn from_builtin() -> Result<Self, DictionaryError> {
        Self::new(builtin::builtin())
    }

    pub fn dictionary(&self) -> &SegmentDictionary {
        &self.dict
    }

    /// タグ抽出のみ。分類根拠の確認やデバッグ用。
    pub fn extract_tags(&self, record: &Record) -> BTreeSet<String> {
        self.matcher.extract(record)
    }

    /// 1レコードを5軸すべてに分類する
    ///
    /// 辞書に無い軸・閾値未満の軸も未分類スロットとして必ず埋まる。
    /// 返り値の axes は常に5エントリ。
    pub fn classify(&self, record: Record) -> ClassifiedRecord {
        let tags = self.matcher.extract(&record);
        let mut axes = BTreeMap::new();

        for axis in Axis::ALL {
            let assignment = match self.dict.axis(axis) {
                Some(axis_cfg) => match select_category(axis_cfg, &tags, &record) {
                    Some(scored) => AxisAssignment {
                        pattern: refine_pattern(scored.category, &tags),
                        mid_category: Some(scored.category.id.clone()),
                        matched_tags: scored.matched_tags,
                    },
                    None => AxisAssignment::default(),
                },
                None => AxisAssignment::default(),
            };
            axes.insert(axis, assignment);
        }

        ClassifiedRecord { record, tags, axes }
    }
}

/// 第3層: 採用済み中分類のパターンを宣言順に試し、最初に成立したものを返す。
/// 成立 = 必須タグが全部立ち、禁止タグが1つも立たない。
fn refine_pattern(category: &MidCategoryConfig, tags: &BTreeSet<String>) -> Option<String> {
    category.patterns.iter().find_map(|pattern| {
        let required_ok = pattern.required_tags.iter().all(|t| tags.contains(t));
        let forbidden_ok = !pattern.forbidden_tags.iter().any(|t| tags.contains(t));
        (required_ok && forbidden_ok).then(|| pattern.id.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AxisConfig, ScoreTerm, TagRule};

    fn classifier() -> Classifier {
        Classifier::from_builtin().unwrap()
    }

    fn full_time_posting() -> Record {
        Record {
            id: Some(1),
            title: Some("経理スタッフ（正社員）".into()),
            description: Some("経験者優遇。賞与年2回、昇給あり。リモート併用・週2出社。".into()),
            employment_type: Some("正社員".into()),
            todofuken: Some("東京都".into()),
            salary_min: Some(28),
            salary_max: Some(45),
            annual_holidays: Some(125),
            ..Record::default()
        }
    }

    #[test]
    fn classifies_across_all_axes() {
        let classified = classifier().classify(full_time_posting());

        assert_eq!(classified.axes.len(), 5);
        let employment = &classified.axes[&Axis::Employment];
        assert_eq!(employment.mid_category.as_deref(), Some("A1"));
        assert_eq!(employment.pattern.as_deref(), Some("A1-2"));
        assert!(employment.matched_tags.is_empty());

        let workforce = &classified.axes[&Axis::Workforce];
        assert_eq!(workforce.mid_category.as_deref(), Some("B3"));
        assert_eq!(workforce.pattern, None);

        let workstyle = &classified.axes[&Axis::Workstyle];
        assert_eq!(workstyle.mid_category.as_deref(), Some("C2"));
        assert_eq!(workstyle.pattern.as_deref(), Some("C2-1"));

        // 賞与+昇給の 2.5 が給与中点の D1 (2.0) を上回る
        let compensation = &classified.axes[&Axis::Compensation];
        assert_eq!(compensation.mid_category.as_deref(), Some("D2"));
        assert_eq!(compensation.pattern.as_deref(), Some("D2-1"));

        let experience = &classified.axes[&Axis::Experience];
        assert_eq!(experience.mid_category.as_deref(), Some("E2"));
        assert_eq!(experience.pattern, None);
    }

    #[test]
    fn unmatched_axes_stay_unclassified_with_full_slots() {
        let record = Record {
            title: Some("スタッフ募集".into()),
            ..Record::default()
        };
        let classified = classifier().classify(record);

        assert_eq!(classified.axes.len(), 5);
        for axis in Axis::ALL {
            let slot = &classified.axes[&axis];
            assert_eq!(slot.mid_category, None);
            assert_eq!(slot.pattern, None);
            assert!(slot.matched_tags.is_empty());
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classifier().classify(full_time_posting());
        let b = classifier().classify(full_time_posting());
        assert_eq!(a, b);
    }

    #[test]
    fn category_without_matching_pattern_keeps_none() {
        // 夜勤+早朝の両立は C4 の深夜型/早朝型どちらの禁止条件にも当たる
        let record = Record {
            description: Some("夜勤・早朝シフトの交替制".into()),
            ..Record::default()
        };
        let classified = classifier().classify(record);

        let workstyle = &classified.axes[&Axis::Workstyle];
        assert_eq!(workstyle.mid_category.as_deref(), Some("C4"));
        assert_eq!(workstyle.pattern, None);
    }

    #[test]
    fn catch_all_pattern_applies_when_forbidden_absent() {
        let record = Record {
            employment_type: Some("派遣社員".into()),
            description: Some("大手工場での軽作業".into()),
            ..Record::default()
        };
        let classified = classifier().classify(record);

        let employment = &classified.axes[&Axis::Employment];
        assert_eq!(employment.mid_category.as_deref(), Some("A3"));
        assert_eq!(employment.pattern.as_deref(), Some("A3-2"));
    }

    #[test]
    fn negative_weight_can_push_category_below_threshold() {
        // 「正社員登用あり」だけでは A1 にならない（雇用形態フィールドなし）
        let record = Record {
            description: Some("頑張り次第で正社員登用あり".into()),
            ..Record::default()
        };
        let classified = classifier().classify(record);
        assert_eq!(classified.axes[&Axis::Employment].mid_category, None);
    }

    #[test]
    fn dictionary_missing_axes_still_fills_all_slots() {
        let dict = SegmentDictionary {
            version: "mini".into(),
            tags: vec![TagRule {
                name: "夜勤".into(),
                patterns: vec!["夜勤".into()],
            }],
            axes: vec![AxisConfig {
                axis: Axis::Workstyle,
                categories: vec![MidCategoryConfig {
                    id: "N1".into(),
                    label: "夜間".into(),
                    priority: 1,
                    min_score: 1.0,
                    terms: vec![ScoreTerm::Tag {
                        tag: "夜勤".into(),
                        weight: 1.0,
                    }],
                    patterns: vec![],
                }],
            }],
        };
        let classifier = Classifier::new(Arc::new(dict)).unwrap();

        let classified = classifier.classify(Record {
            description: Some("夜勤あり".into()),
            ..Record::default()
        });

        assert_eq!(classified.axes.len(), 5);
        assert_eq!(
            classified.axes[&Axis::Workstyle].mid_category.as_deref(),
            Some("N1")
        );
        assert_eq!(classified.axes[&Axis::Employment].mid_category, None);
    }

    #[test]
    fn rejects_invalid_dictionary_at_construction() {
        let dict = SegmentDictionary {
            version: "broken".into(),
            tags: vec![],
            axes: vec![],
        };
        assert!(Classifier::new(Arc::new(dict)).is_err());
    }
}
