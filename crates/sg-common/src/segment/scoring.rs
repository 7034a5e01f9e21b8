use std::collections::BTreeSet;

use crate::Record;
use crate::dictionary::{AxisConfig, MidCategoryConfig, ScoreTerm};
use crate::fields::correct_employment_type;

/// 中分類1つ分のスコアと根拠タグ
#[derive(Debug, Clone)]
pub struct CategoryScore<'a> {
    pub category: &'a MidCategoryConfig,
    pub score: f64,
    /// スコア項が参照したタグのうち実際に立っていたもの。負の重みの根拠も含む。
    pub matched_tags: BTreeSet<String>,
}

/// 重み付き合計を計算する。タグ項はタグ集合を、数値項はレコード本体を見る。
pub fn score_mid_category<'a>(
    category: &'a MidCategoryConfig,
    tags: &BTreeSet<String>,
    record: &Record,
) -> CategoryScore<'a> {
    let mut score = 0.0;
    let mut matched_tags = BTreeSet::new();

    for term in &category.terms {
        match term {
            ScoreTerm::Tag { tag, weight } => {
                if tags.contains(tag) {
                    score += weight;
                    matched_tags.insert(tag.clone());
                }
            }
            ScoreTerm::SalaryAtLeast { man_yen, weight } => {
                if let Some(midpoint) = record.salary_midpoint() {
                    if midpoint >= f64::from(*man_yen) {
                        score += weight;
                    }
                }
            }
            ScoreTerm::HolidaysAtLeast { days, weight } => {
                if let Some(holidays) = record.annual_holidays {
                    if holidays >= *days {
                        score += weight;
                    }
                }
            }
            ScoreTerm::EmploymentTypeIs {
                employment_type,
                weight,
            } => {
                let corrected = record
                    .employment_type
                    .as_deref()
                    .and_then(correct_employment_type);
                if corrected == Some(*employment_type) {
                    score += weight;
                }
            }
        }
    }

    CategoryScore {
        category,
        score,
        matched_tags,
    }
}

/// 軸内の中分類選定
///
/// 候補 = スコアが min_score 以上（同値含む）の中分類。
/// 候補からスコア最大を採り、同点は priority 最小で破る。候補ゼロなら None（未分類）。
/// 宣言順に依存しない決定的な選定。
pub fn select_category<'a>(
    axis: &'a AxisConfig,
    tags: &BTreeSet<String>,
    record: &Record,
) -> Option<CategoryScore<'a>> {
    let mut best: Option<CategoryScore<'a>> = None;

    for category in &axis.categories {
        let scored = score_mid_category(category, tags, record);
        if scored.score < category.min_score {
            continue;
        }

        best = match best {
            None => Some(scored),
            Some(current) => {
                if scored.score > current.score
                    || (scored.score == current.score
                        && scored.category.priority < current.category.priority)
                {
                    Some(scored)
                } else {
                    Some(current)
                }
            }
        };
    }

    best
}
