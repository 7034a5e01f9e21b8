//! 集計出力の各リレーション（行型）と出力バンドル。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{AgeDecade, Gender};
use crate::geography::GeoKey;
use crate::tabulate::meta::RunMeta;
use crate::tabulate::stats::NumericSummary;
use crate::Axis;

/// 地域×軸×中分類の件数。ratio は地域内全レコードに対する割合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCountRow {
    pub geo: GeoKey,
    pub axis: Axis,
    pub mid_category: String,
    pub postings: u64,
    pub seekers: u64,
    pub count: u64,
    pub ratio: f64,
}

impl CategoryCountRow {
    /// 需給ギャップ（求人 − 求職）。
    ///
    /// 列としては持たず、常に正本の件数から再計算する。
    pub fn demand_supply_gap(&self) -> i64 {
        self.postings as i64 - self.seekers as i64
    }
}

/// 地域×軸×中分類×パターンの件数。ratio は属する中分類の件数に対する割合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternCountRow {
    pub geo: GeoKey,
    pub axis: Axis,
    pub mid_category: String,
    pub pattern: String,
    pub count: u64,
    pub ratio: f64,
}

/// 軸ごとの分類カバレッジ。classified + unclassified = 地域内全レコード数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisCoverageRow {
    pub geo: GeoKey,
    pub axis: Axis,
    pub classified: u64,
    pub unclassified: u64,
    pub coverage_ratio: f64,
}

/// 地域×タグの出現件数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCountRow {
    pub geo: GeoKey,
    pub tag: String,
    pub count: u64,
    pub ratio: f64,
}

/// 地域内で同一レコードに共起したタグペア。`tag_a < tag_b` 固定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagPairRow {
    pub geo: GeoKey,
    pub tag_a: String,
    pub tag_b: String,
    pub count: u64,
}

/// 中分類ごとの提示給与（月収中点・万円）の分布。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySalaryRow {
    pub geo: GeoKey,
    pub axis: Axis,
    pub mid_category: String,
    pub salary: NumericSummary,
}

/// 給与バンド別件数。band_min_man_yen はバンド下限（含む）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBandRow {
    pub geo: GeoKey,
    pub band_min_man_yen: u32,
    pub count: u64,
    /// 給与既知レコードに対する割合
    pub ratio: f64,
}

/// 年代別件数。ratio は年代既知レコードに対する割合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDecadeRow {
    pub geo: GeoKey,
    pub decade: AgeDecade,
    pub count: u64,
    pub ratio: f64,
}

/// 性別件数。ratio は性別既知レコードに対する割合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderCountRow {
    pub geo: GeoKey,
    pub gender: Gender,
    pub count: u64,
    pub ratio: f64,
}

/// 中分類ごとの年代・性別内訳。既知の値のみ数える。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDemographicsRow {
    pub geo: GeoKey,
    pub axis: Axis,
    pub mid_category: String,
    pub ages: BTreeMap<AgeDecade, u64>,
    pub genders: BTreeMap<Gender, u64>,
}

/// 地域ごとの年間休日数の分布。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayStatsRow {
    pub geo: GeoKey,
    pub holidays: NumericSummary,
}

/// 集計パイプラインの最終出力。メタ1表 + リレーション11表。
///
/// 各 Vec は (geo, キー) の昇順で並ぶ。BTreeMap 由来なので
/// 入力順・マージ順に依らず常に同じ並びになる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBundle {
    pub run_meta: RunMeta,
    pub category_counts: Vec<CategoryCountRow>,
    pub pattern_counts: Vec<PatternCountRow>,
    pub axis_coverage: Vec<AxisCoverageRow>,
    pub tag_counts: Vec<TagCountRow>,
    pub tag_pairs: Vec<TagPairRow>,
    pub salary_by_category: Vec<CategorySalaryRow>,
    pub salary_bands: Vec<SalaryBandRow>,
    pub age_decades: Vec<AgeDecadeRow>,
    pub gender_counts: Vec<GenderCountRow>,
    pub category_demographics: Vec<CategoryDemographicsRow>,
    pub holiday_stats: Vec<HolidayStatsRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gap_is_postings_minus_seekers() {
        let row = CategoryCountRow {
            geo: GeoKey::resolved("東京都", Some("港区".to_string())),
            axis: Axis::Employment,
            mid_category: "A1".to_string(),
            postings: 3,
            seekers: 8,
            count: 11,
            ratio: 0.5,
        };
        assert_eq!(row.demand_supply_gap(), -5);
    }

    #[test]
    fn gap_is_not_serialized() {
        let row = CategoryCountRow {
            geo: GeoKey::Unresolved,
            axis: Axis::Workstyle,
            mid_category: "C1".to_string(),
            postings: 1,
            seekers: 0,
            count: 1,
            ratio: 1.0,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("demand_supply_gap").is_none());
        assert_eq!(json.get("count").and_then(|v| v.as_u64()), Some(1));
    }

    #[test]
    fn demographics_row_uses_enum_keyed_maps() {
        let mut ages = BTreeMap::new();
        ages.insert(AgeDecade::Thirties, 2u64);
        let mut genders = BTreeMap::new();
        genders.insert(Gender::Female, 2u64);
        let row = CategoryDemographicsRow {
            geo: GeoKey::resolved("大阪府", None),
            axis: Axis::Workforce,
            mid_category: "B5".to_string(),
            ages,
            genders,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json.pointer("/ages/thirties").and_then(|v| v.as_u64()),
            Some(2)
        );
        assert_eq!(
            json.pointer("/genders/female").and_then(|v| v.as_u64()),
            Some(2)
        );
    }
}
