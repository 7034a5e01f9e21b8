//! 分類済みレコードの地域別集計パイプライン。
//!
//! `observe` で件数・サンプルを畳み込み、`merge` で部分集計を結合し、
//! `finalize` で比率と統計を導出する。比率・統計は必ずマージ後の
//! 正本の件数から計算する（部分比率の平均は取らない）ため、
//! 分割・マージの仕方に依らず同一入力は同一バイト列に落ちる。

pub mod cooccur;
pub mod merge;
pub mod meta;
pub mod relations;
pub mod stats;

pub use merge::classify_and_aggregate;
pub use meta::{RunMeta, RunStamp};
pub use relations::{
    AgeDecadeRow, AxisCoverageRow, CategoryCountRow, CategoryDemographicsRow, CategorySalaryRow,
    GenderCountRow, HolidayStatsRow, PatternCountRow, SalaryBandRow, SummaryBundle, TagCountRow,
    TagPairRow,
};
pub use stats::NumericSummary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{correct_age_decade, correct_gender, AgeDecade, Gender};
use crate::geography::{GeoKey, ResolveGeo};
use crate::{Axis, ClassifiedRecord, RecordKind};

/// 集計パラメータ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// tag_pairs に出力する最小共起回数
    pub min_pair_support: u32,
    /// salary_bands のバンド幅（万円）
    pub salary_band_man_yen: u32,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            min_pair_support: 5,
            salary_band_man_yen: 10,
        }
    }
}

/// 求人/求職の内訳つき件数。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct KindCount {
    postings: u64,
    seekers: u64,
}

impl KindCount {
    fn add(&mut self, kind: RecordKind) {
        match kind {
            RecordKind::Posting => self.postings += 1,
            RecordKind::Seeker => self.seekers += 1,
        }
    }

    fn total(self) -> u64 {
        self.postings + self.seekers
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DemoCount {
    ages: BTreeMap<AgeDecade, u64>,
    genders: BTreeMap<Gender, u64>,
}

/// 1地域分の中間集計。件数と生サンプルのみを持ち、
/// 比率・統計の導出は finalize まで遅延する。
#[derive(Debug, Clone, Default, PartialEq)]
struct GeoAccumulator {
    total: u64,
    kinds: KindCount,
    categories: BTreeMap<(Axis, String), KindCount>,
    patterns: BTreeMap<(Axis, String, String), u64>,
    axis_classified: BTreeMap<Axis, u64>,
    tag_counts: BTreeMap<String, u64>,
    tag_pairs: BTreeMap<(String, String), u64>,
    category_salaries: BTreeMap<(Axis, String), Vec<f64>>,
    salaries: Vec<f64>,
    ages: BTreeMap<AgeDecade, u64>,
    genders: BTreeMap<Gender, u64>,
    category_demographics: BTreeMap<(Axis, String), DemoCount>,
    holidays: Vec<f64>,
}

/// 地域キー別のマージ可能な中間集計。
///
/// 契約:
/// - `observe` は1レコードを1地域に数える（地域未解決は Unresolved バケツ）
/// - `merge` は可換・結合的（カウント加算 + サンプル連結）
/// - `finalize` は入力を変更せず、同じ引数なら同じ出力を返す
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryAccumulator {
    total_records: u64,
    geos: BTreeMap<GeoKey, GeoAccumulator>,
}

impl SummaryAccumulator {
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// 分類済みレコード1件を地域キーに畳み込む。
    pub fn observe(&mut self, classified: &ClassifiedRecord, geo: GeoKey) {
        self.total_records += 1;
        let slot = self.geos.entry(geo).or_default();
        slot.total += 1;
        slot.kinds.add(classified.record.kind);

        let salary = classified.record.salary_midpoint();
        if let Some(value) = salary {
            slot.salaries.push(value);
        }
        if let Some(days) = classified.record.annual_holidays {
            slot.holidays.push(f64::from(days));
        }

        let age = classified
            .record
            .age_bracket
            .as_deref()
            .and_then(correct_age_decade);
        if let Some(decade) = age {
            *slot.ages.entry(decade).or_default() += 1;
        }
        let gender = classified
            .record
            .gender
            .as_deref()
            .and_then(correct_gender);
        if let Some(g) = gender {
            *slot.genders.entry(g).or_default() += 1;
        }

        for tag in &classified.tags {
            *slot.tag_counts.entry(tag.clone()).or_default() += 1;
        }
        for pair in cooccur::ordered_pairs(&classified.tags) {
            *slot.tag_pairs.entry(pair).or_default() += 1;
        }

        for (axis, assignment) in &classified.axes {
            let Some(mid) = &assignment.mid_category else {
                continue;
            };
            *slot.axis_classified.entry(*axis).or_default() += 1;
            let key = (*axis, mid.clone());
            slot.categories
                .entry(key.clone())
                .or_default()
                .add(classified.record.kind);
            if let Some(pattern) = &assignment.pattern {
                *slot
                    .patterns
                    .entry((*axis, mid.clone(), pattern.clone()))
                    .or_default() += 1;
            }
            if let Some(value) = salary {
                slot.category_salaries
                    .entry(key.clone())
                    .or_default()
                    .push(value);
            }
            if age.is_some() || gender.is_some() {
                let demo = slot.category_demographics.entry(key).or_default();
                if let Some(decade) = age {
                    *demo.ages.entry(decade).or_default() += 1;
                }
                if let Some(g) = gender {
                    *demo.genders.entry(g).or_default() += 1;
                }
            }
        }
    }

    /// 中間集計からリレーション群を導出する。
    ///
    /// 自身は変更しない。共起ペアの最小支持度もここで初めて適用する
    /// （observe/merge の段階では全ペアを正確に保持する）。
    pub fn finalize(&self, config: &AggregateConfig, stamp: RunStamp) -> SummaryBundle {
        let mut postings = 0u64;
        let mut seekers = 0u64;
        for slot in self.geos.values() {
            postings += slot.kinds.postings;
            seekers += slot.kinds.seekers;
        }
        let unresolved = self
            .geos
            .get(&GeoKey::Unresolved)
            .map_or(0, |slot| slot.total);
        let run_meta = RunMeta {
            run_id: stamp.run_id,
            generated_at: stamp.generated_at,
            engine_version: stamp.engine_version,
            dictionary_version: stamp.dictionary_version,
            total_records: self.total_records,
            postings,
            seekers,
            resolved_records: self.total_records - unresolved,
            unresolved_records: unresolved,
        };

        let mut category_counts = Vec::new();
        let mut pattern_counts = Vec::new();
        let mut axis_coverage = Vec::new();
        let mut tag_counts = Vec::new();
        let mut tag_pairs = Vec::new();
        let mut salary_by_category = Vec::new();
        let mut salary_bands = Vec::new();
        let mut age_decades = Vec::new();
        let mut gender_counts = Vec::new();
        let mut category_demographics = Vec::new();
        let mut holiday_stats = Vec::new();

        let band_width = config.salary_band_man_yen.max(1);
        let min_support = u64::from(config.min_pair_support);

        for (geo, slot) in &self.geos {
            let total = slot.total as f64;

            // 中分類件数
            for ((axis, mid), kinds) in &slot.categories {
                category_counts.push(CategoryCountRow {
                    geo: geo.clone(),
                    axis: *axis,
                    mid_category: mid.clone(),
                    postings: kinds.postings,
                    seekers: kinds.seekers,
                    count: kinds.total(),
                    ratio: kinds.total() as f64 / total,
                });
            }

            // パターン件数（比率は属する中分類内）
            for ((axis, mid, pattern), count) in &slot.patterns {
                let category_total = slot
                    .categories
                    .get(&(*axis, mid.clone()))
                    .map_or(0, |kinds| kinds.total());
                pattern_counts.push(PatternCountRow {
                    geo: geo.clone(),
                    axis: *axis,
                    mid_category: mid.clone(),
                    pattern: pattern.clone(),
                    count: *count,
                    ratio: *count as f64 / category_total as f64,
                });
            }

            // 軸カバレッジ（5軸すべて出す。分類ゼロの軸も行になる）
            for axis in Axis::ALL {
                let classified = slot.axis_classified.get(&axis).copied().unwrap_or(0);
                axis_coverage.push(AxisCoverageRow {
                    geo: geo.clone(),
                    axis,
                    classified,
                    unclassified: slot.total - classified,
                    coverage_ratio: classified as f64 / total,
                });
            }

            // タグ件数
            for (tag, count) in &slot.tag_counts {
                tag_counts.push(TagCountRow {
                    geo: geo.clone(),
                    tag: tag.clone(),
                    count: *count,
                    ratio: *count as f64 / total,
                });
            }

            // タグ共起（最小支持度で足切り）
            for ((a, b), count) in &slot.tag_pairs {
                if *count >= min_support {
                    tag_pairs.push(TagPairRow {
                        geo: geo.clone(),
                        tag_a: a.clone(),
                        tag_b: b.clone(),
                        count: *count,
                    });
                }
            }

            // 中分類別給与分布
            for ((axis, mid), samples) in &slot.category_salaries {
                if let Some(summary) = NumericSummary::from_samples(samples) {
                    salary_by_category.push(CategorySalaryRow {
                        geo: geo.clone(),
                        axis: *axis,
                        mid_category: mid.clone(),
                        salary: summary,
                    });
                }
            }

            // 給与バンド（分母は給与既知のレコード）
            let mut bands: BTreeMap<u32, u64> = BTreeMap::new();
            for value in &slot.salaries {
                let start = (value / f64::from(band_width)).floor() as u32 * band_width;
                *bands.entry(start).or_default() += 1;
            }
            let salary_known = slot.salaries.len() as f64;
            for (band_min, count) in bands {
                salary_bands.push(SalaryBandRow {
                    geo: geo.clone(),
                    band_min_man_yen: band_min,
                    count,
                    ratio: count as f64 / salary_known,
                });
            }

            // 年代・性別（分母は値が取れたレコードのみ）
            let age_known: u64 = slot.ages.values().sum();
            for (decade, count) in &slot.ages {
                age_decades.push(AgeDecadeRow {
                    geo: geo.clone(),
                    decade: *decade,
                    count: *count,
                    ratio: *count as f64 / age_known as f64,
                });
            }
            let gender_known: u64 = slot.genders.values().sum();
            for (gender, count) in &slot.genders {
                gender_counts.push(GenderCountRow {
                    geo: geo.clone(),
                    gender: *gender,
                    count: *count,
                    ratio: *count as f64 / gender_known as f64,
                });
            }

            // 中分類別デモグラフィック内訳
            for ((axis, mid), demo) in &slot.category_demographics {
                category_demographics.push(CategoryDemographicsRow {
                    geo: geo.clone(),
                    axis: *axis,
                    mid_category: mid.clone(),
                    ages: demo.ages.clone(),
                    genders: demo.genders.clone(),
                });
            }

            // 年間休日分布
            if let Some(summary) = NumericSummary::from_samples(&slot.holidays) {
                holiday_stats.push(HolidayStatsRow {
                    geo: geo.clone(),
                    holidays: summary,
                });
            }
        }

        SummaryBundle {
            run_meta,
            category_counts,
            pattern_counts,
            axis_coverage,
            tag_counts,
            tag_pairs,
            salary_by_category,
            salary_bands,
            age_decades,
            gender_counts,
            category_demographics,
            holiday_stats,
        }
    }
}

/// 分類済みレコード列を地域キー解決しながら畳み込む。
pub fn aggregate<'a, I>(classified: I, resolver: &impl ResolveGeo) -> SummaryAccumulator
where
    I: IntoIterator<Item = &'a ClassifiedRecord>,
{
    let mut acc = SummaryAccumulator::default();
    for item in classified {
        let geo = resolver.resolve(&item.record);
        acc.observe(item, geo);
    }
    acc
}
