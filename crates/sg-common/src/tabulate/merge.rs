//! 部分集計のマージと並列実行ドライバ。

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::geography::ResolveGeo;
use crate::segment::Classifier;
use crate::Record;

use super::{DemoCount, GeoAccumulator, KindCount, SummaryAccumulator};

impl SummaryAccumulator {
    /// 部分集計を取り込む。カウントは加算、サンプル列は連結。
    ///
    /// 可換・結合的なので reduce の順序は任意。統計・比率は finalize が
    /// マージ後の正本から計算するため、分割の仕方は出力に現れない。
    pub fn merge(&mut self, other: SummaryAccumulator) {
        self.total_records += other.total_records;
        for (geo, slot) in other.geos {
            match self.geos.entry(geo) {
                Entry::Vacant(entry) => {
                    entry.insert(slot);
                }
                Entry::Occupied(mut entry) => entry.get_mut().merge(slot),
            }
        }
    }
}

impl GeoAccumulator {
    fn merge(&mut self, other: GeoAccumulator) {
        self.total += other.total;
        self.kinds.merge(other.kinds);
        for (key, kinds) in other.categories {
            self.categories.entry(key).or_default().merge(kinds);
        }
        merge_counts(&mut self.patterns, other.patterns);
        merge_counts(&mut self.axis_classified, other.axis_classified);
        merge_counts(&mut self.tag_counts, other.tag_counts);
        merge_counts(&mut self.tag_pairs, other.tag_pairs);
        for (key, samples) in other.category_salaries {
            self.category_salaries
                .entry(key)
                .or_default()
                .extend(samples);
        }
        self.salaries.extend(other.salaries);
        merge_counts(&mut self.ages, other.ages);
        merge_counts(&mut self.genders, other.genders);
        for (key, demo) in other.category_demographics {
            self.category_demographics
                .entry(key)
                .or_default()
                .merge(demo);
        }
        self.holidays.extend(other.holidays);
    }
}

impl KindCount {
    fn merge(&mut self, other: KindCount) {
        self.postings += other.postings;
        self.seekers += other.seekers;
    }
}

impl DemoCount {
    fn merge(&mut self, other: DemoCount) {
        merge_counts(&mut self.ages, other.ages);
        merge_counts(&mut self.genders, other.genders);
    }
}

fn merge_counts<K: Ord>(into: &mut BTreeMap<K, u64>, from: BTreeMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key).or_default() += count;
    }
}

/// 分類 → 地域解決 → 集計をチャンク並列で回す。
///
/// 各チャンクを独立に畳み込み、部分集計を reduce でマージする。
/// 逐次版（`aggregate`）と同じバンドルに finalize される。
pub fn classify_and_aggregate(
    records: &[Record],
    classifier: &Classifier,
    resolver: &(impl ResolveGeo + Sync),
    chunk_size: usize,
) -> SummaryAccumulator {
    let chunk_size = chunk_size.max(1);
    records
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut acc = SummaryAccumulator::default();
            for record in chunk {
                let classified = classifier.classify(record.clone());
                let geo = resolver.resolve(&classified.record);
                acc.observe(&classified, geo);
            }
            acc
        })
        .reduce(SummaryAccumulator::default, |mut left, right| {
            left.merge(right);
            left
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::PrefectureResolver;
    use crate::tabulate::{aggregate, AggregateConfig, RunStamp};
    use crate::{Axis, AxisAssignment, ClassifiedRecord, RecordKind};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn stamp() -> RunStamp {
        RunStamp {
            run_id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            generated_at: chrono::Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
            engine_version: "0.3.0".to_string(),
            dictionary_version: "test".to_string(),
        }
    }

    fn classified(
        record: Record,
        axes: &[(Axis, &str, Option<&str>)],
        tags: &[&str],
    ) -> ClassifiedRecord {
        let mut map = BTreeMap::new();
        for axis in Axis::ALL {
            map.insert(axis, AxisAssignment::default());
        }
        for (axis, mid, pattern) in axes {
            map.insert(
                *axis,
                AxisAssignment {
                    mid_category: Some(mid.to_string()),
                    pattern: pattern.map(str::to_string),
                    matched_tags: tags.iter().map(|t| t.to_string()).collect(),
                },
            );
        }
        ClassifiedRecord {
            record,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            axes: map,
        }
    }

    fn sample_set() -> Vec<ClassifiedRecord> {
        let tokyo = Record {
            todofuken: Some("東京都".to_string()),
            salary_min: Some(25),
            salary_max: Some(35),
            ..Default::default()
        };
        let osaka = Record {
            todofuken: Some("大阪府".to_string()),
            annual_holidays: Some(110),
            ..Default::default()
        };
        let seeker = Record {
            kind: RecordKind::Seeker,
            todofuken: Some("東京都".to_string()),
            age_bracket: Some("30代".to_string()),
            gender: Some("女性".to_string()),
            ..Default::default()
        };
        let lost = Record {
            todofuken: Some("全国".to_string()),
            ..Default::default()
        };
        vec![
            classified(
                tokyo,
                &[(Axis::Employment, "A1", Some("A1-2"))],
                &["経験者優遇", "賞与あり"],
            ),
            classified(osaka, &[(Axis::Workstyle, "C5", None)], &["出社あり"]),
            classified(
                seeker,
                &[(Axis::Workforce, "B5", None)],
                &["主婦OK", "扶養内"],
            ),
            classified(lost, &[], &[]),
        ]
    }

    #[test]
    fn merge_is_commutative() {
        let records = sample_set();
        let resolver = PrefectureResolver;
        let mut left = aggregate(&records[..2], &resolver);
        let right = aggregate(&records[2..], &resolver);
        let mut swapped = aggregate(&records[2..], &resolver);
        let other = aggregate(&records[..2], &resolver);

        left.merge(right);
        swapped.merge(other);

        let config = AggregateConfig::default();
        assert_eq!(
            left.finalize(&config, stamp()),
            swapped.finalize(&config, stamp())
        );
    }

    #[test]
    fn split_merge_matches_single_pass_byte_for_byte() {
        let records = sample_set();
        let resolver = PrefectureResolver;
        let whole = aggregate(&records, &resolver);

        let mut two_way = aggregate(&records[..1], &resolver);
        two_way.merge(aggregate(&records[1..], &resolver));

        let mut three_way = aggregate(&records[..2], &resolver);
        three_way.merge(aggregate(&records[2..3], &resolver));
        three_way.merge(aggregate(&records[3..], &resolver));

        let config = AggregateConfig::default();
        let expected = serde_json::to_string(&whole.finalize(&config, stamp())).unwrap();
        assert_eq!(
            serde_json::to_string(&two_way.finalize(&config, stamp())).unwrap(),
            expected
        );
        assert_eq!(
            serde_json::to_string(&three_way.finalize(&config, stamp())).unwrap(),
            expected
        );
    }

    #[test]
    fn pair_support_counts_across_partitions() {
        let resolver = PrefectureResolver;
        let record = || {
            classified(
                Record {
                    todofuken: Some("東京都".to_string()),
                    ..Default::default()
                },
                &[],
                &["リモート可", "副業可"],
            )
        };
        let first = vec![record(), record()];
        let second = vec![record(), record()];

        let config = AggregateConfig {
            min_pair_support: 3,
            ..Default::default()
        };
        let partial = aggregate(&first, &resolver);
        // 片側だけでは支持度不足
        assert!(partial.finalize(&config, stamp()).tag_pairs.is_empty());

        let mut merged = partial;
        merged.merge(aggregate(&second, &resolver));
        let bundle = merged.finalize(&config, stamp());
        assert_eq!(bundle.tag_pairs.len(), 1);
        assert_eq!(bundle.tag_pairs[0].count, 4);
    }

    #[test]
    fn merging_empty_accumulator_is_identity() {
        let records = sample_set();
        let resolver = PrefectureResolver;
        let mut acc = aggregate(&records, &resolver);
        acc.merge(SummaryAccumulator::default());

        let config = AggregateConfig::default();
        assert_eq!(
            acc.finalize(&config, stamp()),
            aggregate(&records, &resolver).finalize(&config, stamp())
        );
    }

    #[test]
    fn parallel_driver_matches_sequential_pipeline() {
        let classifier = Classifier::from_builtin().unwrap();
        let resolver = PrefectureResolver;
        let records = vec![
            Record {
                title: Some("経理スタッフ（正社員）".to_string()),
                employment_type: Some("正社員".to_string()),
                todofuken: Some("東京都".to_string()),
                salary_min: Some(25),
                salary_max: Some(35),
                ..Default::default()
            },
            Record {
                title: Some("週3日からOKのパート".to_string()),
                employment_type: Some("パート".to_string()),
                todofuken: Some("大阪府".to_string()),
                ..Default::default()
            },
            Record {
                title: Some("フルリモートのエンジニア".to_string()),
                description: Some("未経験可。研修充実。".to_string()),
                todofuken: Some("東京".to_string()),
                salary_min: Some(30),
                salary_max: Some(50),
                ..Default::default()
            },
            Record {
                todofuken: Some("勤務地自由".to_string()),
                ..Default::default()
            },
            Record {
                kind: RecordKind::Seeker,
                todofuken: Some("東京都".to_string()),
                gender: Some("女性".to_string()),
                age_bracket: Some("40代".to_string()),
                ..Default::default()
            },
        ];

        let sequential: Vec<ClassifiedRecord> = records
            .iter()
            .map(|record| classifier.classify(record.clone()))
            .collect();
        let expected = aggregate(&sequential, &resolver);

        let config = AggregateConfig::default();
        for chunk_size in [1, 2, 100] {
            let parallel = classify_and_aggregate(&records, &classifier, &resolver, chunk_size);
            assert_eq!(
                serde_json::to_string(&parallel.finalize(&config, stamp())).unwrap(),
                serde_json::to_string(&expected.finalize(&config, stamp())).unwrap()
            );
        }
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let classifier = Classifier::from_builtin().unwrap();
        let records = vec![Record {
            todofuken: Some("東京都".to_string()),
            ..Default::default()
        }];
        let acc = classify_and_aggregate(&records, &classifier, &PrefectureResolver, 0);
        assert_eq!(acc.total_records(), 1);
        let bundle = acc.finalize(&AggregateConfig::default(), stamp());
        assert_eq!(bundle.run_meta.resolved_records, 1);
    }
}
