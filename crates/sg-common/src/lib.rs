pub mod dictionary;
pub mod error;
pub mod fields;
pub mod geography;
pub mod ingest;
pub mod logging;
pub mod normalize;
pub mod segment;
pub mod tabulate;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// レコード種別。求人と求職者を同じパイプラインに流すための区別。
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Posting,
    Seeker,
}

/// スクレイプ済みレコードの正規化入力
///
/// 全フィールド任意。欠損は欠損のまま持ち、分類・集計側が欄ごとに扱いを決める
/// （スコア寄与なし、比率の分母から除外、など）。補完はしない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub id: Option<i64>,
    pub kind: RecordKind,
    pub title: Option<String>,
    pub description: Option<String>,
    /// 休日・勤務時間欄の原文
    pub holidays_text: Option<String>,
    /// 応募資格欄の原文
    pub qualifications_text: Option<String>,
    /// 雇用形態の原文。分類時に fields::correct_employment_type で補正する。
    pub employment_type: Option<String>,
    pub todofuken: Option<String>,
    pub shikuchoson: Option<String>,
    /// 性別の原文（求職者側）
    pub gender: Option<String>,
    /// 年代の原文（求職者側）。例: "30代"
    pub age_bracket: Option<String>,
    /// 月給下限（万円）
    pub salary_min: Option<u32>,
    /// 月給上限（万円）
    pub salary_max: Option<u32>,
    pub annual_holidays: Option<u32>,
}

impl Record {
    /// 辞書照合の対象テキスト欄（走査順: タイトル → 本文 → 休日 → 資格）
    pub fn text_fields(&self) -> [Option<&str>; 4] {
        [
            self.title.as_deref(),
            self.description.as_deref(),
            self.holidays_text.as_deref(),
            self.qualifications_text.as_deref(),
        ]
    }

    /// 月給中点（万円）。両端あり → 平均、片側のみ → その値、なし → None。
    pub fn salary_midpoint(&self) -> Option<f64> {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => Some((f64::from(min) + f64::from(max)) / 2.0),
            (Some(min), None) => Some(f64::from(min)),
            (None, Some(max)) => Some(f64::from(max)),
            (None, None) => None,
        }
    }
}

/// 分類の5軸。Ord は宣言順で、テーブル出力の行順もこれに従う。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Axis {
    Employment,
    Workforce,
    Workstyle,
    Compensation,
    Experience,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Employment,
        Axis::Workforce,
        Axis::Workstyle,
        Axis::Compensation,
        Axis::Experience,
    ];
}

/// 軸1つ分の割り当て。未分類でもスロット自体は必ず存在する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisAssignment {
    pub mid_category: Option<String>,
    pub pattern: Option<String>,
    /// 採用中分類のスコア項が参照したタグのうち、実際に立っていたもの
    pub matched_tags: BTreeSet<String>,
}

/// 分類済みレコード: 元レコード + タグ集合 + 5軸の割り当て
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub record: Record,
    pub tags: BTreeSet<String>,
    pub axes: BTreeMap<Axis, AxisAssignment>,
}

impl ClassifiedRecord {
    pub fn assignment(&self, axis: Axis) -> Option<&AxisAssignment> {
        self.axes.get(&axis)
    }
}
