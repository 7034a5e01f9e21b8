use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{AxisConfig, MidCategoryConfig, PatternConfig, ScoreTerm, SegmentDictionary, TagRule};
use crate::Axis;
use crate::fields::EmploymentType;

/// 組み込み辞書のバージョン。タグ/中分類/パターンを変えたらここを上げる。
/// run_meta.dictionary_version としてすべての出力に刻まれる。
pub const BUILTIN_VERSION: &str = "2025-08-r1";

/// タグ名 → 正規表現の束
///
/// 照合対象は normalize_for_match() 済みテキスト（NFKC・小文字・空白圧縮）なので、
/// 英字パターンは小文字で書くこと。
static TAG_PATTERNS: &[(&str, &[&str])] = &[
    // 人材層・採用対象
    ("新卒可", &["新卒", "既卒"]),
    ("第二新卒", &["第二新卒", "第2新卒"]),
    ("若手活躍", &["若手"]),
    ("経験者優遇", &["経験者優遇", "経験者歓迎", "経験を活かせ", "経験必須"]),
    ("即戦力", &["即戦力"]),
    // "30代活躍" / "40代活躍"
    ("ミドル活躍", &["ミドル", "[34]0代活躍"]),
    ("シニア歓迎", &["シニア", "60代", "定年後"]),
    ("年齢不問", &["年齢不問"]),
    ("主婦OK", &["主婦", "主夫"]),
    ("学生歓迎", &["学生歓迎", "学生ok", "学生可"]),
    ("ブランクOK", &["ブランク"]),
    // 働き方
    ("フルリモート", &["フルリモート", "完全在宅", "フル在宅", "full remote"]),
    ("リモート可", &["リモート", "在宅", "テレワーク", "remote"]),
    ("出社あり", &["出社", "常駐", "現場", "店舗勤務", "来社"]),
    ("時短勤務", &["時短"]),
    ("シフト自由", &["シフト自由", "自由シフト", "選べるシフト"]),
    // "週3日" / "週 2 日"（空白は1個まで残る）
    ("週3日以内", &[r"週\s?[1-3]\s?日"]),
    ("夜勤", &["夜勤", "深夜", "夜間"]),
    ("早朝", &["早朝"]),
    ("転勤なし", &["転勤なし", "転勤無し"]),
    ("残業少なめ", &["残業少", "残業なし", "ノー残業"]),
    ("直行直帰", &["直行直帰"]),
    // 待遇
    ("高収入", &["高収入", "高給", "稼げる"]),
    ("インセンティブ", &["インセンティブ", "歩合", "出来高"]),
    ("年俸制", &["年俸"]),
    ("賞与あり", &["賞与", "ボーナス"]),
    ("昇給あり", &["昇給"]),
    ("社会保険完備", &["社会保険完備", "社保完備"]),
    ("退職金", &["退職金"]),
    ("家賃補助", &["家賃補助", "住宅手当", "社宅", "寮"]),
    ("日払い", &["日払"]),
    ("週払い", &["週払"]),
    ("時給制", &["時給"]),
    ("交通費支給", &["交通費"]),
    // 経験・資格
    ("未経験可", &["未経験", "経験不問"]),
    ("研修充実", &["研修", "ojt", "マニュアル完備"]),
    ("資格不問", &["資格不問", "学歴不問"]),
    ("要資格", &["要資格", "資格必須", "有資格者"]),
    ("要免許", &["要免許", "免許必須", "普通免許", "運転免許"]),
    ("国家資格", &["国家資格", "看護師", "介護福祉士", "保育士", "電気工事士", "調理師"]),
    ("資格取得支援", &["資格取得支援", "資格支援", "資格取得制度"]),
    // 雇用形態の補助シグナル
    ("正社員登用", &["正社員登用", "社員登用"]),
    ("扶養内", &["扶養内", "扶養範囲"]),
    ("副業可", &["副業", "wワーク", "ダブルワーク", "掛け持ち"]),
    ("育児支援", &["育児支援", "託児", "保育支援", "育休", "産休", "子育て支援", "育児両立"]),
    ("管理職", &["管理職", "マネージャー", "マネジャー", "マネジメント"]),
];

static BUILTIN: Lazy<Arc<SegmentDictionary>> = Lazy::new(|| Arc::new(build()));

/// 組み込みセグメント辞書（5軸 / 22中分類 / 41パターン）
pub fn builtin() -> Arc<SegmentDictionary> {
    Arc::clone(&BUILTIN)
}

fn build() -> SegmentDictionary {
    SegmentDictionary {
        version: BUILTIN_VERSION.into(),
        tags: TAG_PATTERNS
            .iter()
            .map(|(name, patterns)| TagRule {
                name: (*name).into(),
                patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
            })
            .collect(),
        axes: vec![
            employment_axis(),
            workforce_axis(),
            workstyle_axis(),
            compensation_axis(),
            experience_axis(),
        ],
    }
}

/// 軸A: 雇用形態。employment_type フィールドが主シグナルで、本文タグは補助。
fn employment_axis() -> AxisConfig {
    AxisConfig {
        axis: Axis::Employment,
        categories: vec![
            category(
                "A1",
                "正社員",
                1,
                2.0,
                vec![
                    employment(EmploymentType::FullTime, 3.0),
                    // 「正社員登用あり」は現雇用形態が正社員でない示唆
                    tag("正社員登用", -1.0),
                ],
                vec![
                    pattern("A1-1", "新卒採用型", &["新卒可"], &[]),
                    pattern("A1-2", "中途即戦力型", &["経験者優遇"], &["新卒可"]),
                ],
            ),
            category(
                "A2",
                "契約・嘱託",
                2,
                2.0,
                vec![
                    employment(EmploymentType::Contract, 3.0),
                    tag("正社員登用", 0.5),
                ],
                vec![
                    pattern("A2-1", "登用前提型", &["正社員登用"], &[]),
                    pattern("A2-2", "シニア嘱託型", &["シニア歓迎"], &[]),
                ],
            ),
            category(
                "A3",
                "派遣",
                3,
                2.0,
                vec![employment(EmploymentType::Dispatch, 3.0)],
                vec![
                    pattern("A3-1", "紹介予定派遣型", &["正社員登用"], &[]),
                    pattern("A3-2", "一般派遣型", &[], &["正社員登用"]),
                ],
            ),
            category(
                "A4",
                "パート・アルバイト",
                4,
                2.0,
                vec![
                    employment(EmploymentType::PartTime, 3.0),
                    tag("時給制", 0.5),
                    tag("シフト自由", 0.5),
                ],
                vec![
                    pattern("A4-1", "学生型", &["学生歓迎"], &[]),
                    pattern("A4-2", "扶養内型", &["扶養内"], &[]),
                    pattern("A4-3", "Wワーク型", &["副業可"], &[]),
                ],
            ),
            category(
                "A5",
                "業務委託",
                5,
                2.0,
                vec![
                    employment(EmploymentType::Freelance, 3.0),
                    tag("副業可", 0.5),
                ],
                vec![],
            ),
        ],
    }
}

/// 軸B: 人材層
fn workforce_axis() -> AxisConfig {
    AxisConfig {
        axis: Axis::Workforce,
        categories: vec![
            category(
                "B1",
                "新卒・第二新卒",
                1,
                1.5,
                vec![
                    tag("新卒可", 2.0),
                    tag("第二新卒", 1.5),
                    tag("経験者優遇", -1.0),
                ],
                vec![
                    pattern("B1-1", "第二新卒型", &["第二新卒"], &[]),
                    pattern("B1-2", "現役学生型", &["学生歓迎"], &[]),
                ],
            ),
            category(
                "B2",
                "若手・ポテンシャル",
                2,
                1.5,
                vec![tag("若手活躍", 1.5), tag("未経験可", 0.5)],
                vec![pattern("B2-1", "未経験若手型", &["未経験可"], &[])],
            ),
            category(
                "B3",
                "ミドル・即戦力",
                3,
                1.5,
                vec![
                    tag("即戦力", 1.5),
                    tag("経験者優遇", 1.5),
                    tag("ミドル活躍", 1.0),
                    tag("管理職", 1.0),
                ],
                vec![
                    pattern("B3-1", "マネジメント型", &["管理職"], &[]),
                    pattern("B3-2", "ハイキャリア型", &["高収入"], &[]),
                ],
            ),
            category(
                "B4",
                "シニア",
                4,
                1.5,
                vec![
                    tag("シニア歓迎", 2.0),
                    tag("年齢不問", 1.0),
                    tag("ブランクOK", 0.5),
                ],
                vec![pattern("B4-1", "定年後歓迎型", &["シニア歓迎"], &[])],
            ),
            category(
                "B5",
                "主婦・主夫",
                5,
                1.5,
                vec![
                    tag("主婦OK", 2.0),
                    tag("扶養内", 1.0),
                    tag("育児支援", 0.5),
                ],
                vec![
                    pattern("B5-1", "扶養内パート型", &["扶養内"], &[]),
                    pattern("B5-2", "子育て両立型", &["育児支援"], &[]),
                ],
            ),
        ],
    }
}

/// 軸C: 働き方
fn workstyle_axis() -> AxisConfig {
    AxisConfig {
        axis: Axis::Workstyle,
        categories: vec![
            category(
                "C1",
                "フルリモート",
                1,
                2.0,
                vec![
                    tag("フルリモート", 2.5),
                    tag("リモート可", 0.5),
                    tag("出社あり", -1.5),
                ],
                vec![pattern("C1-1", "完全在宅型", &["フルリモート"], &["出社あり"])],
            ),
            category(
                "C2",
                "ハイブリッド",
                2,
                2.0,
                vec![
                    tag("リモート可", 1.5),
                    tag("出社あり", 1.0),
                    tag("フルリモート", -1.0),
                ],
                vec![pattern("C2-1", "週数日出社型", &["リモート可", "出社あり"], &[])],
            ),
            category(
                "C3",
                "時短・柔軟シフト",
                3,
                1.5,
                vec![
                    tag("時短勤務", 1.5),
                    tag("シフト自由", 1.5),
                    tag("週3日以内", 1.5),
                    tag("残業少なめ", 0.5),
                ],
                vec![
                    pattern("C3-1", "時短型", &["時短勤務"], &[]),
                    pattern("C3-2", "週3日以内型", &["週3日以内"], &[]),
                    pattern("C3-3", "自由シフト型", &["シフト自由"], &[]),
                ],
            ),
            category(
                "C4",
                "夜間・早朝",
                4,
                1.5,
                vec![tag("夜勤", 1.5), tag("早朝", 1.5)],
                vec![
                    pattern("C4-1", "深夜型", &["夜勤"], &["早朝"]),
                    pattern("C4-2", "早朝型", &["早朝"], &["夜勤"]),
                ],
            ),
            category(
                "C5",
                "出社中心・現場",
                5,
                1.5,
                vec![
                    tag("出社あり", 1.5),
                    tag("リモート可", -1.0),
                    tag("転勤なし", 0.5),
                    tag("直行直帰", 0.5),
                ],
                vec![
                    pattern("C5-1", "地域限定型", &["転勤なし"], &[]),
                    pattern("C5-2", "直行直帰型", &["直行直帰"], &[]),
                ],
            ),
        ],
    }
}

/// 軸D: 待遇。D1 だけは月給中点のスコア項を持つ。
fn compensation_axis() -> AxisConfig {
    AxisConfig {
        axis: Axis::Compensation,
        categories: vec![
            category(
                "D1",
                "高収入",
                1,
                2.0,
                vec![
                    salary_at_least(35, 2.0),
                    tag("高収入", 1.0),
                    tag("インセンティブ", 0.5),
                    tag("年俸制", 0.5),
                ],
                vec![
                    pattern("D1-1", "歩合型", &["インセンティブ"], &[]),
                    pattern("D1-2", "年俸型", &["年俸制"], &[]),
                ],
            ),
            category(
                "D2",
                "賞与・昇給",
                2,
                1.5,
                vec![tag("賞与あり", 1.5), tag("昇給あり", 1.0)],
                vec![pattern("D2-1", "賞与昇給両立型", &["賞与あり", "昇給あり"], &[])],
            ),
            category(
                "D3",
                "福利厚生充実",
                3,
                1.5,
                vec![
                    tag("社会保険完備", 1.0),
                    tag("退職金", 1.0),
                    tag("家賃補助", 1.0),
                    tag("育児支援", 0.5),
                    holidays_at_least(120, 1.0),
                ],
                vec![
                    pattern("D3-1", "住宅支援型", &["家賃補助"], &[]),
                    pattern("D3-2", "老後保障型", &["退職金"], &[]),
                    pattern("D3-3", "子育て支援型", &["育児支援"], &[]),
                ],
            ),
            category(
                "D4",
                "時給・日払い型",
                4,
                1.5,
                vec![tag("時給制", 1.0), tag("日払い", 1.5), tag("週払い", 1.0)],
                vec![
                    pattern("D4-1", "日払い型", &["日払い"], &[]),
                    pattern("D4-2", "週払い型", &["週払い"], &["日払い"]),
                ],
            ),
        ],
    }
}

/// 軸E: 経験・資格
fn experience_axis() -> AxisConfig {
    AxisConfig {
        axis: Axis::Experience,
        categories: vec![
            category(
                "E1",
                "未経験歓迎",
                1,
                1.5,
                vec![
                    tag("未経験可", 2.0),
                    tag("資格不問", 1.0),
                    tag("研修充実", 0.5),
                    tag("経験者優遇", -1.0),
                ],
                vec![
                    pattern("E1-1", "完全未経験型", &["未経験可"], &["経験者優遇"]),
                    pattern("E1-2", "研修付き型", &["研修充実"], &[]),
                    pattern("E1-3", "学歴資格不問型", &["資格不問"], &[]),
                ],
            ),
            category(
                "E2",
                "経験者優遇",
                2,
                1.5,
                vec![
                    tag("経験者優遇", 2.0),
                    tag("即戦力", 1.0),
                    tag("未経験可", -1.0),
                ],
                vec![pattern("E2-1", "即戦力型", &["即戦力"], &[])],
            ),
            category(
                "E3",
                "有資格・専門職",
                3,
                1.5,
                vec![
                    tag("国家資格", 2.0),
                    tag("要資格", 1.5),
                    tag("要免許", 1.5),
                    tag("資格取得支援", 0.5),
                ],
                vec![
                    pattern("E3-1", "国家資格型", &["国家資格"], &[]),
                    pattern("E3-2", "免許必須型", &["要免許"], &["国家資格"]),
                    pattern("E3-3", "資格取得支援型", &["資格取得支援"], &[]),
                ],
            ),
        ],
    }
}

fn tag(tag: &str, weight: f64) -> ScoreTerm {
    ScoreTerm::Tag {
        tag: tag.into(),
        weight,
    }
}

fn salary_at_least(man_yen: u32, weight: f64) -> ScoreTerm {
    ScoreTerm::SalaryAtLeast { man_yen, weight }
}

fn holidays_at_least(days: u32, weight: f64) -> ScoreTerm {
    ScoreTerm::HolidaysAtLeast { days, weight }
}

fn employment(employment_type: EmploymentType, weight: f64) -> ScoreTerm {
    ScoreTerm::EmploymentTypeIs {
        employment_type,
        weight,
    }
}

fn pattern(id: &str, label: &str, required: &[&str], forbidden: &[&str]) -> PatternConfig {
    PatternConfig {
        id: id.into(),
        label: label.into(),
        required_tags: required.iter().map(|t| (*t).to_string()).collect(),
        forbidden_tags: forbidden.iter().map(|t| (*t).to_string()).collect(),
    }
}

fn category(
    id: &str,
    label: &str,
    priority: u32,
    min_score: f64,
    terms: Vec<ScoreTerm>,
    patterns: Vec<PatternConfig>,
) -> MidCategoryConfig {
    MidCategoryConfig {
        id: id.into(),
        label: label.into(),
        priority,
        min_score,
        terms,
        patterns,
    }
}
