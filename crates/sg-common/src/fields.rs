use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::normalize::normalize_for_match;

/// 雇用形態ENUM: ["正社員", "契約社員", "派遣社員", "パート・アルバイト", "業務委託"]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    Contract,
    Dispatch,
    PartTime,
    Freelance,
}

impl EmploymentType {
    pub fn label(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "正社員",
            EmploymentType::Contract => "契約社員",
            EmploymentType::Dispatch => "派遣社員",
            EmploymentType::PartTime => "パート・アルバイト",
            EmploymentType::Freelance => "業務委託",
        }
    }
}

/// 雇用形態補正: 表記ゆれを正規ENUMへ寄せる
///
/// 原文フィールドは媒体ごとに揺れる（"ｱﾙﾊﾞｲﾄ", "契約社員（正社員登用あり）", "紹介予定派遣"...）。
/// 限定的な語を先に判定する: 派遣 → 契約/嘱託 → パート/バイト → 委託/フリー → 正社員。
pub fn correct_employment_type(input: &str) -> Option<EmploymentType> {
    let normalized = normalize_for_match(input);
    if normalized.is_empty() {
        return None;
    }

    if normalized.contains("派遣") {
        return Some(EmploymentType::Dispatch);
    }
    if normalized.contains("契約") || normalized.contains("嘱託") {
        return Some(EmploymentType::Contract);
    }
    if normalized.contains("パート") || normalized.contains("バイト") {
        return Some(EmploymentType::PartTime);
    }
    if normalized.contains("委託")
        || normalized.contains("フリーランス")
        || normalized.contains("個人事業")
    {
        return Some(EmploymentType::Freelance);
    }
    if normalized.contains("正社員") || normalized.contains("正職員") {
        return Some(EmploymentType::FullTime);
    }

    None
}

/// 性別ENUM: ["男性", "女性", "その他・無回答"]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男性",
            Gender::Female => "女性",
            Gender::Other => "その他・無回答",
        }
    }
}

/// 性別補正: 空欄は未回答（None）、"男女不問" 等の両性表記は「その他・無回答」
pub fn correct_gender(input: &str) -> Option<Gender> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains("不問") || trimmed.contains("男女") {
        return Some(Gender::Other);
    }
    if trimmed.contains('男') {
        return Some(Gender::Male);
    }
    if trimmed.contains('女') {
        return Some(Gender::Female);
    }

    Some(Gender::Other)
}

/// 年代ENUM: "10代" 〜 "70代以上"（70以上は1バケツに畳む）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgeDecade {
    Teens,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    Sixties,
    SeventiesPlus,
}

impl AgeDecade {
    pub fn label(&self) -> &'static str {
        match self {
            AgeDecade::Teens => "10代",
            AgeDecade::Twenties => "20代",
            AgeDecade::Thirties => "30代",
            AgeDecade::Forties => "40代",
            AgeDecade::Fifties => "50代",
            AgeDecade::Sixties => "60代",
            AgeDecade::SeventiesPlus => "70代以上",
        }
    }
}

/// 年代補正: "30代" / "３０代前半" / "70代以上" / "45歳" をバケツへ
///
/// 先頭の数値 + 「代」または「歳」のみ受け付ける。それ以外の自由記述は None。
pub fn correct_age_decade(input: &str) -> Option<AgeDecade> {
    let normalized = normalize_for_match(input);

    let digits: String = normalized
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }

    let rest = &normalized[digits.len()..];
    if !(rest.starts_with('代') || rest.starts_with('歳')) {
        return None;
    }

    let value: u32 = digits.parse().ok()?;
    match value / 10 * 10 {
        10 => Some(AgeDecade::Teens),
        20 => Some(AgeDecade::Twenties),
        30 => Some(AgeDecade::Thirties),
        40 => Some(AgeDecade::Forties),
        50 => Some(AgeDecade::Fifties),
        60 => Some(AgeDecade::Sixties),
        v if v >= 70 => Some(AgeDecade::SeventiesPlus),
        _ => None,
    }
}
