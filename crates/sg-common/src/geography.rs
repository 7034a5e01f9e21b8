use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::Record;

lazy_static! {
    /// 都道府県の短縮形 → 正式名称
    static ref PREFECTURE_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("北海", "北海道"); m.insert("青森", "青森県"); m.insert("岩手", "岩手県");
        m.insert("宮城", "宮城県"); m.insert("秋田", "秋田県"); m.insert("山形", "山形県");
        m.insert("福島", "福島県"); m.insert("茨城", "茨城県"); m.insert("栃木", "栃木県");
        m.insert("群馬", "群馬県"); m.insert("埼玉", "埼玉県"); m.insert("千葉", "千葉県");
        m.insert("東京", "東京都"); m.insert("神奈", "神奈川県"); m.insert("新潟", "新潟県");
        m.insert("富山", "富山県"); m.insert("石川", "石川県"); m.insert("福井", "福井県");
        m.insert("山梨", "山梨県"); m.insert("長野", "長野県"); m.insert("岐阜", "岐阜県");
        m.insert("静岡", "静岡県"); m.insert("愛知", "愛知県"); m.insert("三重", "三重県");
        m.insert("滋賀", "滋賀県"); m.insert("京都", "京都府"); m.insert("大阪", "大阪府");
        m.insert("兵庫", "兵庫県"); m.insert("奈良", "奈良県"); m.insert("和歌", "和歌山県");
        m.insert("鳥取", "鳥取県"); m.insert("島根", "島根県"); m.insert("岡山", "岡山県");
        m.insert("広島", "広島県"); m.insert("山口", "山口県"); m.insert("徳島", "徳島県");
        m.insert("香川", "香川県"); m.insert("愛媛", "愛媛県"); m.insert("高知", "高知県");
        m.insert("福岡", "福岡県"); m.insert("佐賀", "佐賀県"); m.insert("長崎", "長崎県");
        m.insert("熊本", "熊本県"); m.insert("大分", "大分県"); m.insert("宮崎", "宮崎県");
        m.insert("鹿児", "鹿児島県"); m.insert("沖縄", "沖縄県");
        m
    };
}

/// 都道府県補正: 短縮形や前方一致から正式名称に変換
pub fn correct_todofuken(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let all_prefs: Vec<_> = PREFECTURE_MAP.values().cloned().collect();
    if all_prefs.contains(&trimmed) {
        return Some(trimmed.to_string());
    }

    for (key, value) in PREFECTURE_MAP.iter() {
        if trimmed == *key || trimmed.starts_with(*key) {
            return Some(value.to_string());
        }
    }

    if trimmed.chars().count() >= 2 {
        let prefix: String = trimmed.chars().take(2).collect();
        if let Some(value) = PREFECTURE_MAP.get(prefix.as_str()) {
            return Some(value.to_string());
        }
    }

    None
}

/// 集計キー: 解決済み（都道府県＋任意の市区町村）か、未解決バケツのどちらか
///
/// Ord は Resolved → Unresolved の順。テーブル出力の行順はこの順序で安定する。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoKey {
    Resolved {
        todofuken: String,
        shikuchoson: Option<String>,
    },
    Unresolved,
}

impl GeoKey {
    pub fn resolved(todofuken: impl Into<String>, shikuchoson: Option<String>) -> Self {
        GeoKey::Resolved {
            todofuken: todofuken.into(),
            shikuchoson,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, GeoKey::Resolved { .. })
    }

    /// ログ・レポート表示用ラベル
    pub fn label(&self) -> String {
        match self {
            GeoKey::Resolved {
                todofuken,
                shikuchoson: Some(city),
            } => format!("{todofuken}/{city}"),
            GeoKey::Resolved {
                todofuken,
                shikuchoson: None,
            } => todofuken.clone(),
            GeoKey::Unresolved => "（未解決）".to_string(),
        }
    }
}

/// レコード → 集計キーの解決。実装を差し替えれば市区町村より粗い/細かい軸でも集計できる。
pub trait ResolveGeo {
    fn resolve(&self, record: &Record) -> GeoKey;
}

/// 既定の解決器: 都道府県を補正し、市区町村は trim のみで受け入れる。
/// 都道府県が解決できないレコードは市区町村があっても Unresolved に落とす。
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefectureResolver;

impl ResolveGeo for PrefectureResolver {
    fn resolve(&self, record: &Record) -> GeoKey {
        let todofuken = record
            .todofuken
            .as_deref()
            .and_then(correct_todofuken);

        match todofuken {
            Some(pref) => {
                let city = record
                    .shikuchoson
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                GeoKey::resolved(pref, city)
            }
            None => GeoKey::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(todofuken: Option<&str>, shikuchoson: Option<&str>) -> Record {
        Record {
            todofuken: todofuken.map(str::to_string),
            shikuchoson: shikuchoson.map(str::to_string),
            ..Record::default()
        }
    }

    #[test]
    fn corrects_prefecture_names() {
        assert_eq!(correct_todofuken("東京"), Some("東京都".to_string()));
        assert_eq!(correct_todofuken("東京都"), Some("東京都".to_string()));
        assert_eq!(correct_todofuken("神奈"), Some("神奈川県".to_string()));
        assert_eq!(correct_todofuken("京都府京都市"), Some("京都府".to_string()));
        assert_eq!(correct_todofuken("リモート"), None);
        assert_eq!(correct_todofuken(""), None);
    }

    #[test]
    fn resolves_prefecture_and_trims_municipality() {
        let geo = PrefectureResolver.resolve(&record_at(Some("東京"), Some(" 千代田区 ")));
        assert_eq!(
            geo,
            GeoKey::resolved("東京都", Some("千代田区".to_string()))
        );
        assert!(geo.is_resolved());
        assert_eq!(geo.label(), "東京都/千代田区");
    }

    #[test]
    fn unresolvable_prefecture_drops_municipality() {
        assert_eq!(
            PrefectureResolver.resolve(&record_at(Some("全国"), Some("千代田区"))),
            GeoKey::Unresolved
        );
        assert_eq!(
            PrefectureResolver.resolve(&record_at(None, Some("千代田区"))),
            GeoKey::Unresolved
        );
        assert_eq!(GeoKey::Unresolved.label(), "（未解決）");
    }

    #[test]
    fn empty_municipality_folds_to_prefecture_row() {
        assert_eq!(
            PrefectureResolver.resolve(&record_at(Some("大阪府"), Some("  "))),
            GeoKey::resolved("大阪府", None)
        );
    }

    #[test]
    fn resolved_sorts_before_unresolved() {
        let resolved = GeoKey::resolved("東京都", None);
        assert!(resolved < GeoKey::Unresolved);
    }
}
