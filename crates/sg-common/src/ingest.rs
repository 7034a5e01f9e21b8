use serde_json::Value;
use tracing::warn;

use crate::{Record, RecordKind};

/// JSONL の1行を Record にする。壊れた行（非JSON・非オブジェクト）は warn を出して捨てる。
/// 空行は黙って読み飛ばす。
pub fn record_from_jsonl_line(line: &str, line_number: usize) -> Option<Record> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ Value::Object(_)) => Some(record_from_json(&value)),
        Ok(other) => {
            warn!(
                line = line_number,
                got = type_name(&other),
                "skipping non-object jsonl line"
            );
            None
        }
        Err(err) => {
            warn!(line = line_number, error = %err, "skipping malformed jsonl line");
            None
        }
    }
}

/// 生JSONオブジェクト → Record の寛容な変換
///
/// 型が合わない欄は warn を出して欠損扱いにし、行そのものは捨てない。
/// 未知のキーは無視。数値欄は数値文字列（"28"）も受ける。
pub fn record_from_json(value: &Value) -> Record {
    let mut record = Record {
        id: int_field(value, "id"),
        kind: kind_field(value),
        title: text_field(value, "title"),
        description: text_field(value, "description"),
        holidays_text: text_field(value, "holidays_text"),
        qualifications_text: text_field(value, "qualifications_text"),
        employment_type: text_field(value, "employment_type"),
        todofuken: text_field(value, "todofuken"),
        shikuchoson: text_field(value, "shikuchoson"),
        gender: text_field(value, "gender"),
        age_bracket: text_field(value, "age_bracket"),
        salary_min: uint_field(value, "salary_min"),
        salary_max: uint_field(value, "salary_max"),
        annual_holidays: uint_field(value, "annual_holidays"),
    };

    if let (Some(min), Some(max)) = (record.salary_min, record.salary_max) {
        if min > max {
            warn!(
                record_id = record.id,
                salary_min = min,
                salary_max = max,
                "swapping inverted salary range"
            );
            record.salary_min = Some(max);
            record.salary_max = Some(min);
        }
    }

    record
}

fn kind_field(value: &Value) -> RecordKind {
    match value.get("kind") {
        None | Some(Value::Null) => RecordKind::default(),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => RecordKind::default(),
            "posting" | "job" | "求人" => RecordKind::Posting,
            "seeker" | "candidate" | "求職" | "求職者" => RecordKind::Seeker,
            other => {
                warn!(field = "kind", got = other, "unknown record kind; defaulting to posting");
                RecordKind::Posting
            }
        },
        Some(other) => {
            warn!(
                field = "kind",
                got = type_name(other),
                "non-string record kind; defaulting to posting"
            );
            RecordKind::Posting
        }
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(other) => {
            warn!(
                field = key,
                got = type_name(other),
                "ignoring non-string text field"
            );
            None
        }
    }
}

fn uint_field(value: &Value, key: &str) -> Option<u32> {
    match value.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(v) => Some(v),
            None => {
                warn!(field = key, got = %n, "ignoring out-of-range numeric field");
                None
            }
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<u32>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(field = key, got = %s, "ignoring unparsable numeric field");
                    None
                }
            }
        }
        Some(other) => {
            warn!(
                field = key,
                got = type_name(other),
                "ignoring non-numeric field"
            );
            None
        }
    }
}

fn int_field(value: &Value, key: &str) -> Option<i64> {
    match value.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => Some(v),
            None => {
                warn!(field = key, got = %n, "ignoring out-of-range id field");
                None
            }
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<i64>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(field = key, got = %s, "ignoring unparsable id field");
                    None
                }
            }
        }
        Some(other) => {
            warn!(
                field = key,
                got = type_name(other),
                "ignoring non-numeric id field"
            );
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_well_formed_record() {
        let value = json!({
            "id": 42,
            "kind": "seeker",
            "title": "  営業職希望  ",
            "todofuken": "東京都",
            "gender": "女性",
            "age_bracket": "30代",
            "salary_min": "25",
            "salary_max": 35,
        });

        let record = record_from_json(&value);
        assert_eq!(record.id, Some(42));
        assert_eq!(record.kind, RecordKind::Seeker);
        assert_eq!(record.title.as_deref(), Some("営業職希望"));
        assert_eq!(record.salary_min, Some(25));
        assert_eq!(record.salary_max, Some(35));
    }

    #[test]
    fn malformed_fields_degrade_to_missing() {
        let value = json!({
            "id": "abc",
            "title": 123,
            "salary_min": -5,
            "salary_max": 30.5,
            "annual_holidays": "たくさん",
            "gender": null,
        });

        let record = record_from_json(&value);
        assert_eq!(record.id, None);
        assert_eq!(record.title, None);
        assert_eq!(record.salary_min, None);
        assert_eq!(record.salary_max, None);
        assert_eq!(record.annual_holidays, None);
        assert_eq!(record.gender, None);
    }

    #[test]
    fn empty_strings_become_missing_without_noise() {
        let value = json!({ "title": "   ", "salary_min": "" });
        let record = record_from_json(&value);
        assert_eq!(record.title, None);
        assert_eq!(record.salary_min, None);
    }

    #[test]
    fn unknown_kind_defaults_to_posting() {
        let value = json!({ "kind": "派遣案件" });
        assert_eq!(record_from_json(&value).kind, RecordKind::Posting);

        let value = json!({ "kind": 7 });
        assert_eq!(record_from_json(&value).kind, RecordKind::Posting);

        let value = json!({});
        assert_eq!(record_from_json(&value).kind, RecordKind::Posting);
    }

    #[test]
    fn inverted_salary_range_is_swapped() {
        let value = json!({ "salary_min": 50, "salary_max": 30 });
        let record = record_from_json(&value);
        assert_eq!(record.salary_min, Some(30));
        assert_eq!(record.salary_max, Some(50));
    }

    #[test]
    fn jsonl_lines_skip_broken_rows() {
        assert!(record_from_jsonl_line(r#"{"title":"ok"}"#, 1).is_some());
        assert!(record_from_jsonl_line("", 2).is_none());
        assert!(record_from_jsonl_line("   ", 3).is_none());
        assert!(record_from_jsonl_line("{broken", 4).is_none());
        assert!(record_from_jsonl_line("[1,2,3]", 5).is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let value = json!({ "title": "清掃スタッフ", "scraped_at": "2025-08-01", "source": "site-a" });
        let record = record_from_json(&value);
        assert_eq!(record.title.as_deref(), Some("清掃スタッフ"));
    }
}
