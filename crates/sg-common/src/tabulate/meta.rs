//! 集計実行のメタデータ。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// 1回の集計実行を識別するスタンプ。
///
/// finalize に注入する設計なので、同じスタンプを渡せば
/// 同一入力から常にバイト一致の出力が再現できる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStamp {
    /// ULID。時刻順ソート可能。
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub dictionary_version: String,
}

impl RunStamp {
    /// 現在時刻で新しいスタンプを発行する。
    pub fn now(dictionary_version: &str) -> Self {
        Self {
            run_id: Ulid::new().to_string(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            dictionary_version: dictionary_version.to_string(),
        }
    }
}

/// 出力バンドル先頭のメタテーブル。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
    pub dictionary_version: String,
    pub total_records: u64,
    pub postings: u64,
    pub seekers: u64,
    pub resolved_records: u64,
    pub unresolved_records: u64,
}
