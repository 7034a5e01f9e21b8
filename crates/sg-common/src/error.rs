use thiserror::Error;

/// 辞書ロード/検証エラー。起動時に fail-fast し、分類中には発生させない。
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("duplicate axis: {0}")]
    DuplicateAxis(String),
    #[error("duplicate tag: {0}")]
    DuplicateTag(String),
    #[error("duplicate mid-category id: {0}")]
    DuplicateCategory(String),
    #[error("duplicate priority {priority} in axis {axis}: {first} / {second}")]
    DuplicatePriority {
        axis: String,
        priority: u32,
        first: String,
        second: String,
    },
    #[error("duplicate pattern id: {0}")]
    DuplicatePattern(String),
    #[error("unknown tag `{tag}` referenced by {referrer}")]
    UnknownTag { tag: String, referrer: String },
    #[error("pattern {pattern}: tag `{tag}` is both required and forbidden")]
    ConflictingPatternTags { pattern: String, tag: String },
    #[error("non-finite weight in {0}")]
    BadWeight(String),
    #[error("tag `{tag}`: invalid regex `{pattern}`: {source}")]
    BadRegex {
        tag: String,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("dictionary `{0}` defines no axes or no tags")]
    Empty(String),
    #[error("failed to parse dictionary json: {0}")]
    Parse(#[from] serde_json::Error),
}
