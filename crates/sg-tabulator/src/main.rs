use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use sg_common::dictionary::{builtin, SegmentDictionary};
use sg_common::geography::PrefectureResolver;
use sg_common::ingest::record_from_jsonl_line;
use sg_common::segment::Classifier;
use sg_common::tabulate::{classify_and_aggregate, AggregateConfig, RunStamp, SummaryBundle};
use sg_common::Record;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "sg-tabulator",
    about = "Classify job-market records and emit regional summary tables"
)]
struct Cli {
    /// 入力 JSONL（1行1レコード）。"-" で標準入力
    #[arg(long, default_value = "-")]
    input: String,

    /// 出力 JSON。"-" で標準出力
    #[arg(long, default_value = "-")]
    output: String,

    /// 差し替え用セグメント辞書（JSON）。未指定なら組み込み辞書
    #[arg(long, env = "SG_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// tag_pairs に出力する最小共起回数
    #[arg(long, env = "SG_MIN_PAIR_SUPPORT", default_value_t = 5)]
    min_pair_support: u32,

    /// salary_bands のバンド幅（万円）
    #[arg(long, default_value_t = 10)]
    salary_band_man_yen: u32,

    /// 並列分類のチャンクサイズ
    #[arg(long, default_value_t = 4096)]
    chunk_size: usize,

    /// 出力 JSON を整形する
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn load_dictionary(
    path: Option<&Path>,
) -> Result<Arc<SegmentDictionary>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(Arc::new(SegmentDictionary::from_json_str(&raw)?))
        }
        None => Ok(builtin::builtin()),
    }
}

fn read_records(input: &str) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(record) = record_from_jsonl_line(&line, index + 1) {
            records.push(record);
        }
    }
    Ok(records)
}

fn write_bundle(
    output: &str,
    bundle: &SummaryBundle,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(bundle)?
    } else {
        serde_json::to_string(bundle)?
    };
    if output == "-" {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        writeln!(writer, "{json}")?;
    } else {
        let mut writer = BufWriter::new(File::create(output)?);
        writeln!(writer, "{json}")?;
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    sg_common::logging::init("sg-tabulator");

    let args = Cli::parse();
    let dictionary = load_dictionary(args.dictionary.as_deref())?;
    let classifier = Classifier::new(dictionary)?;
    info!(
        dictionary_version = %classifier.dictionary().version,
        categories = classifier.dictionary().category_count(),
        patterns = classifier.dictionary().pattern_count(),
        "classifier ready"
    );

    let records = read_records(&args.input)?;
    info!(records = records.len(), input = %args.input, "loaded input records");

    let accumulated = classify_and_aggregate(
        &records,
        &classifier,
        &PrefectureResolver,
        args.chunk_size,
    );
    let config = AggregateConfig {
        min_pair_support: args.min_pair_support,
        salary_band_man_yen: args.salary_band_man_yen,
    };
    let stamp = RunStamp::now(&classifier.dictionary().version);
    let bundle = accumulated.finalize(&config, stamp);
    info!(
        run_id = %bundle.run_meta.run_id,
        total = bundle.run_meta.total_records,
        unresolved = bundle.run_meta.unresolved_records,
        "aggregation finished"
    );

    write_bundle(&args.output, &bundle, args.pretty)?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("sg-tabulator failed: {err}");
        std::process::exit(1);
    }
}
