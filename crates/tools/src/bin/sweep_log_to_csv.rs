use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use sweeplog_core::{write_csv, Extraction, Extractor, DEFAULT_DELIMITER};
use tools::common::io::{open_writer, read_to_string};

const COMPLETION_MESSAGE: &str = "Extraction and CSV writing complete.";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Extract epochs / batch_size / learning_rate and k-fold results from a sweep log into CSV"
)]
struct Cli {
    /// スイープ実行ログ（`-` で stdin、`.gz` は自動展開）
    #[arg(default_value = "output.txt")]
    input_log: PathBuf,

    /// 出力CSV（`-` で stdout、`.gz` は圧縮）
    #[arg(long, default_value = "output_results.csv")]
    output_csv: PathBuf,

    /// ブロック区切り文字列
    #[arg(long, default_value = DEFAULT_DELIMITER, allow_hyphen_values = true)]
    delimiter: String,

    /// 読み飛ばしたブロックを stderr に出力する
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn report_skipped(extraction: &Extraction) {
    for skipped in &extraction.skipped {
        let missing: Vec<String> = skipped.missing.iter().map(ToString::to_string).collect();
        debug!("skipped block {}: missing {}", skipped.index, missing.join(", "));
    }
    info!(
        "extracted {} records from {} blocks ({} skipped)",
        extraction.records.len(),
        extraction.blocks,
        extraction.skipped.len()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let extractor = Extractor::new(cli.delimiter.as_str()).context("invalid --delimiter")?;
    debug!("splitting blocks on {:?}", extractor.delimiter());

    // 入力の読み込みと抽出が終わるまで出力ファイルは作らない
    let content = read_to_string(&cli.input_log)
        .with_context(|| format!("failed to read {}", cli.input_log.display()))?;
    let extraction = extractor
        .extract_with_report(&content)
        .with_context(|| format!("failed to extract records from {}", cli.input_log.display()))?;
    report_skipped(&extraction);

    let mut writer = open_writer(&cli.output_csv)
        .with_context(|| format!("failed to create {}", cli.output_csv.display()))?;
    let to_stdout = writer.is_stdout();
    write_csv(&mut writer, &extraction.records)
        .with_context(|| format!("failed to write {}", cli.output_csv.display()))?;
    writer.close().with_context(|| format!("failed to write {}", cli.output_csv.display()))?;

    if to_stdout {
        info!("{COMPLETION_MESSAGE}");
    } else {
        println!("{COMPLETION_MESSAGE}");
    }
    Ok(())
}
