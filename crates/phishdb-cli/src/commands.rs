//! CLI command handlers.

use std::sync::Arc;

use anyhow::Context;
use phishdb_core::AppConfig;
use phishdb_store::{AggregateColumn, SearchColumn, SearchMode, Store};

async fn open_store(config: &AppConfig) -> anyhow::Result<Store> {
    Store::connect(&config.database_path, &config.snapshot_path)
        .await
        .context("failed to open the corpus store")
}

pub(crate) async fn refresh(config: &AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(open_store(config).await?);
    let client = phishdb_feeds::FeedClient::from_config(config)?;
    let refresher = phishdb_pipeline::Refresher::new(client, store);

    let report = refresher.run().await?;

    println!("source       status    fetched     kept  discarded");
    for source in &report.sources {
        println!(
            "{:<12} {:<8} {:>8} {:>8} {:>10}{}",
            source.source,
            source.status,
            source.fetched,
            source.kept,
            source.discarded,
            source
                .error
                .as_deref()
                .map(|e| format!("  ({e})"))
                .unwrap_or_default(),
        );
    }
    println!();
    println!(
        "corpus: {} records ({} new this cycle, {} prior)",
        report.corpus_records, report.new_records, report.prior_records
    );
    if report.failed_sources() > 0 {
        println!(
            "warning: {} of {} sources contributed nothing this cycle",
            report.failed_sources(),
            report.sources.len()
        );
    }
    Ok(())
}

pub(crate) async fn aggregate(config: &AppConfig, by: &str) -> anyhow::Result<()> {
    let column = by
        .parse::<AggregateColumn>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let store = open_store(config).await?;

    let groups = store.aggregate(column).await?;
    if groups.is_empty() {
        println!("corpus is empty — run `phishdb-cli refresh` first");
        return Ok(());
    }

    for group in groups {
        println!("{:>8}  {}", group.url_count, group.value);
    }
    Ok(())
}

pub(crate) async fn search(
    config: &AppConfig,
    term: &str,
    column: &str,
    contains: bool,
) -> anyhow::Result<()> {
    let column = column
        .parse::<SearchColumn>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let mode = if contains {
        SearchMode::Contains
    } else {
        SearchMode::Exact
    };
    let store = open_store(config).await?;

    let records = store.search(term, column, mode).await?;
    if records.is_empty() {
        println!("no matches");
        return Ok(());
    }

    println!("{} match(es)", records.len());
    for record in records {
        let date = record
            .date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  [{}] target={} date={}",
            record.url, record.source, record.target, date
        );
    }
    Ok(())
}

pub(crate) async fn classify(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let endpoint = config
        .classifier_url
        .as_deref()
        .context("PHISHDB_CLASSIFIER_URL is not configured")?;
    let classifier = phishdb_classify::RemoteClassifier::new(endpoint, config.feed_timeout_secs)?;

    let verdict = classifier.classify(url).await?;
    println!("{url}: {verdict}");
    Ok(())
}
