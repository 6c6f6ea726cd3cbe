//! Writers for analysis artefacts.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, ParquetWriter, SerWriter, Series};
use tracing::info;

use crate::{insights::AnalysisReport, nlp::topics::Topic};

/// Write every artefact for `report` into `dir`, returning the created paths.
pub fn export_report(report: &AnalysisReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    let mut reviews = reviews_frame(report)?;
    written.push(write_csv(&mut reviews, dir.join("reviews_tagged.csv"))?);
    written.push(write_parquet(&mut reviews, dir.join("reviews_tagged.parquet"))?);

    let mut volume = topic_volume_frame(report)?;
    written.push(write_csv(&mut volume, dir.join("topic_volume.csv"))?);

    let mut sentiment = sentiment_frame(report)?;
    written.push(write_csv(&mut sentiment, dir.join("sentiment_by_topic.csv"))?);

    let mut keywords = keywords_frame(report)?;
    written.push(write_csv(&mut keywords, dir.join("cluster_keywords.csv"))?);

    let summary_path = dir.join("summary.json");
    let file = File::create(&summary_path)?;
    serde_json::to_writer_pretty(file, report).context("writing summary.json")?;
    written.push(summary_path);

    #[cfg(feature = "askama")]
    {
        let html_path = dir.join("report.html");
        let html = crate::ui::render_report(report)?;
        std::fs::write(&html_path, html).context("writing report.html")?;
        written.push(html_path);
    }

    info!(dir = %dir.display(), files = written.len(), "exported analysis");
    Ok(written)
}

fn reviews_frame(report: &AnalysisReport) -> Result<DataFrame> {
    let rows = &report.reviews;
    let df = DataFrame::new(vec![
        Series::new(
            "row".into(),
            rows.iter().map(|r| r.row as i64).collect::<Vec<_>>(),
        ),
        Series::new(
            "full_text".into(),
            rows.iter().map(|r| r.text.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "rating".into(),
            rows.iter().map(|r| r.rating).collect::<Vec<_>>(),
        ),
        Series::new(
            "brand".into(),
            rows.iter().map(|r| r.brand.clone()).collect::<Vec<_>>(),
        ),
        Series::new(
            "date".into(),
            rows.iter()
                .map(|r| r.date.map(|d| d.to_string()))
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "cluster".into(),
            rows.iter().map(|r| r.cluster.0).collect::<Vec<_>>(),
        ),
        Series::new(
            "topics".into(),
            rows.iter()
                .map(|r| join_topics(&r.topics))
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "sentiment".into(),
            rows.iter()
                .map(|r| r.sentiment.as_str().to_string())
                .collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

fn topic_volume_frame(report: &AnalysisReport) -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(
            "topic".into(),
            report
                .topic_volume
                .keys()
                .map(|t| t.as_str().to_string())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "reviews".into(),
            report
                .topic_volume
                .values()
                .map(|n| *n as i64)
                .collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

fn sentiment_frame(report: &AnalysisReport) -> Result<DataFrame> {
    let by_topic = &report.sentiment_by_topic;
    let df = DataFrame::new(vec![
        Series::new(
            "topic".into(),
            by_topic
                .keys()
                .map(|t| t.as_str().to_string())
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "positive".into(),
            by_topic
                .values()
                .map(|c| c.positive as i64)
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "neutral".into(),
            by_topic
                .values()
                .map(|c| c.neutral as i64)
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "negative".into(),
            by_topic
                .values()
                .map(|c| c.negative as i64)
                .collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

fn keywords_frame(report: &AnalysisReport) -> Result<DataFrame> {
    let mut clusters = Vec::new();
    let mut ranks = Vec::new();
    let mut keywords = Vec::new();
    let mut frequencies = Vec::new();
    for (cluster, terms) in &report.cluster_keywords {
        for (rank, term) in terms.iter().enumerate() {
            clusters.push(cluster.0);
            ranks.push(rank as i64 + 1);
            keywords.push(term.keyword.clone());
            frequencies.push(term.frequency as i64);
        }
    }
    let df = DataFrame::new(vec![
        Series::new("cluster".into(), clusters),
        Series::new("rank".into(), ranks),
        Series::new("keyword".into(), keywords),
        Series::new("frequency".into(), frequencies),
    ])?;
    Ok(df)
}

/// Topic labels as a single `|`-separated cell.
pub fn join_topics(topics: &[Topic]) -> String {
    topics
        .iter()
        .map(Topic::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

fn write_csv(df: &mut DataFrame, path: PathBuf) -> Result<PathBuf> {
    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(path)
}

fn write_parquet(df: &mut DataFrame, path: PathBuf) -> Result<PathBuf> {
    let file = File::create(&path)?;
    ParquetWriter::new(file).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote parquet");
    Ok(path)
}
