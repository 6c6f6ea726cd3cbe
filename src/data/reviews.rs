//! Review table loading and normalisation.

use std::{fs::File, io::Read, path::Path};

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::{debug, info, warn};

use crate::error::InputError;

const FULL_TEXT_ALIASES: &[&str] = &["full_text"];
const TEXT_ALIASES: &[&str] = &["review_text", "text", "review", "body", "content"];
const TITLE_ALIASES: &[&str] = &["title", "review_title", "summary", "headline"];
const RATING_ALIASES: &[&str] = &["rating", "stars", "score", "review_rating", "star_rating"];
const BRAND_ALIASES: &[&str] = &["brand", "marca", "brand_name"];
const DATE_ALIASES: &[&str] = &["date", "review_date", "reviewed_at", "created_at"];

const FUZZY_HEADER_THRESHOLD: f64 = 0.95;

/// A single review after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// 1-based data row in the source file.
    pub row: usize,
    pub text: String,
    pub rating: f64,
    pub brand: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Loader knobs.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Keep only reviews of this brand (case-insensitive). `all` disables the filter.
    pub brand: Option<String>,
}

impl LoadOptions {
    fn brand_filter(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty() && !b.eq_ignore_ascii_case("all"))
    }
}

/// Reviews that passed validation plus bookkeeping about the rest.
#[derive(Debug, Clone, Default)]
pub struct LoadedReviews {
    pub reviews: Vec<Review>,
    /// Rows dropped for empty text or an unreadable rating.
    pub skipped: usize,
    /// Rows dropped by the brand filter.
    pub filtered_out: usize,
}

#[derive(Debug)]
struct Columns {
    text: Option<usize>,
    title: Option<usize>,
    rating: usize,
    brand: Option<usize>,
    date: Option<usize>,
}

/// Load reviews from a CSV file on disk.
pub fn load_reviews_from_path(path: &Path, options: &LoadOptions) -> Result<LoadedReviews, InputError> {
    let file = File::open(path)?;
    info!(path = %path.display(), "reading review export");
    load_reviews(file, options)
}

/// Load reviews from any CSV source.
pub fn load_reviews<R: Read>(reader: R, options: &LoadOptions) -> Result<LoadedReviews, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalise_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(InputError::MissingInput);
    }
    let columns = resolve_columns(&headers)?;
    debug!(?columns, "resolved review columns");

    let brand_filter = options.brand_filter();
    if brand_filter.is_some() && columns.brand.is_none() {
        return Err(InputError::MissingColumn {
            column: "brand",
            available: headers,
        });
    }

    let mut loaded = LoadedReviews::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let field = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let brand = field(columns.brand).map(str::to_string);
        if let Some(wanted) = brand_filter {
            if !brand
                .as_deref()
                .is_some_and(|b| b.eq_ignore_ascii_case(wanted))
            {
                loaded.filtered_out += 1;
                continue;
            }
        }

        let text = compose_text(field(columns.title), field(columns.text));
        let rating = field(Some(columns.rating)).and_then(parse_rating);
        let (Some(text), Some(rating)) = (text, rating) else {
            debug!(row, "skipping row without text or rating");
            loaded.skipped += 1;
            continue;
        };

        loaded.reviews.push(Review {
            row,
            text,
            rating,
            brand,
            date: field(columns.date).and_then(parse_date),
        });
    }

    if loaded.skipped > 0 {
        warn!(skipped = loaded.skipped, "dropped rows without text or a readable rating");
    }
    if loaded.reviews.is_empty() {
        return Err(InputError::NoUsableRows {
            skipped: loaded.skipped + loaded.filtered_out,
        });
    }
    info!(
        rows = loaded.reviews.len(),
        filtered_out = loaded.filtered_out,
        "loaded reviews"
    );
    Ok(loaded)
}

fn normalise_header(raw: &str) -> String {
    let cleaned = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
    let mut out = String::with_capacity(cleaned.len());
    for ch in cleaned.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

fn resolve_columns(headers: &[String]) -> Result<Columns, InputError> {
    let groups: [&[&str]; 6] = [
        FULL_TEXT_ALIASES,
        TEXT_ALIASES,
        TITLE_ALIASES,
        RATING_ALIASES,
        BRAND_ALIASES,
        DATE_ALIASES,
    ];
    let mut found: [Option<usize>; 6] = [None; 6];
    let mut taken: Vec<usize> = Vec::new();
    // Exact names claim their header before any fuzzy guess runs.
    for (slot, aliases) in found.iter_mut().zip(groups) {
        *slot = exact_column(headers, aliases, &taken);
        taken.extend(*slot);
    }
    for (slot, aliases) in found.iter_mut().zip(groups) {
        if slot.is_none() {
            *slot = fuzzy_column(headers, aliases, &taken);
            taken.extend(*slot);
        }
    }
    let [full_text, text, title, rating, brand, date] = found;

    let text = full_text.or(text);
    // A ready-made `full_text` already contains the title.
    let title = title.filter(|_| full_text.is_none());
    if text.is_none() && title.is_none() {
        return Err(InputError::MissingColumn {
            column: "full_text",
            available: headers.to_vec(),
        });
    }
    let rating = rating.ok_or_else(|| InputError::MissingColumn {
        column: "rating",
        available: headers.to_vec(),
    })?;
    Ok(Columns {
        text,
        title,
        rating,
        brand,
        date,
    })
}

/// Headers not yet claimed by another column.
fn free_headers<'a>(
    headers: &'a [String],
    taken: &'a [usize],
) -> impl Iterator<Item = (usize, &'a String)> + 'a {
    headers
        .iter()
        .enumerate()
        .filter(move |(pos, _)| !taken.contains(pos))
}

fn exact_column(headers: &[String], aliases: &[&str], taken: &[usize]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        free_headers(headers, taken)
            .find(|(_, h)| h.as_str() == *alias)
            .map(|(pos, _)| pos)
    })
}

/// Closest free header above the fuzzy threshold.
fn fuzzy_column(headers: &[String], aliases: &[&str], taken: &[usize]) -> Option<usize> {
    let mut best: Option<(f64, usize)> = None;
    for (pos, header) in free_headers(headers, taken) {
        for alias in aliases {
            let score = jaro_winkler(header, alias);
            if score > FUZZY_HEADER_THRESHOLD && best.map_or(true, |(b, _)| score > b) {
                best = Some((score, pos));
            }
        }
    }
    best.map(|(_, pos)| pos)
}

fn compose_text(title: Option<&str>, body: Option<&str>) -> Option<String> {
    match (title, body) {
        (Some(title), Some(body)) => {
            let sep = if title.ends_with(&['.', '!', '?'][..]) { " " } else { ". " };
            Some(format!("{title}{sep}{body}"))
        }
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Parse ratings such as `5`, `4.0`, `3,5` or `4.0 out of 5 stars`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    static LEADING_NUMBER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)").expect("valid regex"));
    let caps = LEADING_NUMBER.captures(raw)?;
    let value: f64 = caps[1].replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse the date formats seen in marketplace review exports.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    static LONG_FORM: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"([A-Z][a-z]+ \d{1,2}, \d{4})").expect("valid regex")
    });

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    let head = raw.get(..10).unwrap_or(raw);
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(head, fmt) {
            return Some(date);
        }
    }
    // "Reviewed in the United States on March 5, 2023"
    let caps = LONG_FORM.captures(raw)?;
    NaiveDate::parse_from_str(&caps[1], "%B %d, %Y").ok()
}
