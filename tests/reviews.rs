use chrono::NaiveDate;
use review_insights::{
    data::reviews::{load_reviews, parse_date, parse_rating, LoadOptions},
    error::InputError,
};

fn load(csv: &str, brand: Option<&str>) -> Result<review_insights::data::reviews::LoadedReviews, InputError> {
    let options = LoadOptions {
        brand: brand.map(str::to_string),
    };
    load_reviews(csv.as_bytes(), &options)
}

#[test]
fn header_aliases_are_resolved() {
    let csv = "Review Text,Stars,Brand,Review Date\n\
               Lovely creamy texture,5,Alpina,2024-01-15\n\
               Too sweet for me,2.0 out of 5 stars,Alqueria,15/02/2024\n";
    let loaded = load(csv, None).unwrap();
    assert_eq!(loaded.reviews.len(), 2);
    assert_eq!(loaded.skipped, 0);

    let first = &loaded.reviews[0];
    assert_eq!(first.row, 1);
    assert_eq!(first.text, "Lovely creamy texture");
    assert_eq!(first.rating, 5.0);
    assert_eq!(first.brand.as_deref(), Some("Alpina"));
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15));

    let second = &loaded.reviews[1];
    assert_eq!(second.rating, 2.0);
    assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 2, 15));
}

#[test]
fn review_date_is_never_mistaken_for_a_title() {
    let csv = "review_text,rating,review_date\nGreat taste,5,2024-01-15\n";
    let loaded = load(csv, None).unwrap();
    let review = &loaded.reviews[0];
    assert_eq!(review.text, "Great taste");
    assert_eq!(review.date, NaiveDate::from_ymd_opt(2024, 1, 15));
}

#[test]
fn near_miss_headers_resolve_fuzzily() {
    let csv = "FullText,Ratings,Brand Name\nSmooth and fresh,4,Alpina\n";
    let loaded = load(csv, None).unwrap();
    let review = &loaded.reviews[0];
    assert_eq!(review.text, "Smooth and fresh");
    assert_eq!(review.rating, 4.0);
    assert_eq!(review.brand.as_deref(), Some("Alpina"));
}

#[test]
fn title_and_body_are_joined() {
    let csv = "title,review,rating\n\
               Great taste,Loved it,5\n\
               Wow!,Will buy again,4\n\
               ,Only a body,3\n";
    let loaded = load(csv, None).unwrap();
    let texts: Vec<&str> = loaded.reviews.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Great taste. Loved it", "Wow! Will buy again", "Only a body"]);
}

#[test]
fn full_text_column_wins_over_title() {
    let csv = "title,full_text,rating\nIgnored title,The complete review,4\n";
    let loaded = load(csv, None).unwrap();
    assert_eq!(loaded.reviews[0].text, "The complete review");
}

#[test]
fn rows_without_text_or_rating_are_skipped() {
    let csv = "full_text,rating\n\
               Fine yogurt,4\n\
               ,5\n\
               No rating here,n/a\n\
               Missing rating field,\n\
               Bitter aftertaste,1\n";
    let loaded = load(csv, None).unwrap();
    assert_eq!(loaded.reviews.len(), 2);
    assert_eq!(loaded.skipped, 3);
    assert_eq!(loaded.reviews[1].row, 5);
}

#[test]
fn brand_filter_is_case_insensitive() {
    let csv = "full_text,rating,brand\n\
               One,5,Alpina\n\
               Two,4,alpina\n\
               Three,3,Colanta\n\
               Four,2,\n";
    let loaded = load(csv, Some("ALPINA")).unwrap();
    assert_eq!(loaded.reviews.len(), 2);
    assert_eq!(loaded.filtered_out, 2);

    let everything = load(csv, Some("all")).unwrap();
    assert_eq!(everything.reviews.len(), 4);
    assert_eq!(everything.filtered_out, 0);
}

#[test]
fn brand_filter_needs_a_brand_column() {
    let csv = "full_text,rating\nNice,5\n";
    match load(csv, Some("Alpina")) {
        Err(InputError::MissingColumn { column, available }) => {
            assert_eq!(column, "brand");
            assert_eq!(available, vec!["full_text".to_string(), "rating".to_string()]);
        }
        other => panic!("expected missing brand column, got {other:?}"),
    }
}

#[test]
fn missing_required_columns_are_reported() {
    let err = load("full_text,comment\nNice,ok\n", None).unwrap_err();
    assert!(matches!(err, InputError::MissingColumn { column: "rating", .. }));

    let err = load("rating,brand\n5,Alpina\n", None).unwrap_err();
    assert!(matches!(err, InputError::MissingColumn { column: "full_text", .. }));
    assert!(err.is_client_error());
}

#[test]
fn empty_input_is_missing_input() {
    let err = load("", None).unwrap_err();
    assert!(matches!(err, InputError::MissingInput));
    assert!(err.to_string().contains("no CSV file provided"));
}

#[test]
fn all_rows_invalid_is_an_error() {
    let err = load("full_text,rating\n,5\nText,bad\n", None).unwrap_err();
    match err {
        InputError::NoUsableRows { skipped } => assert_eq!(skipped, 2),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn ratings_parse_from_common_shapes() {
    assert_eq!(parse_rating("5"), Some(5.0));
    assert_eq!(parse_rating(" 4.0 out of 5 stars"), Some(4.0));
    assert_eq!(parse_rating("3,5"), Some(3.5));
    assert_eq!(parse_rating("n/a"), None);
    assert_eq!(parse_rating(""), None);
}

#[test]
fn dates_parse_from_marketplace_formats() {
    let expected = NaiveDate::from_ymd_opt(2023, 3, 5);
    assert_eq!(parse_date("2023-03-05"), expected);
    assert_eq!(parse_date("2023-03-05T10:30:00Z"), expected);
    assert_eq!(parse_date("05.03.2023"), expected);
    assert_eq!(parse_date("05/03/2023"), expected);
    // Day-first fails, so the US order is tried.
    assert_eq!(parse_date("12/31/2023"), NaiveDate::from_ymd_opt(2023, 12, 31));
    assert_eq!(
        parse_date("Reviewed in the United States on March 5, 2023"),
        expected
    );
    assert_eq!(parse_date("yesterday"), None);
}
