//! Terminal rendering of analyses and news pages

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use tradely::RevealedUnit;
use tradely::api::PricePoint;
use tradely::carousel::Article;

const HIGHLIGHT_MARKER: &str = "★ ";
const PLAIN_MARKER: &str = "  ";

/// One revealed unit, marked when it carries a recommendation
pub fn format_unit(unit: &RevealedUnit) -> String {
    let marker = if unit.highlighted { HIGHLIGHT_MARKER } else { PLAIN_MARKER };
    format!("{marker}{}", unit.text)
}

/// Page dots, filled for the current page
pub fn page_dots(indicators: &[bool]) -> String {
    indicators
        .iter()
        .map(|&current| if current { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Table of the articles on one page; `first` is the 1-based number of the first row
pub fn articles_table(articles: &[Article], first: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Title", "Published", "Sentiment", "Link"]);

    for (offset, article) in articles.iter().enumerate() {
        let published = article
            .published_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let sentiment = match (&article.sentiment_label, article.sentiment_score) {
            (Some(label), Some(score)) => format!("{label} ({score:.2})"),
            (Some(label), None) => label.clone(),
            (None, Some(score)) => format!("{score:.2}"),
            (None, None) => String::new(),
        };
        table.add_row(vec![
            (first + offset).to_string(),
            format!("{}\n{}", article.title, article.summary),
            published,
            sentiment,
            article.url.clone(),
        ]);
    }
    table
}

/// Closing prices, most recent last
pub fn prices_table(points: &[PricePoint]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Close"]);
    for point in points {
        table.add_row(vec![point.time.clone(), format!("{:.2}", point.value)]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_unit_marks_recommendations() {
        assert_eq!(format_unit(&RevealedUnit::new("Hold steady.")), "  Hold steady.");
        assert_eq!(
            format_unit(&RevealedUnit::new("Recommendation: Buy")),
            "★ Recommendation: Buy"
        );
    }

    #[test]
    fn test_page_dots() {
        assert_eq!(page_dots(&[false, true, false]), "○ ● ○");
        assert_eq!(page_dots(&[]), "");
    }

    #[test]
    fn test_articles_table_numbers_rows() {
        let mut article = Article::new("Fed holds rates", "Markets steady", "https://n/1");
        article.published_at = Utc.with_ymd_and_hms(2025, 4, 8, 15, 54, 48).single();
        article.sentiment_label = Some("Bullish".to_string());
        article.sentiment_score = Some(0.392_333);

        let rendered = articles_table(&[article], 4).to_string();
        assert!(rendered.contains("Fed holds rates"));
        assert!(rendered.contains("2025-04-08 15:54"));
        assert!(rendered.contains("Bullish (0.39)"));
        assert!(rendered.contains(" 4 "));
    }

    #[test]
    fn test_prices_table() {
        let rendered = prices_table(&[PricePoint { time: "2024-05-01".to_string(), value: 394.9 }])
            .to_string();
        assert!(rendered.contains("394.90"));
    }
}
