//! Text rendering of aggregate views for the terminal.
//!
//! Each function returns the finished table so `main` only decides where
//! it goes. Ratios are rounded to two decimals here and nowhere earlier.

use crate::models::{
    ColumnStats, CountryEfficiency, CountryTotal, DatasetSummary, Improvement, ParticipationSpan, Ratio,
    YearCountryTotal, YearMedals,
};
use crate::report::document::format_count;
use anyhow::Result;
use serde::Serialize;

const EMPTY_VIEW: &str = "   No data for this selection.\n";

/// Serialize any view as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(view: &T) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}

/// Format a ratio with two decimals, or `n/a` when undefined.
pub fn format_ratio(value: Ratio) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "n/a".to_string(),
    }
}

fn country_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(7)
}

pub fn summary_text(summary: &DatasetSummary) -> String {
    let period = match (summary.first_year, summary.last_year) {
        (Some(first), Some(last)) => format!("{}-{}", first, last),
        _ => "none".to_string(),
    };

    let mut out = String::new();
    out.push_str("📊 Medal Tally Overview\n");
    out.push_str(&format!("   Total countries: {}\n", summary.countries));
    out.push_str(&format!("   Years covered:   {}\n", period));
    out.push_str(&format!(
        "   Total medals:    {}\n",
        format_count(summary.total_medals)
    ));
    out.push_str(&format!("   Olympic games:   {}\n", summary.editions));
    out.push_str(&format!("   Records:         {}\n", summary.records));
    if summary.quality_warnings > 0 {
        out.push_str(&format!(
            "   ⚠️  {} rows where gold + silver + bronze != total\n",
            summary.quality_warnings
        ));
    }
    out
}

/// Headline numbers plus the per-column distribution, as one JSON object.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    #[serde(flatten)]
    pub summary: DatasetSummary,
    pub distribution: Vec<ColumnStats>,
}

fn format_bound(value: Option<u64>) -> String {
    value.map(format_count).unwrap_or_else(|| "n/a".to_string())
}

pub fn distribution_table(stats: &[ColumnStats]) -> String {
    let mut out = String::from("📊 Medal Distribution Statistics\n");
    if stats.iter().all(|s| s.count == 0) {
        out.push_str(EMPTY_VIEW);
        return out;
    }

    out.push_str(&format!(
        "   {:<7} {:>6} {:>9} {:>9} {:>7} {:>9} {:>9} {:>9} {:>7}\n",
        "Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"
    ));
    for s in stats {
        out.push_str(&format!(
            "   {:<7} {:>6} {:>9} {:>9} {:>7} {:>9} {:>9} {:>9} {:>7}\n",
            s.column,
            s.count,
            format_ratio(s.mean),
            format_ratio(s.std),
            format_bound(s.min),
            format_ratio(s.q1),
            format_ratio(s.median),
            format_ratio(s.q3),
            format_bound(s.max)
        ));
    }
    out
}

pub fn country_totals_table(rows: &[CountryTotal]) -> String {
    let mut out = String::from("🏆 Countries by Total Medals\n");
    if rows.is_empty() {
        out.push_str(EMPTY_VIEW);
        return out;
    }

    let width = country_width(rows.iter().map(|r| r.country.as_str()));
    out.push_str(&format!(
        "   {:>4}  {:<width$}  {:>6} {:>6} {:>6} {:>7} {:>5}\n",
        "Rank", "Country", "Gold", "Silver", "Bronze", "Total", "Games"
    ));
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "   {:>4}  {:<width$}  {:>6} {:>6} {:>6} {:>7} {:>5}\n",
            i + 1,
            row.country,
            row.gold,
            row.silver,
            row.bronze,
            format_count(row.total),
            row.games
        ));
    }
    out
}

pub fn year_medals_table(title: &str, rows: &[YearMedals]) -> String {
    let mut out = format!("📈 {}\n", title);
    if rows.is_empty() {
        out.push_str(EMPTY_VIEW);
        return out;
    }

    out.push_str(&format!(
        "   {:<6} {:>6} {:>6} {:>6} {:>7}\n",
        "Year", "Gold", "Silver", "Bronze", "Total"
    ));
    for row in rows {
        out.push_str(&format!(
            "   {:<6} {:>6} {:>6} {:>6} {:>7}\n",
            row.year,
            row.gold,
            row.silver,
            row.bronze,
            format_count(row.total)
        ));
    }
    out
}

pub fn comparison_table(rows: &[YearCountryTotal]) -> String {
    let mut out = String::from("🌍 Medal Performance by Year\n");
    if rows.is_empty() {
        out.push_str(EMPTY_VIEW);
        return out;
    }

    let width = country_width(rows.iter().map(|r| r.country.as_str()));
    out.push_str(&format!("   {:<6} {:<width$}  {:>7}\n", "Year", "Country", "Total"));
    for row in rows {
        out.push_str(&format!(
            "   {:<6} {:<width$}  {:>7}\n",
            row.year,
            row.country,
            format_count(row.total)
        ));
    }
    out
}

pub fn efficiency_table(rows: &[CountryEfficiency]) -> String {
    let mut out = String::from("⚖️  Medal Efficiency\n");
    if rows.is_empty() {
        out.push_str(EMPTY_VIEW);
        return out;
    }

    let width = country_width(rows.iter().map(|r| r.country.as_str()));
    out.push_str(&format!(
        "   {:<width$}  {:>7} {:>5} {:>14} {:>8}\n",
        "Country", "Total", "Games", "Medals/Game", "Gold %"
    ));
    for row in rows {
        out.push_str(&format!(
            "   {:<width$}  {:>7} {:>5} {:>14} {:>8}\n",
            row.country,
            format_count(row.total),
            row.games,
            format_ratio(row.medals_per_game),
            format_ratio(row.gold_ratio_percent)
        ));
    }
    out
}

pub fn improvement_table(rows: &[Improvement], split_year: u32) -> String {
    let mut out = format!("🚀 Breakthrough Nations (before vs. since {})\n", split_year);
    if rows.is_empty() {
        out.push_str("   No country improved past the threshold.\n");
        return out;
    }

    let width = country_width(rows.iter().map(|r| r.country.as_str()));
    out.push_str(&format!(
        "   {:<width$}  {:>10} {:>10} {:>7}\n",
        "Country", "Before", "Since", "Growth"
    ));
    for row in rows {
        out.push_str(&format!(
            "   {:<width$}  {:>10} {:>10} {:>7}\n",
            row.country,
            format_ratio(Some(row.historical_avg)),
            format_ratio(Some(row.recent_avg)),
            format_ratio(row.growth())
        ));
    }
    out
}

pub fn span_table(rows: &[ParticipationSpan]) -> String {
    let mut out = String::from("🕰️  Olympic Participation\n");
    if rows.is_empty() {
        out.push_str(EMPTY_VIEW);
        return out;
    }

    let width = country_width(rows.iter().map(|r| r.country.as_str()));
    out.push_str(&format!(
        "   {:<width$}  {:>5} {:>5} {:>5} {:>5}\n",
        "Country", "First", "Last", "Span", "Games"
    ));
    for row in rows {
        out.push_str(&format!(
            "   {:<width$}  {:>5} {:>5} {:>5} {:>5}\n",
            row.country, row.first_year, row.last_year, row.span_years, row.games
        ));
    }
    out
}
