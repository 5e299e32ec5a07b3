//! In-memory report document.
//!
//! A [`ReportDocument`] is the single source for every export format. It
//! holds plain text and typed figures; renderers decide emphasis and
//! markers but never compute or reformat numbers themselves.

use crate::models::Ratio;
use chrono::NaiveDate;
use serde::Serialize;

/// A fully assembled narrative report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// Human-readable generation date, e.g. "October 19, 2026".
    pub fn date_label(&self) -> String {
        self.generated_on.format("%B %d, %Y").to_string()
    }
}

/// Which part of the report a section is. The assembler always emits them
/// in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ExecutiveSummary,
    TopCountries,
    CountryFocus,
    Insights,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Paragraph(String),
    Subheading(String),
    Facts(Vec<Fact>),
    Ranking(Vec<RankedEntry>),
    Bullets(Vec<Bullet>),
}

/// A labelled figure such as "Total Medals: 1,234 medals".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub label: String,
    pub value: FactValue,
    /// Text following the value. Dropped when the value is undefined.
    pub unit: String,
}

impl Fact {
    pub fn new(label: &str, value: FactValue, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            value,
            unit: unit.to_string(),
        }
    }

    /// The value with its unit, or the fallback phrase alone.
    pub fn value_text(&self) -> String {
        match self.value.render() {
            Some(value) if self.unit.is_empty() => value,
            Some(value) => format!("{} {}", value, self.unit),
            None => self.value.fallback().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactValue {
    Count {
        value: u64,
    },
    Decimal {
        value: Ratio,
        places: usize,
        fallback: String,
    },
    YearSpan {
        from: Option<u32>,
        to: Option<u32>,
        fallback: String,
    },
}

impl FactValue {
    pub fn count(value: u64) -> Self {
        FactValue::Count { value }
    }

    pub fn decimal(value: Ratio, places: usize, fallback: &str) -> Self {
        FactValue::Decimal {
            value,
            places,
            fallback: fallback.to_string(),
        }
    }

    pub fn year_span(from: Option<u32>, to: Option<u32>, fallback: &str) -> Self {
        FactValue::YearSpan {
            from,
            to,
            fallback: fallback.to_string(),
        }
    }

    /// Formatted value, or `None` when it is undefined.
    pub fn render(&self) -> Option<String> {
        match self {
            FactValue::Count { value } => Some(format_count(*value)),
            FactValue::Decimal { value, places, .. } => {
                value.filter(|v| v.is_finite()).map(|v| format!("{:.*}", places, v))
            }
            FactValue::YearSpan { from, to, .. } => match (from, to) {
                (Some(from), Some(to)) => Some(format!("{} to {}", from, to)),
                _ => None,
            },
        }
    }

    pub fn fallback(&self) -> &str {
        match self {
            FactValue::Count { .. } => "",
            FactValue::Decimal { fallback, .. } | FactValue::YearSpan { fallback, .. } => fallback,
        }
    }
}

/// Ordinal decoration for a ranked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMarker {
    Gold,
    Silver,
    Bronze,
    Standard,
}

impl RankMarker {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => RankMarker::Gold,
            2 => RankMarker::Silver,
            3 => RankMarker::Bronze,
            _ => RankMarker::Standard,
        }
    }

    /// Emoji used in the Markdown form.
    pub fn emoji(&self) -> &'static str {
        match self {
            RankMarker::Gold => "🥇",
            RankMarker::Silver => "🥈",
            RankMarker::Bronze => "🥉",
            RankMarker::Standard => "🏅",
        }
    }

    /// Plain-text tag used in the PDF form (built-in fonts have no emoji).
    pub fn tag(&self) -> &'static str {
        match self {
            RankMarker::Gold => "[G]",
            RankMarker::Silver => "[S]",
            RankMarker::Bronze => "[B]",
            RankMarker::Standard => "[*]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub country: String,
    pub medals: u64,
    pub marker: RankMarker,
}

impl RankedEntry {
    pub fn new(rank: usize, country: &str, medals: u64) -> Self {
        Self {
            rank,
            country: country.to_string(),
            medals,
            marker: RankMarker::for_rank(rank),
        }
    }

    pub fn medals_text(&self) -> String {
        format!("{} medals", format_count(self.medals))
    }
}

/// A list item with an optional emphasized lead-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bullet {
    pub lead: Option<String>,
    pub text: String,
}

impl Bullet {
    pub fn plain(text: &str) -> Self {
        Self {
            lead: None,
            text: text.to_string(),
        }
    }

    pub fn led(lead: &str, text: &str) -> Self {
        Self {
            lead: Some(lead.to_string()),
            text: text.to_string(),
        }
    }
}

/// Format an integer with comma thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
