//! Report assembly.
//!
//! Builds the one [`ReportDocument`] that every export format renders.
//! Sections always appear in the same order and every data-driven block
//! has a fallback sentence, so assembly cannot fail.

use super::document::{
    Block, Bullet, Fact, FactValue, RankedEntry, ReportDocument, Section, SectionKind,
};
use crate::analysis::{dataset_summary, efficiency, filter_by_country, top_n};
use crate::config::ReportConfig;
use crate::models::{CountryTotal, DatasetSummary, MedalTable};
use chrono::NaiveDate;
use tracing::debug;

pub const REPORT_TITLE: &str = "Olympic Games Data Analysis Report";

/// Inputs that shape the report beyond the table itself.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Country covered by the deep-dive section.
    pub focus_country: String,
    /// Length of the ranking.
    pub top_n: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            focus_country: "India".to_string(),
            top_n: 10,
        }
    }
}

impl From<&ReportConfig> for ReportSettings {
    fn from(config: &ReportConfig) -> Self {
        Self {
            focus_country: config.focus_country.clone(),
            top_n: config.top_n,
        }
    }
}

/// Assemble the full report from the current table.
pub fn assemble(
    table: &MedalTable,
    settings: &ReportSettings,
    generated_on: NaiveDate,
) -> ReportDocument {
    let summary = dataset_summary(table);
    let ranking = top_n(table, settings.top_n);

    debug!(
        "Assembling report: {} records, top {}, focus on {}",
        summary.records, settings.top_n, settings.focus_country
    );

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        generated_on,
        sections: vec![
            executive_summary(&summary),
            top_countries(&ranking),
            country_focus(table, &settings.focus_country),
            insights(&settings.focus_country),
            footer(),
        ],
    }
}

fn executive_summary(summary: &DatasetSummary) -> Section {
    let mut blocks = vec![
        Block::Paragraph(
            "This report looks at Olympic Games medal data: how different countries perform \
             and which patterns appear over the years."
                .to_string(),
        ),
        Block::Subheading("Key Numbers".to_string()),
        Block::Facts(vec![
            Fact::new(
                "Total Countries",
                FactValue::count(summary.countries as u64),
                "countries have won or competed for medals",
            ),
            Fact::new(
                "Total Medals",
                FactValue::count(summary.total_medals),
                "medals awarded across all editions",
            ),
            Fact::new(
                "Time Period",
                FactValue::year_span(summary.first_year, summary.last_year, "no editions recorded"),
                "",
            ),
            Fact::new(
                "Olympic Games",
                FactValue::count(summary.editions as u64),
                "different editions",
            ),
        ]),
    ];

    if summary.quality_warnings > 0 {
        blocks.push(Block::Paragraph(format!(
            "Note: {} rows list a total that differs from gold + silver + bronze. \
             They are counted exactly as recorded.",
            summary.quality_warnings
        )));
    }

    Section {
        kind: SectionKind::ExecutiveSummary,
        heading: "Executive Summary".to_string(),
        blocks,
    }
}

fn top_countries(ranking: &[CountryTotal]) -> Section {
    let mut blocks = Vec::new();

    if ranking.is_empty() {
        blocks.push(Block::Paragraph(
            "No medal data is available to rank countries.".to_string(),
        ));
    } else {
        blocks.push(Block::Paragraph(
            "These are the countries that won the most medals:".to_string(),
        ));
        blocks.push(Block::Ranking(
            ranking
                .iter()
                .enumerate()
                .map(|(i, t)| RankedEntry::new(i + 1, &t.country, t.total))
                .collect(),
        ));
    }

    blocks.push(Block::Subheading("What This Tells Us".to_string()));
    blocks.push(Block::Bullets(vec![
        Bullet::plain("A handful of nations collect a large share of all medals"),
        Bullet::plain("Large countries with long sporting traditions dominate the ranking"),
        Bullet::plain("These countries invest heavily in athlete training and coaching"),
        Bullet::plain("Good facilities and support systems turn talent into podium finishes"),
    ]));

    Section {
        kind: SectionKind::TopCountries,
        heading: "Top Performing Countries".to_string(),
        blocks,
    }
}

fn country_focus(table: &MedalTable, country: &str) -> Section {
    let heading = format!("{}'s Olympic Performance", country);
    let records = filter_by_country(table, country);

    if records.is_empty() {
        return Section {
            kind: SectionKind::CountryFocus,
            heading,
            blocks: vec![Block::Paragraph(format!(
                "No data available for {} in this dataset.",
                country
            ))],
        };
    }

    let stats = efficiency(&records, &[country.to_string()]);
    let mut blocks = vec![Block::Subheading(format!("{}'s Numbers", country))];

    // The requested country has records, so efficiency returns its entry.
    if let Some(stats) = stats.first() {
        blocks.push(Block::Facts(vec![
            Fact::new("Total Medals", FactValue::count(stats.total), "medals"),
            Fact::new("Gold Medals", FactValue::count(stats.gold), "gold medals"),
            Fact::new(
                "Games Played",
                FactValue::count(stats.games as u64),
                "Olympic games",
            ),
            Fact::new(
                "Average per Game",
                FactValue::decimal(
                    stats.medals_per_game,
                    1,
                    "not available (no games recorded)",
                ),
                "medals per Olympics",
            ),
            Fact::new(
                "Gold Share",
                FactValue::decimal(
                    stats.gold_ratio_percent,
                    1,
                    "not available (no medals won yet)",
                ),
                "percent of all medals",
            ),
        ]));
    }

    blocks.push(Block::Subheading(format!("{}'s Story", country)));
    blocks.push(Block::Bullets(vec![
        Bullet::plain(&format!(
            "{} has taken part in the Olympics over many editions",
            country
        )),
        Bullet::plain("Results have been improving slowly over time"),
        Bullet::plain("More investment in sport is needed to close the gap with the leaders"),
        Bullet::plain("Recent games show a better medal count than earlier ones"),
    ]));

    Section {
        kind: SectionKind::CountryFocus,
        heading,
        blocks,
    }
}

fn insights(focus_country: &str) -> Section {
    let blocks = vec![
        Block::Subheading("Medal Distribution Over Time".to_string()),
        Block::Bullets(vec![
            Bullet::plain("The number of medals awarded has grown over the years"),
            Bullet::plain("New sports and events keep being added to the programme"),
            Bullet::plain("More countries take part now than in earlier games"),
        ]),
        Block::Subheading("Country Performance Patterns".to_string()),
        Block::Bullets(vec![
            Bullet::led(
                "Consistent Winners",
                "the United States, Germany and Great Britain perform well in most editions",
            ),
            Bullet::led("Rising Powers", "China has improved sharply in recent games"),
            Bullet::led(
                "Political Impact",
                "the break-up of the Soviet Union reshaped the medal table",
            ),
        ]),
        Block::Subheading("Medal Types".to_string()),
        Block::Paragraph(
            "Gold, silver and bronze medals are spread almost evenly, and no single country \
             dominates every medal type."
                .to_string(),
        ),
        Block::Subheading("Common Mistakes in Data Visualization".to_string()),
        Block::Bullets(vec![
            Bullet::led(
                "Pie charts with many countries",
                "small slices are hard to compare; a bar chart shows the ranking clearly",
            ),
            Bullet::led(
                "Truncated Y-axis",
                "starting the axis above zero makes small differences look large",
            ),
        ]),
        Block::Subheading("Key Learnings".to_string()),
        Block::Bullets(vec![
            Bullet::led(
                "Investment Matters",
                "countries that spend more on sport win more medals",
            ),
            Bullet::led(
                "Long-term Planning",
                "success comes from years of preparation",
            ),
            Bullet::led(
                "Honest Charts",
                "choose the right chart and never stretch scales to mislead",
            ),
        ]),
        Block::Subheading("Future Outlook".to_string()),
        Block::Bullets(vec![
            Bullet::led("Asian Countries", "are likely to win more medals in future games"),
            Bullet::led(
                focus_country,
                "has room to improve with sustained investment in sport",
            ),
            Bullet::led(
                "Medal Distribution",
                "will keep spreading across more countries",
            ),
        ]),
        Block::Subheading("Conclusion".to_string()),
        Block::Paragraph(
            "The Olympics are about more than medals: they bring countries together and show \
             what people can achieve. Looking at the data carefully helps explain these \
             patterns and where each country can go next."
                .to_string(),
        ),
    ];

    Section {
        kind: SectionKind::Insights,
        heading: "Important Trends We Found".to_string(),
        blocks,
    }
}

fn footer() -> Section {
    Section {
        kind: SectionKind::Footer,
        heading: "Report Details".to_string(),
        blocks: vec![
            Block::Paragraph("Report generated by medalboard".to_string()),
            Block::Paragraph("Data source: Olympic Games medal tally".to_string()),
            Block::Paragraph(
                "This report uses plain language so that everyone can follow the analysis."
                    .to_string(),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedalRecord;
    use crate::report::document::RankMarker;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 11).unwrap()
    }

    fn sample_table() -> MedalTable {
        MedalTable::new(vec![
            MedalRecord::new("United States", 2004, 36, 39, 26, 101),
            MedalRecord::new("China", 2004, 32, 17, 14, 63),
            MedalRecord::new("India", 2004, 0, 1, 2, 3),
            MedalRecord::new("United States", 2008, 36, 39, 37, 112),
            MedalRecord::new("China", 2008, 48, 22, 30, 100),
            MedalRecord::new("India", 2008, 1, 0, 1, 2),
        ])
    }

    fn section(doc: &ReportDocument, kind: SectionKind) -> &Section {
        doc.sections.iter().find(|s| s.kind == kind).unwrap()
    }

    fn facts(section: &Section) -> Vec<(String, String)> {
        section
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Facts(facts) => Some(facts),
                _ => None,
            })
            .flatten()
            .map(|f| (f.label.clone(), f.value_text()))
            .collect()
    }

    #[test]
    fn test_fixed_section_order() {
        let doc = assemble(&sample_table(), &ReportSettings::default(), date());
        let kinds: Vec<SectionKind> = doc.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::ExecutiveSummary,
                SectionKind::TopCountries,
                SectionKind::CountryFocus,
                SectionKind::Insights,
                SectionKind::Footer,
            ]
        );
    }

    #[test]
    fn test_executive_summary_facts() {
        let doc = assemble(&sample_table(), &ReportSettings::default(), date());
        let facts = facts(section(&doc, SectionKind::ExecutiveSummary));

        assert_eq!(facts[0].1, "3 countries have won or competed for medals");
        assert_eq!(facts[1].1, "381 medals awarded across all editions");
        assert_eq!(facts[2].1, "2004 to 2008");
        assert_eq!(facts[3].1, "2 different editions");
    }

    #[test]
    fn test_ranking_markers() {
        let table: MedalTable = (0..12)
            .map(|i| MedalRecord::new(&format!("Country {i}"), 2008, 0, 0, 20 - i, 20 - i))
            .collect();
        let doc = assemble(&table, &ReportSettings::default(), date());

        let ranking = section(&doc, SectionKind::TopCountries)
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Ranking(entries) => Some(entries),
                _ => None,
            })
            .unwrap();

        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking[0].marker, RankMarker::Gold);
        assert_eq!(ranking[1].marker, RankMarker::Silver);
        assert_eq!(ranking[2].marker, RankMarker::Bronze);
        assert!(ranking[3..].iter().all(|e| e.marker == RankMarker::Standard));
        assert_eq!(ranking[9].rank, 10);
    }

    #[test]
    fn test_country_focus_numbers() {
        let doc = assemble(&sample_table(), &ReportSettings::default(), date());
        let focus = section(&doc, SectionKind::CountryFocus);
        assert_eq!(focus.heading, "India's Olympic Performance");

        let facts = facts(focus);
        assert_eq!(facts[0].1, "5 medals");
        assert_eq!(facts[1].1, "1 gold medals");
        assert_eq!(facts[2].1, "2 Olympic games");
        assert_eq!(facts[3].1, "2.5 medals per Olympics");
        assert_eq!(facts[4].1, "20.0 percent of all medals");
    }

    #[test]
    fn test_country_focus_without_records() {
        let settings = ReportSettings {
            focus_country: "Atlantis".to_string(),
            ..ReportSettings::default()
        };
        let doc = assemble(&sample_table(), &settings, date());
        let focus = section(&doc, SectionKind::CountryFocus);

        assert_eq!(
            focus.blocks,
            vec![Block::Paragraph(
                "No data available for Atlantis in this dataset.".to_string()
            )]
        );
    }

    #[test]
    fn test_country_focus_with_zero_medals() {
        let table = MedalTable::new(vec![MedalRecord::new("India", 1992, 0, 0, 0, 0)]);
        let doc = assemble(&table, &ReportSettings::default(), date());
        let facts = facts(section(&doc, SectionKind::CountryFocus));

        assert_eq!(facts[3].1, "0.0 medals per Olympics");
        assert_eq!(facts[4].1, "not available (no medals won yet)");
    }

    #[test]
    fn test_empty_table_uses_fallbacks() {
        let doc = assemble(&MedalTable::default(), &ReportSettings::default(), date());

        assert_eq!(doc.sections.len(), 5);
        let summary = facts(section(&doc, SectionKind::ExecutiveSummary));
        assert_eq!(summary[2].1, "no editions recorded");

        let top = section(&doc, SectionKind::TopCountries);
        assert_eq!(
            top.blocks[0],
            Block::Paragraph("No medal data is available to rank countries.".to_string())
        );
    }

    #[test]
    fn test_quality_note_only_when_needed() {
        let clean = assemble(&sample_table(), &ReportSettings::default(), date());
        assert_eq!(section(&clean, SectionKind::ExecutiveSummary).blocks.len(), 3);

        let table = MedalTable::new(vec![MedalRecord::new("India", 2004, 0, 1, 2, 4)]);
        let noted = assemble(&table, &ReportSettings::default(), date());
        assert_eq!(section(&noted, SectionKind::ExecutiveSummary).blocks.len(), 4);
    }
}
