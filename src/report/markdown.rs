//! Markdown report rendering.
//!
//! Renders a [`ReportDocument`] as Markdown with bold labels, flag emoji
//! and medal markers.

use super::document::{Block, Bullet, Fact, RankedEntry, ReportDocument, Section, SectionKind};

/// Generate the complete Markdown report.
pub fn render_markdown(document: &ReportDocument) -> String {
    let mut output = String::new();

    output.push_str(&format!("# 🏅 {}\n\n", document.title));
    output.push_str(&format!("**Date:** {}\n\n", document.date_label()));

    for section in &document.sections {
        output.push_str("---\n\n");
        output.push_str(&render_section(section));
    }

    output
}

fn section_emoji(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::ExecutiveSummary => "📊",
        SectionKind::TopCountries => "🏆",
        SectionKind::CountryFocus => "🔍",
        SectionKind::Insights => "📈",
        SectionKind::Footer => "📝",
    }
}

fn render_section(section: &Section) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## {} {}\n\n",
        section_emoji(section.kind),
        section.heading
    ));

    for block in &section.blocks {
        out.push_str(&render_block(block, section.kind));
    }

    out
}

fn render_block(block: &Block, kind: SectionKind) -> String {
    match block {
        Block::Paragraph(text) if kind == SectionKind::Footer => format!("*{}*\n\n", text),
        Block::Paragraph(text) => format!("{}\n\n", text),
        Block::Subheading(text) => format!("### {}\n\n", text),
        Block::Facts(facts) => render_list(facts.iter().map(render_fact)),
        Block::Ranking(entries) => render_list(entries.iter().map(render_ranked_entry)),
        Block::Bullets(bullets) => render_list(bullets.iter().map(render_bullet)),
    }
}

fn render_list(items: impl Iterator<Item = String>) -> String {
    let mut out: String = items.map(|item| format!("{}\n", item)).collect();
    out.push('\n');
    out
}

fn render_fact(fact: &Fact) -> String {
    format!("- **{}:** {}", fact.label, fact.value_text())
}

fn render_ranked_entry(entry: &RankedEntry) -> String {
    format!(
        "{}. {} {} **{}** - {}",
        entry.rank,
        entry.marker.emoji(),
        flag_for(&entry.country),
        entry.country,
        entry.medals_text()
    )
}

fn render_bullet(bullet: &Bullet) -> String {
    match &bullet.lead {
        Some(lead) => format!("- **{}:** {}", lead, bullet.text),
        None => format!("- {}", bullet.text),
    }
}

/// Flag emoji for well-known countries, white flag otherwise.
pub fn flag_for(country: &str) -> &'static str {
    match country {
        "United States" => "🇺🇸",
        "China" => "🇨🇳",
        "Germany" => "🇩🇪",
        "India" => "🇮🇳",
        "Japan" => "🇯🇵",
        "Great Britain" => "🇬🇧",
        "France" => "🇫🇷",
        "Italy" => "🇮🇹",
        "Australia" => "🇦🇺",
        "South Korea" => "🇰🇷",
        "Russia" => "🇷🇺",
        "Canada" => "🇨🇦",
        _ => "🏳️",
    }
}
