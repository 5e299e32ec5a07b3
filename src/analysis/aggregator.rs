//! Medal aggregation and statistics.
//!
//! Every function here is a pure fold over a [`MedalTable`]: the table is
//! only read, and the returned view is owned by the caller. Sums use exact
//! integer arithmetic, saturating at `u64::MAX` for tables that were not
//! range-checked by the loader. Ratios are left unrounded.

use crate::models::{
    ColumnStats, CountryEfficiency, CountryTotal, DatasetSummary, Improvement, MedalRecord, MedalTable,
    ParticipationSpan, Ratio, YearCountryTotal, YearMedals,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Divide, yielding `None` when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> Ratio {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Sum medals per country, in order of first appearance.
pub fn totals_by_country(table: &MedalTable) -> Vec<CountryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CountryTotal> = Vec::new();
    let mut editions: Vec<HashSet<u32>> = Vec::new();

    for record in table.iter() {
        let slot = *index.entry(record.country.as_str()).or_insert_with(|| {
            totals.push(CountryTotal {
                country: record.country.clone(),
                gold: 0,
                silver: 0,
                bronze: 0,
                total: 0,
                games: 0,
            });
            editions.push(HashSet::new());
            totals.len() - 1
        });

        let entry = &mut totals[slot];
        entry.gold = entry.gold.saturating_add(record.gold);
        entry.silver = entry.silver.saturating_add(record.silver);
        entry.bronze = entry.bronze.saturating_add(record.bronze);
        entry.total = entry.total.saturating_add(record.total);
        editions[slot].insert(record.year);
    }

    for (entry, years) in totals.iter_mut().zip(&editions) {
        entry.games = years.len();
    }

    totals
}

/// Countries ranked by total medals, highest first, truncated to `n`.
///
/// Ties keep the order in which the countries first appear in the table.
pub fn top_n(table: &MedalTable, n: usize) -> Vec<CountryTotal> {
    let mut ranked = totals_by_country(table);
    // Stable sort, so equal totals stay in first-seen order.
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(n);
    ranked
}

/// Medal sums per edition, ascending by year.
pub fn medals_by_year(table: &MedalTable) -> Vec<YearMedals> {
    let mut by_year: BTreeMap<u32, YearMedals> = BTreeMap::new();

    for record in table.iter() {
        let entry = by_year.entry(record.year).or_insert(YearMedals {
            year: record.year,
            gold: 0,
            silver: 0,
            bronze: 0,
            total: 0,
        });
        entry.gold = entry.gold.saturating_add(record.gold);
        entry.silver = entry.silver.saturating_add(record.silver);
        entry.bronze = entry.bronze.saturating_add(record.bronze);
        entry.total = entry.total.saturating_add(record.total);
    }

    by_year.into_values().collect()
}

/// Per-edition totals for the selected countries, ordered by year then
/// country. An empty selection yields an empty view.
pub fn medals_by_year_and_country(
    table: &MedalTable,
    countries: &BTreeSet<String>,
) -> Vec<YearCountryTotal> {
    if countries.is_empty() {
        return Vec::new();
    }

    let mut grouped: BTreeMap<(u32, &str), u64> = BTreeMap::new();
    for record in table.iter().filter(|r| countries.contains(&r.country)) {
        let total = grouped
            .entry((record.year, record.country.as_str()))
            .or_default();
        *total = total.saturating_add(record.total);
    }

    grouped
        .into_iter()
        .map(|((year, country), total)| YearCountryTotal {
            year,
            country: country.to_string(),
            total,
        })
        .collect()
}

fn efficiency_of(totals: &CountryTotal) -> CountryEfficiency {
    CountryEfficiency {
        country: totals.country.clone(),
        total: totals.total,
        gold: totals.gold,
        games: totals.games,
        medals_per_game: ratio(totals.total as f64, totals.games as f64),
        gold_ratio_percent: ratio(100.0 * totals.gold as f64, totals.total as f64),
    }
}

/// Medals-per-game and gold share for each requested country, in request
/// order. A ratio is `None` where its denominator is zero; a country with
/// no rows at all gets `None` for both.
pub fn efficiency(table: &MedalTable, countries: &[String]) -> Vec<CountryEfficiency> {
    if countries.is_empty() {
        return Vec::new();
    }

    let totals = totals_by_country(table);
    let by_name: HashMap<&str, &CountryTotal> =
        totals.iter().map(|t| (t.country.as_str(), t)).collect();

    countries
        .iter()
        .map(|country| match by_name.get(country.as_str()) {
            Some(totals) => efficiency_of(totals),
            None => CountryEfficiency {
                country: country.clone(),
                total: 0,
                gold: 0,
                games: 0,
                medals_per_game: None,
                gold_ratio_percent: None,
            },
        })
        .collect()
}

/// Efficiency for every country with at least `min_total` medals, in
/// first-seen order.
pub fn efficiency_all(table: &MedalTable, min_total: u64) -> Vec<CountryEfficiency> {
    totals_by_country(table)
        .iter()
        .filter(|t| t.total >= min_total)
        .map(efficiency_of)
        .collect()
}

/// Records whose year lies in `min_year..=max_year`.
pub fn filter_by_year_range(table: &MedalTable, min_year: u32, max_year: u32) -> MedalTable {
    table
        .iter()
        .filter(|r| (min_year..=max_year).contains(&r.year))
        .cloned()
        .collect()
}

/// Records for a single country, in table order.
pub fn filter_by_country(table: &MedalTable, country: &str) -> MedalTable {
    table
        .iter()
        .filter(|r| r.country == country)
        .cloned()
        .collect()
}

/// Per-country totals and the number of editions held, for one period.
fn period_totals<'a>(
    records: impl Iterator<Item = &'a MedalRecord>,
) -> (BTreeMap<&'a str, u64>, usize) {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    let mut editions: HashSet<u32> = HashSet::new();

    for record in records {
        let total = totals.entry(record.country.as_str()).or_default();
        *total = total.saturating_add(record.total);
        editions.insert(record.year);
    }

    (totals, editions.len())
}

/// Countries whose per-game average since `split_year` exceeds
/// `growth_factor` times their average before it.
///
/// A period's average is the country's medal sum over that period divided
/// by the number of editions held in the period. Countries missing from
/// either period are skipped. Results are ordered by country name.
pub fn improvement_candidates(
    table: &MedalTable,
    split_year: u32,
    growth_factor: f64,
) -> Vec<Improvement> {
    let (historical, historical_editions) =
        period_totals(table.iter().filter(|r| r.year < split_year));
    let (recent, recent_editions) = period_totals(table.iter().filter(|r| r.year >= split_year));

    recent
        .iter()
        .filter_map(|(country, recent_total)| {
            let historical_total = historical.get(country)?;
            // Both periods are non-empty here, so neither edition count is zero.
            let recent_avg = *recent_total as f64 / recent_editions as f64;
            let historical_avg = *historical_total as f64 / historical_editions as f64;

            (recent_avg > growth_factor * historical_avg).then(|| Improvement {
                country: country.to_string(),
                historical_avg,
                recent_avg,
            })
        })
        .collect()
}

/// First/last edition and games count for each requested country that
/// appears in the table, in request order.
pub fn participation_span(table: &MedalTable, countries: &[String]) -> Vec<ParticipationSpan> {
    countries
        .iter()
        .filter_map(|country| {
            let years: BTreeSet<u32> = table
                .iter()
                .filter(|r| &r.country == country)
                .map(|r| r.year)
                .collect();

            let first_year = *years.first()?;
            let last_year = *years.last()?;

            Some(ParticipationSpan {
                country: country.clone(),
                first_year,
                last_year,
                span_years: last_year - first_year,
                games: years.len(),
            })
        })
        .collect()
}

/// Headline counts for the whole table.
pub fn dataset_summary(table: &MedalTable) -> DatasetSummary {
    let countries: HashSet<&str> = table.iter().map(|r| r.country.as_str()).collect();
    let years: BTreeSet<u32> = table.iter().map(|r| r.year).collect();

    DatasetSummary {
        countries: countries.len(),
        total_medals: table.total_medals(),
        first_year: years.first().copied(),
        last_year: years.last().copied(),
        editions: years.len(),
        records: table.len(),
        quality_warnings: table.quality_warnings(),
    }
}

/// Quantile of sorted values with linear interpolation between ranks.
fn quantile(sorted: &[u64], q: f64) -> Ratio {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let (low, high) = (sorted[lo] as f64, sorted[hi] as f64);
    Some(low + (high - low) * (pos - lo as f64))
}

fn column_stats(column: &'static str, mut values: Vec<u64>) -> ColumnStats {
    values.sort_unstable();
    let count = values.len();
    let mean = ratio(values.iter().map(|&v| v as f64).sum(), count as f64);
    let std = match mean {
        Some(mean) if count > 1 => {
            let squares: f64 = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
            Some((squares / (count - 1) as f64).sqrt())
        }
        _ => None,
    };

    ColumnStats {
        column,
        count,
        mean,
        std,
        min: values.first().copied(),
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max: values.last().copied(),
    }
}

/// Per-row distribution of the gold, silver, bronze and total columns.
pub fn medal_distribution(table: &MedalTable) -> Vec<ColumnStats> {
    let columns: [(&'static str, fn(&MedalRecord) -> u64); 4] = [
        ("gold", |r| r.gold),
        ("silver", |r| r.silver),
        ("bronze", |r| r.bronze),
        ("total", |r| r.total),
    ];

    columns
        .into_iter()
        .map(|(name, value)| column_stats(name, table.iter().map(value).collect()))
        .collect()
}

/// Names of the top `n` countries, highest first.
pub fn top_country_names(table: &MedalTable, n: usize) -> Vec<String> {
    top_n(table, n).into_iter().map(|t| t.country).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, year: u32, gold: u64, silver: u64, bronze: u64) -> MedalRecord {
        MedalRecord::new(country, year, gold, silver, bronze, gold + silver + bronze)
    }

    fn sample_table() -> MedalTable {
        MedalTable::new(vec![
            record("United States", 1996, 44, 32, 25),
            record("Germany", 1996, 20, 18, 27),
            record("India", 1996, 0, 0, 1),
            record("China", 1996, 16, 22, 12),
            record("United States", 2004, 36, 39, 26),
            record("China", 2004, 32, 17, 14),
            record("India", 2004, 0, 1, 0),
            record("China", 2008, 48, 22, 30),
            record("United States", 2008, 36, 39, 37),
            record("India", 2008, 1, 0, 2),
            record("Great Britain", 2008, 19, 13, 15),
        ])
    }

    fn names(set: &[&str]) -> BTreeSet<String> {
        set.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_india_scenario() {
        let table = MedalTable::new(vec![
            MedalRecord::new("India", 2004, 0, 1, 2, 3),
            MedalRecord::new("India", 2008, 1, 0, 1, 2),
        ]);

        let totals = totals_by_country(&table);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].country, "India");
        assert_eq!(totals[0].total, 5);
        assert_eq!(totals[0].games, 2);

        let eff = efficiency(&table, &["India".to_string()]);
        assert_eq!(eff[0].gold_ratio_percent, Some(20.0));
        assert_eq!(eff[0].medals_per_game, Some(2.5));
    }

    #[test]
    fn test_totals_preserve_grand_total() {
        let table = sample_table();
        let sum: u64 = totals_by_country(&table).iter().map(|t| t.total).sum();
        assert_eq!(sum, table.total_medals());
    }

    #[test]
    fn test_totals_use_recorded_total_for_inconsistent_rows() {
        let table = MedalTable::new(vec![
            MedalRecord::new("Chile", 2004, 2, 0, 0, 7),
            MedalRecord::new("Chile", 2008, 1, 0, 0, 1),
        ]);
        let totals = totals_by_country(&table);
        assert_eq!(totals[0].total, 8);
        assert_eq!(totals[0].gold, 3);
    }

    #[test]
    fn test_sums_saturate_on_huge_totals() {
        let table = MedalTable::new(vec![
            MedalRecord::new("India", 2004, 0, 0, 0, u64::MAX),
            MedalRecord::new("India", 2004, 0, 0, 0, 1),
        ]);

        assert_eq!(totals_by_country(&table)[0].total, u64::MAX);
        assert_eq!(medals_by_year(&table)[0].total, u64::MAX);
        let view = medals_by_year_and_country(&table, &names(&["India"]));
        assert_eq!(view[0].total, u64::MAX);
    }

    #[test]
    fn test_totals_first_seen_order() {
        let order: Vec<String> = totals_by_country(&sample_table())
            .into_iter()
            .map(|t| t.country)
            .collect();
        assert_eq!(
            order,
            vec!["United States", "Germany", "India", "China", "Great Britain"]
        );
    }

    #[test]
    fn test_top_n_sorted_and_truncated() {
        let top = top_n(&sample_table(), 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].country, "United States");
        assert_eq!(top[0].total, 314);
        assert_eq!(top[1].country, "China");
        assert_eq!(top[2].country, "Germany");
        assert!(top.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn test_top_n_fewer_countries_than_requested() {
        let table = sample_table();
        assert_eq!(top_n(&table, 50).len(), 5);
        assert!(top_n(&table, 0).is_empty());
        assert!(top_n(&MedalTable::default(), 10).is_empty());
    }

    #[test]
    fn test_top_n_ties_keep_first_occurrence() {
        let table = MedalTable::new(vec![
            record("Kenya", 2004, 1, 1, 1),
            record("Jamaica", 2004, 2, 1, 0),
            record("Norway", 2004, 5, 0, 0),
            record("Cuba", 2004, 0, 0, 3),
        ]);

        let top: Vec<String> = top_n(&table, 4).into_iter().map(|t| t.country).collect();
        assert_eq!(top, vec!["Norway", "Kenya", "Jamaica", "Cuba"]);
    }

    #[test]
    fn test_medals_by_year_ascending() {
        let years = medals_by_year(&sample_table());
        let order: Vec<u32> = years.iter().map(|y| y.year).collect();
        assert_eq!(order, vec![1996, 2004, 2008]);
        assert_eq!(years[0].gold, 80);
        assert_eq!(years[0].silver, 72);
        assert_eq!(years[0].bronze, 65);
        assert_eq!(years[0].total, 217);
    }

    #[test]
    fn test_medals_by_year_and_country() {
        let view = medals_by_year_and_country(&sample_table(), &names(&["India", "China"]));

        assert_eq!(view.len(), 6);
        assert_eq!(
            view[0],
            YearCountryTotal {
                year: 1996,
                country: "China".to_string(),
                total: 50
            }
        );
        assert_eq!(view[1].country, "India");
        assert_eq!(view[5].year, 2008);
        assert_eq!(view[5].total, 3);
    }

    #[test]
    fn test_medals_by_year_and_country_empty_selection() {
        assert!(medals_by_year_and_country(&sample_table(), &BTreeSet::new()).is_empty());
        assert!(medals_by_year_and_country(&MedalTable::default(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_efficiency_zero_medals_is_undefined() {
        let table = MedalTable::new(vec![record("Fiji", 1992, 0, 0, 0)]);

        let eff = efficiency(&table, &["Fiji".to_string(), "Atlantis".to_string()]);
        assert_eq!(eff.len(), 2);
        assert_eq!(eff[0].gold_ratio_percent, None);
        assert_eq!(eff[0].medals_per_game, Some(0.0));
        assert_eq!(eff[1].gold_ratio_percent, None);
        assert_eq!(eff[1].medals_per_game, None);
    }

    #[test]
    fn test_efficiency_empty_selection() {
        assert!(efficiency(&sample_table(), &[]).is_empty());
    }

    #[test]
    fn test_efficiency_all_threshold() {
        let eff = efficiency_all(&sample_table(), 100);
        let countries: Vec<&str> = eff.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(countries, vec!["United States", "China"]);
    }

    #[test]
    fn test_filter_by_year_range_inclusive() {
        let table = sample_table();
        let filtered = filter_by_year_range(&table, 2004, 2008);
        assert_eq!(filtered.len(), 7);
        assert!(filtered.iter().all(|r| r.year >= 2004));
    }

    #[test]
    fn test_filter_by_year_range_empty() {
        let table = MedalTable::new(vec![
            MedalRecord::new("India", 2004, 0, 1, 2, 3),
            MedalRecord::new("India", 2008, 1, 0, 1, 2),
        ]);
        assert!(filter_by_year_range(&table, 2010, 2020).is_empty());
        assert!(filter_by_year_range(&table, 2008, 2004).is_empty());
    }

    #[test]
    fn test_filter_by_country() {
        let india = filter_by_country(&sample_table(), "India");
        assert_eq!(india.len(), 3);
        assert_eq!(india.total_medals(), 5);
    }

    #[test]
    fn test_improvement_candidates() {
        // Historical editions: 1996. Recent editions: 2004, 2008.
        let improvements = improvement_candidates(&sample_table(), 2000, 2.0);
        let countries: Vec<&str> = improvements.iter().map(|i| i.country.as_str()).collect();

        // China: 50 before vs (63 + 100) / 2 = 81.5 after, not more than double.
        // India: 1 before vs (1 + 3) / 2 = 2.0 after, exactly double is excluded.
        assert!(countries.is_empty());

        let improvements = improvement_candidates(&sample_table(), 2000, 1.5);
        let countries: Vec<&str> = improvements.iter().map(|i| i.country.as_str()).collect();
        assert_eq!(countries, vec!["China", "India"]);
        assert_eq!(improvements[1].historical_avg, 1.0);
        assert_eq!(improvements[1].recent_avg, 2.0);
    }

    #[test]
    fn test_improvement_requires_historical_records() {
        // Great Britain only appears after the split, with a large average.
        let improvements = improvement_candidates(&sample_table(), 2000, 2.0);
        assert!(improvements.iter().all(|i| i.country != "Great Britain"));

        let recent_only = MedalTable::new(vec![record("Kosovo", 2016, 40, 0, 0)]);
        assert!(improvement_candidates(&recent_only, 2000, 2.0).is_empty());
    }

    #[test]
    fn test_participation_span() {
        let spans = participation_span(
            &sample_table(),
            &["Great Britain".to_string(), "China".to_string(), "Atlantis".to_string()],
        );
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].span_years, 0);
        assert_eq!(spans[1].first_year, 1996);
        assert_eq!(spans[1].last_year, 2008);
        assert_eq!(spans[1].span_years, 12);
        assert_eq!(spans[1].games, 3);
    }

    #[test]
    fn test_medal_distribution() {
        let table = MedalTable::new(vec![
            MedalRecord::new("A", 2004, 1, 0, 0, 1),
            MedalRecord::new("B", 2004, 2, 0, 0, 2),
            MedalRecord::new("C", 2004, 3, 0, 0, 3),
            MedalRecord::new("D", 2004, 4, 0, 0, 4),
        ]);

        let stats = medal_distribution(&table);
        let columns: Vec<&str> = stats.iter().map(|s| s.column).collect();
        assert_eq!(columns, vec!["gold", "silver", "bronze", "total"]);

        let gold = &stats[0];
        assert_eq!(gold.count, 4);
        assert_eq!(gold.mean, Some(2.5));
        assert_eq!(gold.min, Some(1));
        assert_eq!(gold.q1, Some(1.75));
        assert_eq!(gold.median, Some(2.5));
        assert_eq!(gold.q3, Some(3.25));
        assert_eq!(gold.max, Some(4));
        let std = gold.std.unwrap();
        assert!((std - 1.2909944).abs() < 1e-6);

        assert_eq!(stats[1].std, Some(0.0));
    }

    #[test]
    fn test_medal_distribution_small_tables() {
        let empty = medal_distribution(&MedalTable::default());
        assert_eq!(empty[0].count, 0);
        assert_eq!(empty[0].mean, None);
        assert_eq!(empty[0].min, None);
        assert_eq!(empty[0].median, None);

        let single = medal_distribution(&MedalTable::new(vec![MedalRecord::new(
            "India", 2008, 1, 0, 2, 3,
        )]));
        assert_eq!(single[3].mean, Some(3.0));
        assert_eq!(single[3].median, Some(3.0));
        assert_eq!(single[3].std, None);
    }

    #[test]
    fn test_dataset_summary() {
        let summary = dataset_summary(&sample_table());
        assert_eq!(summary.countries, 5);
        assert_eq!(summary.editions, 3);
        assert_eq!(summary.first_year, Some(1996));
        assert_eq!(summary.last_year, Some(2008));
        assert_eq!(summary.records, 11);

        let empty = dataset_summary(&MedalTable::default());
        assert_eq!(empty.first_year, None);
        assert_eq!(empty.total_medals, 0);
    }
}
