//! Region-level analyses: theft counts joined with population attributes,
//! density correlation, and per-capita rates.

use std::collections::BTreeMap;

use theft_dashboard_analytics_models::{
    DensityCorrelation, PerCapitaRanking, RegionRate, RegionSummary, TrendLine,
};
use theft_dashboard_incident_models::IncidentRecord;

/// Rates are expressed per this many residents.
pub const PER_CAPITA_SCALE: f64 = 10_000.0;

/// Population and density of one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionAttributes {
    /// Region population.
    pub population: Option<f64>,
    /// Region population density.
    pub density: Option<f64>,
}

/// Deduplicated region → (population, density) lookup.
///
/// Population and density are repeated on every record of a region. The
/// first record seen for a region supplies its attributes; regions whose
/// later records disagree are reported by [`conflicts`](Self::conflicts).
#[derive(Debug, Clone, Default)]
pub struct RegionLookup {
    attributes: BTreeMap<String, RegionAttributes>,
    conflicts: Vec<String>,
}

impl RegionLookup {
    /// Builds the lookup from `records`.
    #[must_use]
    pub fn from_records(records: &[&IncidentRecord]) -> Self {
        let mut lookup = Self::default();
        for record in records {
            let attrs = RegionAttributes {
                population: record.population,
                density: record.density,
            };
            match lookup.attributes.get(&record.region) {
                None => {
                    lookup.attributes.insert(record.region.clone(), attrs);
                }
                Some(existing) if *existing != attrs => {
                    if !lookup.conflicts.contains(&record.region) {
                        log::warn!(
                            "Region '{}' has conflicting population/density values; keeping the first seen",
                            record.region
                        );
                        lookup.conflicts.push(record.region.clone());
                    }
                }
                Some(_) => {}
            }
        }
        lookup
    }

    /// Attributes of `region`, if any record mentioned it.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<RegionAttributes> {
        self.attributes.get(region).copied()
    }

    /// Regions whose records carried more than one attribute pair.
    #[must_use]
    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }
}

/// Theft counts per region in `records`, left-joined with `lookup`, ordered
/// by region name.
#[must_use]
pub fn region_summary(records: &[&IncidentRecord], lookup: &RegionLookup) -> Vec<RegionSummary> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.region.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(region, theft_count)| {
            let attrs = lookup.get(region);
            RegionSummary {
                region: region.to_owned(),
                theft_count,
                population: attrs.and_then(|a| a.population),
                density: attrs.and_then(|a| a.density),
            }
        })
        .collect()
}

/// Pearson correlation of `xs` and `ys`.
///
/// `None` with fewer than two points, unequal lengths, or zero variance in
/// either variable.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Least-squares fit of `ys` on `xs`.
///
/// `None` with fewer than two points, unequal lengths, or no variance in
/// `xs`.
#[must_use]
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<TrendLine> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    if sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);
    (slope.is_finite() && intercept.is_finite()).then_some(TrendLine { slope, intercept })
}

/// Correlation and trend between region density and theft count.
///
/// Regions without a known density are left out of the scatter.
#[must_use]
pub fn density_correlation(summary: &[RegionSummary]) -> DensityCorrelation {
    let regions: Vec<RegionSummary> = summary
        .iter()
        .filter(|r| r.density.is_some_and(f64::is_finite))
        .cloned()
        .collect();

    let xs: Vec<f64> = regions.iter().filter_map(|r| r.density).collect();
    #[allow(clippy::cast_precision_loss)]
    let ys: Vec<f64> = regions.iter().map(|r| r.theft_count as f64).collect();

    let coefficient = pearson(&xs, &ys);
    let trend = if coefficient.is_some() {
        linear_fit(&xs, &ys)
    } else {
        None
    };

    DensityCorrelation {
        regions,
        coefficient,
        trend,
    }
}

/// Thefts per [`PER_CAPITA_SCALE`] residents for every region in
/// `summary`. The rate is `None` unless population is positive.
#[must_use]
pub fn per_capita_rates(summary: &[RegionSummary]) -> Vec<RegionRate> {
    summary
        .iter()
        .map(|r| {
            #[allow(clippy::cast_precision_loss)]
            let thefts_per_10k = r
                .population
                .filter(|p| p.is_finite() && *p > 0.0)
                .map(|p| r.theft_count as f64 / p * PER_CAPITA_SCALE);
            RegionRate {
                region: r.region.clone(),
                theft_count: r.theft_count,
                thefts_per_10k,
            }
        })
        .collect()
}

/// The `n` highest and `n` lowest per-capita rates.
///
/// Both lists are ranked independently over the regions with a computable
/// rate; if fewer than `n` exist, each list holds all of them.
#[must_use]
pub fn per_capita_ranking(summary: &[RegionSummary], n: usize) -> PerCapitaRanking {
    let computable: Vec<(f64, RegionRate)> = per_capita_rates(summary)
        .into_iter()
        .filter_map(|rate| rate.thefts_per_10k.map(|v| (v, rate)))
        .collect();

    let mut highest = computable.clone();
    highest.sort_by(|a, b| b.0.total_cmp(&a.0));
    highest.truncate(n);

    let mut lowest = computable;
    lowest.sort_by(|a, b| a.0.total_cmp(&b.0));
    lowest.truncate(n);

    PerCapitaRanking {
        highest: highest.into_iter().map(|(_, rate)| rate).collect(),
        lowest: lowest.into_iter().map(|(_, rate)| rate).collect(),
    }
}
