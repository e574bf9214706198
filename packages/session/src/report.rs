//! The full set of dashboard tables for one filter state.

use std::time::Instant;

use serde::Serialize;
use theft_dashboard_analytics::{
    frequency, histogram,
    histogram::NumericField,
    regional::{self, RegionLookup},
    summary,
    temporal::{self, BucketFill},
};
use theft_dashboard_analytics_models::{
    BucketCount, CategoryCount, DensityCorrelation, HistogramBin, PairCount, PerCapitaRanking,
    SummaryMetrics, TimeSeriesPoint, table::DataTable,
};
use theft_dashboard_dataset::Dataset;
use theft_dashboard_filter::{FilterSummary, apply};
use theft_dashboard_filter_models::FilterState;
use theft_dashboard_incident_models::GroupField;

/// Models shown in the most-stolen-models chart.
pub const TOP_MODELS: usize = 20;
/// Make/classification pairs shown in the make comparison chart.
pub const TOP_MAKE_CLASSIFICATIONS: usize = 15;
/// Regions shown in the regional chart.
pub const TOP_REGIONS: usize = 10;
/// Models broken down by region.
pub const TOP_MODELS_BY_REGION: usize = 10;
/// Vehicle types shown in the vehicle type chart.
pub const TOP_VEHICLE_TYPES: usize = 10;
/// Makes broken down by color.
pub const TOP_MAKES_BY_COLOR: usize = 10;
/// Regions in each per-capita ranking.
pub const PER_CAPITA_RANKING: usize = 5;

/// Every derived table of the dashboard, computed from one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// Filter state the report was computed for.
    pub filters: FilterState,
    /// Record counts before and after filtering.
    pub filter_summary: FilterSummary,
    /// Headline metrics.
    pub summary: SummaryMetrics,
    /// Most stolen models, at most [`TOP_MODELS`].
    pub top_models: Vec<CategoryCount>,
    /// Make and make-type pairs, at most [`TOP_MAKE_CLASSIFICATIONS`].
    pub make_classifications: Vec<PairCount>,
    /// Regions by theft count, at most [`TOP_REGIONS`].
    pub top_regions: Vec<CategoryCount>,
    /// Top models within each region.
    pub models_by_region: Vec<PairCount>,
    /// Vehicle types by theft count, at most [`TOP_VEHICLE_TYPES`].
    pub vehicle_types: Vec<CategoryCount>,
    /// Every color with its theft count.
    pub colors: Vec<CategoryCount>,
    /// Luxury versus standard theft counts.
    pub classification_share: Vec<CategoryCount>,
    /// Thefts per calendar quarter.
    pub quarterly_trend: Vec<TimeSeriesPoint>,
    /// Thefts per model year.
    pub model_years: Vec<BucketCount>,
    /// Vehicle age histogram split by make type.
    pub age_by_classification: Vec<HistogramBin>,
    /// Color breakdown of the top [`TOP_MAKES_BY_COLOR`] makes.
    pub make_colors: Vec<PairCount>,
    /// Density scatter points with their correlation and trend line.
    pub density_correlation: DensityCorrelation,
    /// Regions with the highest and lowest thefts per 10,000 residents.
    pub per_capita: PerCapitaRanking,
    /// Regions whose records disagreed on population or density.
    pub region_conflicts: Vec<String>,
}

impl DashboardReport {
    /// Filters `dataset` by `filters` and runs every aggregation over the
    /// result. Vehicle ages are measured against `reference_year`.
    #[must_use]
    pub fn build(dataset: &Dataset, filters: &FilterState, reference_year: i32) -> Self {
        let start = Instant::now();
        let view = apply(dataset, filters);
        let records = view.records();

        let lookup = RegionLookup::from_records(records);
        let regions = regional::region_summary(records, &lookup);

        let report = Self {
            filters: filters.clone(),
            filter_summary: FilterSummary::new(dataset, &view),
            summary: summary::summary_metrics(records, reference_year),
            top_models: frequency::top_n(records, GroupField::Model, TOP_MODELS),
            make_classifications: frequency::top_pair_counts(
                records,
                GroupField::Make,
                GroupField::MakeType,
                TOP_MAKE_CLASSIFICATIONS,
            ),
            top_regions: frequency::top_n(records, GroupField::Region, TOP_REGIONS),
            models_by_region: frequency::top_models_by_region(records, TOP_MODELS_BY_REGION),
            vehicle_types: frequency::top_n(records, GroupField::VehicleType, TOP_VEHICLE_TYPES),
            colors: frequency::value_counts(records, GroupField::Color),
            classification_share: frequency::classification_share(records),
            quarterly_trend: temporal::quarterly_trend(records, BucketFill::Sparse),
            model_years: histogram::model_year_counts(records),
            age_by_classification: histogram::histogram_by_category(
                records,
                NumericField::VehicleAge,
                GroupField::MakeType,
                reference_year,
            ),
            make_colors: frequency::make_color_breakdown(records, TOP_MAKES_BY_COLOR),
            density_correlation: regional::density_correlation(&regions),
            per_capita: regional::per_capita_ranking(&regions, PER_CAPITA_RANKING),
            region_conflicts: lookup.conflicts().to_vec(),
        };

        log::debug!(
            "Recomputed dashboard over {} of {} incidents in {:.2?}",
            view.len(),
            dataset.len(),
            start.elapsed()
        );

        report
    }

    /// Headline metrics as a two-column table.
    #[must_use]
    pub fn summary_table(&self) -> DataTable {
        let s = &self.summary;
        let f = &self.filter_summary;
        DataTable::key_values(
            "Summary",
            vec![
                ("Total incidents", s.total_incidents.into()),
                ("Distinct makes", s.distinct_makes.into()),
                ("Luxury incidents", s.luxury_incidents.into()),
                ("Mean vehicle age", s.mean_vehicle_age.into()),
                ("Most stolen make", s.most_stolen_make.clone().into()),
                ("Thefts per 100k", s.thefts_per_100k.into()),
                ("Records in base dataset", f.base_records.into()),
                ("Filter reduction %", f.reduction_percent.into()),
            ],
        )
    }

    /// Density correlation coefficient and trend line as a two-column table.
    ///
    /// The trend is also evaluated at the lowest and highest observed
    /// density, the endpoints of the plotted line.
    #[must_use]
    pub fn correlation_table(&self) -> DataTable {
        let c = &self.density_correlation;
        let densities = c.regions.iter().filter_map(|r| r.density);
        let lowest = densities.clone().reduce(f64::min);
        let highest = densities.reduce(f64::max);
        let endpoint = |x: Option<f64>| c.trend.zip(x).map(|(t, x)| t.at(x));

        DataTable::key_values(
            "Density Correlation",
            vec![
                ("Regions", (c.regions.len() as u64).into()),
                ("Pearson r", c.coefficient.into()),
                ("Trend slope", c.trend.map(|t| t.slope).into()),
                ("Trend intercept", c.trend.map(|t| t.intercept).into()),
                ("Trend at lowest density", endpoint(lowest).into()),
                ("Trend at highest density", endpoint(highest).into()),
            ],
        )
    }

    /// Every table of the report, in display order.
    #[must_use]
    pub fn tables(&self) -> Vec<DataTable> {
        vec![
            self.summary_table(),
            DataTable::from_rows("Top Stolen Models", &self.top_models)
                .with_columns(&["model", "thefts"]),
            DataTable::from_rows("Make Comparison", &self.make_classifications)
                .with_columns(&["make", "make_type", "thefts"]),
            DataTable::from_rows("Thefts by Region", &self.top_regions)
                .with_columns(&["region", "thefts"]),
            DataTable::from_rows("Top Models by Region", &self.models_by_region)
                .with_columns(&["region", "model", "thefts"]),
            DataTable::from_rows("Vehicle Types", &self.vehicle_types)
                .with_columns(&["vehicle_type", "thefts"]),
            DataTable::from_rows("Colors", &self.colors).with_columns(&["color", "thefts"]),
            DataTable::from_rows("Luxury vs Standard", &self.classification_share)
                .with_columns(&["make_type", "thefts"]),
            DataTable::from_rows("Quarterly Trend", &self.quarterly_trend)
                .with_columns(&["quarter", "thefts"]),
            DataTable::from_rows("Thefts by Model Year", &self.model_years)
                .with_columns(&["model_year", "thefts"]),
            DataTable::from_rows("Vehicle Age by Make Type", &self.age_by_classification)
                .with_columns(&["vehicle_age", "make_type", "thefts"]),
            DataTable::from_rows("Top Makes by Color", &self.make_colors)
                .with_columns(&["make", "color", "thefts"]),
            DataTable::from_rows("Density vs Thefts", &self.density_correlation.regions),
            self.correlation_table(),
            DataTable::from_rows("Highest Thefts per 10k", &self.per_capita.highest),
            DataTable::from_rows("Lowest Thefts per 10k", &self.per_capita.lowest),
        ]
    }
}
