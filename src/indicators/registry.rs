use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::synthetic::{FallbackProfile, Pattern};
use crate::core::transform::TransformKind;
use crate::indicators::debt_mechanics::{DebtServiceToRevenue, DebtToReserves, DebtToRevenue, RateVsGrowth};
use crate::indicators::CompositeFormula;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Economic,
    Financial,
    Monetary,
    Debt,
    Consumer,
    DebtMechanics,
    Deflationary,
    Inflationary,
    Both, // relevant to both debt cycle types
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Economic => "economic",
            Category::Financial => "financial",
            Category::Monetary => "monetary",
            Category::Debt => "debt",
            Category::Consumer => "consumer",
            Category::DebtMechanics => "debt-mechanics",
            Category::Deflationary => "deflationary",
            Category::Inflationary => "inflationary",
            Category::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Annual => "annual",
        }
    }
}

/// How a metric is bound to upstream data. Resolved once when the catalog is built.
#[derive(Debug, Clone)]
pub enum MetricKind {
    Direct { series_id: String, transform: TransformKind },
    Composite { formula: Arc<dyn CompositeFormula> },
    Unmapped,
}

impl MetricKind {
    /// Upstream series this metric reads, in declaration order.
    pub fn series_ids(&self) -> Vec<&str> {
        match self {
            MetricKind::Direct { series_id, .. } => vec![series_id.as_str()],
            MetricKind::Composite { formula } => formula.required_inputs().to_vec(),
            MetricKind::Unmapped => Vec::new(),
        }
    }
}

// ============================================================================
// METADATA STRUCT
// ============================================================================

#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub unit: String,
    pub category: Category,
    pub frequency: Frequency,
    pub is_percentage: bool,
    pub kind: MetricKind,
    pub fallback: FallbackProfile,
}

macro_rules! metric {
    ($id:expr, $title:expr, $desc:expr, $unit:expr, $cat:expr, $freq:expr, $pct:expr, $kind:expr,
     ($min:expr, $max:expr, $pattern:expr)) => {
        MetricDefinition {
            id: $id.to_string(),
            title: $title.to_string(),
            description: $desc.to_string(),
            unit: $unit.to_string(),
            category: $cat,
            frequency: $freq,
            is_percentage: $pct,
            kind: $kind,
            fallback: FallbackProfile::new($min, $max, $pattern),
        }
    };
}

fn direct(series_id: &str) -> MetricKind {
    MetricKind::Direct { series_id: series_id.to_string(), transform: TransformKind::Identity }
}

fn year_over_year(series_id: &str) -> MetricKind {
    MetricKind::Direct { series_id: series_id.to_string(), transform: TransformKind::YearOverYear }
}

fn composite(formula: impl CompositeFormula + 'static) -> MetricKind {
    MetricKind::Composite { formula: Arc::new(formula) }
}

// ============================================================================
// STATIC METRIC CATALOG
// ============================================================================

static STANDARD: Lazy<Catalog> = Lazy::new(|| Catalog::new(standard_metrics()));

fn standard_metrics() -> Vec<MetricDefinition> {
    use Category::*;
    use Frequency::*;
    use Pattern::*;

    vec![
        // =====================================================================
        // DASHBOARD
        // =====================================================================
        metric!("gdp", "Real GDP",
                "Real GDP growth: output of goods and services adjusted for inflation.",
                "%", Economic, Quarterly, true, direct("A191RL1Q225SBEA"), (17.0, 25.0, Up)),
        metric!("unemployment", "Unemployment Rate",
                "Percentage of the labor force that is jobless and actively seeking employment.",
                "%", Economic, Monthly, true, direct("UNRATE"), (3.0, 15.0, Cycle)),
        metric!("inflation", "Consumer Price Index",
                "Price level of a weighted basket of consumer goods and services.",
                "", Monetary, Monthly, false, direct("CPIAUCSL"), (0.0, 9.0, Cycle)),
        metric!("federalFunds", "Federal Funds Rate",
                "Overnight rate at which banks lend reserve balances to each other.",
                "%", Monetary, Daily, true, direct("DFF"), (0.0, 5.0, Cycle)),
        metric!("debtToGDP", "Federal Debt to GDP",
                "Total federal government debt as a percentage of GDP.",
                "%", Debt, Quarterly, true, direct("GFDEGDQ188S"), (60.0, 130.0, Up)),
        metric!("yieldCurve", "Treasury Yield Curve",
                "Spread between 10-year and 2-year Treasury yields. Negative = inverted.",
                "%", Financial, Daily, true, direct("T10Y2Y"), (-2.0, 3.0, Cycle)),
        metric!("housingIndex", "Housing Price Index",
                "Changes in single-family home prices across the United States.",
                "", Financial, Monthly, false, direct("CSUSHPINSA"), (100.0, 250.0, Up)),
        metric!("consumerSentiment", "Consumer Sentiment",
                "Consumer confidence regarding the economy and personal finances.",
                "", Consumer, Monthly, false, direct("UMCSENT"), (50.0, 110.0, Cycle)),

        // =====================================================================
        // DEBT MECHANICS (composites)
        // =====================================================================
        metric!("govtDebtToRevenue", "Government Debt-to-Revenue",
                "Years of federal receipts needed to repay total public debt.",
                "x", DebtMechanics, Quarterly, false, composite(DebtToRevenue), (2.0, 8.0, Up)),
        metric!("govtDebtServiceToRevenue", "Debt Service-to-Revenue",
                "Federal interest payments as a share of federal receipts.",
                "%", DebtMechanics, Quarterly, true, composite(DebtServiceToRevenue), (5.0, 20.0, Cycle)),
        metric!("rateVsGrowth", "Interest Rate vs Growth Spread",
                "10-year Treasury rate minus nominal GDP growth. Positive = debt burden compounding.",
                "%", DebtMechanics, Quarterly, true, composite(RateVsGrowth), (-5.0, 5.0, Cycle)),
        metric!("debtToReserves", "Debt-to-Reserves Ratio",
                "Total public debt relative to reserves excluding gold.",
                "x", DebtMechanics, Quarterly, false, composite(DebtToReserves), (100.0, 1000.0, Up)),

        // =====================================================================
        // DEFLATIONARY DEBT CYCLE
        // =====================================================================
        metric!("debt-to-gdp", "Debt-to-GDP Ratio",
                "Total public debt relative to gross domestic product.",
                "%", Deflationary, Quarterly, true, direct("GFDEGDQ188S"), (30.0, 140.0, Cycle)),
        metric!("short-term-interest", "Short-Term Interest Rates",
                "Rates on short-term debt instruments, driven by central bank policy.",
                "%", Deflationary, Daily, true, direct("DFF"), (0.0, 20.0, Cycle)),
        metric!("long-term-interest", "Long-Term Interest Rates",
                "Rates on long-term debt instruments such as 10-year government bonds.",
                "%", Deflationary, Monthly, true, direct("GS10"), (1.0, 15.0, Cycle)),
        metric!("stock-market", "Stock Market Indices",
                "Value of a broad section of the stock market (S&P 500).",
                "index", Deflationary, Daily, false, direct("SP500"), (10.0, 5000.0, Up)),
        metric!("real-estate", "Real Estate Prices",
                "Average prices of residential properties.",
                "index", Deflationary, Monthly, false, direct("CSUSHPINSA"), (50.0, 250.0, Up)),
        metric!("credit-growth", "Credit Growth Rates",
                "Total credit to the non-financial sector.",
                "%", Deflationary, Quarterly, true, direct("TOTDTEUSQ163N"), (-10.0, 20.0, Cycle)),
        metric!("inflation-def", "Inflation Rates",
                "Annual percentage change in the Consumer Price Index.",
                "%", Both, Monthly, true, year_over_year("CPIAUCSL"), (-5.0, 25.0, Cycle)),
        metric!("gdp-growth-def", "GDP Growth Rates",
                "Annual percentage change in real GDP growth.",
                "%", Both, Quarterly, true, year_over_year("A191RL1Q225SBEA"), (-15.0, 20.0, Cycle)),
        metric!("debt-service-def", "Debt Service Payments",
                "Household debt service payments relative to disposable income.",
                "%", Both, Quarterly, true, direct("TDSP"), (5.0, 35.0, Cycle)),

        // =====================================================================
        // INFLATIONARY DEBT CYCLE
        // =====================================================================
        metric!("inflation-inf", "Inflation Rates",
                "Annual percentage change in the Consumer Price Index.",
                "%", Both, Monthly, true, year_over_year("CPIAUCSL"), (-5.0, 25.0, Cycle)),
        metric!("real-exchange", "Real Exchange Rates",
                "Exchange rates adjusted for inflation differentials.",
                "index", Inflationary, Monthly, false, direct("RBUSBIS"), (60.0, 140.0, Cycle)),
        metric!("nominal-exchange", "Nominal Exchange Rates",
                "Exchange rate unadjusted for inflation.",
                "index", Inflationary, Monthly, false, direct("NBUSBIS"), (50.0, 150.0, Cycle)),
        metric!("foreign-debt", "Foreign Debt Percentage",
                "Federal debt held by foreign and international investors.",
                "%", Inflationary, Quarterly, true, direct("FDHBFIN"), (5.0, 60.0, Cycle)),
        metric!("current-account", "Current Account Balance",
                "Balance of trade plus net income and net current transfers.",
                "%", Inflationary, Quarterly, true, direct("BOPBCA"), (-8.0, 8.0, Cycle)),
        metric!("capital-inflows", "Capital Inflows",
                "Foreign investment in domestic assets (net foreign investment proxy).",
                "%", Inflationary, Quarterly, true, direct("NETFI"), (0.0, 15.0, Cycle)),
        metric!("capital-outflows", "Capital Outflows",
                "Domestic investment in foreign assets (net foreign investment proxy).",
                "%", Inflationary, Quarterly, true, direct("NETFI"), (0.0, 12.0, Cycle)),
        metric!("fx-reserves", "Foreign Exchange Reserves",
                "Reserves excluding gold, the buffer against external shocks.",
                "%", Inflationary, Monthly, true, direct("TOTRESNS"), (1.0, 25.0, Cycle)),
        metric!("equity-local", "Equity Prices (Local Currency)",
                "Stock market performance measured in local currency.",
                "index", Inflationary, Daily, false, direct("SP500"), (10.0, 5000.0, Up)),
        metric!("equity-foreign", "Equity Prices (Foreign Currency)",
                "Stock market performance measured in foreign currency.",
                "index", Inflationary, Daily, false, direct("SP500"), (10.0, 4500.0, Up)),
        metric!("debt-service-inf", "Debt Service Payments",
                "Household debt service payments relative to disposable income.",
                "%", Both, Quarterly, true, direct("TDSP"), (5.0, 35.0, Cycle)),
        metric!("gdp-growth-inf", "GDP Growth Rates",
                "Annual percentage change in real GDP growth.",
                "%", Both, Quarterly, true, year_over_year("A191RL1Q225SBEA"), (-15.0, 20.0, Cycle)),
    ]
}

// ============================================================================
// CATALOG
// ============================================================================

/// An ordered set of metric definitions with O(1) lookup by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    metrics: Vec<MetricDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog; the first definition wins for a repeated id.
    pub fn new(metrics: Vec<MetricDefinition>) -> Self {
        let mut index = HashMap::with_capacity(metrics.len());
        for (idx, metric) in metrics.iter().enumerate() {
            index.entry(metric.id.clone()).or_insert(idx);
        }
        Self { metrics, index }
    }

    /// The built-in debt cycle catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    pub fn get(&self, id: &str) -> Option<&MetricDefinition> {
        self.index.get(id).and_then(|&idx| self.metrics.get(idx))
    }

    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn get_by_category(&self, category: Category) -> Vec<&MetricDefinition> {
        self.metrics.iter().filter(|m| m.category == category).collect()
    }

    /// Every upstream series referenced by a direct or composite metric, first occurrence order.
    pub fn upstream_series_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.metrics
            .iter()
            .flat_map(|m| m.kind.series_ids())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
