use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::SeriesMetadata;

macro_rules! series {
    ($id:expr, $name:expr, $desc:expr, $unit:expr, $freq:expr) => {
        ($id, SeriesMetadata {
            name: $name.to_string(),
            description: $desc.to_string(),
            unit: $unit.to_string(),
            frequency: $freq.to_string(),
        })
    };
}

/// Descriptive metadata for every upstream series the catalog touches.
static SERIES_INFO: Lazy<HashMap<&'static str, SeriesMetadata>> = Lazy::new(|| {
    HashMap::from([
        series!("GFDEGDQ188S", "Federal Debt to GDP",
                "Federal Debt: Total Public Debt as Percent of Gross Domestic Product", "%", "Quarterly"),
        series!("DFF", "Federal Funds Rate", "Effective Federal Funds Rate", "%", "Daily"),
        series!("GS10", "10-Year Treasury Rate", "10-Year Treasury Constant Maturity Rate", "%", "Daily"),
        series!("UNRATE", "Unemployment Rate", "Civilian Unemployment Rate", "%", "Monthly"),
        series!("SP500", "S&P 500", "S&P 500 Stock Market Index", "Index", "Daily"),
        series!("CPIAUCSL", "Consumer Price Index",
                "Consumer Price Index for All Urban Consumers: All Items", "Index", "Monthly"),
        series!("A191RL1Q225SBEA", "Real GDP Growth Rate",
                "Percent Change in Real Gross Domestic Product", "%", "Quarterly"),
        series!("A191RP1Q027SBEA", "Nominal GDP Growth Rate",
                "Percent Change in Nominal Gross Domestic Product", "%", "Quarterly"),
        series!("CSUSHPINSA", "Case-Shiller Home Price Index",
                "S&P/Case-Shiller U.S. National Home Price Index", "Index", "Monthly"),
        series!("TOTDTEUSQ163N", "Total Credit to Non-Financial Sector",
                "Total Credit to Non-Financial Sector, Adjusted for Breaks", "%", "Quarterly"),
        series!("TDSP", "Debt Service Ratio",
                "Household Debt Service Payments as a Percent of Disposable Personal Income", "%", "Quarterly"),
        series!("RBUSBIS", "Real Effective Exchange Rate",
                "Real Effective Exchange Rate for United States", "Index", "Monthly"),
        series!("NBUSBIS", "Nominal Effective Exchange Rate",
                "Nominal Effective Exchange Rate for United States", "Index", "Monthly"),
        series!("FDHBFIN", "Foreign Holdings of Federal Debt",
                "Federal Debt Held by Foreign and International Investors", "Billions of Dollars", "Quarterly"),
        series!("BOPBCA", "Current Account Balance", "Balance on Current Account", "Billions of Dollars", "Quarterly"),
        series!("NETFI", "Net Foreign Investment", "Net Foreign Investment", "Billions of Dollars", "Quarterly"),
        series!("TOTRESNS", "Total Reserves",
                "Total Reserves excluding Gold for United States", "Millions of U.S. Dollars", "Monthly"),
        series!("T10Y2Y", "Treasury Yield Curve",
                "10-Year Treasury Constant Maturity Minus 2-Year Treasury Constant Maturity", "%", "Daily"),
        series!("UMCSENT", "Consumer Sentiment", "University of Michigan: Consumer Sentiment", "Index", "Monthly"),
        series!("GFDEBTN", "Total Public Debt", "Federal Debt: Total Public Debt", "Millions of Dollars", "Quarterly"),
        series!("FGRECPT", "Federal Receipts", "Federal Government Current Receipts", "Billions of Dollars", "Quarterly"),
        series!("A091RC1Q027SBEA", "Federal Interest Payments",
                "Federal government current expenditures: Interest payments", "Billions of Dollars", "Quarterly"),
        series!("GDP", "Nominal GDP", "Gross Domestic Product", "Billions of Dollars", "Quarterly"),
    ])
});

/// Metadata for a series id, falling back to a generic record.
pub fn series_metadata(series_id: &str) -> SeriesMetadata {
    SERIES_INFO
        .get(series_id)
        .cloned()
        .unwrap_or_else(|| SeriesMetadata::unknown(series_id))
}

pub fn is_known_series(series_id: &str) -> bool {
    SERIES_INFO.contains_key(series_id)
}
