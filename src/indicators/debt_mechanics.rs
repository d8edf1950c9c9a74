use super::{checked_div, input, CompositeFormula};
use anyhow::Result;
use std::collections::HashMap;

pub const FEDERAL_DEBT: &str = "GFDEBTN";
pub const FEDERAL_RECEIPTS: &str = "FGRECPT";
pub const INTEREST_PAYMENTS: &str = "A091RC1Q027SBEA";
pub const TREASURY_10Y: &str = "GS10";
pub const NOMINAL_GDP_GROWTH: &str = "A191RP1Q027SBEA";
pub const TOTAL_RESERVES: &str = "TOTRESNS";

#[derive(Debug)]
pub struct DebtToRevenue;

#[derive(Debug)]
pub struct DebtServiceToRevenue;

#[derive(Debug)]
pub struct RateVsGrowth;

#[derive(Debug)]
pub struct DebtToReserves;

impl CompositeFormula for DebtToRevenue {
    fn slug(&self) -> &str {
        "govtDebtToRevenue"
    }

    fn name(&self) -> &str {
        "Government Debt-to-Revenue"
    }

    fn required_inputs(&self) -> &[&'static str] {
        &[FEDERAL_DEBT, FEDERAL_RECEIPTS]
    }

    fn evaluate(&self, inputs: &HashMap<&str, f64>) -> Result<f64> {
        // GFDEBTN is in millions, FGRECPT in billions.
        let debt_billions = input(inputs, FEDERAL_DEBT)? / 1000.0;
        checked_div(debt_billions, input(inputs, FEDERAL_RECEIPTS)?)
    }
}

impl CompositeFormula for DebtServiceToRevenue {
    fn slug(&self) -> &str {
        "govtDebtServiceToRevenue"
    }

    fn name(&self) -> &str {
        "Debt Service-to-Revenue"
    }

    fn required_inputs(&self) -> &[&'static str] {
        &[INTEREST_PAYMENTS, FEDERAL_RECEIPTS]
    }

    fn evaluate(&self, inputs: &HashMap<&str, f64>) -> Result<f64> {
        let ratio = checked_div(input(inputs, INTEREST_PAYMENTS)?, input(inputs, FEDERAL_RECEIPTS)?)?;
        Ok(ratio * 100.0)
    }
}

impl CompositeFormula for RateVsGrowth {
    fn slug(&self) -> &str {
        "rateVsGrowth"
    }

    fn name(&self) -> &str {
        "Interest Rate vs Growth Spread"
    }

    fn required_inputs(&self) -> &[&'static str] {
        &[TREASURY_10Y, NOMINAL_GDP_GROWTH]
    }

    fn evaluate(&self, inputs: &HashMap<&str, f64>) -> Result<f64> {
        Ok(input(inputs, TREASURY_10Y)? - input(inputs, NOMINAL_GDP_GROWTH)?)
    }
}

impl CompositeFormula for DebtToReserves {
    fn slug(&self) -> &str {
        "debtToReserves"
    }

    fn name(&self) -> &str {
        "Debt-to-Reserves Ratio"
    }

    fn required_inputs(&self) -> &[&'static str] {
        &[FEDERAL_DEBT, TOTAL_RESERVES]
    }

    fn evaluate(&self, inputs: &HashMap<&str, f64>) -> Result<f64> {
        // Both series are in millions.
        checked_div(input(inputs, FEDERAL_DEBT)?, input(inputs, TOTAL_RESERVES)?)
    }
}
