use clap::Parser;

use crate::{core::prices::Charges, quantity::rate::KilowattHourRate};

#[derive(Copy, Clone, Parser)]
pub struct ChargesArgs {
    /// Purchase cost («inkoopvergoeding») in euro per kWh, including VAT.
    #[clap(long = "purchase-cost", env = "PURCHASE_COST", default_value = "0.0484")]
    purchase_cost: KilowattHourRate,

    /// Energy tax («energiebelasting») in euro per kWh, including VAT.
    #[clap(long = "energy-tax", env = "ENERGY_TAX", default_value = "0.1312")]
    energy_tax: KilowattHourRate,
}

impl From<ChargesArgs> for Charges {
    fn from(args: ChargesArgs) -> Self {
        Self { purchase_cost: args.purchase_cost, energy_tax: args.energy_tax }
    }
}
