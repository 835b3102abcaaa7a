//! Next-day prices and their statistics.

use crate::quantity::rate::KilowattHourRate;

#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display, derive_more::Error)]
#[display("no prices available")]
pub struct NoPricesError;

/// Fixed consumer charges on top of the wholesale price.
#[derive(Copy, Clone, Debug)]
pub struct Charges {
    /// Purchase cost («inkoopvergoeding»), including VAT.
    pub purchase_cost: KilowattHourRate,

    /// Energy tax («energiebelasting»), including VAT.
    pub energy_tax: KilowattHourRate,
}

impl Default for Charges {
    fn default() -> Self {
        Self { purchase_cost: KilowattHourRate(0.0484), energy_tax: KilowattHourRate(0.1312) }
    }
}

impl Charges {
    #[must_use]
    pub fn apply(self, wholesale: KilowattHourRate) -> KilowattHourRate {
        wholesale + self.purchase_cost + self.energy_tax
    }
}

/// Consumer prices of a single day, one per hour slot.
///
/// The number of slots is not fixed to 24: a day counts 23 or 25 hours on daylight saving transitions.
///
/// Every price is rounded to cents before any statistics are taken, so that the exact comparisons
/// in the «where the price is» sets stay reliable.
#[must_use]
#[derive(Clone, Debug)]
pub struct PriceSet {
    prices: Vec<KilowattHourRate>,
    average: KilowattHourRate,
    high: KilowattHourRate,
    low: KilowattHourRate,
    average_hours: Vec<usize>,
    high_hours: Vec<usize>,
    low_hours: Vec<usize>,
}

impl PriceSet {
    /// Apply the charges to the raw prices, round them and calculate the statistics.
    pub fn try_from_raw(
        raw: impl IntoIterator<Item = KilowattHourRate>,
        charge: impl Fn(KilowattHourRate) -> KilowattHourRate,
    ) -> Result<Self, NoPricesError> {
        let prices: Vec<_> = raw.into_iter().map(|price| charge(price).round_to_cents()).collect();

        let high = prices.iter().copied().reduce(KilowattHourRate::max).ok_or(NoPricesError)?;
        let low = prices.iter().copied().reduce(KilowattHourRate::min).ok_or(NoPricesError)?;
        #[expect(clippy::cast_precision_loss)]
        let average = prices.iter().copied().sum::<KilowattHourRate>() / prices.len() as f64;

        let (average, high, low) =
            (average.round_to_cents(), high.round_to_cents(), low.round_to_cents());
        Ok(Self {
            average_hours: where_price_is(&prices, average),
            high_hours: where_price_is(&prices, high),
            low_hours: where_price_is(&prices, low),
            prices,
            average,
            high,
            low,
        })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.prices.len()
    }

    /// Iterate over the hour indices and prices, in hour order.
    pub fn all(&self) -> impl Iterator<Item = (usize, KilowattHourRate)> + '_ {
        self.prices.iter().copied().enumerate()
    }

    #[must_use]
    pub const fn average(&self) -> KilowattHourRate {
        self.average
    }

    #[must_use]
    pub const fn high(&self) -> KilowattHourRate {
        self.high
    }

    #[must_use]
    pub const fn low(&self) -> KilowattHourRate {
        self.low
    }

    #[must_use]
    pub fn average_hours(&self) -> &[usize] {
        &self.average_hours
    }

    #[must_use]
    pub fn high_hours(&self) -> &[usize] {
        &self.high_hours
    }

    #[must_use]
    pub fn low_hours(&self) -> &[usize] {
        &self.low_hours
    }
}

fn where_price_is(prices: &[KilowattHourRate], target: KilowattHourRate) -> Vec<usize> {
    prices
        .iter()
        .enumerate()
        .filter(|(_, price)| **price == target)
        .map(|(hour, _)| hour)
        .collect()
}
