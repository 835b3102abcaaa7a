use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Euro per kilowatt-hour.
#[derive(
    Copy,
    Clone,
    Default,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Div,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::Sum,
)]
pub struct KilowattHourRate(pub f64);

impl KilowattHourRate {
    pub const ZERO: Self = Self(0.0);

    /// Round the rate to whole cents, halfway cases away from zero.
    ///
    /// Note that the result may be the negative zero.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }

    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        if rhs.0 < self.0 { rhs } else { self }
    }

    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        if rhs.0 > self.0 { rhs } else { self }
    }
}

impl Display for KilowattHourRate {
    /// Dutch notation: `€ 0,23` with the non-breaking space and decimal comma.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Adding the positive zero turns `-0.0` into `0.0`:
        let value = self.round_to_cents().0 + 0.0;
        let formatted = format!("{value:.2}").replacen('.', ",", 1);
        write!(f, "€\u{a0}{formatted}")
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}€/kWh", self.0)
    }
}
