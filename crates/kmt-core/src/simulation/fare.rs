use crate::{error::Error, warn};
use minijinja::{Value, context};
use rand::Rng;
use std::str::FromStr;

/// Passenger category of a fare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FareType {
    /// Regular fare.
    #[default]
    Regular,
    /// Student fare.
    Student,
    /// Senior citizen fare.
    Senior,
}

impl FareType {
    /// Returns the discount rate.
    #[inline]
    pub fn discount(self) -> f64 {
        match self {
            Self::Regular => 0.0,
            Self::Student => 0.15,
            Self::Senior => 0.25,
        }
    }

    /// Returns the translation key of the label.
    #[inline]
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Regular => "fare_regular",
            Self::Student => "fare_student",
            Self::Senior => "fare_senior",
        }
    }
}

impl FromStr for FareType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "regular" => Ok(Self::Regular),
            "student" => Ok(Self::Student),
            "senior" => Ok(Self::Senior),
            _ => Err(warn!("unsupported fare type `{s}`")),
        }
    }
}

/// A simulated fare for a trip.
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    /// Origin.
    from: String,
    /// Destination.
    to: String,
    /// Passenger category.
    fare_type: FareType,
    /// Base fare in rupees.
    base_fare: u32,
    /// Final fare rounded to two decimals.
    final_fare: f64,
}

impl FareQuote {
    /// Calculates a fare with a random base fare in `[20, 70)`.
    ///
    /// Both ends of the trip are required. The error message is the
    /// translation key of the alert to show.
    pub fn calculate(
        from: &str,
        to: &str,
        fare_type: FareType,
        rng: &mut impl Rng,
    ) -> Result<Self, Error> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(Error::new("fare_error"));
        }

        let base_fare: u32 = rng.random_range(20..70);
        let final_fare = round_fare(f64::from(base_fare) * (1.0 - fare_type.discount()));
        Ok(Self {
            from: from.to_owned(),
            to: to.to_owned(),
            fare_type,
            base_fare,
            final_fare,
        })
    }

    /// Returns the origin.
    #[inline]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Returns the destination.
    #[inline]
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Returns the passenger category.
    #[inline]
    pub fn fare_type(&self) -> FareType {
        self.fare_type
    }

    /// Returns the base fare.
    #[inline]
    pub fn base_fare(&self) -> u32 {
        self.base_fare
    }

    /// Returns the final fare.
    #[inline]
    pub fn final_fare(&self) -> f64 {
        self.final_fare
    }

    /// Returns the data of the fare details.
    pub fn view(&self) -> Value {
        let discount = self.fare_type.discount();
        let discount = (discount > 0.0).then(|| format!("{}%", (discount * 100.0).round()));
        context! {
            from => &self.from,
            to => &self.to,
            fare_type_key => self.fare_type.label_key(),
            base_fare => format!("₹{:.2}", f64::from(self.base_fare)),
            discount => discount,
            final_fare => format!("₹{:.2}", self.final_fare),
        }
    }
}

/// Rounds an amount to two decimals.
#[inline]
pub(crate) fn round_fare(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{FareQuote, FareType, round_fare};
    use crate::view::{Document, test_engine};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_calculates_discounted_fares() {
        let mut rng = StdRng::seed_from_u64(42);
        for fare_type in [FareType::Regular, FareType::Student, FareType::Senior] {
            for _ in 0..200 {
                let quote = FareQuote::calculate("Rankala Lake", "Kalamba", fare_type, &mut rng)
                    .unwrap();
                assert!((20..70).contains(&quote.base_fare()));
                let base_fare = f64::from(quote.base_fare());
                let expected = round_fare(base_fare * (1.0 - fare_type.discount()));
                assert_eq!(quote.final_fare(), expected);
            }
        }
    }

    #[test]
    fn it_requires_both_ends() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = FareQuote::calculate("", "Kalamba", FareType::Regular, &mut rng).unwrap_err();
        assert_eq!(err.message(), "fare_error");
        assert!(FareQuote::calculate("Kalamba", "  ", FareType::Student, &mut rng).is_err());
    }

    #[test]
    fn it_parses_fare_types() {
        assert_eq!("Senior".parse::<FareType>().unwrap(), FareType::Senior);
        assert_eq!("".parse::<FareType>().unwrap(), FareType::Regular);
        assert!("child".parse::<FareType>().is_err());
        assert_eq!(round_fare(42.499), 42.5);
        assert_eq!(round_fare(20.0 * 0.85), 17.0);
    }

    #[test]
    fn it_renders_fare_details() {
        let mut rng = StdRng::seed_from_u64(9);
        let quote = FareQuote::calculate("Shahupuri", "Kalamba", FareType::Student, &mut rng)
            .unwrap();
        let document = Document::new("partials/fare.html").with("fare", quote.view());
        let html = test_engine().render(&document).unwrap();
        assert!(html.contains("Shahupuri fare_to_connector Kalamba"));
        assert!(html.contains("<strong>fare_discount:</strong> 15%"));
        assert!(html.contains(&format!("₹{:.2}", quote.final_fare())));

        let quote = FareQuote::calculate("Shahupuri", "Kalamba", FareType::Regular, &mut rng)
            .unwrap();
        let document = Document::new("partials/fare.html").with("fare", quote.view());
        let html = test_engine().render(&document).unwrap();
        assert!(!html.contains("fare_discount"));
    }
}
