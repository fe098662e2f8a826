use crate::{datetime::arrival_after, error::Error};
use rand::Rng;

/// Stops offered by the journey planner demo.
pub const PLANNER_STOPS: [&str; 5] = [
    "Central Bus Stand",
    "Railway Station",
    "Rankala Lake",
    "New Palace",
    "Rajarampuri",
];

/// A recommended journey drawn at random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyPlan {
    /// Origin.
    from: String,
    /// Destination.
    to: String,
    /// Route ID in `KMT-01..=KMT-10`.
    route_id: String,
    /// Departure time as `08:MM`.
    departure: String,
    /// Arrival time as `HH:MM`.
    arrival: String,
    /// Travel time in minutes.
    duration_min: u32,
    /// Number of stops.
    stops: u32,
    /// Fare in rupees.
    fare: u32,
}

impl JourneyPlan {
    /// Plans a journey between two different stops.
    ///
    /// The error message is the translation key of the alert to show.
    pub fn generate(from: &str, to: &str, rng: &mut impl Rng) -> Result<Self, Error> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return Err(Error::new("planner_error_missing"));
        }
        if from == to {
            return Err(Error::new("planner_error_same"));
        }

        let route_number: u32 = rng.random_range(1..=10);
        let departure = format!("08:{:02}", rng.random_range(0..60));
        let duration_min = rng.random_range(15..45);
        let stops = rng.random_range(2..7);
        let fare = rng.random_range(20..50);
        let arrival = arrival_after(&departure, duration_min)
            .ok_or_else(|| Error::new(format!("invalid departure time `{departure}`")))?;
        Ok(Self {
            from: from.to_owned(),
            to: to.to_owned(),
            route_id: format!("KMT-{route_number:02}"),
            departure,
            arrival,
            duration_min,
            stops,
            fare,
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

    /// Returns the route ID.
    #[inline]
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    /// Returns the departure time.
    #[inline]
    pub fn departure(&self) -> &str {
        &self.departure
    }

    /// Returns the arrival time.
    #[inline]
    pub fn arrival(&self) -> &str {
        &self.arrival
    }

    /// Returns the travel time in minutes.
    #[inline]
    pub fn duration_min(&self) -> u32 {
        self.duration_min
    }

    /// Returns the number of stops.
    #[inline]
    pub fn stops(&self) -> u32 {
        self.stops
    }

    /// Returns the fare.
    #[inline]
    pub fn fare(&self) -> u32 {
        self.fare
    }

    /// Returns the labeled lines of the recommended route.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Route", self.route_id.clone()),
            ("From", self.from.clone()),
            ("To", self.to.clone()),
            ("Departure", self.departure.clone()),
            ("Arrival", self.arrival.clone()),
            ("Duration", format!("{} minutes", self.duration_min)),
            ("Stops", self.stops.to_string()),
            ("Fare", format!("₹{}", self.fare)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::JourneyPlan;
    use crate::datetime::arrival_after;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_plans_journeys() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..300 {
            let plan = JourneyPlan::generate("Rankala Lake", "New Palace", &mut rng).unwrap();
            let number = plan.route_id().strip_prefix("KMT-").unwrap();
            assert!((1..=10).contains(&number.parse::<u32>().unwrap()));
            assert_eq!(number.len(), 2);
            assert!(plan.departure().starts_with("08:"));
            assert!((15..45).contains(&plan.duration_min()));
            assert!((2..7).contains(&plan.stops()));
            assert!((20..50).contains(&plan.fare()));
            assert_eq!(
                arrival_after(plan.departure(), plan.duration_min()).as_deref(),
                Some(plan.arrival())
            );
        }
    }

    #[test]
    fn it_rejects_incomplete_journeys() {
        let mut rng = StdRng::seed_from_u64(21);
        let err = JourneyPlan::generate("", "New Palace", &mut rng).unwrap_err();
        assert_eq!(err.message(), "planner_error_missing");
        let err = JourneyPlan::generate("Rankala Lake", " Rankala Lake", &mut rng).unwrap_err();
        assert_eq!(err.message(), "planner_error_same");
    }

    #[test]
    fn it_summarizes_recommended_routes() {
        let mut rng = StdRng::seed_from_u64(8);
        let plan = JourneyPlan::generate("Central Bus Stand", "Rajarampuri", &mut rng).unwrap();
        let summary = plan.summary();
        assert_eq!(summary[0], ("Route", plan.route_id().to_owned()));
        assert_eq!(summary[1].1, "Central Bus Stand");
        assert_eq!(summary[5].1, format!("{} minutes", plan.duration_min()));
        assert_eq!(summary[7].1, format!("₹{}", plan.fare()));
    }
}
