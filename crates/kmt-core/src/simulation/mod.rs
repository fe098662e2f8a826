//! Simulated search, fare, booking and tracking data.
//!
//! Nothing here talks to a real backend: every result is canned
//! or drawn from a random number generator.

use crate::extension::TomlTableExt;
use rand::Rng;
use std::time::Duration;
use toml::Table;

mod fare;
mod goods;
mod planner;
mod route;
mod schedule;
mod ticket;
mod tracking;

pub use fare::{FareQuote, FareType};
pub use goods::{DeliveryTime, GoodsBooking, GoodsBookingForm, PackageSize};
pub use planner::{JourneyPlan, PLANNER_STOPS};
pub use route::{RouteOption, RouteStatus, search_routes};
pub use schedule::{ScheduleTab, schedule_view};
pub use ticket::{PaidTicket, PaymentMethod, TicketOffer};
pub use tracking::{BUS_ROUTES, BusRoute, Occupancy, PathPoint, TrackingInfo, bus_markers};

/// Known bus stops.
pub const BUS_STOPS: [&str; 12] = [
    "Central Bus Stand",
    "Railway Station",
    "Rankala Lake",
    "New Palace",
    "Rajarampuri",
    "Tarabai Park",
    "Bindu Chowk",
    "Shahupuri",
    "Kalamba",
    "Market Yard",
    "Shivaji University",
    "Mahadwar Road",
];

/// Minimum number of characters before stop suggestions are offered.
const MIN_SUGGESTION_QUERY: usize = 2;

/// Returns the bus stops containing the query case-insensitively.
///
/// Queries shorter than two characters yield no suggestions.
pub fn suggest_stops(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_SUGGESTION_QUERY {
        return Vec::new();
    }
    BUS_STOPS
        .iter()
        .copied()
        .filter(|stop| stop.to_lowercase().contains(&query))
        .collect()
}

/// Generates a random code of uppercase letters and digits.
pub(crate) fn random_code(rng: &mut impl Rng, len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}

/// Artificial delays of the simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationDelays {
    /// Route search.
    pub search: Duration,
    /// Fare calculation.
    pub fare: Duration,
    /// Ticket payment.
    pub payment: Duration,
    /// Goods booking.
    pub goods: Duration,
    /// Journey planning.
    pub planner: Duration,
}

impl SimulationDelays {
    /// Reads the delays from the `[simulation]` config table,
    /// using the defaults for missing or invalid values.
    pub fn from_config(config: &Table) -> Self {
        let defaults = Self::default();
        Self {
            search: config.get_duration("search-delay").unwrap_or(defaults.search),
            fare: config.get_duration("fare-delay").unwrap_or(defaults.fare),
            payment: config.get_duration("payment-delay").unwrap_or(defaults.payment),
            goods: config.get_duration("goods-delay").unwrap_or(defaults.goods),
            planner: config.get_duration("planner-delay").unwrap_or(defaults.planner),
        }
    }
}

impl Default for SimulationDelays {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(1),
            fare: Duration::from_millis(800),
            payment: Duration::from_secs(2),
            goods: Duration::from_secs(2),
            planner: Duration::from_millis(1500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SimulationDelays, random_code, suggest_stops};
    use rand::{SeedableRng, rngs::StdRng};
    use std::time::Duration;
    use toml::Table;

    #[test]
    fn it_suggests_stops() {
        assert_eq!(
            suggest_stops("ra"),
            [
                "Central Bus Stand",
                "Railway Station",
                "Rankala Lake",
                "Rajarampuri",
                "Tarabai Park",
            ]
        );
        assert_eq!(suggest_stops("  CHOWK "), ["Bindu Chowk"]);
        assert!(suggest_stops("r").is_empty());
        assert!(suggest_stops("airport").is_empty());
    }

    #[test]
    fn it_generates_random_codes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let code = random_code(&mut rng, 8);
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn it_reads_delays() {
        let config = r#"
            search-delay = "1500ms"
            payment-delay = "3s"
            goods-delay = "soon"
        "#
        .parse::<Table>()
        .unwrap();
        let delays = SimulationDelays::from_config(&config);
        assert_eq!(delays.search, Duration::from_millis(1500));
        assert_eq!(delays.payment, Duration::from_secs(3));
        assert_eq!(delays.goods, Duration::from_secs(2));
        assert_eq!(delays.fare, Duration::from_millis(800));
    }
}
