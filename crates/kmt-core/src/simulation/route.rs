use crate::error::Error;
use minijinja::{Value, context};

/// Punctuality of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    /// Running on time.
    OnTime,
    /// Running late.
    Delayed,
}

impl RouteStatus {
    /// Returns the CSS class of the status badge.
    #[inline]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::OnTime => "on-time",
            Self::Delayed => "delayed",
        }
    }

    /// Returns the translation key of the label.
    #[inline]
    pub fn label_key(self) -> &'static str {
        match self {
            Self::OnTime => "status_on_time",
            Self::Delayed => "status_delayed",
        }
    }
}

/// A route returned by the simulated search.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOption {
    /// Route ID.
    pub route_id: &'static str,
    /// Origin.
    pub from: String,
    /// Destination.
    pub to: String,
    /// Departure time.
    pub departure: &'static str,
    /// Arrival time.
    pub arrival: &'static str,
    /// Fare in rupees.
    pub fare: u32,
    /// Distance in kilometers.
    pub distance_km: f32,
    /// Travel time in minutes.
    pub duration_min: u32,
    /// Number of stops.
    pub stops: u32,
    /// Punctuality.
    pub status: RouteStatus,
}

/// Canned routes as `(id, departure, arrival, fare, distance, duration, stops, status)`.
const ROUTES: [(&str, &str, &str, u32, f32, u32, u32, RouteStatus); 3] = [
    ("KMT-01", "07:30 AM", "08:15 AM", 25, 7.5, 45, 8, RouteStatus::OnTime),
    ("KMT-03", "08:00 AM", "08:50 AM", 30, 8.2, 50, 10, RouteStatus::Delayed),
    ("KMT-05", "08:30 AM", "09:10 AM", 25, 7.2, 40, 7, RouteStatus::OnTime),
];

/// Searches the routes between two locations.
///
/// Both locations are required. The error message is the translation key
/// of the inline warning.
pub fn search_routes(from: &str, to: &str) -> Result<Vec<RouteOption>, Error> {
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(Error::new("search_error"));
    }

    let routes = ROUTES
        .iter()
        .map(
            |&(route_id, departure, arrival, fare, distance_km, duration_min, stops, status)| {
                RouteOption {
                    route_id,
                    from: from.to_owned(),
                    to: to.to_owned(),
                    departure,
                    arrival,
                    fare,
                    distance_km,
                    duration_min,
                    stops,
                    status,
                }
            },
        )
        .collect();
    Ok(routes)
}

impl RouteOption {
    /// Returns the data of the route card.
    pub fn view(&self) -> Value {
        context! {
            route_id => self.route_id,
            from => &self.from,
            to => &self.to,
            departure => self.departure,
            arrival => self.arrival,
            fare => self.fare,
            distance_km => self.distance_km.to_string(),
            duration_min => self.duration_min,
            stops => self.stops,
            status_class => self.status.css_class(),
            status_key => self.status.label_key(),
        }
    }
}
