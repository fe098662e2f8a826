use crate::datetime::{format_clock, local_time_after};
use chrono::NaiveTime;
use minijinja::{Value, context};
use std::time::Duration;

/// Interval between two marker moves.
const MOVE_INTERVAL: Duration = Duration::from_secs(3);

/// A point on a simulated bus path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Horizontal offset on the overlay, in CSS units.
    pub left: &'static str,
    /// Vertical offset on the overlay, in CSS units.
    pub top: &'static str,
}

/// A bus route with an animated marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusRoute {
    /// Route ID.
    pub id: &'static str,
    /// Route name.
    pub name: &'static str,
    /// Marker color.
    pub color: &'static str,
    /// Points the marker cycles through.
    pub path: &'static [PathPoint],
}

impl BusRoute {
    /// Returns the position of the marker after the elapsed time.
    ///
    /// The marker advances one point every three seconds and wraps around.
    pub fn position_at(&self, elapsed: Duration) -> Option<&PathPoint> {
        if self.path.is_empty() {
            return None;
        }
        let steps = elapsed.as_millis() / MOVE_INTERVAL.as_millis();
        let index = usize::try_from(steps % self.path.len() as u128).unwrap_or_default();
        self.path.get(index)
    }
}

/// Routes with animated markers.
pub const BUS_ROUTES: [BusRoute; 2] = [
    BusRoute {
        id: "KMT-01",
        name: "Rankala Route",
        color: "#4a6cf7",
        path: &[
            PathPoint {
                lat: 16.7050,
                lng: 74.2433,
                left: "50%",
                top: "50%",
            },
            PathPoint {
                lat: 16.7080,
                lng: 74.2350,
                left: "45%",
                top: "45%",
            },
            PathPoint {
                lat: 16.7100,
                lng: 74.2300,
                left: "40%",
                top: "40%",
            },
        ],
    },
    BusRoute {
        id: "KMT-02",
        name: "Kalamba Route",
        color: "#ff4757",
        path: &[
            PathPoint {
                lat: 16.7050,
                lng: 74.2433,
                left: "50%",
                top: "50%",
            },
            PathPoint {
                lat: 16.7000,
                lng: 74.2400,
                left: "55%",
                top: "55%",
            },
            PathPoint {
                lat: 16.6950,
                lng: 74.2350,
                left: "60%",
                top: "60%",
            },
        ],
    },
];

/// Returns the bus markers at their positions after the elapsed time.
pub fn bus_markers(elapsed: Duration) -> Vec<Value> {
    BUS_ROUTES
        .iter()
        .filter_map(|route| {
            let point = route.position_at(elapsed)?;
            let marker = context! {
                id => route.id,
                name => route.name,
                color => route.color,
                left => point.left,
                top => point.top,
            };
            Some(marker)
        })
        .collect()
}

/// Crowding of a bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Occupancy {
    /// Seats available.
    Low,
    /// Some standing room.
    #[default]
    Medium,
    /// Crowded.
    High,
}

impl Occupancy {
    /// Returns the display label.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Live status of a tracked bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingInfo {
    /// Route ID.
    route_id: String,
    /// Current location.
    current_location: &'static str,
    /// Next stop.
    next_stop: &'static str,
    /// Minutes to the next stop.
    eta_min: u32,
    /// Speed in km/h.
    speed_kmh: u32,
    /// Crowding.
    occupancy: Occupancy,
}

impl TrackingInfo {
    /// Returns the live status of the bus on the route.
    pub fn for_route(route_id: &str) -> Self {
        Self {
            route_id: route_id.trim().to_owned(),
            current_location: "Bindu Chowk",
            next_stop: "Rankala Lake",
            eta_min: 3,
            speed_kmh: 32,
            occupancy: Occupancy::Medium,
        }
    }

    /// Returns the route ID.
    #[inline]
    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    /// Returns the current location.
    #[inline]
    pub fn current_location(&self) -> &str {
        self.current_location
    }

    /// Returns the next stop.
    #[inline]
    pub fn next_stop(&self) -> &str {
        self.next_stop
    }

    /// Returns the local time the bus reaches the next stop.
    #[inline]
    pub fn expected_arrival(&self) -> NaiveTime {
        local_time_after(Duration::from_secs(u64::from(self.eta_min) * 60))
    }

    /// Returns the speed in km/h.
    #[inline]
    pub fn speed_kmh(&self) -> u32 {
        self.speed_kmh
    }

    /// Returns the crowding.
    #[inline]
    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    /// Returns the data of the tracking panel.
    pub fn view(&self) -> Value {
        let items = [
            ("Current Location:", self.current_location.to_owned()),
            ("Next Stop:", format!("{} ({} min)", self.next_stop, self.eta_min)),
            ("Expected Arrival:", format_clock(self.expected_arrival())),
            ("Speed:", format!("{} km/h", self.speed_kmh)),
            ("Occupancy:", self.occupancy.label().to_owned()),
            ("Last Updated:", "Just now".to_owned()),
        ];
        context! {
            route_id => &self.route_id,
            items => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BUS_ROUTES, TrackingInfo, bus_markers};
    use crate::view::{Document, test_engine};
    use std::time::Duration;

    #[test]
    fn it_cycles_marker_positions() {
        let route = &BUS_ROUTES[1];
        let left = |secs| route.position_at(Duration::from_secs(secs)).unwrap().left;
        assert_eq!(left(0), "50%");
        assert_eq!(left(2), "50%");
        assert_eq!(left(3), "55%");
        assert_eq!(left(6), "60%");
        assert_eq!(left(9), "50%");
        assert_eq!(left(3 * 3_000 + 4), "55%");
    }

    #[test]
    fn it_places_bus_markers() {
        let markers = bus_markers(Duration::from_secs(4));
        assert_eq!(markers.len(), 2);
        let field = |index: usize, name: &str| {
            markers[index].get_attr(name).unwrap().as_str().unwrap().to_owned()
        };
        assert_eq!(field(0, "id"), "KMT-01");
        assert_eq!(field(0, "left"), "45%");
        assert_eq!(field(0, "top"), "45%");
        assert_eq!(field(1, "color"), "#ff4757");
    }

    #[test]
    fn it_renders_tracking_panels() {
        let info = TrackingInfo::for_route("KMT-03");
        let document = Document::new("modal/tracking.html").with("view", info.view());
        let html = test_engine().render(&document).unwrap();
        assert!(html.contains("Live Tracking - KMT-03"));
        assert!(html.contains("Rankala Lake (3 min)"));
        assert!(html.contains("32 km/h"));
        assert!(html.contains("Expected Arrival:"));
    }
}
