use crate::{error::Error, warn};
use minijinja::{Value, context};
use std::str::FromStr;

/// A tab of the timetable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScheduleTab {
    /// Monday to Friday.
    #[default]
    Weekday,
    /// Saturday and Sunday.
    Weekend,
}

impl ScheduleTab {
    /// All tabs in display order.
    pub const ALL: [Self; 2] = [Self::Weekday, Self::Weekend];

    /// Returns the value of the `data-tab` attribute.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekday => "weekday",
            Self::Weekend => "weekend",
        }
    }

    /// Returns the translation key of the tab label.
    #[inline]
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Weekday => "schedule_weekday",
            Self::Weekend => "schedule_weekend",
        }
    }
}

impl FromStr for ScheduleTab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekday" => Ok(Self::Weekday),
            "weekend" => Ok(Self::Weekend),
            _ => Err(warn!("unsupported schedule tab `{s}`")),
        }
    }
}

/// Timetable rows as `(tab, route, from, to, first bus, last bus, frequency)`.
#[rustfmt::skip]
const TIMETABLE: [(ScheduleTab, &str, &str, &str, &str, &str, &str); 8] = [
    (ScheduleTab::Weekday, "KMT-01", "Central Bus Stand", "Rankala Lake", "06:00", "22:00", "15 min"),
    (ScheduleTab::Weekday, "KMT-02", "Central Bus Stand", "Kalamba", "06:15", "21:45", "20 min"),
    (ScheduleTab::Weekday, "KMT-03", "Railway Station", "New Palace", "06:30", "22:30", "15 min"),
    (ScheduleTab::Weekday, "KMT-05", "Shahupuri", "Shivaji University", "07:00", "21:00", "10 min"),
    (ScheduleTab::Weekend, "KMT-01", "Central Bus Stand", "Rankala Lake", "07:00", "22:30", "20 min"),
    (ScheduleTab::Weekend, "KMT-02", "Central Bus Stand", "Kalamba", "07:00", "21:00", "30 min"),
    (ScheduleTab::Weekend, "KMT-03", "Railway Station", "New Palace", "07:30", "22:00", "25 min"),
    (ScheduleTab::Weekend, "KMT-07", "Mahadwar Road", "Tarabai Park", "08:00", "20:00", "30 min"),
];

/// Column headers of the timetable.
const COLUMNS: [&str; 6] = [
    "schedule_route",
    "schedule_from",
    "schedule_to",
    "schedule_first_bus",
    "schedule_last_bus",
    "schedule_frequency",
];

/// Returns the tab bar and the timetable with the rows of the other tab hidden.
pub fn schedule_view(active: ScheduleTab) -> Value {
    let tabs = ScheduleTab::ALL
        .into_iter()
        .map(|tab| {
            context! {
                name => tab.as_str(),
                label_key => tab.label_key(),
                active => tab == active,
            }
        })
        .collect::<Vec<_>>();
    let rows = TIMETABLE
        .iter()
        .map(|&(tab, route, from, to, first_bus, last_bus, frequency)| {
            context! {
                tab => tab.as_str(),
                visible => tab == active,
                cells => [route, from, to, first_bus, last_bus, frequency],
            }
        })
        .collect::<Vec<_>>();
    context! {
        tabs => tabs,
        columns => COLUMNS,
        rows => rows,
    }
}

#[cfg(test)]
mod tests {
    use super::{ScheduleTab, schedule_view};
    use crate::view::{Document, test_engine};

    #[test]
    fn it_parses_schedule_tabs() {
        assert_eq!("Weekend".parse::<ScheduleTab>().unwrap(), ScheduleTab::Weekend);
        assert_eq!(ScheduleTab::default(), ScheduleTab::Weekday);
        assert!("holiday".parse::<ScheduleTab>().is_err());
    }

    #[test]
    fn it_shows_rows_of_the_active_tab() {
        let schedule = schedule_view(ScheduleTab::Weekend);
        let document = Document::new("partials/schedule.html").with("schedule", schedule);
        let html = test_engine().render(&document).unwrap();
        let visible_weekend_row = "<tr class=\"weekend\" style=\"display: table-row\">";
        assert_eq!(html.matches(visible_weekend_row).count(), 4);
        assert!(!html.contains("<tr class=\"weekday\" style=\"display: table-row\">"));
        assert!(html.contains("<tr class=\"weekday\" style=\"display: none\">"));
        assert_eq!(html.matches("schedule-tab active").count(), 1);
        assert!(html.contains("class=\"schedule-tab active\" data-tab=\"weekend\""));
        assert!(html.contains("data-translate=\"schedule_first_bus\""));
    }
}
