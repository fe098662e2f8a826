//! Per-visitor application context.
//!
//! An [`AppContext`] owns everything a visitor sees: the current language,
//! the overlay, the result panels and a pending one-shot alert.
//! Rendering passes the regions of the home page to its template
//! and binds the translator.

use crate::{
    Map,
    contact::ContactForm,
    error::Error,
    i18n::Translator,
    modal::{ContainerState, Feature, ModalDispatcher},
    simulation::{
        BUS_STOPS, FareQuote, FareType, RouteOption, ScheduleTab, SimulationDelays, bus_markers,
        schedule_view, search_routes,
    },
    view::{Document, HOME_PAGE, ViewEngine},
};
use minijinja::{Value, context};
use tokio::time::Instant;

/// Language buttons as pairs of the code and the native name.
const LANGUAGE_BUTTONS: [(&str, &str); 3] = [("en", "English"), ("mr", "मराठी"), ("hi", "हिंदी")];

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Successful outcome.
    Success,
    /// Missing or invalid input.
    Warning,
    /// Failed request.
    Error,
}

impl AlertKind {
    /// Returns the CSS class.
    #[inline]
    fn css_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Warning => "alert-warning",
            Self::Error => "alert-error",
        }
    }
}

/// An alert shown on the next render only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Severity.
    kind: AlertKind,
    /// Translation key of the message.
    key: String,
    /// Untranslated text appended to the message.
    detail: Option<String>,
}

impl Alert {
    /// Creates a new instance.
    #[inline]
    pub fn new(kind: AlertKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            detail: None,
        }
    }

    /// Appends an untranslated detail.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns the severity.
    #[inline]
    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    /// Returns the translation key of the message.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn view(&self) -> Value {
        context! {
            class => self.kind.css_class(),
            key => &self.key,
            detail => &self.detail,
        }
    }
}

/// Content of the search results region.
#[derive(Debug, Clone, Default)]
enum SearchPanel {
    #[default]
    Empty,
    Warning(String),
    Results {
        routes: Vec<RouteOption>,
        ready_at: Instant,
    },
}

/// Content of the contact region.
#[derive(Debug, Clone)]
enum ContactPanel {
    Form(ContactForm),
    Sent,
}

/// State of one visitor.
#[derive(Debug)]
pub struct AppContext {
    /// Translation engine with the current language.
    translator: Translator,
    /// Overlay flows.
    dispatcher: ModalDispatcher,
    /// Artificial delays.
    delays: SimulationDelays,
    /// Pending one-shot alert.
    alert: Option<Alert>,
    /// Route search region.
    search: SearchPanel,
    /// Fare result and the instant it becomes visible.
    fare: Option<(FareQuote, Instant)>,
    /// Active schedule tab.
    schedule_tab: ScheduleTab,
    /// Contact region.
    contact: ContactPanel,
    /// Creation time, which drives the bus markers.
    started_at: Instant,
}

impl AppContext {
    /// Creates a new context in the current language of the translator.
    pub fn new(translator: Translator, delays: SimulationDelays) -> Self {
        Self {
            translator,
            dispatcher: ModalDispatcher::new(delays),
            delays,
            alert: None,
            search: SearchPanel::default(),
            fare: None,
            schedule_tab: ScheduleTab::default(),
            contact: ContactPanel::Form(ContactForm::default()),
            started_at: Instant::now(),
        }
    }

    /// Returns the current language code.
    #[inline]
    pub fn language(&self) -> &str {
        self.translator.language()
    }

    /// Selects the language. Returns `false` if it is not supported.
    #[inline]
    pub fn set_language(&mut self, language: &str) -> bool {
        self.translator.set_language(language)
    }

    /// Returns a reference to the overlay dispatcher.
    #[inline]
    pub fn dispatcher(&self) -> &ModalDispatcher {
        &self.dispatcher
    }

    /// Returns a mutable reference to the overlay dispatcher.
    #[inline]
    pub fn dispatcher_mut(&mut self) -> &mut ModalDispatcher {
        &mut self.dispatcher
    }

    /// Returns the pending alert.
    #[inline]
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Shows an alert on the next render.
    #[inline]
    pub fn show_alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    /// Searches the routes between two locations.
    ///
    /// An incomplete search shows an inline warning instead of the results.
    /// The results appear once the search delay has passed.
    pub fn search_routes(&mut self, from: &str, to: &str) {
        self.search = match search_routes(from, to) {
            Ok(routes) => {
                tracing::info!(from = from.trim(), to = to.trim(), "routes searched");
                SearchPanel::Results {
                    routes,
                    ready_at: Instant::now() + self.delays.search,
                }
            }
            Err(err) => SearchPanel::Warning(err.message().to_owned()),
        };
    }

    /// Calculates the fare of a trip.
    ///
    /// A missing end of the trip shows an alert and keeps the previous result.
    /// The fare appears once the fare delay has passed.
    pub fn calculate_fare(&mut self, from: &str, to: &str, fare_type: &str) {
        let fare_type = fare_type.parse::<FareType>().unwrap_or_default();
        match FareQuote::calculate(from, to, fare_type, &mut rand::rng()) {
            Ok(quote) => {
                tracing::info!(
                    base_fare = quote.base_fare(),
                    final_fare = quote.final_fare(),
                    "fare calculated"
                );
                self.fare = Some((quote, Instant::now() + self.delays.fare));
            }
            Err(err) => self.show_alert(Alert::new(AlertKind::Warning, err.message())),
        }
    }

    /// Returns the calculated fare once it is visible.
    pub fn fare(&self) -> Option<&FareQuote> {
        self.fare
            .as_ref()
            .filter(|(_, ready_at)| Instant::now() >= *ready_at)
            .map(|(quote, _)| quote)
    }

    /// Selects the schedule tab.
    #[inline]
    pub fn select_schedule_tab(&mut self, tab: ScheduleTab) {
        self.schedule_tab = tab;
    }

    /// Plans a demo journey, showing an alert for incomplete input.
    pub fn plan_demo_journey(&mut self, from: &str, to: &str) {
        if let Err(err) = self.dispatcher.plan_demo_journey(from, to) {
            self.show_alert(Alert::new(AlertKind::Warning, err.message()));
        }
    }

    /// Validates a contact form and returns the template params of the email.
    ///
    /// The form is kept for resubmission. An invalid form shows an alert.
    pub fn validate_contact(&mut self, form: ContactForm) -> Result<Map, Error> {
        let validation = form.validate();
        let params = form.template_params();
        self.contact = ContactPanel::Form(form);
        match validation {
            Ok(_) => Ok(params),
            Err(err) => {
                self.show_alert(Alert::new(AlertKind::Warning, err.message()));
                Err(err)
            }
        }
    }

    /// Completes a contact submission with the outcome of the delivery.
    ///
    /// A failure shows an alert with the manual contact address and keeps the form.
    pub fn complete_contact(&mut self, result: Result<(), Error>, fallback_email: &str) {
        match result {
            Ok(()) => {
                self.contact = ContactPanel::Sent;
                self.show_alert(Alert::new(AlertKind::Success, "contact_success"));
            }
            Err(err) => {
                tracing::error!("fail to send the contact email: {err}");
                self.show_alert(
                    Alert::new(AlertKind::Error, "contact_error").with_detail(fallback_email),
                );
            }
        }
    }

    /// Shows an empty contact form again.
    #[inline]
    pub fn reset_contact(&mut self) {
        self.contact = ContactPanel::Form(ContactForm::default());
    }

    /// Returns `true` if a result is waiting for its delay or the overlay is processing.
    pub fn is_processing(&self) -> bool {
        let now = Instant::now();
        let searching =
            matches!(self.search, SearchPanel::Results { ready_at, .. } if now < ready_at);
        let calculating = self.fare.as_ref().is_some_and(|(_, ready_at)| now < *ready_at);
        searching || calculating || self.dispatcher.state() == Some(ContainerState::Processing)
    }

    /// Renders the home page in the current language and consumes the pending alert.
    pub fn render_page(&mut self, views: &ViewEngine) -> Result<String, Error> {
        let now = Instant::now();
        let languages = LANGUAGE_BUTTONS.map(|(code, name)| {
            context! {
                code => code,
                name => name,
            }
        });
        let mut document = Document::new(HOME_PAGE)
            .with("languages", languages)
            .with("bus_stops", BUS_STOPS)
            .with("features", Feature::CARDS.map(Feature::card))
            .with("schedule", schedule_view(self.schedule_tab))
            .with("bus_markers", bus_markers(self.started_at.elapsed()))
            .with("processing", self.is_processing());

        if let Some(alert) = self.alert.take() {
            document.insert("alert", alert.view());
        }

        let search = match &self.search {
            SearchPanel::Empty => None,
            SearchPanel::Warning(key) => Some(context! { warning => key }),
            SearchPanel::Results { ready_at, .. } if now < *ready_at => {
                Some(context! { loading => true })
            }
            SearchPanel::Results { routes, .. } => {
                let routes = routes.iter().map(RouteOption::view).collect::<Vec<_>>();
                Some(context! { routes => routes })
            }
        };
        document.insert("search", search);

        let fare = self.fare.as_ref().map(|(quote, ready_at)| {
            if now < *ready_at {
                context! { loading => true }
            } else {
                quote.view()
            }
        });
        document.insert("fare", fare);

        let contact = match &self.contact {
            ContactPanel::Form(form) => form.view(),
            ContactPanel::Sent => context! { sent => true },
        };
        document.insert("contact", contact);

        let overlay = self.dispatcher.snapshot();
        let modal = overlay.view().filter(|_| overlay.is_visible()).map(|view| {
            context! {
                template => view.template_name(),
                view => view.data(),
            }
        });
        document.insert("modal", modal);
        document.insert("modal_visible", overlay.is_visible());
        document.insert("body_overflow", overlay.body_overflow().as_css());

        self.translator.apply_translations(&mut document, self.translator.language());
        views.render(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::{Alert, AlertKind, AppContext};
    use crate::{
        contact::ContactForm,
        error::Error,
        i18n::{Dictionary, Translator},
        simulation::{ScheduleTab, SimulationDelays},
        view::test_engine,
    };
    use std::{sync::Arc, time::Duration};

    impl AppContext {
        fn page(&mut self) -> String {
            self.render_page(&test_engine()).unwrap()
        }
    }

    fn context() -> AppContext {
        let en = "search_loading = Searching...\n\
                  search_results_title = Available Routes\n\
                  search_error = Please enter both locations\n\
                  fare_error = Please select both stops\n\
                  contact_error = Sending failed. Please write to\n\
                  contact_success = Message sent\n\
                  planner_error_same = Please choose different stops\n";
        let mr = "search_results_title = उपलब्ध मार्ग\n";
        let dictionary = Dictionary::from_sources("en", [("en", en), ("mr", mr)]).unwrap();
        AppContext::new(
            Translator::new(Arc::new(dictionary)),
            SimulationDelays::default(),
        )
    }

    fn contact_form() -> ContactForm {
        ContactForm {
            first_name: "Asha".to_owned(),
            last_name: "Patil".to_owned(),
            email: "asha@example.com".to_owned(),
            contact_number: "9876543210".to_owned(),
            program_name: "passenger".to_owned(),
            message: "Is KMT-05 running on Sundays?".to_owned(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn it_shows_search_results_after_the_delay() {
        let mut context = context();
        context.search_routes("", "Kalamba");
        let html = context.page();
        assert!(html.contains("Please enter both locations"));
        assert!(!context.is_processing());

        context.search_routes("Rankala Lake", "Kalamba");
        let html = context.page();
        assert!(html.contains("Searching..."));
        assert!(html.contains("http-equiv=\"refresh\""));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let html = context.page();
        assert!(html.contains("Available Routes"));
        assert!(html.contains("KMT-03"));
        assert!(!html.contains("http-equiv=\"refresh\""));

        assert!(context.set_language("marathi"));
        let html = context.page();
        assert!(html.contains("उपलब्ध मार्ग"));
        assert!(html.contains("lang=\"mr\""));
        assert!(html.contains("class=\"language-btn active\""));
    }

    #[tokio::test(start_paused = true)]
    async fn it_shows_alerts_once() {
        let mut context = context();
        context.calculate_fare("Rankala Lake", "", "student");
        assert_eq!(context.alert().map(Alert::kind), Some(AlertKind::Warning));
        assert!(context.page().contains("Please select both stops"));
        assert!(!context.page().contains("Please select both stops"));

        context.plan_demo_journey("Kalamba", "Kalamba");
        assert_eq!(context.alert().map(Alert::key), Some("planner_error_same"));
        assert!(context.fare().is_none());

        context.calculate_fare("Rankala Lake", "Kalamba", "senior");
        assert!(context.fare().is_none());
        tokio::time::sleep(Duration::from_millis(800)).await;
        let quote = context.fare().unwrap();
        assert_eq!(quote.final_fare(), (f64::from(quote.base_fare()) * 75.0).round() / 100.0);
    }

    #[tokio::test]
    async fn it_renders_the_open_overlay() {
        let mut context = context();
        let html = context.page();
        assert!(html.contains("id=\"feature-modal\" class=\"modal\" style=\"display: none\""));
        assert!(html.contains("<body>"));

        context.dispatcher_mut().show_feature_details("QR Tickets");
        let html = context.page();
        assert!(html.contains("style=\"display: block\""));
        assert!(html.contains("<body style=\"overflow: hidden\">"));
        assert!(html.contains("QR Code Ticketing System"));

        context.dispatcher_mut().close_modal();
        let html = context.page();
        assert!(html.contains("<body>"));
        assert!(html.contains("style=\"display: none\""));
        assert!(!html.contains("QR Code Ticketing System"));
    }

    #[tokio::test]
    async fn it_completes_contact_submissions() {
        let mut context = context();
        let mut invalid = contact_form();
        invalid.email = "asha".to_owned();
        assert!(context.validate_contact(invalid).is_err());
        assert_eq!(context.alert().map(Alert::key), Some("contact_error_email"));
        assert!(context.page().contains("value=\"Asha\""));

        let params = context.validate_contact(contact_form()).unwrap();
        assert_eq!(params["contact_number"], "9876543210");
        context.complete_contact(Err(Error::new("timed out")), "help@example.com");
        let html = context.page();
        assert!(html.contains("Sending failed. Please write to"));
        assert!(html.contains(" help@example.com"));
        assert!(html.contains("id=\"contact-form\""));

        context.complete_contact(Ok(()), "help@example.com");
        let html = context.page();
        assert!(!html.contains("id=\"contact-form\""));
        assert!(html.contains("/contact/reset"));

        context.reset_contact();
        assert!(context.page().contains("id=\"contact-form\""));
    }

    #[tokio::test]
    async fn it_switches_schedule_tabs() {
        let mut context = context();
        let html = context.page();
        assert!(html.contains("data-tab=\"weekday\""));

        context.select_schedule_tab(ScheduleTab::Weekend);
        let html = context.page();
        assert!(html.contains("class=\"schedule-tab active\" data-tab=\"weekend\""));
    }
}
