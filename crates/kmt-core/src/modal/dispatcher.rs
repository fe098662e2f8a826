use super::{
    feature::Feature,
    overlay::Overlay,
    view::{ContainerState, ModalView, NotificationPreferences, PlannerState},
};
use crate::{
    error::Error,
    simulation::{
        GoodsBooking, GoodsBookingForm, JourneyPlan, PaidTicket, PaymentMethod, SimulationDelays,
        TicketOffer, TrackingInfo,
    },
    view::Overflow,
    warn,
};
use parking_lot::Mutex;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// A flag which cancels a pending step once set.
pub type CancellationToken = Arc<AtomicBool>;

/// Maximum number of stars of a rating.
const MAX_STARS: u8 = 5;

/// Dispatcher of the overlay flows of a visitor.
///
/// Every action supersedes the pending delayed step, if any, so a stale
/// step never overwrites the container.
#[derive(Debug)]
pub struct ModalDispatcher {
    /// Overlay shared with the delayed steps.
    overlay: Arc<Mutex<Overlay>>,
    /// Token of the pending delayed step.
    pending: Option<CancellationToken>,
    /// Delays of the simulated requests.
    delays: SimulationDelays,
}

impl ModalDispatcher {
    /// Creates a new instance with a hidden overlay.
    #[inline]
    pub fn new(delays: SimulationDelays) -> Self {
        Self::with_overlay(Overlay::default(), delays)
    }

    /// Creates a new instance with the overlay.
    #[inline]
    pub fn with_overlay(overlay: Overlay, delays: SimulationDelays) -> Self {
        Self {
            overlay: Arc::new(Mutex::new(overlay)),
            pending: None,
            delays,
        }
    }

    /// Returns a copy of the overlay.
    #[inline]
    pub fn snapshot(&self) -> Overlay {
        self.overlay.lock().clone()
    }

    /// Returns `true` if the overlay is shown.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.overlay.lock().is_visible()
    }

    /// Returns the state of the container.
    #[inline]
    pub fn state(&self) -> Option<ContainerState> {
        self.overlay.lock().state()
    }

    /// Returns the background overflow.
    #[inline]
    pub fn body_overflow(&self) -> Overflow {
        self.overlay.lock().body_overflow()
    }

    /// Returns `true` if a delayed step has not been superseded yet.
    ///
    /// The step may have completed already.
    #[inline]
    pub fn has_pending_step(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|token| !token.load(Ordering::Acquire))
    }

    /// Shows the canned content of a feature.
    ///
    /// Unknown names show a "coming soon" placeholder.
    pub fn show_feature_details(&mut self, feature_name: &str) {
        let view = match feature_name.parse::<Feature>() {
            Ok(Feature::JourneyPlanner) => ModalView::JourneyPlanner(PlannerState::Idle),
            Ok(feature) => ModalView::Feature(feature),
            Err(_) => ModalView::ComingSoon(feature_name.trim().to_owned()),
        };
        self.open(view);
    }

    /// Hides the overlay and restores background scrolling. Idempotent.
    pub fn close_modal(&mut self) {
        self.supersede();
        self.overlay.lock().close();
    }

    /// Shows a ticket offer for the route with the payment methods.
    pub fn show_ticketing_options(&mut self, route_id: &str, from: &str, to: &str, departure: &str) {
        let offer = TicketOffer::generate(route_id, from, to, departure, &mut rand::rng());
        tracing::info!(
            ticket_id = offer.ticket_id(),
            route_id = offer.route_id(),
            price = offer.price(),
            "ticket offered"
        );
        self.open(ModalView::Ticketing(offer));
    }

    /// Pays the ticket shown in the overlay.
    ///
    /// The container shows the processing view until the payment delay has passed.
    pub fn process_payment(&mut self, ticket_id: &str, method: PaymentMethod) -> Result<(), Error> {
        let offer = match self.overlay.lock().view() {
            Some(ModalView::Ticketing(offer)) if offer.ticket_id() == ticket_id.trim() => {
                offer.clone()
            }
            _ => return Err(warn!("ticket `{ticket_id}` is not awaiting payment")),
        };
        self.open(ModalView::ProcessingPayment(offer.clone(), method));

        let paid = PaidTicket { offer, method };
        tracing::info!(
            ticket_id = paid.offer.ticket_id(),
            method = method.as_str(),
            "payment started"
        );
        self.schedule(self.delays.payment, ModalView::PaymentSuccess(paid));
        Ok(())
    }

    /// Shows the goods transportation services.
    #[inline]
    pub fn show_goods_transport_info(&mut self) {
        self.open(ModalView::Feature(Feature::GoodsTransport));
    }

    /// Shows an empty goods booking form.
    #[inline]
    pub fn show_goods_booking_form(&mut self) {
        self.open(ModalView::GoodsBookingForm {
            form: GoodsBookingForm::default(),
            error: None,
        });
    }

    /// Books the goods transportation.
    ///
    /// An invalid form is shown again with the error, whose message is the
    /// translation key of the warning. Otherwise the container shows the
    /// processing view until the goods delay has passed.
    pub fn process_goods_booking(&mut self, form: GoodsBookingForm) -> Result<(), Error> {
        let booking = match GoodsBooking::quote(&form, &mut rand::rng()) {
            Ok(booking) => booking,
            Err(err) => {
                tracing::warn!(error = err.message(), "invalid goods booking");
                self.open(ModalView::GoodsBookingForm {
                    form,
                    error: Some(err.message().to_owned()),
                });
                return Err(err);
            }
        };
        tracing::info!(
            booking_id = booking.booking_id(),
            price = booking.price(),
            "goods booking started"
        );
        self.open(ModalView::ProcessingGoods(booking.clone()));
        self.schedule(self.delays.goods, ModalView::GoodsConfirmed(booking));
        Ok(())
    }

    /// Shows the star rating form.
    #[inline]
    pub fn show_rating(&mut self) {
        self.open(ModalView::Rating);
    }

    /// Records a rating of up to five stars and thanks the visitor.
    pub fn submit_rating(&mut self, stars: u8, feedback: &str) -> Result<(), Error> {
        if stars > MAX_STARS {
            return Err(warn!("a rating has at most {MAX_STARS} stars, got {stars}"));
        }
        tracing::info!(stars, feedback = feedback.trim(), "rating submitted");
        self.open(ModalView::RatingThanks);
        Ok(())
    }

    /// Shows the notification toggles with their defaults.
    #[inline]
    pub fn show_notification_preferences(&mut self) {
        self.open(ModalView::NotificationPreferences(
            NotificationPreferences::default(),
        ));
    }

    /// Records the notification toggles.
    pub fn save_notification_preferences(&mut self, preferences: NotificationPreferences) {
        tracing::info!(
            arrival_alerts = preferences.arrival_alerts,
            delay_notifications = preferences.delay_notifications,
            route_changes = preferences.route_changes,
            promotional_offers = preferences.promotional_offers,
            "notification preferences saved"
        );
        self.open(ModalView::PreferencesSaved);
    }

    /// Plans a demo journey in the journey planner.
    ///
    /// Both stops are required and must differ; the error message is the
    /// translation key of the alert to show. The planner shows the loading
    /// indicator until the planner delay has passed.
    pub fn plan_demo_journey(&mut self, from: &str, to: &str) -> Result<(), Error> {
        let plan = JourneyPlan::generate(from, to, &mut rand::rng())?;
        self.open(ModalView::JourneyPlanner(PlannerState::Planning {
            from: plan.from().to_owned(),
            to: plan.to().to_owned(),
        }));
        self.schedule(
            self.delays.planner,
            ModalView::JourneyPlanner(PlannerState::Planned(plan)),
        );
        Ok(())
    }

    /// Shows the journey planner form again.
    #[inline]
    pub fn reset_demo_planner(&mut self) {
        self.open(ModalView::JourneyPlanner(PlannerState::Idle));
    }

    /// Shows the live tracking panel of the route.
    #[inline]
    pub fn track_bus(&mut self, route_id: &str) {
        self.open(ModalView::Tracking(TrackingInfo::for_route(route_id)));
    }

    /// Cancels the pending delayed step.
    fn supersede(&mut self) {
        if let Some(token) = self.pending.take() {
            token.store(true, Ordering::Release);
        }
    }

    /// Supersedes the pending step and shows the view.
    fn open(&mut self, view: ModalView) {
        self.supersede();
        self.overlay.lock().open(view);
    }

    /// Shows the view after the delay unless superseded in the meantime.
    fn schedule(&mut self, delay: Duration, view: ModalView) {
        let token = CancellationToken::default();
        self.pending = Some(token.clone());

        let overlay = self.overlay.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut overlay = overlay.lock();
            if token.load(Ordering::Acquire) {
                tracing::debug!("superseded step discarded");
            } else {
                overlay.replace(view);
            }
        });
    }
}

impl Drop for ModalDispatcher {
    fn drop(&mut self) {
        self.supersede();
    }
}

#[cfg(test)]
mod tests {
    use super::ModalDispatcher;
    use crate::{
        modal::{ContainerState, Feature, ModalView, NotificationPreferences, Overlay, PlannerState},
        simulation::{GoodsBookingForm, PaymentMethod, SimulationDelays},
        view::{Overflow, test_engine},
    };
    use std::time::Duration;

    fn render(view: &ModalView) -> String {
        test_engine().render(&view.document()).unwrap()
    }

    fn ticket_id(dispatcher: &ModalDispatcher) -> String {
        match dispatcher.snapshot().view() {
            Some(ModalView::Ticketing(offer)) => offer.ticket_id().to_owned(),
            view => panic!("unexpected view {view:?}"),
        }
    }

    fn goods_form() -> GoodsBookingForm {
        GoodsBookingForm {
            pickup_location: "Market Yard".to_owned(),
            delivery_location: "Rajarampuri".to_owned(),
            package_type: "large".to_owned(),
            delivery_time: "same-day".to_owned(),
            contact_number: "9876543210".to_owned(),
            special_instructions: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn it_completes_payments_after_the_delay() {
        let mut dispatcher = ModalDispatcher::new(SimulationDelays::default());
        dispatcher.show_ticketing_options("KMT-01", "Rankala Lake", "Kalamba", "07:30 AM");
        let ticket_id = ticket_id(&dispatcher);
        assert!(dispatcher.process_payment("KMT-00000000", PaymentMethod::Upi).is_err());

        dispatcher.process_payment(&ticket_id, PaymentMethod::Wallet).unwrap();
        assert_eq!(dispatcher.state(), Some(ContainerState::Processing));

        tokio::time::sleep(Duration::from_millis(1_900)).await;
        assert_eq!(dispatcher.state(), Some(ContainerState::Processing));

        tokio::time::sleep(Duration::from_millis(200)).await;
        match dispatcher.snapshot().view() {
            Some(ModalView::PaymentSuccess(paid)) => {
                assert_eq!(paid.offer.ticket_id(), ticket_id);
                assert_eq!(paid.method, PaymentMethod::Wallet);
            }
            view => panic!("unexpected view {view:?}"),
        }
        assert_eq!(dispatcher.state(), Some(ContainerState::Terminal));
    }

    #[tokio::test(start_paused = true)]
    async fn it_discards_superseded_steps() {
        let mut dispatcher = ModalDispatcher::new(SimulationDelays::default());
        dispatcher.process_goods_booking(goods_form()).unwrap();
        assert!(dispatcher.has_pending_step());

        dispatcher.show_feature_details("QR Tickets");
        assert!(!dispatcher.has_pending_step());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            dispatcher.snapshot().view(),
            Some(&ModalView::Feature(Feature::QrTickets))
        );

        dispatcher.plan_demo_journey("Rankala Lake", "New Palace").unwrap();
        dispatcher.close_modal();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!dispatcher.is_visible());
        assert!(dispatcher.snapshot().view().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn it_plans_demo_journeys() {
        let mut dispatcher = ModalDispatcher::new(SimulationDelays::default());
        dispatcher.show_feature_details("journey planner");
        assert_eq!(
            dispatcher.snapshot().view(),
            Some(&ModalView::JourneyPlanner(PlannerState::Idle))
        );

        let err = dispatcher.plan_demo_journey("Rankala Lake", "").unwrap_err();
        assert_eq!(err.message(), "planner_error_missing");
        let err = dispatcher.plan_demo_journey("Rankala Lake", "Rankala Lake").unwrap_err();
        assert_eq!(err.message(), "planner_error_same");

        dispatcher.plan_demo_journey("Rankala Lake", "New Palace").unwrap();
        assert_eq!(dispatcher.state(), Some(ContainerState::Processing));
        tokio::time::sleep(Duration::from_millis(1_600)).await;
        match dispatcher.snapshot().view() {
            Some(ModalView::JourneyPlanner(PlannerState::Planned(plan))) => {
                assert_eq!(plan.from(), "Rankala Lake");
                assert_eq!(plan.to(), "New Palace");
            }
            view => panic!("unexpected view {view:?}"),
        }

        dispatcher.reset_demo_planner();
        assert_eq!(dispatcher.state(), Some(ContainerState::Interactive));
    }

    #[tokio::test]
    async fn it_does_not_leak_feature_content() {
        let mut dispatcher = ModalDispatcher::new(SimulationDelays::default());
        dispatcher.show_feature_details("Mobile App");
        dispatcher.close_modal();
        dispatcher.show_feature_details("QR Tickets");
        let overlay = dispatcher.snapshot();
        let html = overlay.view().map(render).unwrap();
        assert!(html.contains("QR Code Ticketing System"));
        assert!(!html.contains("Mobile App"));

        dispatcher.show_feature_details("Bike Sharing");
        assert_eq!(
            dispatcher.snapshot().view(),
            Some(&ModalView::ComingSoon("Bike Sharing".to_owned()))
        );
    }

    #[tokio::test]
    async fn it_restores_scrolling_on_close() {
        let overlay = Overlay::with_body_overflow(Overflow::Auto);
        let mut dispatcher = ModalDispatcher::with_overlay(overlay, SimulationDelays::default());
        dispatcher.show_feature_details("Notifications");
        dispatcher.show_goods_transport_info();
        dispatcher.show_goods_booking_form();
        assert_eq!(dispatcher.body_overflow(), Overflow::Hidden);

        dispatcher.close_modal();
        dispatcher.close_modal();
        assert_eq!(dispatcher.body_overflow(), Overflow::Auto);
    }

    #[tokio::test]
    async fn it_shows_goods_form_errors() {
        let mut dispatcher = ModalDispatcher::new(SimulationDelays::default());
        let mut form = goods_form();
        form.delivery_location.clear();
        let err = dispatcher.process_goods_booking(form).unwrap_err();
        assert_eq!(err.message(), "goods_error_locations");
        match dispatcher.snapshot().view() {
            Some(ModalView::GoodsBookingForm { form, error }) => {
                assert_eq!(form.pickup_location, "Market Yard");
                assert_eq!(error.as_deref(), Some("goods_error_locations"));
            }
            view => panic!("unexpected view {view:?}"),
        }
        assert!(!dispatcher.has_pending_step());
    }

    #[tokio::test]
    async fn it_finishes_rating_and_preferences() {
        let mut dispatcher = ModalDispatcher::new(SimulationDelays::default());
        dispatcher.show_rating();
        assert!(dispatcher.submit_rating(6, "").is_err());
        dispatcher.submit_rating(4, "Clean buses").unwrap();
        assert_eq!(dispatcher.snapshot().view(), Some(&ModalView::RatingThanks));

        dispatcher.show_notification_preferences();
        let preferences = NotificationPreferences {
            promotional_offers: true,
            ..NotificationPreferences::default()
        };
        dispatcher.save_notification_preferences(preferences);
        assert_eq!(dispatcher.state(), Some(ContainerState::Terminal));

        dispatcher.track_bus("KMT-05");
        let html = dispatcher.snapshot().view().map(render);
        assert!(html.is_some_and(|html| html.contains("Live Tracking - KMT-05")));
    }
}
