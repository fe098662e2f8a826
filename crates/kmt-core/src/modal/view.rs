use super::feature::Feature;
use crate::{
    simulation::{
        GoodsBooking, GoodsBookingForm, JourneyPlan, PLANNER_STOPS, PaidTicket, PaymentMethod,
        TicketOffer, TrackingInfo,
    },
    view::Document,
};
use minijinja::{Value, context};

/// The state of the overlay container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// Waiting for the visitor.
    Interactive,
    /// A simulated request is pending.
    Processing,
    /// The flow has finished.
    Terminal,
}

/// Progress of the journey planner demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerState {
    /// The planner form.
    Idle,
    /// A journey is being planned.
    Planning {
        /// Origin.
        from: String,
        /// Destination.
        to: String,
    },
    /// The recommended route.
    Planned(JourneyPlan),
}

/// Notification toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreferences {
    /// Bus arrival alerts.
    pub arrival_alerts: bool,
    /// Delay notifications.
    pub delay_notifications: bool,
    /// Route change alerts.
    pub route_changes: bool,
    /// Promotional offers.
    pub promotional_offers: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            arrival_alerts: true,
            delay_notifications: true,
            route_changes: false,
            promotional_offers: false,
        }
    }
}

/// A view rendered into the overlay container.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalView {
    /// Canned content of a feature.
    Feature(Feature),
    /// Placeholder for an unknown feature name.
    ComingSoon(String),
    /// Ticket details with the payment methods.
    Ticketing(TicketOffer),
    /// Payment in progress.
    ProcessingPayment(TicketOffer, PaymentMethod),
    /// Paid ticket.
    PaymentSuccess(PaidTicket),
    /// Goods booking form, with the values and the error of the last submission.
    GoodsBookingForm {
        /// Submitted values.
        form: GoodsBookingForm,
        /// Translation key of the validation error.
        error: Option<String>,
    },
    /// Goods booking in progress.
    ProcessingGoods(GoodsBooking),
    /// Confirmed goods booking.
    GoodsConfirmed(GoodsBooking),
    /// Star rating form.
    Rating,
    /// Rating acknowledgement.
    RatingThanks,
    /// Notification toggles.
    NotificationPreferences(NotificationPreferences),
    /// Preferences acknowledgement.
    PreferencesSaved,
    /// Journey planner with its demo.
    JourneyPlanner(PlannerState),
    /// Live tracking panel.
    Tracking(TrackingInfo),
}

impl ModalView {
    /// Returns the state of the container showing the view.
    pub fn state(&self) -> ContainerState {
        match self {
            Self::ProcessingPayment(..)
            | Self::ProcessingGoods(_)
            | Self::JourneyPlanner(PlannerState::Planning { .. }) => ContainerState::Processing,
            Self::PaymentSuccess(_)
            | Self::GoodsConfirmed(_)
            | Self::RatingThanks
            | Self::PreferencesSaved => ContainerState::Terminal,
            _ => ContainerState::Interactive,
        }
    }

    /// Returns the template of the view.
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::Feature(feature) => feature.template_name(),
            Self::ComingSoon(_) => "modal/coming_soon.html",
            Self::Ticketing(_) => "modal/ticketing.html",
            Self::ProcessingPayment(..) | Self::ProcessingGoods(_) => "modal/processing.html",
            Self::PaymentSuccess(_)
            | Self::GoodsConfirmed(_)
            | Self::RatingThanks
            | Self::PreferencesSaved => "modal/success.html",
            Self::GoodsBookingForm { .. } => "modal/goods_form.html",
            Self::Rating => "modal/rating.html",
            Self::NotificationPreferences(_) => "modal/preferences.html",
            Self::JourneyPlanner(_) => Feature::JourneyPlanner.template_name(),
            Self::Tracking(_) => "modal/tracking.html",
        }
    }

    /// Returns the data rendered by the template as the `view` variable.
    pub fn data(&self) -> Value {
        match self {
            Self::Feature(_) | Self::Rating => context! {},
            Self::ComingSoon(name) => context! { name => name },
            Self::Ticketing(offer) => ticketing_data(offer),
            Self::ProcessingPayment(..) => context! {
                title => "Processing Payment",
                message => "Please wait while we process your payment...",
            },
            Self::PaymentSuccess(ticket) => payment_success_data(ticket),
            Self::GoodsBookingForm { form, error } => goods_form_data(form, error.as_deref()),
            Self::ProcessingGoods(_) => context! {
                title => "Processing Your Booking",
                message => "Please wait while we process your goods transportation request...",
            },
            Self::GoodsConfirmed(booking) => goods_confirmed_data(booking),
            Self::RatingThanks => context! {
                title => "Thank You!",
                message => "Your feedback has been submitted successfully.",
            },
            Self::NotificationPreferences(preferences) => preferences_data(preferences),
            Self::PreferencesSaved => context! {
                title => "Preferences Saved!",
                message => "Your notification preferences have been updated successfully.",
            },
            Self::JourneyPlanner(state) => context! { planner => planner_data(state) },
            Self::Tracking(info) => info.view(),
        }
    }

    /// Returns a document rendering the view on its own.
    pub fn document(&self) -> Document {
        Document::new(self.template_name()).with("view", self.data())
    }
}

/// Formats an amount in rupees.
fn rupees(amount: u32) -> String {
    format!("₹{:.2}", f64::from(amount))
}

fn ticketing_data(offer: &TicketOffer) -> Value {
    let lines = [
        ("Route", offer.route_id().to_owned()),
        ("From", offer.from().to_owned()),
        ("To", offer.to().to_owned()),
        ("Departure", offer.departure().to_owned()),
        ("Ticket ID", offer.ticket_id().to_owned()),
        ("Price", rupees(offer.price())),
    ];
    let methods = PaymentMethod::ALL
        .into_iter()
        .map(|method| {
            context! {
                value => method.as_str(),
                label => method.label(),
                checked => method == PaymentMethod::default(),
            }
        })
        .collect::<Vec<_>>();
    context! {
        lines => lines,
        ticket_id => offer.ticket_id(),
        methods => methods,
    }
}

fn payment_success_data(ticket: &PaidTicket) -> Value {
    let offer = &ticket.offer;
    let lines = [
        ("Ticket ID", offer.ticket_id().to_owned()),
        ("Route", offer.route_id().to_owned()),
        ("From", offer.from().to_owned()),
        ("To", offer.to().to_owned()),
        ("Departure", offer.departure().to_owned()),
        ("Payment Method", ticket.method.label().to_owned()),
        ("Amount Paid", rupees(offer.price())),
    ];
    context! {
        title => "Payment Successful!",
        message => "Your ticket has been booked successfully.",
        lines => lines,
        note => "A copy of your ticket has been sent to your email and mobile number.",
        qr_code => offer.ticket_id(),
        qr_caption => "Show this QR code to the conductor when boarding",
    }
}

fn goods_form_data(form: &GoodsBookingForm, error: Option<&str>) -> Value {
    let selects = [
        select_data(
            "package-type",
            "package_type",
            "Package Type",
            "Select package type",
            &form.package_type,
            &[
                ("small", "Small Package (Up to 5kg)"),
                ("medium", "Medium Package (5-15kg)"),
                ("large", "Large Package (15-30kg)"),
            ],
        ),
        select_data(
            "delivery-time",
            "delivery_time",
            "Delivery Time",
            "Select delivery time",
            &form.delivery_time,
            &[
                ("same-day", "Same Day Delivery (Extra ₹50)"),
                ("next-day", "Next Day Delivery"),
                ("scheduled", "Scheduled Delivery"),
            ],
        ),
    ];
    context! {
        error => error,
        pickup_location => &form.pickup_location,
        delivery_location => &form.delivery_location,
        contact_number => &form.contact_number,
        special_instructions => &form.special_instructions,
        selects => selects,
    }
}

/// Returns a labeled select with the submitted value selected.
fn select_data(
    id: &str,
    name: &str,
    label: &str,
    prompt: &str,
    value: &str,
    options: &[(&str, &str)],
) -> Value {
    let options = options
        .iter()
        .map(|&(option, label)| {
            context! {
                value => option,
                label => label,
                selected => option == value,
            }
        })
        .collect::<Vec<_>>();
    context! {
        id => id,
        name => name,
        label => label,
        prompt => prompt,
        options => options,
    }
}

fn goods_confirmed_data(booking: &GoodsBooking) -> Value {
    let mut lines = vec![
        ("Booking ID", booking.booking_id().to_owned()),
        ("Pickup", booking.pickup_location().to_owned()),
        ("Delivery", booking.delivery_location().to_owned()),
        ("Package Type", booking.package().label().to_owned()),
        ("Delivery Type", booking.delivery_time().label().to_owned()),
        ("Contact Number", booking.contact_number().to_owned()),
    ];
    if let Some(instructions) = booking.special_instructions() {
        lines.push(("Special Instructions", instructions.to_owned()));
    }
    lines.push(("Amount", rupees(booking.price())));
    context! {
        title => "Booking Confirmed!",
        message => "Your goods transportation request has been confirmed.",
        lines => lines,
        note => "A confirmation has been sent to your phone number. \
                 Our team will contact you shortly for pickup arrangements.",
        qr_code => booking.booking_id(),
        qr_caption => "Your booking QR code for reference",
    }
}

fn preferences_data(preferences: &NotificationPreferences) -> Value {
    let toggles = [
        (
            "arrival_alerts",
            preferences.arrival_alerts,
            "Bus Arrival Alerts",
            "Get notified when your bus is approaching your stop",
        ),
        (
            "delay_notifications",
            preferences.delay_notifications,
            "Delay Notifications",
            "Receive updates when your bus is delayed",
        ),
        (
            "route_changes",
            preferences.route_changes,
            "Route Changes",
            "Get alerts about temporary route changes",
        ),
        (
            "promotional_offers",
            preferences.promotional_offers,
            "Promotional Offers",
            "Receive information about discounts and special offers",
        ),
    ]
    .into_iter()
    .map(|(name, checked, title, description)| {
        context! {
            name => name,
            checked => checked,
            title => title,
            description => description,
        }
    })
    .collect::<Vec<_>>();
    context! { toggles => toggles }
}

fn planner_data(state: &PlannerState) -> Value {
    match state {
        PlannerState::Idle => context! { stops => PLANNER_STOPS },
        PlannerState::Planning { .. } => context! {
            stops => PLANNER_STOPS,
            planning => true,
        },
        PlannerState::Planned(plan) => context! { plan => plan.summary() },
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainerState, ModalView, NotificationPreferences, PlannerState};
    use crate::simulation::{
        GoodsBooking, GoodsBookingForm, JourneyPlan, PaidTicket, PaymentMethod, TicketOffer,
    };
    use crate::view::test_engine;
    use rand::{SeedableRng, rngs::StdRng};

    fn render(view: &ModalView) -> String {
        test_engine().render(&view.document()).unwrap()
    }

    fn terminal_views() -> Vec<ModalView> {
        let mut rng = StdRng::seed_from_u64(1);
        let offer =
            TicketOffer::generate("KMT-01", "Rankala Lake", "Kalamba", "07:30 AM", &mut rng);
        let form = GoodsBookingForm {
            pickup_location: "Market Yard".to_owned(),
            delivery_location: "Shahupuri".to_owned(),
            package_type: "small".to_owned(),
            delivery_time: "next-day".to_owned(),
            contact_number: "9876543210".to_owned(),
            special_instructions: "Fragile".to_owned(),
        };
        let booking = GoodsBooking::quote(&form, &mut rng).unwrap();
        vec![
            ModalView::PaymentSuccess(PaidTicket {
                offer,
                method: PaymentMethod::Card,
            }),
            ModalView::GoodsConfirmed(booking),
            ModalView::RatingThanks,
            ModalView::PreferencesSaved,
        ]
    }

    #[test]
    fn it_offers_close_on_terminal_views() {
        for view in terminal_views() {
            assert_eq!(view.state(), ContainerState::Terminal);
            let html = render(&view);
            assert_eq!(html.matches("action=\"/modal/close\"").count(), 1, "{view:?}");
            assert!(html.contains("modal-close-form"));
        }
    }

    #[test]
    fn it_classifies_container_states() {
        let mut rng = StdRng::seed_from_u64(2);
        let offer =
            TicketOffer::generate("KMT-03", "Kalamba", "New Palace", "08:00 AM", &mut rng);
        assert_eq!(
            ModalView::Ticketing(offer.clone()).state(),
            ContainerState::Interactive
        );
        assert_eq!(
            ModalView::ProcessingPayment(offer, PaymentMethod::Upi).state(),
            ContainerState::Processing
        );
        let planning = PlannerState::Planning {
            from: "Rankala Lake".to_owned(),
            to: "New Palace".to_owned(),
        };
        assert_eq!(
            ModalView::JourneyPlanner(planning).state(),
            ContainerState::Processing
        );
        assert_eq!(
            ModalView::NotificationPreferences(NotificationPreferences::default()).state(),
            ContainerState::Interactive
        );
    }

    #[test]
    fn it_renders_planner_states() {
        let idle = render(&ModalView::JourneyPlanner(PlannerState::Idle));
        assert!(idle.contains("id=\"journey-planner-demo\""));
        assert!(idle.contains("id=\"demo-from\""));
        assert!(!idle.contains("Planning your journey..."));

        let planning = PlannerState::Planning {
            from: "Rankala Lake".to_owned(),
            to: "New Palace".to_owned(),
        };
        assert!(render(&ModalView::JourneyPlanner(planning)).contains("Planning your journey..."));

        let mut rng = StdRng::seed_from_u64(4);
        let plan = JourneyPlan::generate("Rankala Lake", "New Palace", &mut rng).unwrap();
        let route_id = plan.route_id().to_owned();
        let planned = render(&ModalView::JourneyPlanner(PlannerState::Planned(plan)));
        assert!(planned.contains("Recommended Route"));
        assert!(planned.contains(&format!("<strong>Route:</strong> {route_id}")));
        assert!(planned.contains("Plan Another Journey"));
        assert!(!planned.contains("id=\"demo-from\""));
    }

    #[test]
    fn it_keeps_goods_form_values() {
        let form = GoodsBookingForm {
            pickup_location: "Market Yard".to_owned(),
            package_type: "medium".to_owned(),
            ..GoodsBookingForm::default()
        };
        let view = ModalView::GoodsBookingForm {
            form,
            error: Some("goods_error_locations".to_owned()),
        };
        let html = render(&view);
        assert!(html.contains("value=\"Market Yard\""));
        assert!(html.contains("<option value=\"medium\" selected=\"selected\">"));
        assert!(html.contains("<option value=\"small\">"));
        assert!(html.contains("data-translate=\"goods_error_locations\""));
    }

    #[test]
    fn it_renders_default_preferences() {
        let view = ModalView::NotificationPreferences(NotificationPreferences::default());
        let html = render(&view);
        assert_eq!(html.matches("checked=\"checked\"").count(), 2);
        assert!(html.contains("name=\"arrival_alerts\" value=\"on\" checked=\"checked\""));
        assert!(html.contains("name=\"delay_notifications\" value=\"on\" checked=\"checked\""));
        assert!(html.contains("name=\"route_changes\" value=\"on\">"));
    }

    #[test]
    fn it_renders_coming_soon_placeholders() {
        let html = render(&ModalView::ComingSoon("Bike Sharing".to_owned()));
        assert!(html.contains("<h2>Bike Sharing</h2>"));
        assert!(html.contains("Please check back soon."));
    }

    #[test]
    fn it_selects_the_default_payment_method() {
        let mut rng = StdRng::seed_from_u64(3);
        let offer =
            TicketOffer::generate("KMT-05", "Kalamba", "Shahupuri", "08:30 AM", &mut rng);
        let html = render(&ModalView::Ticketing(offer.clone()));
        let default_method = PaymentMethod::default().as_str();
        assert!(html.contains(&format!("value=\"{default_method}\" checked=\"checked\"")));
        assert_eq!(html.matches("checked=\"checked\"").count(), 1);
        assert!(html.contains(&format!("name=\"ticket_id\" value=\"{}\"", offer.ticket_id())));
        assert!(html.contains(&format!("₹{:.2}", f64::from(offer.price()))));
    }
}
