use crate::{error::Error, warn};
use minijinja::{Value, context};
use std::{fmt, str::FromStr};

/// A feature with canned overlay content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// The upcoming mobile application.
    MobileApp,
    /// Real-time notifications.
    Notifications,
    /// QR code ticketing.
    QrTickets,
    /// Digital payment options.
    DigitalPayments,
    /// Multilingual support.
    Multilingual,
    /// The journey planner with its demo.
    JourneyPlanner,
    /// Goods transportation services.
    GoodsTransport,
}

impl Feature {
    /// Features shown as cards on the home page.
    pub const CARDS: [Self; 6] = [
        Self::MobileApp,
        Self::Notifications,
        Self::QrTickets,
        Self::DigitalPayments,
        Self::Multilingual,
        Self::JourneyPlanner,
    ];

    /// Returns the canonical English title used as the feature name.
    pub fn title(self) -> &'static str {
        match self {
            Self::MobileApp => "Mobile App",
            Self::Notifications => "Notifications",
            Self::QrTickets => "QR Tickets",
            Self::DigitalPayments => "Digital Payments",
            Self::Multilingual => "Multilingual",
            Self::JourneyPlanner => "Journey Planner",
            Self::GoodsTransport => "Goods Transport",
        }
    }

    /// Returns the translation key of the card title.
    pub fn title_key(self) -> &'static str {
        match self {
            Self::MobileApp => "feature_mobile_app_title",
            Self::Notifications => "feature_notifications_title",
            Self::QrTickets => "feature_qr_tickets_title",
            Self::DigitalPayments => "feature_payments_title",
            Self::Multilingual => "feature_multilingual_title",
            Self::JourneyPlanner => "feature_journey_planner_title",
            Self::GoodsTransport => "goods_title",
        }
    }

    /// Returns the translation key of the card summary.
    pub fn summary_key(self) -> &'static str {
        match self {
            Self::MobileApp => "feature_mobile_app_desc",
            Self::Notifications => "feature_notifications_desc",
            Self::QrTickets => "feature_qr_tickets_desc",
            Self::DigitalPayments => "feature_payments_desc",
            Self::Multilingual => "feature_multilingual_desc",
            Self::JourneyPlanner => "feature_journey_planner_desc",
            Self::GoodsTransport => "goods_desc",
        }
    }

    /// Returns the CSS class of the card icon.
    pub fn icon(self) -> &'static str {
        match self {
            Self::MobileApp => "fas fa-mobile-alt",
            Self::Notifications => "fas fa-bell",
            Self::QrTickets => "fas fa-qrcode",
            Self::DigitalPayments => "fas fa-credit-card",
            Self::Multilingual => "fas fa-language",
            Self::JourneyPlanner => "fas fa-route",
            Self::GoodsTransport => "fas fa-truck",
        }
    }

    /// Returns the template of the canned content.
    pub fn template_name(self) -> &'static str {
        match self {
            Self::MobileApp => "features/mobile_app.html",
            Self::Notifications => "features/notifications.html",
            Self::QrTickets => "features/qr_tickets.html",
            Self::DigitalPayments => "features/digital_payments.html",
            Self::Multilingual => "features/multilingual.html",
            Self::JourneyPlanner => "features/journey_planner.html",
            Self::GoodsTransport => "features/goods_transport.html",
        }
    }

    /// Returns the card shown on the home page.
    pub(crate) fn card(self) -> Value {
        context! {
            title => self.title(),
            icon => self.icon(),
            title_key => self.title_key(),
            summary_key => self.summary_key(),
        }
    }
}

impl fmt::Display for Feature {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::CARDS
            .into_iter()
            .chain([Self::GoodsTransport])
            .find(|feature| feature.title().eq_ignore_ascii_case(name))
            .ok_or_else(|| warn!("unknown feature `{name}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::Feature;
    use crate::view::{Document, test_engine};

    fn render(feature: Feature) -> String {
        let document = Document::new(feature.template_name()).with("view", minijinja::context! {});
        test_engine().render(&document).unwrap()
    }

    #[test]
    fn it_parses_feature_names() {
        assert_eq!("QR Tickets".parse::<Feature>().unwrap(), Feature::QrTickets);
        assert_eq!(" mobile app ".parse::<Feature>().unwrap(), Feature::MobileApp);
        assert_eq!(
            "Goods Transport".parse::<Feature>().unwrap(),
            Feature::GoodsTransport
        );
        assert!("Bike Sharing".parse::<Feature>().is_err());
        for feature in Feature::CARDS {
            assert_eq!(feature.title().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn it_renders_distinct_content() {
        let qr_tickets = render(Feature::QrTickets);
        assert!(qr_tickets.contains("QR Code Ticketing System"));
        assert!(!qr_tickets.contains("Coming Soon"));

        let mobile_app = render(Feature::MobileApp);
        assert!(mobile_app.contains("Coming Soon"));
        assert!(!mobile_app.contains("QR Code Ticketing System"));

        let payments = render(Feature::DigitalPayments);
        assert!(payments.contains("BHIM"));
        assert!(payments.contains("Net Banking"));
    }

    #[test]
    fn it_has_a_template_for_every_feature() {
        let features = Feature::CARDS.into_iter().chain([Feature::GoodsTransport]);
        let mut template_names = features.map(Feature::template_name).collect::<Vec<_>>();
        template_names.dedup();
        assert_eq!(template_names.len(), 7);

        let journey_planner = render(Feature::JourneyPlanner);
        assert!(journey_planner.contains("id=\"journey-planner-demo\""));
        assert!(!journey_planner.contains("id=\"demo-from\""));
        assert!(render(Feature::GoodsTransport).contains("action=\"/goods/form\""));
    }
}
