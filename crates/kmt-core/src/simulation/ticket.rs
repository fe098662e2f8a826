use super::random_code;
use crate::{error::Error, warn};
use rand::Rng;
use std::str::FromStr;

/// A payment method offered for a ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentMethod {
    /// UPI.
    #[default]
    Upi,
    /// Credit or debit card.
    Card,
    /// Digital wallet.
    Wallet,
}

impl PaymentMethod {
    /// All payment methods in display order.
    pub const ALL: [Self; 3] = [Self::Upi, Self::Card, Self::Wallet];

    /// Returns the form value.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::Card => "card",
            Self::Wallet => "wallet",
        }
    }

    /// Returns the display label.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Credit/Debit Card",
            Self::Wallet => "Digital Wallet",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s.trim())
            .ok_or_else(|| warn!("unsupported payment method `{s}`"))
    }
}

/// A ticket offered for a route but not paid yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOffer {
    /// Ticket ID such as `KMT-4F9Q1ZXA`.
    ticket_id: String,
    /// Route ID.
    route_id: String,
    /// Origin.
    from: String,
    /// Destination.
    to: String,
    /// Departure time.
    departure: String,
    /// Price in rupees, in `[20, 50)`.
    price: u32,
}

impl TicketOffer {
    /// Generates an offer with a random ticket ID and price.
    pub fn generate(
        route_id: &str,
        from: &str,
        to: &str,
        departure: &str,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            ticket_id: format!("KMT-{}", random_code(rng, 8)),
            route_id: route_id.trim().to_owned(),
            from: from.trim().to_owned(),
            to: to.trim().to_owned(),
            departure: departure.trim().to_owned(),
            price: rng.random_range(20..50),
        }
    }

    /// Returns the ticket ID.
    #[inline]
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    /// Returns the route ID.
    #[inline]
    pub fn route_id(&self) -> &str {
        &self.route_id
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

    /// Returns the departure time.
    #[inline]
    pub fn departure(&self) -> &str {
        &self.departure
    }

    /// Returns the price.
    #[inline]
    pub fn price(&self) -> u32 {
        self.price
    }
}

/// A ticket which has been paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaidTicket {
    /// The offer.
    pub offer: TicketOffer,
    /// Payment method.
    pub method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::{PaymentMethod, TicketOffer};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_generates_ticket_offers() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let offer =
                TicketOffer::generate("KMT-03", "Kalamba", "New Palace", "08:00 AM", &mut rng);
            assert!((20..50).contains(&offer.price()));
            let suffix = offer.ticket_id().strip_prefix("KMT-").unwrap();
            assert_eq!(suffix.len(), 8);
            assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert_eq!(offer.route_id(), "KMT-03");
        }
    }

    #[test]
    fn it_parses_payment_methods() {
        assert_eq!("wallet".parse::<PaymentMethod>().unwrap(), PaymentMethod::Wallet);
        assert_eq!(PaymentMethod::Card.label(), "Credit/Debit Card");
        assert!("cash".parse::<PaymentMethod>().is_err());
    }
}
