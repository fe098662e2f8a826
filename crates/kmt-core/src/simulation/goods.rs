use super::random_code;
use crate::error::Error;
use rand::Rng;
use serde::Deserialize;
use std::{ops::RangeInclusive, str::FromStr};

/// Surcharge for the same-day delivery.
const SAME_DAY_SURCHARGE: u32 = 50;

/// Size class of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSize {
    /// Up to 5kg.
    Small,
    /// 5-15kg.
    Medium,
    /// 15-30kg.
    Large,
}

impl PackageSize {
    /// Returns the display label.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    /// Returns the range of the base price in rupees.
    #[inline]
    pub fn price_range(self) -> RangeInclusive<u32> {
        match self {
            Self::Small => 50..=100,
            Self::Medium => 100..=200,
            Self::Large => 200..=350,
        }
    }
}

impl FromStr for PackageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(Error::new(format!("invalid package type `{s}`"))),
        }
    }
}

/// Delivery option of a goods booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTime {
    /// Same-day delivery.
    SameDay,
    /// Next-day delivery.
    NextDay,
    /// Scheduled delivery.
    Scheduled,
}

impl DeliveryTime {
    /// Returns the display label.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::SameDay => "Same Day",
            Self::NextDay => "Next Day",
            Self::Scheduled => "Scheduled",
        }
    }

    /// Returns the surcharge in rupees.
    #[inline]
    pub fn surcharge(self) -> u32 {
        match self {
            Self::SameDay => SAME_DAY_SURCHARGE,
            _ => 0,
        }
    }
}

impl FromStr for DeliveryTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "same-day" => Ok(Self::SameDay),
            "next-day" => Ok(Self::NextDay),
            "scheduled" => Ok(Self::Scheduled),
            _ => Err(Error::new(format!("invalid delivery time `{s}`"))),
        }
    }
}

/// Submitted values of the goods booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GoodsBookingForm {
    /// Pickup address.
    pub pickup_location: String,
    /// Delivery address.
    pub delivery_location: String,
    /// One of `small`, `medium` or `large`.
    pub package_type: String,
    /// One of `same-day`, `next-day` or `scheduled`.
    pub delivery_time: String,
    /// Phone number.
    pub contact_number: String,
    /// Optional handling instructions.
    pub special_instructions: String,
}

impl GoodsBookingForm {
    /// Validates the form.
    ///
    /// The error message is the translation key of the alert to show.
    pub fn validate(&self) -> Result<(PackageSize, DeliveryTime), Error> {
        if self.pickup_location.trim().is_empty() || self.delivery_location.trim().is_empty() {
            return Err(Error::new("goods_error_locations"));
        }

        let package = self
            .package_type
            .parse::<PackageSize>()
            .map_err(|err| Error::with_source("goods_error_package", err))?;
        let delivery_time = self
            .delivery_time
            .parse::<DeliveryTime>()
            .map_err(|err| Error::with_source("goods_error_delivery", err))?;
        if self.contact_number.trim().is_empty() {
            return Err(Error::new("goods_error_contact"));
        }
        Ok((package, delivery_time))
    }
}

/// A confirmed goods transportation booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodsBooking {
    /// Booking ID such as `KMT-G-7Q2ZK0AB`.
    booking_id: String,
    /// Pickup address.
    pickup_location: String,
    /// Delivery address.
    delivery_location: String,
    /// Package size.
    package: PackageSize,
    /// Delivery option.
    delivery_time: DeliveryTime,
    /// Phone number.
    contact_number: String,
    /// Handling instructions.
    special_instructions: Option<String>,
    /// Price in rupees.
    price: u32,
}

impl GoodsBooking {
    /// Validates the form and quotes a random price for the booking.
    pub fn quote(form: &GoodsBookingForm, rng: &mut impl Rng) -> Result<Self, Error> {
        let (package, delivery_time) = form.validate()?;
        let instructions = form.special_instructions.trim();
        Ok(Self {
            booking_id: format!("KMT-G-{}", random_code(rng, 8)),
            pickup_location: form.pickup_location.trim().to_owned(),
            delivery_location: form.delivery_location.trim().to_owned(),
            package,
            delivery_time,
            contact_number: form.contact_number.trim().to_owned(),
            special_instructions: (!instructions.is_empty()).then(|| instructions.to_owned()),
            price: goods_price(package, delivery_time, rng),
        })
    }

    /// Returns the booking ID.
    #[inline]
    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    /// Returns the pickup address.
    #[inline]
    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    /// Returns the delivery address.
    #[inline]
    pub fn delivery_location(&self) -> &str {
        &self.delivery_location
    }

    /// Returns the package size.
    #[inline]
    pub fn package(&self) -> PackageSize {
        self.package
    }

    /// Returns the delivery option.
    #[inline]
    pub fn delivery_time(&self) -> DeliveryTime {
        self.delivery_time
    }

    /// Returns the phone number.
    #[inline]
    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    /// Returns the handling instructions.
    #[inline]
    pub fn special_instructions(&self) -> Option<&str> {
        self.special_instructions.as_deref()
    }

    /// Returns the price.
    #[inline]
    pub fn price(&self) -> u32 {
        self.price
    }
}

/// Draws a random price for the package and adds the delivery surcharge.
pub(crate) fn goods_price(
    package: PackageSize,
    delivery_time: DeliveryTime,
    rng: &mut impl Rng,
) -> u32 {
    rng.random_range(package.price_range()) + delivery_time.surcharge()
}

#[cfg(test)]
mod tests {
    use super::{DeliveryTime, GoodsBooking, GoodsBookingForm, PackageSize, goods_price};
    use rand::{SeedableRng, rngs::StdRng};

    fn form() -> GoodsBookingForm {
        GoodsBookingForm {
            pickup_location: "Market Yard".to_owned(),
            delivery_location: "Shivaji University".to_owned(),
            package_type: "large".to_owned(),
            delivery_time: "same-day".to_owned(),
            contact_number: "9876543210".to_owned(),
            special_instructions: " ".to_owned(),
        }
    }

    #[test]
    fn it_prices_packages() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let price = goods_price(PackageSize::Large, DeliveryTime::NextDay, &mut rng);
            assert!((200..351).contains(&price));
            let price = goods_price(PackageSize::Large, DeliveryTime::SameDay, &mut rng);
            assert!((250..401).contains(&price));
            let price = goods_price(PackageSize::Small, DeliveryTime::Scheduled, &mut rng);
            assert!((50..101).contains(&price));
            let price = goods_price(PackageSize::Medium, DeliveryTime::NextDay, &mut rng);
            assert!((100..201).contains(&price));
        }
    }

    #[test]
    fn it_quotes_bookings() {
        let mut rng = StdRng::seed_from_u64(11);
        let booking = GoodsBooking::quote(&form(), &mut rng).unwrap();
        let suffix = booking.booking_id().strip_prefix("KMT-G-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_eq!(booking.package(), PackageSize::Large);
        assert_eq!(booking.delivery_time().label(), "Same Day");
        assert!((250..401).contains(&booking.price()));
        assert!(booking.special_instructions().is_none());
    }

    #[test]
    fn it_validates_forms() {
        let mut missing_pickup = form();
        missing_pickup.pickup_location.clear();
        let err = missing_pickup.validate().unwrap_err();
        assert_eq!(err.message(), "goods_error_locations");

        let mut bad_package = form();
        bad_package.package_type = "huge".to_owned();
        assert_eq!(bad_package.validate().unwrap_err().message(), "goods_error_package");

        let mut missing_delivery = form();
        missing_delivery.delivery_time.clear();
        assert_eq!(
            missing_delivery.validate().unwrap_err().message(),
            "goods_error_delivery"
        );

        let mut missing_contact = form();
        missing_contact.contact_number = "  ".to_owned();
        assert_eq!(
            missing_contact.validate().unwrap_err().message(),
            "goods_error_contact"
        );
    }
}
