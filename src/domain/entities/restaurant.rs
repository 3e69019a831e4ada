//! Restaurant entity and its opening hours.

use chrono::{DateTime, NaiveTime, Utc};

/// Descriptive fields supplied by the owner at registration.
///
/// Values are stored trimmed, and `email` is stored lower-cased
/// (see [`RestaurantDetails::normalized`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDetails {
    pub name: String,
    pub description: String,
    pub owner_name: String,
    pub email: String,
    pub phone_number: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl RestaurantDetails {
    /// Trims every text field and lower-cases the email address.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            owner_name: self.owner_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone_number: self.phone_number.trim().to_string(),
            opening_time: self.opening_time,
            closing_time: self.closing_time,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
        }
    }

    /// Returns true if the restaurant is open at the given wall-clock time.
    pub fn is_open_at(&self, at: NaiveTime) -> bool {
        is_open_at(self.opening_time, self.closing_time, at)
    }
}

/// A registered restaurant.
///
/// `rating` and `review_count` are derived from the restaurant's reviews and are
/// only ever written together with a review append.
#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: i64,
    pub owner_id: i64,
    pub details: RestaurantDetails,
    pub avatar_url: String,
    pub rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for persisting a new restaurant.
///
/// Rating starts at `0.0` with no reviews.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub owner_id: i64,
    pub details: RestaurantDetails,
    pub avatar_url: String,
}

/// Open-hours check shared by the in-memory store and unit tests.
///
/// - `opening < closing`: open on `[opening, closing)`
/// - `closing < opening`: hours wrap past midnight
/// - `opening == closing`: open all day
///
/// The PostgreSQL repository evaluates the same rule in SQL.
pub fn is_open_at(opening: NaiveTime, closing: NaiveTime, at: NaiveTime) -> bool {
    if opening == closing {
        true
    } else if opening < closing {
        at >= opening && at < closing
    } else {
        at >= opening || at < closing
    }
}

/// Parses a wall-clock time in `HH:MM` (or `HH:MM:SS`) form.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample_details() -> RestaurantDetails {
        RestaurantDetails {
            name: "  Blue Fig ".to_string(),
            description: "Mediterranean".to_string(),
            owner_name: "Sam Doe".to_string(),
            email: " Owner@BlueFig.Example ".to_string(),
            phone_number: "555-0100".to_string(),
            opening_time: t(9, 0),
            closing_time: t(22, 0),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
        }
    }

    #[test]
    fn test_open_during_daytime_hours() {
        assert!(is_open_at(t(9, 0), t(22, 0), t(9, 0)));
        assert!(is_open_at(t(9, 0), t(22, 0), t(12, 30)));
        assert!(!is_open_at(t(9, 0), t(22, 0), t(22, 0)));
        assert!(!is_open_at(t(9, 0), t(22, 0), t(8, 59)));
    }

    #[test]
    fn test_open_overnight_hours() {
        assert!(is_open_at(t(18, 0), t(2, 0), t(23, 0)));
        assert!(is_open_at(t(18, 0), t(2, 0), t(1, 30)));
        assert!(!is_open_at(t(18, 0), t(2, 0), t(2, 0)));
        assert!(!is_open_at(t(18, 0), t(2, 0), t(12, 0)));
    }

    #[test]
    fn test_equal_hours_mean_always_open() {
        assert!(is_open_at(t(0, 0), t(0, 0), t(3, 0)));
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("09:30"), Some(t(9, 30)));
        assert_eq!(parse_clock_time(" 21:05:00 "), Some(t(21, 5)));
        assert_eq!(parse_clock_time("9am"), None);
        assert_eq!(parse_clock_time("25:00"), None);
    }

    #[test]
    fn test_normalized_trims_and_lowercases_email() {
        let details = sample_details().normalized();

        assert_eq!(details.name, "Blue Fig");
        assert_eq!(details.email, "owner@bluefig.example");
        assert!(details.is_open_at(t(10, 0)));
    }
}
