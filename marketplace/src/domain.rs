//! Domain types shared by every marketplace feature.
//!
//! Artists and bookings are flat records. Categories and price ranges are
//! closed sets with a stable wire representation; ratings are a bounded
//! fixed-point value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an artist
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    /// Wraps an identifier string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtistId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wraps an identifier string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Performance category an artist can be listed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Professional vocalists
    Singers,
    /// Contemporary, classical, and cultural dancers
    Dancers,
    /// Motivational and keynote speakers
    Speakers,
    /// DJs for events and parties
    Djs,
    /// Live bands and musical groups
    Bands,
    /// Stand-up comedians and entertainers
    Comedians,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Self; 6] = [
        Self::Singers,
        Self::Dancers,
        Self::Speakers,
        Self::Djs,
        Self::Bands,
        Self::Comedians,
    ];

    /// Wire identifier (`"djs"`)
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Singers => "singers",
            Self::Dancers => "dancers",
            Self::Speakers => "speakers",
            Self::Djs => "djs",
            Self::Bands => "bands",
            Self::Comedians => "comedians",
        }
    }

    /// Display name (`"DJs"`)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Singers => "Singers",
            Self::Dancers => "Dancers",
            Self::Speakers => "Speakers",
            Self::Djs => "DJs",
            Self::Bands => "Bands",
            Self::Comedians => "Comedians",
        }
    }

    /// Emoji shown next to the name
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Singers => "🎤",
            Self::Dancers => "💃",
            Self::Speakers => "🎯",
            Self::Djs => "🎧",
            Self::Bands => "🎸",
            Self::Comedians => "😂",
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Singers => "Professional vocalists for all occasions",
            Self::Dancers => "Contemporary, classical, and cultural dancers",
            Self::Speakers => "Motivational and keynote speakers",
            Self::Djs => "Professional DJs for events and parties",
            Self::Bands => "Live bands and musical groups",
            Self::Comedians => "Stand-up comedians and entertainers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown category or price range
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseDomainError {
    kind: &'static str,
    value: String,
}

impl FromStr for Category {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.id() == s)
            .ok_or_else(|| ParseDomainError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Fee bucket an artist charges within
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceRange {
    /// $500 - $1,000
    #[serde(rename = "500-1000")]
    From500To1000,
    /// $1,000 - $2,500
    #[serde(rename = "1000-2500")]
    From1000To2500,
    /// $2,500 - $5,000
    #[serde(rename = "2500-5000")]
    From2500To5000,
    /// $5,000 - $10,000
    #[serde(rename = "5000-10000")]
    From5000To10000,
    /// $10,000+
    #[serde(rename = "10000+")]
    Above10000,
}

impl PriceRange {
    /// Every bucket, cheapest first
    pub const ALL: [Self; 5] = [
        Self::From500To1000,
        Self::From1000To2500,
        Self::From2500To5000,
        Self::From5000To10000,
        Self::Above10000,
    ];

    /// Wire value (`"2500-5000"`)
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::From500To1000 => "500-1000",
            Self::From1000To2500 => "1000-2500",
            Self::From2500To5000 => "2500-5000",
            Self::From5000To10000 => "5000-10000",
            Self::Above10000 => "10000+",
        }
    }

    /// Human-readable label (`"$2,500 - $5,000"`)
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::From500To1000 => "$500 - $1,000",
            Self::From1000To2500 => "$1,000 - $2,500",
            Self::From2500To5000 => "$2,500 - $5,000",
            Self::From5000To10000 => "$5,000 - $10,000",
            Self::Above10000 => "$10,000+",
        }
    }

    /// Lowest fee in the bucket, in whole dollars
    #[must_use]
    pub const fn min_fee(self) -> u64 {
        match self {
            Self::From500To1000 => 500,
            Self::From1000To2500 => 1_000,
            Self::From2500To5000 => 2_500,
            Self::From5000To10000 => 5_000,
            Self::Above10000 => 10_000,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for PriceRange {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.value() == s)
            .ok_or_else(|| ParseDomainError {
                kind: "price range",
                value: s.to_string(),
            })
    }
}

/// Average review score on a 0.0 to 5.0 scale.
///
/// Stored as tenths so equality and ordering are exact; serialized as a
/// plain number (`4.9`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Rating(u8);

impl Rating {
    const SCALE: f32 = 10.0;
    const MAX_TENTHS: u8 = 50;

    /// Highest possible rating, given to newly onboarded artists
    pub const MAX: Self = Self(Self::MAX_TENTHS);

    /// Creates a rating, rounding to one decimal place.
    ///
    /// Returns `None` outside `0.0..=5.0` or for NaN.
    #[must_use]
    pub fn new(value: f32) -> Option<Self> {
        if !(0.0..=5.0).contains(&value) {
            return None;
        }

        // Range checked above, so the rounded value fits in 0..=50
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let tenths = (value * Self::SCALE).round() as u8;

        (tenths <= Self::MAX_TENTHS).then_some(Self(tenths))
    }

    /// Returns the rating as a float
    #[must_use]
    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / Self::SCALE
    }
}

impl TryFrom<f32> for Rating {
    type Error = String;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} is outside 0.0..=5.0"))
    }
}

impl From<Rating> for f32 {
    fn from(rating: Rating) -> Self {
        rating.as_f32()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_f32())
    }
}

/// A performer's listing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    /// Unique identifier
    pub id: ArtistId,
    /// Display name
    pub name: String,
    /// Categories the artist is listed under (never empty)
    pub category: Vec<Category>,
    /// Free-text biography
    pub bio: String,
    /// Fee bucket
    pub price_range: PriceRange,
    /// City and state, e.g. `"Miami, FL"`
    pub location: String,
    /// Spoken languages
    pub languages: Vec<String>,
    /// Image URL or `data:` URL
    pub image: String,
    /// Average review score
    pub rating: Rating,
    /// Number of reviews behind the rating
    pub review_count: u32,
    /// Whether the profile has been verified
    pub verified: bool,
    /// Free-text availability, e.g. `"Available weekends"`
    pub availability: String,
}

impl Artist {
    /// Builds an artist from a record that has not been assigned an id yet
    #[must_use]
    pub fn from_new(id: ArtistId, new: NewArtist) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            bio: new.bio,
            price_range: new.price_range,
            location: new.location,
            languages: new.languages,
            image: new.image,
            rating: new.rating,
            review_count: new.review_count,
            verified: new.verified,
            availability: new.availability,
        }
    }

    /// Whether the artist is listed under `category`
    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.category.contains(&category)
    }
}

/// An artist record without an identifier
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewArtist {
    /// Display name
    pub name: String,
    /// Categories (must not be empty)
    pub category: Vec<Category>,
    /// Free-text biography
    pub bio: String,
    /// Fee bucket
    pub price_range: PriceRange,
    /// City and state
    pub location: String,
    /// Spoken languages
    pub languages: Vec<String>,
    /// Image URL or `data:` URL
    pub image: String,
    /// Starting rating
    pub rating: Rating,
    /// Starting review count
    pub review_count: u32,
    /// Verified flag
    pub verified: bool,
    /// Free-text availability
    pub availability: String,
}

/// Lifecycle of a booking request.
///
/// Only `Pending` can change; `Confirmed` and `Rejected` are final.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting a decision
    #[default]
    Pending,
    /// Accepted by the artist
    Confirmed,
    /// Declined by the artist
    Rejected,
}

impl BookingStatus {
    /// Whether a booking in this status may move to `next`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Rejected)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Confirmed => f.write_str("confirmed"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// A request linking a client, an artist, and an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier
    pub id: BookingId,
    /// Booked artist
    pub artist_id: ArtistId,
    /// Artist display name at booking time
    pub artist_name: String,
    /// Event title
    pub event_title: String,
    /// Event date
    pub event_date: NaiveDate,
    /// Event venue or city
    pub location: String,
    /// Client display name
    pub client_name: String,
    /// Current status
    pub status: BookingStatus,
    /// Agreed fee in whole dollars
    pub fee: u64,
    /// Creation date (`YYYY-MM-DD`)
    pub created_at: NaiveDate,
}

impl Booking {
    /// Builds a booking from a request that has no id or creation date yet
    #[must_use]
    pub fn from_new(id: BookingId, created_at: NaiveDate, new: NewBooking) -> Self {
        Self {
            id,
            artist_id: new.artist_id,
            artist_name: new.artist_name,
            event_title: new.event_title,
            event_date: new.event_date,
            location: new.location,
            client_name: new.client_name,
            status: new.status,
            fee: new.fee,
            created_at,
        }
    }
}

/// A booking without id or creation date
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    /// Booked artist
    pub artist_id: ArtistId,
    /// Artist display name
    pub artist_name: String,
    /// Event title
    pub event_title: String,
    /// Event date
    pub event_date: NaiveDate,
    /// Event venue or city
    pub location: String,
    /// Client display name
    pub client_name: String,
    /// Initial status; anything but `pending` is rejected
    #[serde(default)]
    pub status: BookingStatus,
    /// Fee in whole dollars
    pub fee: u64,
}

/// Event details a client supplies when requesting a quote from a listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Event title
    pub event_title: String,
    /// Event date
    pub event_date: NaiveDate,
    /// Event venue or city
    pub location: String,
    /// Client display name
    pub client_name: String,
    /// Proposed fee; defaults to the bottom of the artist's price range
    #[serde(default)]
    pub fee: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_format() {
        assert_eq!(serde_json::to_string(&Category::Djs).unwrap(), "\"djs\"");
        assert_eq!("comedians".parse::<Category>().unwrap(), Category::Comedians);
        assert!("jugglers".parse::<Category>().is_err());
    }

    #[test]
    fn price_range_wire_format() {
        assert_eq!(
            serde_json::to_string(&PriceRange::Above10000).unwrap(),
            "\"10000+\""
        );
        let parsed: PriceRange = serde_json::from_str("\"2500-5000\"").unwrap();
        assert_eq!(parsed, PriceRange::From2500To5000);
        assert_eq!(parsed.label(), "$2,500 - $5,000");
    }

    #[test]
    fn rating_is_bounded() {
        assert_eq!(Rating::new(4.9).unwrap().as_f32(), 4.9);
        assert_eq!(Rating::new(5.0), Some(Rating::MAX));
        assert!(Rating::new(5.1).is_none());
        assert!(Rating::new(-0.1).is_none());
        assert!(Rating::new(f32::NAN).is_none());
        assert!(serde_json::from_str::<Rating>("7.5").is_err());
        assert_eq!(serde_json::to_string(&Rating::new(4.7).unwrap()).unwrap(), "4.7");
    }

    #[test]
    fn booking_status_is_one_directional() {
        use BookingStatus::{Confirmed, Pending, Rejected};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn new_booking_defaults_to_pending() {
        let json = r#"{
            "artist_id": "1",
            "artist_name": "Sarah Johnson",
            "event_title": "Launch Party",
            "event_date": "2025-05-01",
            "location": "Brooklyn, NY",
            "client_name": "Acme",
            "fee": 3000
        }"#;
        let booking: NewBooking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
