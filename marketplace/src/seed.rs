//! Reference lists and sample data.
//!
//! Sample records keep their short numeric ids (`"1"` to `"6"` for artists,
//! `"1"` to `"4"` for bookings) so links and tests can name them.

use crate::domain::{
    Artist, ArtistId, Booking, BookingId, BookingStatus, Category, PriceRange, Rating,
};
use chrono::NaiveDate;

/// Locations offered when filtering or onboarding
pub const LOCATIONS: [&str; 8] = [
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Miami, FL",
    "Seattle, WA",
    "Austin, TX",
    "Nashville, TN",
];

/// Languages offered when onboarding
pub const LANGUAGES: [&str; 10] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Italian",
    "Portuguese",
    "Mandarin",
    "Japanese",
    "Korean",
    "Arabic",
];

/// Stock portrait used when a new profile has no uploaded image
pub const DEFAULT_ARTIST_IMAGE: &str =
    "https://images.pexels.com/photos/1587927/pexels-photo-1587927.jpeg?auto=compress&cs=tinysrgb&w=400";

fn pexels(photo: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=400"
    )
}

fn rating(tenths: u8) -> Rating {
    Rating::new(f32::from(tenths) / 10.0).unwrap_or(Rating::MAX)
}

fn languages(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The six sample artists, in listing order
#[must_use]
pub fn sample_artists() -> Vec<Artist> {
    vec![
        Artist {
            id: ArtistId::new("1"),
            name: "Sarah Johnson".to_string(),
            category: vec![Category::Singers],
            bio: "Professional jazz and soul vocalist with 10+ years of experience".to_string(),
            price_range: PriceRange::From2500To5000,
            location: "New York, NY".to_string(),
            languages: languages(&["English", "French"]),
            image: pexels(1_587_927),
            rating: rating(49),
            review_count: 87,
            verified: true,
            availability: "Available".to_string(),
        },
        Artist {
            id: ArtistId::new("2"),
            name: "Marcus Thompson".to_string(),
            category: vec![Category::Dancers, Category::Singers],
            bio: "Contemporary dancer and choreographer specializing in modern performances"
                .to_string(),
            price_range: PriceRange::From1000To2500,
            location: "Los Angeles, CA".to_string(),
            languages: languages(&["English", "Spanish"]),
            image: pexels(1_222_271),
            rating: rating(48),
            review_count: 64,
            verified: true,
            availability: "Busy until Feb 2025".to_string(),
        },
        Artist {
            id: ArtistId::new("3"),
            name: "DJ Alex Rivera".to_string(),
            category: vec![Category::Djs],
            bio: "Electronic music DJ with residencies at top clubs worldwide".to_string(),
            price_range: PriceRange::From5000To10000,
            location: "Miami, FL".to_string(),
            languages: languages(&["English", "Spanish", "Portuguese"]),
            image: pexels(1_763_075),
            rating: rating(47),
            review_count: 132,
            verified: true,
            availability: "Available".to_string(),
        },
        Artist {
            id: ArtistId::new("4"),
            name: "Emily Chen".to_string(),
            category: vec![Category::Speakers],
            bio: "Motivational speaker and business consultant with TEDx experience".to_string(),
            price_range: PriceRange::From2500To5000,
            location: "Seattle, WA".to_string(),
            languages: languages(&["English", "Mandarin"]),
            image: pexels(774_909),
            rating: rating(49),
            review_count: 45,
            verified: true,
            availability: "Available".to_string(),
        },
        Artist {
            id: ArtistId::new("5"),
            name: "The Midnight Blues".to_string(),
            category: vec![Category::Bands],
            bio: "5-piece blues band with original compositions and classic covers".to_string(),
            price_range: PriceRange::From1000To2500,
            location: "Chicago, IL".to_string(),
            languages: languages(&["English"]),
            image: pexels(1_105_666),
            rating: rating(46),
            review_count: 78,
            verified: false,
            availability: "Available weekends".to_string(),
        },
        Artist {
            id: ArtistId::new("6"),
            name: "Carlos Martinez".to_string(),
            category: vec![Category::Comedians],
            bio: "Stand-up comedian with appearances on major comedy networks".to_string(),
            price_range: PriceRange::From500To1000,
            location: "Austin, TX".to_string(),
            languages: languages(&["English", "Spanish"]),
            image: pexels(1_438_761),
            rating: rating(48),
            review_count: 91,
            verified: true,
            availability: "Available".to_string(),
        },
    ]
}

/// The four sample bookings
#[must_use]
pub fn sample_bookings() -> Vec<Booking> {
    vec![
        Booking {
            id: BookingId::new("1"),
            artist_id: ArtistId::new("1"),
            artist_name: "Sarah Johnson".to_string(),
            event_title: "Corporate Gala 2025".to_string(),
            event_date: date(2025, 3, 15),
            location: "Manhattan, NY".to_string(),
            client_name: "TechCorp Events".to_string(),
            status: BookingStatus::Confirmed,
            fee: 3_500,
            created_at: date(2025, 1, 10),
        },
        Booking {
            id: BookingId::new("2"),
            artist_id: ArtistId::new("3"),
            artist_name: "DJ Alex Rivera".to_string(),
            event_title: "Wedding Reception".to_string(),
            event_date: date(2025, 2, 28),
            location: "South Beach, FL".to_string(),
            client_name: "Jennifer & Michael".to_string(),
            status: BookingStatus::Pending,
            fee: 7_500,
            created_at: date(2025, 1, 12),
        },
        Booking {
            id: BookingId::new("3"),
            artist_id: ArtistId::new("4"),
            artist_name: "Emily Chen".to_string(),
            event_title: "Leadership Conference".to_string(),
            event_date: date(2025, 4, 10),
            location: "Seattle Convention Center".to_string(),
            client_name: "Future Leaders Inc".to_string(),
            status: BookingStatus::Confirmed,
            fee: 4_000,
            created_at: date(2025, 1, 8),
        },
        Booking {
            id: BookingId::new("4"),
            artist_id: ArtistId::new("2"),
            artist_name: "Marcus Thompson".to_string(),
            event_title: "Art Gallery Opening".to_string(),
            event_date: date(2025, 2, 20),
            location: "Beverly Hills, CA".to_string(),
            client_name: "Modern Art Gallery".to_string(),
            status: BookingStatus::Rejected,
            fee: 2_000,
            created_at: date(2025, 1, 14),
        },
    ]
}
