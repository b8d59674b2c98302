//! Aggregate booking statistics, recomputed on every read.

use crate::domain::{Booking, BookingStatus};
use serde::Serialize;

/// Booking counts and revenue shown on the dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// All bookings
    pub total: usize,
    /// Awaiting a decision
    pub pending: usize,
    /// Accepted
    pub confirmed: usize,
    /// Declined
    pub rejected: usize,
    /// Sum of fees over confirmed bookings, in whole dollars. Wider than a
    /// single fee so that no sum of `u64` fees can overflow.
    pub total_revenue: u128,
    /// Confirmed share of all bookings as a rounded percentage; 0 when empty
    pub success_rate: u32,
}

impl DashboardStats {
    /// Aggregates `bookings`
    #[must_use]
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let mut stats = Self {
            total: bookings.len(),
            ..Self::default()
        };

        for booking in bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => {
                    stats.confirmed += 1;
                    stats.total_revenue += u128::from(booking.fee);
                },
                BookingStatus::Rejected => stats.rejected += 1,
            }
        }

        stats.success_rate = success_rate(stats.confirmed, stats.total);
        stats
    }
}

/// `round(confirmed / total * 100)` in integer arithmetic
fn success_rate(confirmed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = (confirmed * 200 + total) / (total * 2);
    u32::try_from(percent).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_bookings;

    #[test]
    fn sample_dashboard() {
        let stats = DashboardStats::from_bookings(&sample_bookings());
        assert_eq!(
            stats,
            DashboardStats {
                total: 4,
                pending: 1,
                confirmed: 2,
                rejected: 1,
                total_revenue: 7_500,
                success_rate: 50,
            }
        );
    }

    #[test]
    fn empty_dashboard_has_zero_success_rate() {
        assert_eq!(DashboardStats::from_bookings(&[]), DashboardStats::default());
    }

    #[test]
    fn revenue_of_maximal_fees_does_not_overflow() {
        let mut bookings = sample_bookings();
        for booking in &mut bookings {
            booking.status = BookingStatus::Confirmed;
            booking.fee = u64::MAX;
        }

        let stats = DashboardStats::from_bookings(&bookings);
        assert_eq!(stats.total_revenue, u128::from(u64::MAX) * 4);
        assert_eq!(stats.success_rate, 100);
    }

    #[test]
    fn success_rate_rounds_half_up() {
        assert_eq!(success_rate(1, 3), 33);
        assert_eq!(success_rate(2, 3), 67);
        assert_eq!(success_rate(1, 8), 13); // 12.5
        assert_eq!(success_rate(3, 3), 100);
    }
}
