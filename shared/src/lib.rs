use serde::{Deserialize, Serialize};
use std::fmt;

pub mod schedule;

/// Weekday dues fall on when a schedule omits one (5 = Friday).
pub const DEFAULT_PAY_DAY: u8 = 5;

/// Generic envelope the backend wraps every list endpoint in: `{"data": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiListResponse<T> {
    pub data: Vec<T>,
}

/// Payment schedule window as returned by `GET /schedules`, ordered by
/// `start_date` ascending. Dates are ISO `YYYY-MM-DD` strings at this boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDto {
    /// Inclusive lower bound of the window
    pub start_date: String,
    /// Inclusive upper bound; absent means the window runs until the next
    /// window's start (or forever if it is the last one)
    pub end_date: Option<String>,
    /// Weekday dues are due on, 0 = Sunday .. 6 = Saturday
    pub pay_day_of_week: Option<u8>,
}

/// Payment record from `GET /payments`, scoped to the authenticated member.
/// Consumed read-only; `id` and `amount` are passthrough fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDto {
    pub id: i64,
    /// Due date the payment is attributed to (ISO `YYYY-MM-DD`)
    pub due_date: Option<String>,
    /// Raw status string from the ledger ("pending", "approved", "Lunas", ...)
    pub status: String,
    pub amount: Option<f64>,
}

/// Normalized payment status. The ledger mixes English and Indonesian
/// literals ("approved" vs "Lunas"), so raw strings are mapped here once
/// instead of string-matching throughout the calendar logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Rejected,
}

impl PaymentStatus {
    /// Map a raw ledger status to its normalized form, case-insensitively.
    /// Unknown strings count as pending rather than failing the slot.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "approved" | "lunas" => PaymentStatus::Paid,
            "rejected" | "ditolak" => PaymentStatus::Rejected,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn is_paid(self) -> bool {
        self == PaymentStatus::Paid
    }
}

impl PaymentDto {
    pub fn normalized_status(&self) -> PaymentStatus {
        PaymentStatus::from_raw(&self.status)
    }
}

/// Result of selecting a week slot, handed to the payment submission form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedWeek {
    pub label: String,
    /// Due date the submitted payment will be attributed to (ISO `YYYY-MM-DD`)
    pub due_date: String,
}

/// Get the English name for a 0 = Sunday .. 6 = Saturday weekday index
pub fn weekday_name(day_of_week: u8) -> &'static str {
    match day_of_week {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Invalid",
    }
}

/// Validate a weekday index
pub fn is_valid_pay_day(day: u8) -> bool {
    day <= 6
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleDtoError {
    InvalidStartDate(String),
    InvalidPayDay(u8),
}

impl fmt::Display for ScheduleDtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDtoError::InvalidStartDate(raw) => {
                write!(f, "Unparsable schedule start date: {}", raw)
            }
            ScheduleDtoError::InvalidPayDay(day) => {
                write!(f, "Invalid pay day of week: {}. Must be 0-6 (Sunday-Saturday)", day)
            }
        }
    }
}

impl std::error::Error for ScheduleDtoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_normalization_accepts_all_paid_literals() {
        assert_eq!(PaymentStatus::from_raw("approved"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_raw("Lunas"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_raw("lunas"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_raw("APPROVED"), PaymentStatus::Paid);
    }

    #[test]
    fn test_status_normalization_pending_and_rejected() {
        assert_eq!(PaymentStatus::from_raw("pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_raw("rejected"), PaymentStatus::Rejected);
        assert_eq!(PaymentStatus::from_raw("ditolak"), PaymentStatus::Rejected);

        // Unknown ledger strings degrade to pending, never to paid
        assert_eq!(PaymentStatus::from_raw("waiting-review"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_raw(""), PaymentStatus::Pending);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(0), "Sunday");
        assert_eq!(weekday_name(5), "Friday");
        assert_eq!(weekday_name(6), "Saturday");
        assert_eq!(weekday_name(7), "Invalid");
    }

    #[test]
    fn test_is_valid_pay_day() {
        for day in 0..=6 {
            assert!(is_valid_pay_day(day));
        }
        assert!(!is_valid_pay_day(7));
        assert!(!is_valid_pay_day(255));
    }

    #[test]
    fn test_schedule_dto_deserializes_with_missing_fields() {
        let json = r#"{"start_date": "2026-01-01"}"#;
        let dto: ScheduleDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.start_date, "2026-01-01");
        assert_eq!(dto.end_date, None);
        assert_eq!(dto.pay_day_of_week, None);
    }

    #[test]
    fn test_payment_dto_deserializes_from_ledger_shape() {
        let json = r#"{"data": [{"id": 7, "due_date": "2026-01-23", "status": "approved", "amount": 5000.0}]}"#;
        let response: ApiListResponse<PaymentDto> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 1);
        let payment = &response.data[0];
        assert_eq!(payment.id, 7);
        assert_eq!(payment.due_date.as_deref(), Some("2026-01-23"));
        assert!(payment.normalized_status().is_paid());
    }
}
