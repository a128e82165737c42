//! Weekly pay-schedule resolution for the dues calendar.
//!
//! This module contains all business logic for deriving the rolling window
//! of weekly pay dates shown on member dashboards: resolving which
//! admin-defined schedule window covers a date, generating a centered
//! sequence of weekday-aligned due dates, and classifying each slot
//! against the member's payment records. The UI only handles presentation;
//! every date computation lives here.
//!
//! Weekday indexing follows the schedule API: 0 = Sunday .. 6 = Saturday.

use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{
    weekday_name, PaymentDto, ScheduleDto, ScheduleDtoError, SelectedWeek, DEFAULT_PAY_DAY,
};

const YMD_FORMAT: &str = "%Y-%m-%d";

/// An admin-defined schedule window with parsed dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleWindow {
    /// Inclusive lower bound
    pub start: NaiveDate,
    /// Inclusive upper bound; `None` runs until the next window's start
    pub end: Option<NaiveDate>,
    /// Weekday dues are due on within this window, 0 = Sunday .. 6 = Saturday
    pub pay_day_of_week: u8,
}

impl ScheduleWindow {
    /// Parse a schedule DTO into a window. A window whose `start_date` does
    /// not parse, or whose weekday index is out of range, is rejected so the
    /// caller can drop it without aborting the whole resolution pass.
    pub fn from_dto(dto: &ScheduleDto) -> Result<Self, ScheduleDtoError> {
        let start = parse_ymd(&dto.start_date)
            .ok_or_else(|| ScheduleDtoError::InvalidStartDate(dto.start_date.clone()))?;

        // An unparsable end date degrades to open-ended rather than
        // rejecting the window; the start date is what anchors coverage.
        let end = match dto.end_date.as_deref() {
            Some(raw) => {
                let parsed = parse_ymd(raw);
                if parsed.is_none() {
                    warn!("Unparsable schedule end date {:?}; treating window as open-ended", raw);
                }
                parsed
            }
            None => None,
        };

        let pay_day_of_week = dto.pay_day_of_week.unwrap_or(DEFAULT_PAY_DAY);
        if !crate::is_valid_pay_day(pay_day_of_week) {
            return Err(ScheduleDtoError::InvalidPayDay(pay_day_of_week));
        }

        Ok(Self {
            start,
            end,
            pay_day_of_week,
        })
    }

    /// Human-readable name of this window's pay day
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.pay_day_of_week)
    }
}

/// Ordered set of schedule windows, able to answer "which window covers
/// date D". Windows are kept in the order the schedule API returned them
/// (`start_date` ascending); resolution takes the first match, so an
/// overlapping pair resolves to whichever was stored first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowIndex {
    windows: Vec<ScheduleWindow>,
}

impl WindowIndex {
    pub fn new(windows: Vec<ScheduleWindow>) -> Self {
        let index = Self { windows };
        index.warn_on_overlap();
        index
    }

    /// Build an index from raw schedule DTOs. Malformed windows are skipped
    /// with a warning instead of failing the whole list.
    pub fn from_dtos(dtos: &[ScheduleDto]) -> Self {
        let windows = dtos
            .iter()
            .filter_map(|dto| match ScheduleWindow::from_dto(dto) {
                Ok(window) => Some(window),
                Err(e) => {
                    warn!("Skipping malformed schedule window: {}", e);
                    None
                }
            })
            .collect();
        Self::new(windows)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Fallback weekday when no window covers a date: the first configured
    /// window's pay day, or the system default when no windows exist.
    pub fn default_pay_day(&self) -> u8 {
        self.windows
            .first()
            .map(|w| w.pay_day_of_week)
            .unwrap_or(DEFAULT_PAY_DAY)
    }

    /// Return the first window whose effective interval contains `target`.
    ///
    /// An explicit end date is inclusive: the window covers `[start, end]`.
    /// An absent end date runs until the next window's start (exclusive),
    /// or unbounded if the window is the last one. Empty index resolves
    /// nothing.
    pub fn resolve(&self, target: NaiveDate) -> Option<&ScheduleWindow> {
        for (i, window) in self.windows.iter().enumerate() {
            let covers = match window.end {
                Some(end) => target >= window.start && target <= end,
                None => {
                    let next_start = self.windows.get(i + 1).map(|next| next.start);
                    target >= window.start && next_start.map_or(true, |next| target < next)
                }
            };
            if covers {
                return Some(window);
            }
        }
        None
    }

    /// Admins are expected to configure non-overlapping windows, but the
    /// API does not enforce it. First-match resolution handles overlap
    /// deterministically; this only surfaces the misconfiguration.
    fn warn_on_overlap(&self) {
        for pair in self.windows.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if next.start <= current.start {
                warn!(
                    "Schedule windows out of order: {} listed before {}; resolution uses stored order",
                    current.start, next.start
                );
            } else if let Some(end) = current.end.filter(|end| *end >= next.start) {
                warn!(
                    "Overlapping schedule windows: window starting {} ends {} but next starts {}; first match wins",
                    current.start, end, next.start
                );
            }
        }
    }
}

/// Display state of one week slot on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlotState {
    /// No admin-defined window covers the date; rendered neutral, not selectable
    OutOfSchedule,
    /// A payment record with a paid status matches the due date
    Paid,
    /// The due date falls in the current Monday-start week
    DueThisWeek,
    /// Unpaid and outside the current week. Past and future unpaid weeks
    /// share this state; the dashboards render both red.
    Overdue,
}

/// One selectable unit of the weekly calendar, recomputed wholesale on
/// every resolution pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaySlot {
    /// Generated pay date for this slot (ISO `YYYY-MM-DD`)
    pub pay_date: String,
    /// Relative label, e.g. "This week", "Week +1", "Week -2"
    pub label: String,
    /// Weekday name of the resolved window's pay day
    pub day_name: String,
    /// Whether any schedule window covers `pay_date`
    pub in_schedule: bool,
    pub state: SlotState,
    /// Due date a submission for this slot is attributed to; the matching
    /// payment's due date when one exists, otherwise `pay_date`
    pub due_date: String,
    /// Matching payment record, if the ledger has one for `pay_date`
    pub payment: Option<PaymentDto>,
}

impl PaySlot {
    /// Select this slot for bill submission. Slots outside every schedule
    /// window are not selectable.
    pub fn select(&self) -> Result<SelectedWeek, SelectWeekError> {
        if self.state == SlotState::OutOfSchedule {
            return Err(SelectWeekError::OutOfSchedule);
        }
        Ok(SelectedWeek {
            label: self.label.clone(),
            due_date: self.due_date.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotRequestError {
    /// The caller asked for zero slots
    InvalidCount,
}

impl fmt::Display for SlotRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRequestError::InvalidCount => {
                write!(f, "Slot count must be greater than zero")
            }
        }
    }
}

impl std::error::Error for SlotRequestError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectWeekError {
    /// The slot's date is outside every admin-defined schedule window
    OutOfSchedule,
}

impl fmt::Display for SelectWeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectWeekError::OutOfSchedule => {
                write!(f, "Week is not covered by any payment schedule")
            }
        }
    }
}

impl std::error::Error for SelectWeekError {}

/// Parse an ISO `YYYY-MM-DD` date string
pub fn parse_ymd(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, YMD_FORMAT).ok()
}

/// Format a date as ISO `YYYY-MM-DD`
pub fn format_ymd(date: NaiveDate) -> String {
    date.format(YMD_FORMAT).to_string()
}

/// The pay date for the week containing `today`: today itself or the next
/// matching weekday within the following six days.
pub fn upcoming_pay_date(today: NaiveDate, pay_day: u8) -> NaiveDate {
    let today_dow = today.weekday().num_days_from_sunday() as i64;
    let days_ahead = (pay_day as i64 - today_dow + 7) % 7;
    today + Duration::days(days_ahead)
}

/// Shift `base` to the date with weekday `pay_day` in the same Sunday-start
/// calendar week. The shift can move backward or forward; anchoring on the
/// week that contains `base` keeps the rule deterministic when adjacent
/// windows mandate different weekdays.
fn align_to_pay_day(base: NaiveDate, pay_day: u8) -> NaiveDate {
    let base_dow = base.weekday().num_days_from_sunday() as i64;
    base + Duration::days(pay_day as i64 - base_dow)
}

/// Monday of the week containing `date`; used for "same week" checks.
fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The pay date for the current week under the window covering `today`,
/// falling back to the index default when today is uncovered.
pub fn current_pay_date(today: NaiveDate, index: &WindowIndex) -> NaiveDate {
    let active_pay_day = index
        .resolve(today)
        .map(|w| w.pay_day_of_week)
        .unwrap_or_else(|| index.default_pay_day());
    upcoming_pay_date(today, active_pay_day)
}

/// Generate `count` weekly pay dates centered on the week containing
/// `today`, each aligned to the weekday mandated by its covering window.
///
/// Each slot's base date is re-resolved against the index and re-aligned
/// individually: a window boundary where the pay day changes shifts that
/// slot within its own week instead of drifting the rest of the sequence.
/// Output is strictly increasing; spacing is ~7 days but deviates by up to
/// six days at a weekday change, which is expected.
pub fn generate_pay_dates(
    today: NaiveDate,
    count: u32,
    index: &WindowIndex,
) -> Result<Vec<NaiveDate>, SlotRequestError> {
    if count == 0 {
        return Err(SlotRequestError::InvalidCount);
    }

    let default_pay_day = index.default_pay_day();
    let active_window = index.resolve(today);
    let anchor = current_pay_date(today, index);

    let half = (count / 2) as i64;
    let mut dates = Vec::with_capacity(count as usize);
    for i in 0..count as i64 {
        let rel = i - half;
        let base = anchor + Duration::days(rel * 7);
        let pay_day = index
            .resolve(base)
            .or(active_window)
            .map(|w| w.pay_day_of_week)
            .unwrap_or(default_pay_day);
        dates.push(align_to_pay_day(base, pay_day));
    }
    Ok(dates)
}

/// Assign a display state to one generated pay date. Rules apply in order,
/// first match wins:
///
/// 1. no covering window -> out of schedule
/// 2. matching payment with a paid status -> paid
/// 3. pay date in the current Monday-start week -> due this week
/// 4. anything else, past or future -> overdue
pub fn classify_slot(
    pay_date: NaiveDate,
    window: Option<&ScheduleWindow>,
    today: NaiveDate,
    payment: Option<&PaymentDto>,
) -> SlotState {
    if window.is_none() {
        return SlotState::OutOfSchedule;
    }
    if payment.map_or(false, |p| p.normalized_status().is_paid()) {
        return SlotState::Paid;
    }
    if monday_of_week(pay_date) == monday_of_week(today) {
        return SlotState::DueThisWeek;
    }
    SlotState::Overdue
}

/// Index payment records by parsed due date for exact-match lookup.
/// Records without a due date never enter the lookup; on a duplicate due
/// date the later record wins.
pub fn index_payments(payments: &[PaymentDto]) -> HashMap<NaiveDate, PaymentDto> {
    let mut by_due_date = HashMap::new();
    for payment in payments {
        let Some(raw) = payment.due_date.as_deref() else {
            continue;
        };
        match parse_ymd(raw) {
            Some(due_date) => {
                by_due_date.insert(due_date, payment.clone());
            }
            None => debug!("Ignoring payment {} with unparsable due date {:?}", payment.id, raw),
        }
    }
    by_due_date
}

/// Relative label for a slot `rel` weeks away from the current week
fn week_label(rel: i64) -> String {
    if rel == 0 {
        "This week".to_string()
    } else if rel > 0 {
        format!("Week +{}", rel)
    } else {
        format!("Week {}", rel)
    }
}

/// Build the full labeled slot sequence for the calendar: generate pay
/// dates, resolve each against the schedule windows, cross-reference the
/// payment lookup, and classify. Pure function of its inputs; identical
/// snapshots yield identical output.
pub fn build_week_slots(
    today: NaiveDate,
    count: u32,
    index: &WindowIndex,
    payments_by_due_date: &HashMap<NaiveDate, PaymentDto>,
) -> Result<Vec<PaySlot>, SlotRequestError> {
    let pay_dates = generate_pay_dates(today, count, index)?;
    let default_pay_day = index.default_pay_day();
    let half = (count / 2) as i64;

    let slots = pay_dates
        .into_iter()
        .enumerate()
        .map(|(i, pay_date)| {
            let window = index.resolve(pay_date);
            let payment = payments_by_due_date.get(&pay_date);
            let pay_day = window.map(|w| w.pay_day_of_week).unwrap_or(default_pay_day);
            let ymd = format_ymd(pay_date);
            let due_date = payment
                .and_then(|p| p.due_date.clone())
                .unwrap_or_else(|| ymd.clone());

            PaySlot {
                pay_date: ymd,
                label: week_label(i as i64 - half),
                day_name: weekday_name(pay_day).to_string(),
                in_schedule: window.is_some(),
                state: classify_slot(pay_date, window, today, payment),
                due_date,
                payment: payment.cloned(),
            }
        })
        .collect();

    Ok(slots)
}

/// Index of the slot carrying the current week's pay date, when that slot
/// exists and is in schedule. Used by the UI for auto-selection.
pub fn current_slot_index(
    slots: &[PaySlot],
    today: NaiveDate,
    index: &WindowIndex,
) -> Option<usize> {
    let current_ymd = format_ymd(current_pay_date(today, index));
    slots
        .iter()
        .position(|slot| slot.pay_date == current_ymd && slot.in_schedule)
}
