//! Hook wiring the weekly calendar to its two data sources.

use chrono::Local;
use shared::schedule::{build_week_slots, current_slot_index, index_payments, PaySlot, WindowIndex};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

/// Snapshot of the calendar's derived state for rendering
#[derive(Clone, PartialEq)]
pub struct WeekCalendarState {
    pub slots: Vec<PaySlot>,
    pub loading: bool,
    /// Index of the slot holding the current week's pay date, when that
    /// slot exists and is in schedule; drives auto-selection
    pub current_index: Option<usize>,
}

/// Fetch schedules and payments, then derive the labeled week slots.
///
/// The two fetches are independent and issued concurrently; either one
/// failing degrades to empty data for that source with a console warning,
/// since the calendar is a convenience view and must stay available.
/// Recomputes on mount and whenever the API client (token) or the
/// requested slot count changes. A mounted flag guards against a late
/// response touching state after the component is gone.
#[hook]
pub fn use_week_calendar(api_client: &ApiClient, weeks: u32) -> WeekCalendarState {
    let slots = use_state(Vec::<PaySlot>::new);
    let loading = use_state(|| true);
    let current_index = use_state(|| Option::<usize>::None);
    let mounted = use_mut_ref(|| true);

    {
        let mounted = mounted.clone();
        use_effect_with((), move |_| {
            *mounted.borrow_mut() = true;
            move || {
                *mounted.borrow_mut() = false;
            }
        });
    }

    {
        let slots = slots.clone();
        let loading = loading.clone();
        let current_index = current_index.clone();
        let mounted = mounted.clone();

        use_effect_with((api_client.clone(), weeks), move |(api_client, weeks)| {
            let api_client = api_client.clone();
            let weeks = *weeks;

            loading.set(true);
            spawn_local(async move {
                let (schedules, payments) =
                    futures::join!(api_client.list_schedules(), api_client.list_payments());

                let schedules = schedules.unwrap_or_else(|e| {
                    gloo::console::warn!(format!("Schedule fetch failed, calendar runs without windows: {}", e));
                    Vec::new()
                });
                let payments = payments.unwrap_or_else(|e| {
                    gloo::console::warn!(format!("Payment fetch failed, calendar runs without payments: {}", e));
                    Vec::new()
                });

                let index = WindowIndex::from_dtos(&schedules);
                let payments_by_due_date = index_payments(&payments);
                let today = Local::now().date_naive();

                if !*mounted.borrow() {
                    return;
                }
                match build_week_slots(today, weeks, &index, &payments_by_due_date) {
                    Ok(list) => {
                        current_index.set(current_slot_index(&list, today, &index));
                        slots.set(list);
                    }
                    Err(e) => {
                        gloo::console::error!(format!("Cannot build week slots: {}", e));
                        current_index.set(None);
                        slots.set(Vec::new());
                    }
                }
                loading.set(false);
            });
            || ()
        });
    }

    WeekCalendarState {
        slots: (*slots).clone(),
        loading: *loading,
        current_index: *current_index,
    }
}
