//! Weekly dues calendar: a paginated strip of week slots the member can
//! pick a due date from.

use chrono::Datelike;
use shared::schedule::{parse_ymd, SlotState};
use shared::SelectedWeek;
use yew::prelude::*;

use crate::hooks::use_week_calendar::use_week_calendar;
use crate::services::api::ApiClient;
use crate::services::session::Session;

const PAGE_SIZE: usize = 12;

#[derive(Properties, PartialEq)]
pub struct WeeklyCalendarProps {
    /// Number of week slots to derive, centered on the current week
    #[prop_or(12)]
    pub weeks: u32,
    /// Emits the picked week's label and due date for the submission form
    #[prop_or_default]
    pub on_select_week: Callback<SelectedWeek>,
    #[prop_or_default]
    pub session: Session,
}

fn circle_color(state: SlotState) -> &'static str {
    match state {
        SlotState::Paid => "#16a34a",
        SlotState::DueThisWeek => "#2563eb",
        SlotState::Overdue => "#dc2626",
        SlotState::OutOfSchedule => "#475569",
    }
}

fn day_of_month(pay_date: &str) -> String {
    parse_ymd(pay_date)
        .map(|date| date.day().to_string())
        .unwrap_or_default()
}

#[function_component(WeeklyCalendar)]
pub fn weekly_calendar(props: &WeeklyCalendarProps) -> Html {
    let api_client = use_memo(props.session.clone(), |session| {
        ApiClient::new(session.clone())
    });
    let calendar = use_week_calendar(&api_client, props.weeks);

    let selected_date = use_state(|| Option::<String>::None);
    let page = use_state(|| 0usize);

    // Auto-select the current week once data arrives, opening the page two
    // slots before it so recent history stays visible.
    {
        let selected_date = selected_date.clone();
        let page = page.clone();
        let on_select_week = props.on_select_week.clone();
        use_effect_with(
            (calendar.slots.clone(), calendar.current_index),
            move |(slots, current_index): &(Vec<shared::schedule::PaySlot>, Option<usize>)| {
                match (*current_index).and_then(|idx| slots.get(idx).map(|slot| (idx, slot))) {
                    Some((idx, slot)) => {
                        if let Ok(selection) = slot.select() {
                            page.set(idx.saturating_sub(2) / PAGE_SIZE);
                            selected_date.set(Some(slot.pay_date.clone()));
                            on_select_week.emit(selection);
                        }
                    }
                    None => page.set(0),
                }
                || ()
            },
        );
    }

    if calendar.loading {
        return html! {
            <div style="font-size: 0.875rem; color: #64748b;">{"Loading calendar..."}</div>
        };
    }

    let total_pages = (calendar.slots.len().max(1) + PAGE_SIZE - 1) / PAGE_SIZE;
    let current_page = (*page).min(total_pages - 1);
    let start = current_page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(calendar.slots.len());
    let visible = &calendar.slots[start..end];

    let on_prev = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| {
            page.set(current_page.saturating_sub(1));
        })
    };
    let on_next = {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| {
            page.set((current_page + 1).min(total_pages - 1));
        })
    };

    let slot_buttons: Html = visible
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let disabled = slot.state == SlotState::OutOfSchedule;
            let is_selected = selected_date.as_deref() == Some(slot.pay_date.as_str());
            let global_index = start + i;

            let onclick = {
                let slot = slot.clone();
                let selected_date = selected_date.clone();
                let page = page.clone();
                let on_select_week = props.on_select_week.clone();
                Callback::from(move |_: MouseEvent| {
                    if let Ok(selection) = slot.select() {
                        page.set(global_index / PAGE_SIZE);
                        selected_date.set(Some(slot.pay_date.clone()));
                        on_select_week.emit(selection);
                    }
                })
            };

            let border = if disabled {
                "1px solid #e2e8f0"
            } else if is_selected {
                "2px solid #2563eb"
            } else {
                "1px solid #cbd5e1"
            };
            let opacity = if disabled { "0.6" } else { "1" };
            let cursor = if disabled { "not-allowed" } else { "pointer" };
            let status_text = slot
                .payment
                .as_ref()
                .map(|p| p.status.clone())
                .unwrap_or_else(|| "No proof submitted yet".to_string());
            let title = if disabled {
                "This week is not scheduled by the admin".to_string()
            } else {
                format!("{} {} — {}", slot.day_name, slot.pay_date, status_text)
            };

            html! {
                <button
                    key={slot.pay_date.clone()}
                    {onclick}
                    {disabled}
                    {title}
                    style={format!(
                        "width: 6.5rem; padding: 0.75rem 0.5rem; border-radius: 8px; background: white; \
                         border: {}; opacity: {}; cursor: {};",
                        border, opacity, cursor
                    )}
                >
                    <div style="display: flex; justify-content: center;">
                        <div style={format!(
                            "width: 2.5rem; height: 2.5rem; border-radius: 50%; color: white; \
                             display: flex; align-items: center; justify-content: center; background: {};",
                            circle_color(slot.state)
                        )}>
                            {day_of_month(&slot.pay_date)}
                        </div>
                    </div>
                    <div style="margin-top: 0.5rem; text-align: center; font-size: 0.875rem; font-weight: 600;">
                        {slot.label.clone()}
                    </div>
                    <div style="text-align: center; font-size: 0.75rem; color: #64748b;">
                        {format!("{} • {}", slot.day_name, slot.due_date)}
                    </div>
                </button>
            }
        })
        .collect();

    html! {
        <div style="display: flex; flex-direction: column; gap: 0.75rem;">
            <div style="display: flex; align-items: center; justify-content: space-between;">
                <div>
                    <h3 style="margin: 0; font-size: 0.875rem;">{"Weekly Calendar"}</h3>
                    <p style="margin: 0; font-size: 0.75rem; color: #64748b;">
                        {"Click a pay day to pick that week"}
                    </p>
                </div>
                <div style="display: flex; align-items: center; gap: 0.5rem;">
                    <button onclick={on_prev} disabled={current_page == 0}>{"<"}</button>
                    <span style="font-size: 0.75rem; color: #64748b;">
                        {format!("Page {} / {}", current_page + 1, total_pages)}
                    </span>
                    <button onclick={on_next} disabled={current_page + 1 >= total_pages}>{">"}</button>
                </div>
            </div>
            <div style="display: flex; gap: 0.5rem; overflow-x: auto; padding: 0.25rem 0;">
                { slot_buttons }
            </div>
        </div>
    }
}
