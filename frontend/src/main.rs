use shared::SelectedWeek;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::weekly_calendar::WeeklyCalendar;

#[function_component(App)]
fn app() -> Html {
    let selected_week = use_state(|| Option::<SelectedWeek>::None);

    let on_select_week = {
        let selected_week = selected_week.clone();
        Callback::from(move |selection: SelectedWeek| {
            selected_week.set(Some(selection));
        })
    };

    html! {
        <div style="max-width: 900px; margin: 0 auto; padding: 1rem; font-family: sans-serif;">
            <h2 style="margin-bottom: 0.25rem;">{"Kas Tracker"}</h2>
            <p style="margin-top: 0; color: #64748b;">{"Weekly dues overview"}</p>
            <WeeklyCalendar weeks={12u32} on_select_week={on_select_week} />
            {
                match selected_week.as_ref() {
                    Some(selection) => html! {
                        <div style="margin-top: 1rem; padding: 0.75rem; border: 1px solid #e2e8f0; border-radius: 8px; font-size: 0.875rem;">
                            {format!("Selected {} — due {}", selection.label, selection.due_date)}
                        </div>
                    },
                    None => html! {},
                }
            }
        </div>
    }
}

fn main() {
    // Route the shared crate's schedule warnings to the browser console
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
