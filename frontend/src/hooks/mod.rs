pub mod use_week_calendar;
