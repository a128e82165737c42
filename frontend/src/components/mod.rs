pub mod weekly_calendar;
