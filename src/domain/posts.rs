use time::{Date, OffsetDateTime, format_description::FormatItem, macros::format_description};

/// Storage/display format for post dates, matching the `YYYY-MM-DD` column.
pub const STORAGE_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

pub fn format_storage_date(date: Date) -> String {
    date.format(STORAGE_DATE_FORMAT).expect("valid calendar date")
}

/// The creation-day stamp for a post created right now (UTC).
pub fn today_stamp() -> String {
    format_storage_date(OffsetDateTime::now_utc().date())
}
