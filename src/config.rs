//! Support for library configuration options

use std::sync::{Arc, Mutex};
use chrono::format::{Item, StrftimeItems};
use once_cell::sync::Lazy;

use crate::collection::CollectionKind;

const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// The `chrono` format string used when a date is displayed to a human (e.g. `17.10.2026 9:00`).
/// Feel free to override it when initing this library. An invalid format is ignored, and the default one is used instead.
pub static DATE_FORMAT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new(DEFAULT_DATE_FORMAT.to_string())));

/// How often the [`NotificationManager`](crate::notifications::NotificationManager) checks for due tasks.
pub static NOTIFICATION_PERIOD: Lazy<Arc<Mutex<std::time::Duration>>> = Lazy::new(|| Arc::new(Mutex::new(std::time::Duration::from_secs(60))));

/// The kind of list built by [`create_default_collection`](crate::collection::create_default_collection)
pub static DEFAULT_COLLECTION_KIND: Lazy<Arc<Mutex<CollectionKind>>> = Lazy::new(|| Arc::new(Mutex::new(CollectionKind::Array)));


/// Returns the current value of [`DATE_FORMAT`], or the default format if the current one is not a valid `strftime` string
pub fn date_format() -> String {
    let format = match DATE_FORMAT.lock() {
        Ok(format) => format.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
        log::warn!("Invalid date format {:?}, using {:?} instead", format, DEFAULT_DATE_FORMAT);
        return DEFAULT_DATE_FORMAT.to_string();
    }
    format
}

/// Returns the current value of [`NOTIFICATION_PERIOD`]
pub fn notification_period() -> std::time::Duration {
    match NOTIFICATION_PERIOD.lock() {
        Ok(period) => *period,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Returns the current value of [`DEFAULT_COLLECTION_KIND`]
pub fn default_collection_kind() -> CollectionKind {
    match DEFAULT_COLLECTION_KIND.lock() {
        Ok(kind) => *kind,
        Err(poisoned) => *poisoned.into_inner(),
    }
}
