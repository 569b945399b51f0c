//! Typed settings and reminder updates, validated before anything is stored.

use crate::gamification::theme_unlock_level;
use crate::store::{keys, KvStore};
use crate::{AppSettings, Error, ReminderSettings, Result};
use chrono::NaiveTime;
use std::ops::RangeInclusive;

pub const CYCLE_LENGTH_RANGE: RangeInclusive<u32> = 21..=45;
pub const PERIOD_LENGTH_RANGE: RangeInclusive<u32> = 2..=10;

/// Theme that needs no level to select
pub const PRIVACY_THEME: &str = "Privacy";

pub fn load_settings<S: KvStore>(store: &S) -> AppSettings {
    store.get_or(keys::SETTINGS, AppSettings::default())
}

pub fn save_settings<S: KvStore>(store: &mut S, settings: &AppSettings) {
    store.set_value(keys::SETTINGS, settings);
}

/// Partial update of the declared cycle baseline
#[derive(Clone, Debug, Default)]
pub struct CycleSettingsUpdate {
    pub cycle_length: Option<u32>,
    pub period_length: Option<u32>,
}

impl CycleSettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(length) = self.cycle_length {
            check_range("cycle length", length, &CYCLE_LENGTH_RANGE)?;
        }
        if let Some(length) = self.period_length {
            check_range("period length", length, &PERIOD_LENGTH_RANGE)?;
        }
        Ok(())
    }

    pub fn apply(&self, settings: &mut AppSettings) -> Result<()> {
        self.validate()?;
        if let Some(length) = self.cycle_length {
            settings.cycle_length = length;
        }
        if let Some(length) = self.period_length {
            settings.period_length = length;
        }
        Ok(())
    }
}

fn check_range(what: &str, value: u32, range: &RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::Settings(format!(
            "{} must be between {} and {} days, got {}",
            what,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Check that `theme` exists and is unlocked at `level`
pub fn validate_theme(theme: &str, level: u32) -> Result<()> {
    if theme == PRIVACY_THEME {
        return Ok(());
    }
    match theme_unlock_level(theme) {
        Some(required) if required <= level => Ok(()),
        Some(required) => Err(Error::Settings(format!(
            "{} unlocks at level {}",
            theme, required
        ))),
        None => Err(Error::Settings(format!("Unknown theme: {}", theme))),
    }
}

/// Reminders; a stored value of any other shape resolves to defaults
pub fn load_reminders<S: KvStore>(store: &S) -> ReminderSettings {
    store.get_or(keys::REMINDERS, ReminderSettings::default())
}

pub fn validate_reminder_time(time: &str) -> Result<()> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| Error::Settings(format!("Reminder time must be HH:MM, got {:?}", time)))
}

pub fn save_reminders<S: KvStore>(store: &mut S, reminders: &ReminderSettings) -> Result<()> {
    for time in [
        &reminders.daily_check_in.time,
        &reminders.period_prediction.time,
        &reminders.pill.time,
        &reminders.fertile_window.time,
    ] {
        validate_reminder_time(time)?;
    }
    store.set_value(keys::REMINDERS, reminders);
    Ok(())
}
