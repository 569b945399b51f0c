//! Core domain types for the Lunaloop engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Daily log entries and partial updates
//! - Cycle phases and flow intensities
//! - User stats, app settings and reminders
//! - Derived cycle data and calendar projections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Tags
// ============================================================================

/// Flow intensity recorded on a period day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FlowIntensity {
    Light,
    Medium,
    Heavy,
    Super,
}

impl FlowIntensity {
    /// Weight used by the flow score (Heavy and Super share the top weight)
    pub fn weight(self) -> u32 {
        match self {
            FlowIntensity::Light => 1,
            FlowIntensity::Medium => 2,
            FlowIntensity::Heavy | FlowIntensity::Super => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlowIntensity::Light => "Light",
            FlowIntensity::Medium => "Medium",
            FlowIntensity::Heavy => "Heavy",
            FlowIntensity::Super => "Super",
        }
    }
}

impl fmt::Display for FlowIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowIntensity {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(FlowIntensity::Light),
            "medium" => Ok(FlowIntensity::Medium),
            "heavy" => Ok(FlowIntensity::Heavy),
            "super" => Ok(FlowIntensity::Super),
            other => Err(crate::Error::Other(format!("Unknown flow intensity: {}", other))),
        }
    }
}

/// Phase of the menstrual cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl CyclePhase {
    pub const ALL: [CyclePhase; 4] = [
        CyclePhase::Menstrual,
        CyclePhase::Follicular,
        CyclePhase::Ovulation,
        CyclePhase::Luteal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CyclePhase::Menstrual => "Menstrual",
            CyclePhase::Follicular => "Follicular",
            CyclePhase::Ovulation => "Ovulation",
            CyclePhase::Luteal => "Luteal",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Entries
// ============================================================================

/// One day of logged data, keyed by its local calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub date: NaiveDate,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub flow: Option<FlowIntensity>,
    #[serde(default)]
    pub spotting: Option<String>,
    #[serde(default)]
    pub water_intake: u32,
}

impl LogEntry {
    /// Create an empty entry for the given date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            symptoms: Vec::new(),
            mood: None,
            flow: None,
            spotting: None,
            water_intake: 0,
        }
    }

    /// A flow tag marks the day as a period day
    pub fn is_period_day(&self) -> bool {
        self.flow.is_some()
    }

    /// Add a symptom tag, keeping first-seen order and skipping duplicates
    pub fn add_symptom(&mut self, symptom: impl Into<String>) {
        let symptom = symptom.into();
        if !self.symptoms.contains(&symptom) {
            self.symptoms.push(symptom);
        }
    }

    /// Merge a partial update into this entry; absent fields are preserved
    pub fn apply(&mut self, patch: LogPatch) {
        if let Some(symptoms) = patch.symptoms {
            self.symptoms.clear();
            for symptom in symptoms {
                self.add_symptom(symptom);
            }
        }
        if let Some(mood) = patch.mood {
            self.mood = mood;
        }
        if let Some(flow) = patch.flow {
            self.flow = flow;
        }
        if let Some(spotting) = patch.spotting {
            self.spotting = spotting;
        }
        if let Some(water) = patch.water_intake {
            self.water_intake = water;
        }
    }
}

/// Partial update for a log entry
///
/// `None` leaves a field untouched; `Some(None)` clears an optional tag.
#[derive(Clone, Debug, Default)]
pub struct LogPatch {
    pub symptoms: Option<Vec<String>>,
    pub mood: Option<Option<String>>,
    pub flow: Option<Option<FlowIntensity>>,
    pub spotting: Option<Option<String>>,
    pub water_intake: Option<u32>,
}

// ============================================================================
// User State and Settings
// ============================================================================

/// Gamification state for the single local user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub name: String,
    pub streak: u32,
    pub points: u32,
    pub level: u32,
    pub unlocked_badges: Vec<String>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            name: "User".into(),
            streak: 0,
            points: 100,
            level: 1,
            unlocked_badges: vec!["badge_newbie".into()],
        }
    }
}

impl UserStats {
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.unlocked_badges.iter().any(|b| b == badge_id)
    }
}

/// User-declared baseline cycle parameters and app preferences
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub privacy_mode: bool,
    #[serde(default)]
    pub onboarded: bool,
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    #[serde(default = "default_period_length")]
    pub period_length: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_cycle_length() -> u32 {
    28
}

fn default_period_length() -> u32 {
    5
}

fn default_theme() -> String {
    "Pretty in Pink".into()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            privacy_mode: false,
            onboarded: false,
            cycle_length: default_cycle_length(),
            period_length: default_period_length(),
            theme: default_theme(),
        }
    }
}

/// A reminder that fires at a fixed time of day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimedReminder {
    pub enabled: bool,
    pub time: String,
}

/// Reminder ahead of the predicted period
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReminder {
    pub enabled: bool,
    pub days_before: u32,
    pub time: String,
}

/// Reminder preferences (delivery is handled outside the engine)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub daily_check_in: TimedReminder,
    pub period_prediction: PredictionReminder,
    pub pill: TimedReminder,
    pub fertile_window: TimedReminder,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            daily_check_in: TimedReminder {
                enabled: false,
                time: "20:00".into(),
            },
            period_prediction: PredictionReminder {
                enabled: true,
                days_before: 1,
                time: "09:00".into(),
            },
            pill: TimedReminder {
                enabled: false,
                time: "09:00".into(),
            },
            fertile_window: TimedReminder {
                enabled: true,
                time: "09:00".into(),
            },
        }
    }
}

// ============================================================================
// Derived Data
// ============================================================================

/// Current cycle position and prediction, derived from logs and settings
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleData {
    pub current_day: i64,
    pub total_cycle_length: i64,
    pub phase: CyclePhase,
    pub prediction: String,
    pub next_period_date: NaiveDate,
    pub last_period_start: NaiveDate,
    pub days_until_next: i64,
}

impl CycleData {
    /// The expected period date has passed without a new period being logged
    pub fn is_late(&self) -> bool {
        self.days_until_next < 0
    }
}

/// Kind of projected calendar day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    Period,
    Ovulation,
}

/// A projected future calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalendarProjection {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ProjectionKind,
}
