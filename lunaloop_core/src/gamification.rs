//! Gamification rules: streaks, points, levels and badges.
//!
//! Rules are pure functions over `UserStats` and the log collection; the
//! tracker persists the result. Points for a daily log are only awarded when
//! a save creates a new date, so editing an entry never farms points.
//!
//! A save performs at most one level-up, even when the new point total
//! crosses several thresholds. Badge bonuses are included in that single
//! check and never trigger a second one.

use crate::dates::{add_days, day_diff};
use crate::{LogEntry, UserStats};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;

/// Point awards
pub mod points {
    pub const DAILY_LOG: u32 = 50;
    pub const WATER_GOAL: u32 = 25;
    /// Reserved; no rule awards it yet
    pub const STREAK_BONUS: u32 = 100;
    pub const BADGE_UNLOCK: u32 = 200;
}

/// Badge identifiers
pub mod badges {
    pub const NEWBIE: &str = "badge_newbie";
    pub const FIRST_LOG: &str = "badge_first_log";
    pub const STREAK_7: &str = "badge_streak_7";
    pub const HYDRATION_10: &str = "badge_hydration_10";
    pub const MOOD_20: &str = "badge_mood_20";
    pub const CYCLE_3: &str = "badge_cycle_3";
}

/// Hydration units that count as meeting the daily water goal
pub const WATER_GOAL_UNITS: u32 = 8;

const STREAK_BADGE_DAYS: u32 = 7;
const HYDRATION_BADGE_DAYS: usize = 10;
const MOOD_BADGE_LOGS: usize = 20;
const CYCLE_BADGE_SPAN_DAYS: i64 = 80;
const DAYS_PER_TRACKED_CYCLE: i64 = 28;

// ============================================================================
// Levels
// ============================================================================

/// A level threshold and the theme it unlocks
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct LevelDef {
    pub level: u32,
    pub xp: u32,
    pub reward: Option<&'static str>,
}

pub const LEVELS: [LevelDef; 10] = [
    LevelDef { level: 1, xp: 0, reward: Some("Pretty in Pink") },
    LevelDef { level: 2, xp: 500, reward: None },
    LevelDef { level: 3, xp: 1200, reward: Some("Forest Fairy") },
    LevelDef { level: 4, xp: 2000, reward: None },
    LevelDef { level: 5, xp: 3000, reward: Some("Magical Muse") },
    LevelDef { level: 6, xp: 4500, reward: None },
    LevelDef { level: 7, xp: 6000, reward: None },
    LevelDef { level: 8, xp: 8000, reward: Some("Deep Sea Diver") },
    LevelDef { level: 9, xp: 10000, reward: None },
    LevelDef { level: 10, xp: 12500, reward: Some("Cosmic Queen") },
];

pub fn level_def(level: u32) -> Option<&'static LevelDef> {
    LEVELS.iter().find(|l| l.level == level)
}

/// Level at which a theme becomes selectable
pub fn theme_unlock_level(theme: &str) -> Option<u32> {
    LEVELS
        .iter()
        .find(|l| l.reward == Some(theme))
        .map(|l| l.level)
}

/// First theme reward above the given level
pub fn next_theme_reward(level: u32) -> Option<&'static LevelDef> {
    LEVELS.iter().find(|l| l.level > level && l.reward.is_some())
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub current_points: u32,
    pub next_level_points: u32,
    pub points_remaining: u32,
    pub percentage: f64,
}

/// Progress from the current level's threshold towards the next one
pub fn level_progress(points: u32, level: u32) -> LevelProgress {
    let Some(next) = level.checked_add(1).and_then(level_def) else {
        return LevelProgress {
            current_points: points,
            next_level_points: points,
            points_remaining: 0,
            percentage: 100.0,
        };
    };

    let base = level_def(level).map_or(0, |l| l.xp);
    let span = f64::from(next.xp.saturating_sub(base));
    let earned = f64::from(points.saturating_sub(base));
    let percentage = if span > 0.0 {
        (earned / span * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    LevelProgress {
        current_points: points,
        next_level_points: next.xp,
        points_remaining: next.xp.saturating_sub(points),
        percentage,
    }
}

// ============================================================================
// Badges
// ============================================================================

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub target: u32,
}

static BADGE_CATALOG: Lazy<Vec<BadgeDefinition>> = Lazy::new(|| {
    vec![
        BadgeDefinition {
            id: badges::NEWBIE,
            name: "Newbie",
            description: "Create your account",
            icon: "sparkle",
            target: 1,
        },
        BadgeDefinition {
            id: badges::FIRST_LOG,
            name: "First Step",
            description: "Log your first symptom",
            icon: "brush",
            target: 1,
        },
        BadgeDefinition {
            id: badges::STREAK_7,
            name: "On Fire",
            description: "Achieve a 7-day streak",
            icon: "flame",
            target: 7,
        },
        BadgeDefinition {
            id: badges::HYDRATION_10,
            name: "Hydration Hero",
            description: "Hit water goal 10 times",
            icon: "water",
            target: 10,
        },
        BadgeDefinition {
            id: badges::MOOD_20,
            name: "Zen Master",
            description: "Log moods 20 times",
            icon: "smile",
            target: 20,
        },
        BadgeDefinition {
            id: badges::CYCLE_3,
            name: "Period Prophet",
            description: "Track 3 full cycles",
            icon: "eye",
            target: 3,
        },
    ]
});

/// All badges in display order
pub fn badge_catalog() -> &'static [BadgeDefinition] {
    &BADGE_CATALOG
}

pub fn find_badge(badge_id: &str) -> Option<&'static BadgeDefinition> {
    BADGE_CATALOG.iter().find(|b| b.id == badge_id)
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BadgeProgress {
    pub current: u32,
    pub target: u32,
    pub label: &'static str,
}

fn hydration_days(logs: &[LogEntry]) -> usize {
    logs.iter().filter(|l| l.water_intake >= WATER_GOAL_UNITS).count()
}

fn mood_logs(logs: &[LogEntry]) -> usize {
    logs.iter().filter(|l| l.mood.is_some()).count()
}

/// Days between the oldest and newest logged dates
fn logged_span_days(logs: &[LogEntry]) -> Option<i64> {
    let oldest = logs.iter().map(|l| l.date).min()?;
    let newest = logs.iter().map(|l| l.date).max()?;
    Some(day_diff(oldest, newest))
}

/// Progress towards a badge, or `None` for an unknown id
pub fn badge_progress(
    badge_id: &str,
    logs: &[LogEntry],
    stats: &UserStats,
) -> Option<BadgeProgress> {
    let badge = find_badge(badge_id)?;

    let (current, label) = match badge.id {
        badges::NEWBIE => (1, "actions"),
        badges::FIRST_LOG => (u32::from(!logs.is_empty()), "actions"),
        badges::STREAK_7 => (stats.streak, "days"),
        badges::HYDRATION_10 => (hydration_days(logs) as u32, "days"),
        badges::MOOD_20 => (mood_logs(logs) as u32, "moods"),
        badges::CYCLE_3 => {
            let cycles = logged_span_days(logs)
                .map_or(0, |span| (span / DAYS_PER_TRACKED_CYCLE).min(3));
            (cycles as u32, "cycles")
        }
        _ => (0, "actions"),
    };

    Some(BadgeProgress {
        current,
        target: badge.target,
        label,
    })
}

// ============================================================================
// Streaks
// ============================================================================

/// Consecutive logged days ending today, or yesterday if today is not logged yet
pub fn calculate_streak(logs: &[LogEntry], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = logs.iter().map(|l| l.date).collect();
    let yesterday = add_days(today, -1);

    let mut day = if dates.contains(&today) {
        today
    } else if dates.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while dates.contains(&day) {
        streak += 1;
        day = add_days(day, -1);
    }
    streak
}

/// Store a recalculated streak on the stats
///
/// Returns `true` when the value changed. Reaching seven days unlocks the
/// streak badge once; its bonus is added without a level check.
pub fn apply_streak(stats: &mut UserStats, streak: u32) -> bool {
    if stats.streak == streak {
        return false;
    }

    stats.streak = streak;
    if streak >= STREAK_BADGE_DAYS && !stats.has_badge(badges::STREAK_7) {
        stats.unlocked_badges.push(badges::STREAK_7.to_string());
        stats.points = stats.points.saturating_add(points::BADGE_UNLOCK);
        tracing::info!("Unlocked {} with a {}-day streak", badges::STREAK_7, streak);
    }
    true
}

// ============================================================================
// Log Rules
// ============================================================================

/// Outcome of a log save
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GamificationResult {
    pub unlocked_badges: Vec<String>,
    pub level_up: bool,
    pub new_level: u32,
    pub points_earned: u32,
}

fn unlock_badge(stats: &UserStats, badge: &str, unlocked: &mut Vec<String>, earned: &mut u32) {
    if !stats.has_badge(badge) && !unlocked.iter().any(|b| b == badge) {
        unlocked.push(badge.to_string());
        *earned += points::BADGE_UNLOCK;
    }
}

/// Apply the save-time rules for `entry`
///
/// `logs` is the collection after the save. Returns what was earned; the
/// stats are only touched when something was.
pub fn apply_log_rules(
    stats: &mut UserStats,
    logs: &[LogEntry],
    entry: &LogEntry,
    is_new_log_for_day: bool,
) -> GamificationResult {
    let mut earned = 0u32;
    let mut unlocked: Vec<String> = Vec::new();

    if is_new_log_for_day {
        earned += points::DAILY_LOG;
        unlock_badge(stats, badges::FIRST_LOG, &mut unlocked, &mut earned);
    }

    if hydration_days(logs) >= HYDRATION_BADGE_DAYS {
        unlock_badge(stats, badges::HYDRATION_10, &mut unlocked, &mut earned);
    }

    if is_new_log_for_day && entry.water_intake >= WATER_GOAL_UNITS {
        earned += points::WATER_GOAL;
    }

    if mood_logs(logs) >= MOOD_BADGE_LOGS {
        unlock_badge(stats, badges::MOOD_20, &mut unlocked, &mut earned);
    }

    if logged_span_days(logs).is_some_and(|span| span >= CYCLE_BADGE_SPAN_DAYS) {
        unlock_badge(stats, badges::CYCLE_3, &mut unlocked, &mut earned);
    }

    let mut level_up = false;
    if earned > 0 || !unlocked.is_empty() {
        stats.points = stats.points.saturating_add(earned);

        // One level step per save
        if let Some(next) = stats.level.checked_add(1).and_then(level_def) {
            if stats.points >= next.xp {
                stats.level += 1;
                level_up = true;
                tracing::info!("Level up: reached level {}", stats.level);
            }
        }

        for badge in &unlocked {
            tracing::info!("Unlocked badge {}", badge);
        }
        stats.unlocked_badges.extend(unlocked.iter().cloned());
    }

    GamificationResult {
        unlocked_badges: unlocked,
        level_up,
        new_level: stats.level,
        points_earned: earned,
    }
}

// ============================================================================
// Weekly Activity
// ============================================================================

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    pub date: NaiveDate,
    /// First letter of the weekday name
    pub day_initial: String,
    pub is_logged: bool,
    pub is_today: bool,
}

/// The last seven days, oldest first
pub fn weekly_activity(logs: &[LogEntry], today: NaiveDate) -> Vec<DayActivity> {
    let logged: HashSet<NaiveDate> = logs.iter().map(|l| l.date).collect();
    (0..7)
        .rev()
        .map(|days_ago| {
            let date = add_days(today, -days_ago);
            DayActivity {
                date,
                day_initial: date.format("%a").to_string().chars().take(1).collect(),
                is_logged: logged.contains(&date),
                is_today: days_ago == 0,
            }
        })
        .collect()
}
