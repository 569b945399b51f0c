//! Tracker: the engine entry points over an injected key-value store.
//!
//! Every read recomputes from the stored logs and settings. Mutations
//! (`save_log`, `update_log`, `delete_log`) persist the log collection, then
//! recalculate the streak, then apply the gamification rules.

use crate::analytics::{compute_analytics, AnalyticsData};
use crate::calendar::calendar_projections;
use crate::cycle::calculate_cycle_data;
use crate::dates::{self, add_days};
use crate::export::generate_csv;
use crate::gamification::{
    self, apply_log_rules, apply_streak, calculate_streak, BadgeProgress, DayActivity,
    GamificationResult, LevelDef, LevelProgress,
};
use crate::insight::InsightService;
use crate::logs;
use crate::settings::{self, CycleSettingsUpdate};
use crate::store::{keys, KvStore};
use crate::{
    AppSettings, CalendarProjection, CycleData, Error, FlowIntensity, LogEntry, LogPatch,
    ReminderSettings, Result, UserStats,
};
use chrono::NaiveDate;

pub struct Tracker<S: KvStore> {
    store: S,
    today: Option<NaiveDate>,
}

impl<S: KvStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self { store, today: None }
    }

    /// Evaluate everything as of a fixed date instead of the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(dates::today)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    pub fn logs(&self) -> Vec<LogEntry> {
        logs::load_logs(&self.store)
    }

    pub fn log_for_date(&self, date: NaiveDate) -> Option<LogEntry> {
        logs::find_log(&self.store, date)
    }

    /// Save a full entry, replacing any entry for the same date
    pub fn save_log(&mut self, entry: LogEntry) -> GamificationResult {
        let is_new = logs::upsert_log(&mut self.store, entry.clone());
        tracing::info!(
            "Saved log for {} ({})",
            entry.date,
            if is_new { "new" } else { "update" }
        );
        self.recalculate_streak();
        self.apply_rules(&entry, is_new)
    }

    /// Merge a partial update into the entry for `date`
    pub fn update_log(&mut self, date: NaiveDate, patch: LogPatch) -> GamificationResult {
        let (entry, is_new) = logs::merge_log(&mut self.store, date, patch);
        tracing::info!("Updated log for {}", date);
        self.recalculate_streak();
        self.apply_rules(&entry, is_new)
    }

    /// Remove the entry for `date`; returns whether one existed
    pub fn delete_log(&mut self, date: NaiveDate) -> bool {
        let removed = logs::remove_log(&mut self.store, date);
        if removed {
            tracing::info!("Deleted log for {}", date);
        }
        self.recalculate_streak();
        removed
    }

    fn apply_rules(&mut self, entry: &LogEntry, is_new: bool) -> GamificationResult {
        let logs = self.logs();
        let mut stats = self.user_stats();
        let result = apply_log_rules(&mut stats, &logs, entry, is_new);
        if result.points_earned > 0 || !result.unlocked_badges.is_empty() {
            self.store.set_value(keys::USER, &stats);
        }
        result
    }

    // ------------------------------------------------------------------
    // Gamification
    // ------------------------------------------------------------------

    pub fn user_stats(&self) -> UserStats {
        self.store.get_or(keys::USER, UserStats::default())
    }

    /// Recompute the streak from the logs; safe to call any number of times
    pub fn recalculate_streak(&mut self) -> u32 {
        let streak = calculate_streak(&self.logs(), self.today());
        let mut stats = self.user_stats();
        if apply_streak(&mut stats, streak) {
            tracing::debug!("Streak is now {}", streak);
            self.store.set_value(keys::USER, &stats);
        }
        streak
    }

    pub fn level_progress(&self) -> LevelProgress {
        let stats = self.user_stats();
        gamification::level_progress(stats.points, stats.level)
    }

    pub fn next_theme_reward(&self) -> Option<&'static LevelDef> {
        gamification::next_theme_reward(self.user_stats().level)
    }

    pub fn badge_progress(&self, badge_id: &str) -> Option<BadgeProgress> {
        gamification::badge_progress(badge_id, &self.logs(), &self.user_stats())
    }

    pub fn weekly_activity(&self) -> Vec<DayActivity> {
        gamification::weekly_activity(&self.logs(), self.today())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Settings("Name must not be empty".into()));
        }
        let mut stats = self.user_stats();
        stats.name = name.to_string();
        self.store.set_value(keys::USER, &stats);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn settings(&self) -> AppSettings {
        settings::load_settings(&self.store)
    }

    pub fn update_cycle_settings(&mut self, update: CycleSettingsUpdate) -> Result<AppSettings> {
        let mut current = self.settings();
        update.apply(&mut current)?;
        settings::save_settings(&mut self.store, &current);
        Ok(current)
    }

    pub fn set_privacy_mode(&mut self, enabled: bool) -> AppSettings {
        let mut current = self.settings();
        current.privacy_mode = enabled;
        settings::save_settings(&mut self.store, &current);
        current
    }

    /// Select a theme the user's level has unlocked
    pub fn select_theme(&mut self, theme: &str) -> Result<AppSettings> {
        settings::validate_theme(theme, self.user_stats().level)?;
        let mut current = self.settings();
        current.theme = theme.to_string();
        settings::save_settings(&mut self.store, &current);
        Ok(current)
    }

    /// Store the declared baseline and log the most recent period start
    pub fn complete_onboarding(
        &mut self,
        cycle_length: u32,
        period_length: u32,
        last_period_start: NaiveDate,
    ) -> Result<GamificationResult> {
        let mut current = self.settings();
        CycleSettingsUpdate {
            cycle_length: Some(cycle_length),
            period_length: Some(period_length),
        }
        .apply(&mut current)?;
        current.onboarded = true;
        settings::save_settings(&mut self.store, &current);

        let mut entry = LogEntry::new(last_period_start);
        entry.flow = Some(FlowIntensity::Medium);
        Ok(self.save_log(entry))
    }

    pub fn reminders(&self) -> ReminderSettings {
        settings::load_reminders(&self.store)
    }

    pub fn save_reminders(&mut self, reminders: &ReminderSettings) -> Result<()> {
        settings::save_reminders(&mut self.store, reminders)
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    pub fn cycle_data(&self) -> CycleData {
        calculate_cycle_data(&self.logs(), &self.settings(), self.today())
    }

    pub fn calendar_projections(&self, months_ahead: u32) -> Vec<CalendarProjection> {
        let settings = self.settings();
        let cycle = calculate_cycle_data(&self.logs(), &settings, self.today());
        calendar_projections(&cycle, settings.period_length, months_ahead)
    }

    pub fn analytics(&self) -> AnalyticsData {
        compute_analytics(&self.logs(), &self.settings())
    }

    /// Insight for today's phase, using today's logged mood when present
    pub fn daily_insight(&mut self, service: &InsightService<'_>) -> String {
        let cycle = self.cycle_data();
        let today = self.today();
        let mood = self
            .log_for_date(today)
            .and_then(|l| l.mood)
            .unwrap_or_else(|| "Neutral".to_string());
        service.get_insight(&mut self.store, cycle.phase, cycle.current_day, &mood, today)
    }

    pub fn export_csv(&self) -> Result<String> {
        generate_csv(&self.logs())
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    pub fn clear_all_data(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear data: {}", e);
        }
    }

    /// Replace all data with a demo profile: three logged periods 30 days apart
    pub fn seed_demo_data(&mut self) {
        self.clear_all_data();
        let today = self.today();

        let demo_settings = AppSettings {
            privacy_mode: false,
            onboarded: true,
            cycle_length: 29,
            period_length: 5,
            theme: "Forest Fairy".into(),
        };
        let demo_user = UserStats {
            name: "Demo User".into(),
            streak: 0,
            points: 3450,
            level: 5,
            unlocked_badges: [
                gamification::badges::NEWBIE,
                gamification::badges::FIRST_LOG,
                gamification::badges::HYDRATION_10,
                gamification::badges::MOOD_20,
            ]
            .iter()
            .map(|b| b.to_string())
            .collect(),
        };

        let mut reminders = ReminderSettings::default();
        reminders.daily_check_in.enabled = true;
        reminders.period_prediction.days_before = 2;
        reminders.pill.enabled = true;
        reminders.pill.time = "08:00".into();
        reminders.fertile_window.time = "10:00".into();

        let mut demo_logs = Vec::new();
        for cycle in 0..3i64 {
            let days_back_start = 5 + cycle * 30;
            for day in 0..5i64 {
                let mut entry = LogEntry::new(add_days(today, -(days_back_start - day)));
                entry.flow = Some(match day {
                    1 => FlowIntensity::Heavy,
                    2 => FlowIntensity::Medium,
                    _ => FlowIntensity::Light,
                });
                entry.add_symptom("Cramps");
                entry.add_symptom("Headache");
                entry.mood = Some(if cycle % 2 == 0 { "Tired" } else { "Happy" }.into());
                entry.water_intake = 4;
                demo_logs.push(entry);
            }
        }

        settings::save_settings(&mut self.store, &demo_settings);
        self.store.set_value(keys::USER, &demo_user);
        self.store.set_value(keys::LOGS, &demo_logs);
        self.store.set_value(keys::REMINDERS, &reminders);
        self.recalculate_streak();

        tracing::info!("Seeded demo data with {} log entries", demo_logs.len());
    }
}
