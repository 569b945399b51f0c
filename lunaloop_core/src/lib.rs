#![forbid(unsafe_code)]

//! Cycle inference and analytics engine for Lunaloop.
//!
//! This crate provides:
//! - Domain types (log entries, settings, user stats, derived cycle data)
//! - Local-calendar date helpers
//! - Key-value persistence (in-memory and JSON directory stores)
//! - Cycle inference, calendar projections and analytics
//! - Gamification (streaks, points, levels, badges)
//! - Insight text with cached lookups and an offline fallback
//! - CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod dates;
pub mod store;
pub mod logs;
pub mod settings;
pub mod cycle;
pub mod calendar;
pub mod analytics;
pub mod gamification;
pub mod insight;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{JsonDirStore, KvStore, MemoryStore};
pub use cycle::calculate_cycle_data;
pub use calendar::calendar_projections;
pub use analytics::{compute_analytics, AnalyticsData};
pub use gamification::{GamificationResult, LevelProgress};
pub use insight::{InsightService, InsightSource};
pub use tracker::Tracker;
