use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lunaloop_core::dates::{format_date, parse_date};
use lunaloop_core::gamification::{badge_catalog, GamificationResult};
use lunaloop_core::settings::CycleSettingsUpdate;
use lunaloop_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "luna")]
#[command(about = "Private menstrual cycle tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of the local date
    #[arg(long, global = true)]
    today: Option<String>,

    /// Log engine activity (saves, streaks, badges) to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log (or update) a day; only the given fields change
    Log {
        /// Day to log (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Flow intensity (light, medium, heavy, super)
        #[arg(long, conflicts_with = "no_flow")]
        flow: Option<String>,

        /// Clear the flow tag
        #[arg(long)]
        no_flow: bool,

        #[arg(long)]
        mood: Option<String>,

        #[arg(long)]
        spotting: Option<String>,

        /// Symptom tag (repeatable); replaces the day's symptoms
        #[arg(long = "symptom")]
        symptoms: Vec<String>,

        /// Glasses of water
        #[arg(long)]
        water: Option<u32>,
    },

    /// Delete the entry for a day
    Delete { date: String },

    /// Show the current cycle day, phase and prediction (default)
    Status,

    /// Show projected period and ovulation days
    Calendar {
        #[arg(long, default_value_t = calendar::DEFAULT_MONTHS_AHEAD)]
        months: u32,
    },

    /// Show cycle history and tag statistics
    Analytics,

    /// Show points, level, badges and the last week of activity
    Stats,

    /// Show or change settings
    Settings {
        #[arg(long)]
        cycle_length: Option<u32>,

        #[arg(long)]
        period_length: Option<u32>,

        #[arg(long)]
        privacy: Option<bool>,

        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        name: Option<String>,
    },

    /// First-run setup: declared lengths plus the last period start
    Onboard {
        #[arg(long)]
        cycle_length: u32,

        #[arg(long)]
        period_length: u32,

        #[arg(long)]
        last_period: String,
    },

    /// Show or change reminder preferences
    Reminders {
        #[arg(long)]
        daily: Option<bool>,

        #[arg(long)]
        daily_time: Option<String>,

        #[arg(long)]
        prediction: Option<bool>,

        #[arg(long)]
        days_before: Option<u32>,

        #[arg(long)]
        pill: Option<bool>,

        #[arg(long)]
        pill_time: Option<String>,

        #[arg(long)]
        fertile: Option<bool>,
    },

    /// Export all logs to CSV
    Export {
        /// Output file (defaults to the configured name in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Replace all data with a demo profile
    Seed,

    /// Delete all stored data
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        lunaloop_core::logging::init();
    } else {
        lunaloop_core::logging::init_with_level("warn");
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let today = cli.today.as_deref().map(parse_date).transpose()?;
    tracing::debug!("Using data directory {:?}", data_dir);
    let mut tracker = open_tracker(&data_dir, today);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Log {
            date,
            flow,
            no_flow,
            mood,
            spotting,
            symptoms,
            water,
        } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => tracker.today(),
            };
            let flow = match (flow, no_flow) {
                (Some(f), _) => Some(Some(f.parse::<FlowIntensity>()?)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let patch = LogPatch {
                symptoms: (!symptoms.is_empty()).then_some(symptoms),
                mood: mood.map(Some),
                flow,
                spotting: spotting.map(Some),
                water_intake: water,
            };
            cmd_log(&mut tracker, date, patch)
        }
        Commands::Delete { date } => cmd_delete(&mut tracker, parse_date(&date)?),
        Commands::Status => cmd_status(&mut tracker, &config),
        Commands::Calendar { months } => cmd_calendar(&tracker, months),
        Commands::Analytics => cmd_analytics(&tracker),
        Commands::Stats => cmd_stats(&tracker),
        Commands::Settings {
            cycle_length,
            period_length,
            privacy,
            theme,
            name,
        } => {
            if cycle_length.is_some() || period_length.is_some() {
                tracker.update_cycle_settings(CycleSettingsUpdate {
                    cycle_length,
                    period_length,
                })?;
            }
            if let Some(enabled) = privacy {
                tracker.set_privacy_mode(enabled);
            }
            if let Some(theme) = theme {
                tracker.select_theme(&theme)?;
            }
            if let Some(name) = name {
                tracker.set_name(&name)?;
            }
            print_settings(&tracker);
            Ok(())
        }
        Commands::Onboard {
            cycle_length,
            period_length,
            last_period,
        } => {
            let last_period = parse_date(&last_period)?;
            let result = tracker.complete_onboarding(cycle_length, period_length, last_period)?;
            println!("✓ Onboarding complete");
            print_rewards(&result);
            Ok(())
        }
        Commands::Reminders {
            daily,
            daily_time,
            prediction,
            days_before,
            pill,
            pill_time,
            fertile,
        } => {
            let mut reminders = tracker.reminders();
            let before = reminders.clone();
            if let Some(v) = daily {
                reminders.daily_check_in.enabled = v;
            }
            if let Some(t) = daily_time {
                reminders.daily_check_in.time = t;
            }
            if let Some(v) = prediction {
                reminders.period_prediction.enabled = v;
            }
            if let Some(d) = days_before {
                reminders.period_prediction.days_before = d;
            }
            if let Some(v) = pill {
                reminders.pill.enabled = v;
            }
            if let Some(t) = pill_time {
                reminders.pill.time = t;
            }
            if let Some(v) = fertile {
                reminders.fertile_window.enabled = v;
            }
            if reminders != before {
                tracker.save_reminders(&reminders)?;
            }
            print_reminders(&reminders);
            Ok(())
        }
        Commands::Export { output, stdout } => {
            if stdout {
                println!("{}", tracker.export_csv()?);
                return Ok(());
            }
            let path = output.unwrap_or_else(|| data_dir.join(&config.export.file_name));
            let count = export::write_csv(&tracker.logs(), &path)?;
            println!("✓ Exported {} entries", count);
            println!("  CSV: {}", path.display());
            Ok(())
        }
        Commands::Seed => {
            tracker.seed_demo_data();
            println!("✓ Demo data loaded ({} entries)", tracker.logs().len());
            Ok(())
        }
        Commands::Reset => {
            tracker.clear_all_data();
            println!("✓ All data cleared");
            Ok(())
        }
    }
}

fn open_tracker(data_dir: &Path, today: Option<NaiveDate>) -> Tracker<JsonDirStore> {
    let tracker = Tracker::new(JsonDirStore::new(data_dir));
    match today {
        Some(date) => tracker.with_today(date),
        None => tracker,
    }
}

fn cmd_log(tracker: &mut Tracker<JsonDirStore>, date: NaiveDate, patch: LogPatch) -> Result<()> {
    let result = tracker.update_log(date, patch);

    println!("✓ Logged {}", format_date(date));
    print_rewards(&result);
    println!("  Streak: {} days", tracker.user_stats().streak);
    Ok(())
}

fn cmd_delete(tracker: &mut Tracker<JsonDirStore>, date: NaiveDate) -> Result<()> {
    if tracker.delete_log(date) {
        println!("✓ Deleted {}", format_date(date));
    } else {
        println!("No entry for {}", format_date(date));
    }
    Ok(())
}

fn cmd_status(tracker: &mut Tracker<JsonDirStore>, config: &Config) -> Result<()> {
    let cycle = tracker.cycle_data();

    println!("\n  Day {} of {}", cycle.current_day, cycle.total_cycle_length);
    println!("  Phase: {}", cycle.phase);
    println!("  Next period: {}", cycle.prediction);
    println!("  Expected on: {}", format_date(cycle.next_period_date));
    println!("  Last period started: {}", format_date(cycle.last_period_start));

    if config.insight.enabled {
        let insight = tracker.daily_insight(&InsightService::offline());
        println!();
        println!("  ℹ {}", insight);
    }
    println!();
    Ok(())
}

fn cmd_calendar(tracker: &Tracker<JsonDirStore>, months: u32) -> Result<()> {
    let projections = tracker.calendar_projections(months);
    if projections.is_empty() {
        println!("Nothing to project.");
        return Ok(());
    }

    for projection in projections {
        let label = match projection.kind {
            ProjectionKind::Period => "period",
            ProjectionKind::Ovulation => "ovulation",
        };
        println!("{}  {}", format_date(projection.date), label);
    }
    Ok(())
}

fn cmd_analytics(tracker: &Tracker<JsonDirStore>) -> Result<()> {
    let data = tracker.analytics();

    println!("Average cycle: {} days", data.avg_cycle);
    println!("Average period: {} days", data.avg_period);

    if data.has_enough_data {
        println!(
            "Variability: ±{:.1} days ({}, score {})",
            data.variability, data.cycle_status, data.consistency_score
        );
    } else {
        println!("Log at least two full cycles to see trends.");
    }

    if !data.chart_data.is_empty() {
        println!("\nRecent cycles:");
        for point in &data.chart_data {
            println!(
                "  {} {}  {} days ({} period)",
                point.month,
                format_date(point.start_date),
                point.total,
                point.period
            );
        }
    }

    let tags = [("Symptoms", &data.symptom_stats), ("Moods", &data.mood_stats)];
    for (title, stats) in tags {
        if stats.is_empty() {
            continue;
        }
        println!("\n{}:", title);
        for tag in stats {
            println!("  {:<12} {:>3} ({}%)", tag.name, tag.count, tag.pct);
        }
    }

    let flow = &data.flow_stats;
    if flow.light + flow.medium + flow.heavy > 0 {
        println!(
            "\nFlow: light {}, medium {}, heavy {} (score {:.1})",
            flow.light, flow.medium, flow.heavy, flow.score
        );
    }
    Ok(())
}

fn cmd_stats(tracker: &Tracker<JsonDirStore>) -> Result<()> {
    let stats = tracker.user_stats();
    let progress = tracker.level_progress();

    println!("{}: level {}, {} points", stats.name, stats.level, stats.points);
    if progress.points_remaining > 0 {
        println!(
            "  {:.0}% to level {} ({} points to go)",
            progress.percentage,
            stats.level.saturating_add(1),
            progress.points_remaining
        );
    }
    if let Some(reward) = tracker.next_theme_reward() {
        if let Some(theme) = reward.reward {
            println!("  Next theme: {} at level {}", theme, reward.level);
        }
    }
    println!("  Streak: {} days", stats.streak);

    println!("\nBadges:");
    for badge in badge_catalog() {
        let mark = if stats.has_badge(badge.id) { "✓" } else { " " };
        match tracker.badge_progress(badge.id) {
            Some(p) if !stats.has_badge(badge.id) => {
                println!("  [{}] {} ({}/{} {})", mark, badge.name, p.current, p.target, p.label)
            }
            _ => println!("  [{}] {}", mark, badge.name),
        }
    }

    let week: String = tracker
        .weekly_activity()
        .iter()
        .map(|d| if d.is_logged { d.day_initial.clone() } else { "·".into() })
        .collect::<Vec<_>>()
        .join(" ");
    println!("\nThis week: {}", week);
    Ok(())
}

fn print_rewards(result: &GamificationResult) {
    if result.points_earned > 0 {
        println!("  +{} points", result.points_earned);
    }
    for badge in &result.unlocked_badges {
        let name = gamification::find_badge(badge).map_or(badge.as_str(), |b| b.name);
        println!("  ★ Badge unlocked: {}", name);
    }
    if result.level_up {
        println!("  ▲ Level up! Now level {}", result.new_level);
    }
}

fn print_settings(tracker: &Tracker<JsonDirStore>) {
    let settings = tracker.settings();
    println!("Cycle length: {} days", settings.cycle_length);
    println!("Period length: {} days", settings.period_length);
    println!("Privacy mode: {}", if settings.privacy_mode { "on" } else { "off" });
    println!("Theme: {}", settings.theme);
    println!("Name: {}", tracker.user_stats().name);
}

fn print_reminders(reminders: &ReminderSettings) {
    let on_off = |enabled: bool| if enabled { "on" } else { "off" };
    println!(
        "Daily check-in: {} at {}",
        on_off(reminders.daily_check_in.enabled),
        reminders.daily_check_in.time
    );
    println!(
        "Period prediction: {} ({} days before, at {})",
        on_off(reminders.period_prediction.enabled),
        reminders.period_prediction.days_before,
        reminders.period_prediction.time
    );
    println!("Pill: {} at {}", on_off(reminders.pill.enabled), reminders.pill.time);
    println!(
        "Fertile window: {} at {}",
        on_off(reminders.fertile_window.enabled),
        reminders.fertile_window.time
    );
}
