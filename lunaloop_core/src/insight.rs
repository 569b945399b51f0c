//! Daily cycle insight text.
//!
//! Text comes from an optional external [`InsightSource`]. Results are cached
//! per day and phase in the key-value store, and a fixed table of four
//! canned insights per phase covers a missing, failing or empty source.
//! Cycle computation never depends on this module.

use crate::dates::format_date;
use crate::store::{keys, KvStore};
use crate::{CyclePhase, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// External text generator
pub trait InsightSource {
    fn generate(&self, prompt: &str) -> Result<String>;
}

static FALLBACK_INSIGHTS: Lazy<HashMap<CyclePhase, [&'static str; 4]>> = Lazy::new(|| {
    HashMap::from([
        (
            CyclePhase::Menstrual,
            [
                "Estrogen and progesterone are at their lowest; rest is scientifically beneficial.",
                "Inflammation markers may be higher; gentle movement can help circulation.",
                "Iron levels drop with blood loss; consider iron-rich foods like spinach.",
                "Uterine contractions cause cramps; magnesium may help muscle relaxation.",
            ],
        ),
        (
            CyclePhase::Follicular,
            [
                "Estrogen is rising, boosting serotonin and energy levels.",
                "Insulin sensitivity improves now; great time for complex carbs.",
                "Collagen production increases with estrogen; your skin may glow.",
                "Rising hormones improve cognitive function and verbal skills.",
            ],
        ),
        (
            CyclePhase::Ovulation,
            [
                "Peak estrogen triggers the LH surge; energy and libido are highest.",
                "Testosterone spikes slightly, increasing confidence and drive.",
                "Body temperature dips slightly before rising; you are most fertile.",
                "Immune system shifts slightly; prioritize hydration and hygiene.",
            ],
        ),
        (
            CyclePhase::Luteal,
            [
                "Progesterone rises, increasing body temperature and calorie burn.",
                "Progesterone has a sedating effect; you may feel sleepier.",
                "Blood sugar is less stable; focus on protein to avoid mood swings.",
                "Pre-menstrual drop in hormones can trigger neurotransmitter dips.",
            ],
        ),
    ])
});

/// Canned insight for a phase, chosen by cycle day
pub fn fallback_insight(phase: CyclePhase, day: i64) -> &'static str {
    let options = &FALLBACK_INSIGHTS[&phase];
    options[day.rem_euclid(options.len() as i64) as usize]
}

pub fn cache_key(date: NaiveDate, phase: CyclePhase) -> String {
    format!("{}{}_{}", keys::INSIGHT_PREFIX, format_date(date), phase)
}

pub fn build_prompt(phase: CyclePhase, day: i64, mood: &str) -> String {
    format!(
        "Act as a clinical women's health expert. The user is on day {} of their cycle ({} phase). \
         Their mood is \"{}\". Provide a 1-sentence scientific health insight. \
         Explain what is happening hormonally (Estrogen/Progesterone/LH) and how it affects them. \
         Keep it under 25 words. Be empathetic but factual.",
        day, phase, mood
    )
}

/// Cached insight lookup over an optional source
pub struct InsightService<'a> {
    source: Option<&'a dyn InsightSource>,
}

impl<'a> InsightService<'a> {
    /// Service that only serves cached text and the fallback table
    pub fn offline() -> Self {
        Self { source: None }
    }

    pub fn with_source(source: &'a dyn InsightSource) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Insight for `phase` on cycle `day`; always returns text
    pub fn get_insight<S: KvStore>(
        &self,
        store: &mut S,
        phase: CyclePhase,
        day: i64,
        mood: &str,
        today: NaiveDate,
    ) -> String {
        let key = cache_key(today, phase);
        if let Some(cached) = store.get_raw(&key) {
            tracing::debug!("Insight cache hit for {}", key);
            return cached;
        }

        let Some(source) = self.source else {
            return fallback_insight(phase, day).to_string();
        };

        match source.generate(&build_prompt(phase, day, mood)) {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                if let Err(e) = store.set_raw(&key, &text) {
                    tracing::error!("Error caching insight {}: {}", key, e);
                }
                text
            }
            Ok(_) => {
                tracing::warn!("Insight source returned empty text, using fallback");
                fallback_insight(phase, day).to_string()
            }
            Err(e) => {
                tracing::warn!("Error fetching insight: {}. Using fallback.", e);
                fallback_insight(phase, day).to_string()
            }
        }
    }
}
