//! Vote tally computation.
//!
//! A tally is always derived fresh from the full set of vote choices currently
//! visible. Nothing here is persisted.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fill colors for chart slices, assigned by option position.
pub const CHART_COLORS: [&str; 6] = [
    "#4ade80", "#facc15", "#f87171", "#a78bfa", "#38bdf8", "#f472b6",
];

/// Count for a single option.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TallyEntry {
    pub label: String,
    pub count: u64,
}

/// Per-option counts in option order, plus their sum.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Tally {
    pub entries: Vec<TallyEntry>,
    pub total_votes: u64,
}

/// One slice of a pie chart.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: u64,
    /// Whole-number share of the total, 0 when there are no votes.
    pub percent: u32,
    pub color: String,
}

/// Count `choices` against `options`.
///
/// Every option starts at zero. Choices that match no option exactly are
/// ignored. A label repeated in `options` gets a single entry, at its first
/// position.
pub fn tally<'a, I>(options: &[String], choices: I) -> Tally
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::with_capacity(options.len());
    let mut labels: Vec<&str> = Vec::with_capacity(options.len());
    for option in options {
        if counts.insert(option.as_str(), 0).is_none() {
            labels.push(option.as_str());
        }
    }
    for choice in choices {
        if let Some(count) = counts.get_mut(choice) {
            *count += 1;
        }
    }

    let entries: Vec<TallyEntry> = labels
        .into_iter()
        .map(|option| TallyEntry {
            label: option.to_string(),
            count: counts.get(option).copied().unwrap_or(0),
        })
        .collect();
    let total_votes = entries.iter().map(|e| e.count).sum();

    Tally {
        entries,
        total_votes,
    }
}

impl Tally {
    /// Count for `label`, or `None` if it is not an option.
    #[must_use]
    pub fn count_for(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.count)
    }

    /// Convert into a chart-ready series.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn chart(&self) -> Vec<ChartSlice> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let percent = if self.total_votes == 0 {
                    0
                } else {
                    ((entry.count as f64 / self.total_votes as f64) * 100.0).round() as u32
                };
                ChartSlice {
                    label: entry.label.clone(),
                    value: entry.count,
                    percent,
                    color: CHART_COLORS[index % CHART_COLORS.len()].to_string(),
                }
            })
            .collect()
    }
}
