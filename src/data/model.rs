use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Color;

// ---------------------------------------------------------------------------
// Observation – one row of the source file
// ---------------------------------------------------------------------------

/// A single dated index value. `value` is always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    /// Build an observation, rejecting non-finite values.
    pub fn new(date: NaiveDate, value: f64) -> Option<Self> {
        value.is_finite().then_some(Self { date, value })
    }
}

// ---------------------------------------------------------------------------
// ViewMode – the one UI toggle
// ---------------------------------------------------------------------------

/// Which series the chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// Daily values as read.
    #[default]
    Raw,
    /// Trailing moving average.
    MovingAverage,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Raw => ViewMode::MovingAverage,
            ViewMode::MovingAverage => ViewMode::Raw,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Raw => write!(f, "raw"),
            ViewMode::MovingAverage => write!(f, "moving average"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "daily" => Ok(ViewMode::Raw),
            "average" | "avg" | "ma" | "moving-average" | "movingaverage" => {
                Ok(ViewMode::MovingAverage)
            }
            other => Err(format!("unknown view mode '{other}' (expected raw or average)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Series – the derived, plotted sequence
// ---------------------------------------------------------------------------

/// The plotted sequence for one mode. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub mode: ViewMode,
    pub points: Vec<Observation>,
}

impl Series {
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EventRange – a named interval drawn over the chart
// ---------------------------------------------------------------------------

/// A named, coloured date interval. `end: None` means the event is ongoing
/// and stretches to the last plotted date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRange {
    pub name: String,
    pub start: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_open_end")]
    pub end: Option<NaiveDate>,
    pub color: Color,
}

impl EventRange {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: Option<NaiveDate>, color: Color) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            color,
        }
    }

    pub fn kind(&self) -> EventKind {
        EventKind::of(&self.name)
    }

    /// Stable annotation id prefix, e.g. `"Season 2"` → `"season-2"`.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }
}

/// Markers older event lists used for "no end date".
const OPEN_END_MARKERS: &[&str] = &["", "ongoing", "present", "invalid date"];

fn deserialize_open_end<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if OPEN_END_MARKERS.contains(&s.trim().to_ascii_lowercase().as_str()) => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("event end '{s}': {e}"))),
    }
}

/// Label category; picks vertical placement and horizontal offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Season,
    FundingRound,
}

impl EventKind {
    pub fn of(name: &str) -> Self {
        let is_season = name
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("season"));
        if is_season {
            EventKind::Season
        } else {
            EventKind::FundingRound
        }
    }
}

/// Whether an event is drawn as a single line at its start or as a
/// start/end pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    Point,
    #[default]
    Range,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn observation_rejects_non_finite() {
        assert!(Observation::new(date(2023, 1, 1), f64::NAN).is_none());
        assert!(Observation::new(date(2023, 1, 1), f64::INFINITY).is_none());
        assert!(Observation::new(date(2023, 1, 1), 1.5).is_some());
    }

    #[test]
    fn view_mode_toggles_and_parses() {
        assert_eq!(ViewMode::default(), ViewMode::Raw);
        assert_eq!(ViewMode::Raw.toggled(), ViewMode::MovingAverage);
        assert_eq!(ViewMode::MovingAverage.toggled(), ViewMode::Raw);
        assert_eq!("Average".parse::<ViewMode>(), Ok(ViewMode::MovingAverage));
        assert_eq!("raw".parse::<ViewMode>(), Ok(ViewMode::Raw));
        assert!("weekly".parse::<ViewMode>().is_err());
    }

    #[test]
    fn kind_follows_name_prefix() {
        assert_eq!(EventKind::of("Season 3"), EventKind::Season);
        assert_eq!(EventKind::of("season one"), EventKind::Season);
        assert_eq!(EventKind::of("Seed round"), EventKind::FundingRound);
        assert_eq!(EventKind::of("S"), EventKind::FundingRound);
    }

    #[test]
    fn slug_is_stable() {
        let ev = EventRange::new("  Series A (lead) ", date(2023, 1, 1), None, Color::TEAL);
        assert_eq!(ev.slug(), "series-a-lead");
    }

    #[test]
    fn open_end_markers_deserialize_to_none() {
        for end in ["null", "\"\"", "\"Invalid Date\"", "\"ongoing\""] {
            let json = format!(
                r##"{{"name":"Season 1","start":"2023-01-01","end":{end},"color":"#112233"}}"##
            );
            let ev: EventRange = serde_json::from_str(&json).unwrap();
            assert_eq!(ev.end, None, "end = {end}");
        }

        let missing: EventRange =
            serde_json::from_str(r##"{"name":"x","start":"2023-01-01","color":"#112233"}"##).unwrap();
        assert_eq!(missing.end, None);

        let closed: EventRange = serde_json::from_str(
            r##"{"name":"x","start":"2023-01-01","end":"2023-02-01","color":"#112233"}"##,
        )
        .unwrap();
        assert_eq!(closed.end, Some(date(2023, 2, 1)));
    }

    #[test]
    fn impossible_end_date_is_an_error() {
        let res: Result<EventRange, _> = serde_json::from_str(
            r##"{"name":"x","start":"2023-01-01","end":"2023-02-30","color":"#112233"}"##,
        );
        assert!(res.is_err());
    }
}
