use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use super::model::{EventKind, EventRange, MarkerStyle, Observation};
use crate::color::Color;

// ---------------------------------------------------------------------------
// Annotation descriptors handed to the renderer
// ---------------------------------------------------------------------------

/// Where a label sits vertically, relative to the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelAnchor {
    Top,
    NearTop,
}

/// One overlay primitive, keyed by id in [`annotate`]'s output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    /// Vertical line across the whole plot at `x`.
    #[serde(rename_all = "camelCase")]
    Line {
        x: NaiveDate,
        border_color: Color,
        border_width: f32,
        border_dash: Vec<u8>,
    },
    #[serde(rename_all = "camelCase")]
    Label {
        x: NaiveDate,
        anchor: LabelAnchor,
        x_adjust: i32,
        y_adjust: i32,
        content: String,
        color: Color,
        background_color: Color,
    },
}

impl Annotation {
    pub fn x(&self) -> NaiveDate {
        match self {
            Annotation::Line { x, .. } | Annotation::Label { x, .. } => *x,
        }
    }
}

/// Label placement per event category.
struct LabelStyle {
    anchor: LabelAnchor,
    x_adjust: i32,
    y_adjust: i32,
}

impl From<EventKind> for LabelStyle {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Season => LabelStyle {
                anchor: LabelAnchor::Top,
                x_adjust: 0,
                y_adjust: 8,
            },
            EventKind::FundingRound => LabelStyle {
                anchor: LabelAnchor::NearTop,
                x_adjust: 6,
                y_adjust: 28,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// EventRange → annotations
// ---------------------------------------------------------------------------

/// The date an event is drawn to: its own end, else the last plotted date,
/// else its start when nothing is plotted.
pub fn effective_end(event: &EventRange, observations: &[Observation]) -> NaiveDate {
    event
        .end
        .or_else(|| observations.last().map(|o| o.date))
        .unwrap_or(event.start)
}

/// Midpoint of two dates, rounded towards `a`.
fn midpoint(a: NaiveDate, b: NaiveDate) -> NaiveDate {
    let half = (b - a).num_days() / 2;
    a + TimeDelta::days(half)
}

/// Map every event to its start line, its end line (for
/// [`MarkerStyle::Range`]) and one text label.
///
/// Ids are `<slug>-start`, `<slug>-end` and `<slug>-label`; duplicate slugs
/// get a numeric suffix so no event silently replaces another.
pub fn annotate(
    events: &[EventRange],
    observations: &[Observation],
    marker: MarkerStyle,
) -> BTreeMap<String, Annotation> {
    let mut out = BTreeMap::new();

    for event in events {
        let id = unique_id(&out, event);
        let end = effective_end(event, observations);
        let line = |x: NaiveDate, dash: Vec<u8>| Annotation::Line {
            x,
            border_color: event.color,
            border_width: 2.0,
            border_dash: dash,
        };

        out.insert(format!("{id}-start"), line(event.start, Vec::new()));
        let label_x = match marker {
            MarkerStyle::Point => event.start,
            MarkerStyle::Range => {
                // Ongoing events get a dashed end line.
                let dash = if event.end.is_none() { vec![6, 6] } else { Vec::new() };
                out.insert(format!("{id}-end"), line(end, dash));
                midpoint(event.start, end)
            }
        };

        let style = LabelStyle::from(event.kind());
        out.insert(
            format!("{id}-label"),
            Annotation::Label {
                x: label_x,
                anchor: style.anchor,
                x_adjust: style.x_adjust,
                y_adjust: style.y_adjust,
                content: event.name.clone(),
                color: event.color,
                background_color: event.color.lighten(0.6).with_alpha(0.8),
            },
        );
    }
    out
}

fn unique_id(existing: &BTreeMap<String, Annotation>, event: &EventRange) -> String {
    let mut base = event.slug();
    if base.is_empty() {
        base = "event".to_string();
    }
    let mut id = base.clone();
    let mut n = 2;
    while existing.contains_key(&format!("{id}-start")) {
        id = format!("{base}-{n}");
        n += 1;
    }
    id
}
