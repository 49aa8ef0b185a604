//! The hand-authored list of program seasons and funding rounds drawn over
//! the chart when the configuration does not supply its own.

use chrono::NaiveDate;

use crate::color::{generate_palette, Color};
use crate::data::model::EventRange;

/// Evaluated in const context, so a bad date fails the build.
const fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(y, m, d) {
        Some(date) => date,
        None => panic!("invalid built-in event date"),
    }
}

const SEASONS: &[(&str, NaiveDate, Option<NaiveDate>)] = &[
    ("Season 1", ymd(2023, 1, 9), Some(ymd(2023, 4, 14))),
    ("Season 2", ymd(2023, 6, 5), Some(ymd(2023, 9, 8))),
    ("Season 3", ymd(2024, 1, 8), Some(ymd(2024, 4, 12))),
    ("Season 4", ymd(2024, 9, 2), None),
];

const FUNDING_ROUNDS: &[(&str, NaiveDate, Option<NaiveDate>)] = &[
    ("Pre-Seed", ymd(2022, 11, 14), Some(ymd(2022, 12, 16))),
    ("Seed Round", ymd(2023, 5, 1), Some(ymd(2023, 5, 31))),
    ("Series A", ymd(2024, 6, 3), Some(ymd(2024, 7, 19))),
];

const FUNDING_COLOR: Color = Color::rgb(255, 159, 64);

/// Seasons get evenly spaced hues; funding rounds share one amber.
pub fn default_event_ranges() -> Vec<EventRange> {
    let season_colors = generate_palette(SEASONS.len());
    let seasons = SEASONS
        .iter()
        .zip(season_colors)
        .map(|(&(name, start, end), color)| EventRange::new(name, start, end, color));
    let rounds = FUNDING_ROUNDS
        .iter()
        .map(|&(name, start, end)| EventRange::new(name, start, end, FUNDING_COLOR));
    seasons.chain(rounds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EventKind;

    #[test]
    fn built_in_list_is_well_formed() {
        let events = default_event_ranges();
        assert_eq!(events.len(), SEASONS.len() + FUNDING_ROUNDS.len());
        for ev in &events {
            if let Some(end) = ev.end {
                assert!(end >= ev.start, "{} ends before it starts", ev.name);
            }
        }
        let seasons = events.iter().filter(|e| e.kind() == EventKind::Season).count();
        assert_eq!(seasons, SEASONS.len());
    }

    #[test]
    fn latest_season_is_ongoing() {
        let events = default_event_ranges();
        let last = events.iter().filter(|e| e.kind() == EventKind::Season).last().unwrap();
        assert_eq!(last.end, None);
    }
}
