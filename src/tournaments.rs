use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use log::{error, info};

use crate::card::{tournament_card, TournamentCard};
use crate::counter::CounterDisplay;
use crate::{Result, TournamentRecord};

pub const LOAD_ERROR: &str = "Failed to load tournaments data";

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum PlacementClass {
    Winner,
    Second,
    Third,
    #[default]
    Regular,
}

impl PlacementClass {
    /// Case-insensitive substring match, first hit wins: winner, then
    /// "2"/"second", then "3"/"third". So "23rd" is `Second`.
    pub fn classify(placement: &str) -> Self {
        let p = placement.to_lowercase();
        if p.contains("winner") {
            PlacementClass::Winner
        } else if p.contains('2') || p.contains("second") {
            PlacementClass::Second
        } else if p.contains('3') || p.contains("third") {
            PlacementClass::Third
        } else {
            PlacementClass::Regular
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            PlacementClass::Winner => "placement-winner",
            PlacementClass::Second => "placement-second",
            PlacementClass::Third => "placement-third",
            PlacementClass::Regular => "placement-regular",
        }
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    // Year-month and bare year resolve to the first day.
    let mut parts = raw.splitn(2, '-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Long Russian date, e.g. `15 марта 2024 г.`; empty when unparseable.
pub fn format_date(raw: Option<&str>) -> String {
    match raw.and_then(parse_date) {
        Some(d) => format!(
            "{:02} {} {} г.",
            d.day(),
            MONTHS_GENITIVE[d.month0() as usize],
            d.year()
        ),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TournamentContainer {
    Cards(Vec<TournamentCard>),
    Error(&'static str),
}

/// Tournament page controller. Records are rendered as soon as they load.
pub struct TournamentDirectory {
    records: Vec<Option<TournamentRecord>>,
    counter: CounterDisplay,
    container: TournamentContainer,
}

impl Default for TournamentDirectory {
    fn default() -> Self {
        TournamentDirectory {
            records: Vec::new(),
            counter: CounterDisplay::Pending,
            container: TournamentContainer::Cards(Vec::new()),
        }
    }
}

impl TournamentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&mut self, result: Result<Vec<Option<TournamentRecord>>>) {
        match result {
            Ok(records) => {
                info!("Loaded {} tournaments", records.len());
                self.counter = CounterDisplay::Value(records.len() as u64);
                self.records = records;
                self.render();
            }
            Err(e) => {
                error!("Error loading tournaments: {}", e);
                self.container = TournamentContainer::Error(LOAD_ERROR);
            }
        }
    }

    pub fn records(&self) -> &[Option<TournamentRecord>] {
        &self.records
    }

    pub fn counter(&self) -> CounterDisplay {
        self.counter
    }

    pub fn container(&self) -> &TournamentContainer {
        &self.container
    }

    fn render(&mut self) {
        let cards = self
            .records
            .iter()
            .map(|r| tournament_card(r.as_ref()))
            .collect();
        self.container = TournamentContainer::Cards(cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn placement_priority() {
        assert_eq!(PlacementClass::classify("Winner"), PlacementClass::Winner);
        assert_eq!(PlacementClass::classify("2nd Place"), PlacementClass::Second);
        assert_eq!(PlacementClass::classify("Third"), PlacementClass::Third);
        assert_eq!(PlacementClass::classify("Group Stage"), PlacementClass::Regular);
        assert_eq!(PlacementClass::classify("23rd"), PlacementClass::Second);
        assert_eq!(PlacementClass::classify("SECOND"), PlacementClass::Second);
        assert_eq!(PlacementClass::classify(""), PlacementClass::Regular);
    }

    #[test]
    fn css_classes() {
        assert_eq!(PlacementClass::classify("2nd").css_class(), "placement-second");
        assert_eq!(PlacementClass::Regular.css_class(), "placement-regular");
    }

    #[test]
    fn formats_dates_in_russian_long_form() {
        assert_eq!(format_date(Some("2024-03-15")), "15 марта 2024 г.");
        assert_eq!(format_date(Some("2023-12-01T18:30:00Z")), "01 декабря 2023 г.");
        assert_eq!(format_date(Some("2022-07")), "01 июля 2022 г.");
        assert_eq!(format_date(Some("2021")), "01 января 2021 г.");
    }

    #[test]
    fn bad_dates_are_blank() {
        assert_eq!(format_date(Some("soon")), "");
        assert_eq!(format_date(Some("2024-13-01")), "");
        assert_eq!(format_date(Some("")), "");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn renders_in_load_order() {
        let mut dir = TournamentDirectory::new();
        let names = ["B", "A", "C"];
        dir.loaded(Ok(names
            .iter()
            .map(|n| {
                Some(TournamentRecord {
                    name: Some(n.to_string()),
                    ..Default::default()
                })
            })
            .collect()));
        assert_eq!(dir.counter(), CounterDisplay::Value(3));
        let TournamentContainer::Cards(cards) = dir.container() else {
            panic!("expected cards");
        };
        let rendered: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(rendered, names);
    }

    #[test]
    fn load_failure_shows_error_message() {
        let mut dir = TournamentDirectory::new();
        dir.loaded(Err(Error::Status {
            path: "assets/data/tournaments.json".into(),
            status: 500,
        }));
        assert_eq!(dir.container(), &TournamentContainer::Error(LOAD_ERROR));
        assert_eq!(dir.counter(), CounterDisplay::Pending);
    }
}
