use std::fmt;

use log::{debug, error, info};

use crate::card::{streamer_card, StreamerCard};
use crate::counter::CounterDisplay;
use crate::{Platform, Result, StreamerRecord};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum FilterMode {
    #[default]
    All,
    Pro,
    Streamers,
}

impl FilterMode {
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Pro, FilterMode::Streamers];

    /// Anything but `pro` or `streamers` falls back to `All`.
    pub fn parse_lenient(key: &str) -> Self {
        match key {
            "pro" => FilterMode::Pro,
            "streamers" => FilterMode::Streamers,
            _ => FilterMode::All,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Pro => "pro",
            FilterMode::Streamers => "streamers",
        }
    }

    /// Text of the dropdown button while this filter is active.
    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "All ▾",
            FilterMode::Pro => "Pro Players ▾",
            FilterMode::Streamers => "Streamers ▾",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Pro players are the ones with an HLTV or Liquipedia page.
pub fn is_pro(record: &StreamerRecord) -> bool {
    record.link(Platform::Hltv).is_some() || record.link(Platform::Liquipedia).is_some()
}

pub fn normalize_query(text: &str) -> String {
    text.to_lowercase().trim().to_owned()
}

/// Filters by mode, then by nickname substring. Load order is kept.
///
/// `query` is expected to be normalized already. Empty slots (entries that
/// failed to deserialize) count as non-pro with an empty nickname.
pub fn derive_view<'a>(
    records: &'a [Option<StreamerRecord>],
    filter: FilterMode,
    query: &str,
) -> Vec<Option<&'a StreamerRecord>> {
    records
        .iter()
        .map(Option::as_ref)
        .filter(|r| {
            let pro = r.map_or(false, is_pro);
            match filter {
                FilterMode::All => true,
                FilterMode::Pro => pro,
                FilterMode::Streamers => !pro,
            }
        })
        .filter(|r| {
            query.is_empty()
                || r.map_or(false, |r| r.nickname().to_lowercase().contains(query))
        })
        .collect()
}

/// The full list stays unrendered until the user asks for it.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum RevealGate {
    #[default]
    Collapsed,
    Revealed,
}

/// Streamer page controller.
#[derive(Debug, Default)]
pub struct StreamerDirectory {
    records: Vec<Option<StreamerRecord>>,
    counter: CounterDisplay,
    filter: FilterMode,
    query: String,
    gate: RevealGate,
    menu_open: bool,
    touch: bool,
    open_tooltip: Option<usize>,
    container: Vec<StreamerCard>,
}

impl StreamerDirectory {
    /// `touch` enables tap-to-toggle tooltips.
    pub fn new(touch: bool) -> Self {
        StreamerDirectory {
            touch,
            ..Default::default()
        }
    }

    pub fn loaded(&mut self, result: Result<Vec<Option<StreamerRecord>>>) {
        match result {
            Ok(records) => {
                info!("Loaded {} streamers", records.len());
                self.counter = CounterDisplay::Value(records.len() as u64);
                self.records = records;
                self.refresh();
            }
            Err(e) => {
                error!("Error loading streamers: {}", e);
                self.counter = CounterDisplay::Failed;
            }
        }
    }

    pub fn records(&self) -> &[Option<StreamerRecord>] {
        &self.records
    }

    pub fn counter(&self) -> CounterDisplay {
        self.counter
    }

    pub fn gate(&self) -> RevealGate {
        self.gate
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn open_tooltip(&self) -> Option<usize> {
        self.open_tooltip
    }

    /// Cards currently in the container; empty until revealed.
    pub fn container(&self) -> &[StreamerCard] {
        &self.container
    }

    /// Dropdown options with their active flag.
    pub fn filter_options(&self) -> [(FilterMode, bool); 3] {
        FilterMode::ALL.map(|m| (m, m == self.filter))
    }

    pub fn view(&self) -> Vec<Option<&StreamerRecord>> {
        derive_view(&self.records, self.filter, &self.query)
    }

    pub fn reveal(&mut self) {
        self.gate = RevealGate::Revealed;
        self.close_menu();
        self.render();
    }

    /// Choosing an option also closes the menu.
    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
        self.menu_open = false;
        self.refresh();
    }

    pub fn set_search(&mut self, text: &str) {
        self.query = normalize_query(text);
        self.refresh();
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// A tap on the nickname of container card `index`.
    ///
    /// Without a tooltip on that card this counts as a tap outside.
    pub fn tap_nickname(&mut self, index: usize) {
        self.close_menu();
        if !self.touch {
            return;
        }
        let has_tooltip = self
            .container
            .get(index)
            .map_or(false, StreamerCard::has_tooltip);
        if !has_tooltip {
            self.open_tooltip = None;
            return;
        }
        self.open_tooltip = match self.open_tooltip {
            Some(open) if open == index => None,
            _ => Some(index),
        };
    }

    pub fn tap_outside(&mut self) {
        self.close_menu();
        if self.touch {
            self.open_tooltip = None;
        }
    }

    fn refresh(&mut self) {
        if self.gate == RevealGate::Revealed {
            self.render();
        }
    }

    fn render(&mut self) {
        let cards: Vec<StreamerCard> = self.view().into_iter().map(streamer_card).collect();
        debug!(
            "Rendering {} of {} streamers (filter={}, query={:?})",
            cards.len(),
            self.records.len(),
            self.filter,
            self.query
        );
        self.container = cards;
        self.open_tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StreamerLinks;
    use pretty_assertions::assert_eq;

    fn streamer(nickname: &str, name: Option<&str>, hltv: Option<&str>, lp: Option<&str>) -> Option<StreamerRecord> {
        Some(StreamerRecord {
            nickname: Some(nickname.into()),
            name: name.map(Into::into),
            links: Some(StreamerLinks {
                hltv: hltv.map(Into::into),
                liquipedia: lp.map(Into::into),
                ..Default::default()
            }),
        })
    }

    fn nicknames(view: &[Option<&StreamerRecord>]) -> Vec<String> {
        view.iter()
            .map(|r| r.map(|r| r.nickname().to_owned()).unwrap_or_default())
            .collect()
    }

    fn roster() -> Vec<Option<StreamerRecord>> {
        vec![
            streamer("ALICEinchains", Some("Alice"), None, None),
            streamer("Bob", None, Some("https://hltv.org/bob"), None),
            streamer("alicePro", None, None, Some("https://liquipedia.net/alice")),
            streamer("Carol", Some("Carol C"), None, None),
        ]
    }

    #[test]
    fn empty_records_give_empty_views() {
        for mode in FilterMode::ALL {
            assert!(derive_view(&[], mode, "").is_empty());
            assert!(derive_view(&[], mode, "x").is_empty());
        }
    }

    #[test]
    fn pro_needs_non_blank_hltv_or_liquipedia() {
        assert!(is_pro(&streamer("a", None, Some("x"), None).unwrap()));
        assert!(is_pro(&streamer("a", None, None, Some("x")).unwrap()));
        assert!(!is_pro(&streamer("a", None, Some("  "), Some("")).unwrap()));
        assert!(!is_pro(&StreamerRecord {
            nickname: Some("a".into()),
            ..Default::default()
        }));
    }

    #[test]
    fn filters_keep_load_order() {
        let records = roster();
        assert_eq!(
            nicknames(&derive_view(&records, FilterMode::All, "")),
            vec!["ALICEinchains", "Bob", "alicePro", "Carol"]
        );
        assert_eq!(nicknames(&derive_view(&records, FilterMode::Pro, "")), vec!["Bob", "alicePro"]);
        assert_eq!(
            nicknames(&derive_view(&records, FilterMode::Streamers, "")),
            vec!["ALICEinchains", "Carol"]
        );
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let records = roster();
        let query = normalize_query(" Alice ");
        assert_eq!(query, "alice");
        assert_eq!(
            nicknames(&derive_view(&records, FilterMode::All, &query)),
            vec!["ALICEinchains", "alicePro"]
        );
    }

    #[test]
    fn filter_and_search_narrow_together() {
        let records = roster();
        let pro = derive_view(&records, FilterMode::Pro, "");
        let both = derive_view(&records, FilterMode::Pro, "alice");
        assert_eq!(nicknames(&both), vec!["alicePro"]);
        assert!(both.len() <= pro.len());
    }

    #[test]
    fn unknown_filter_key_means_all() {
        assert_eq!(FilterMode::parse_lenient("legends"), FilterMode::All);
        assert_eq!(FilterMode::parse_lenient("pro"), FilterMode::Pro);
        assert_eq!(FilterMode::parse_lenient("legends").label(), "All ▾");
    }

    #[test]
    fn empty_slots_are_streamers_without_nickname() {
        let records = vec![None, streamer("Bob", None, Some("x"), None)];
        assert_eq!(derive_view(&records, FilterMode::Streamers, "").len(), 1);
        assert!(derive_view(&records, FilterMode::Streamers, "b").is_empty());
    }

    #[test]
    fn nothing_renders_before_reveal() {
        let mut dir = StreamerDirectory::new(false);
        dir.loaded(Ok(roster()));
        assert_eq!(dir.counter(), CounterDisplay::Value(4));
        dir.set_filter(FilterMode::Pro);
        dir.set_search("bob");
        assert!(dir.container().is_empty());
        assert_eq!(dir.gate(), RevealGate::Collapsed);

        dir.reveal();
        let rendered: Vec<&str> = dir.container().iter().map(|c| c.nickname.as_str()).collect();
        assert_eq!(rendered, vec!["Bob"]);
    }

    #[test]
    fn reveal_before_load_renders_on_arrival() {
        let mut dir = StreamerDirectory::new(false);
        dir.reveal();
        assert!(dir.container().is_empty());
        dir.loaded(Ok(roster()));
        assert_eq!(dir.container().len(), 4);
    }

    #[test]
    fn reset_filters_restore_full_list() {
        let mut dir = StreamerDirectory::new(false);
        dir.loaded(Ok(roster()));
        dir.reveal();
        dir.set_filter(FilterMode::Streamers);
        dir.set_search("carol");
        assert_eq!(dir.container().len(), 1);
        dir.set_filter(FilterMode::All);
        dir.set_search("");
        assert_eq!(dir.container().len(), dir.records().len());
    }

    #[test]
    fn filter_menu_state() {
        let mut dir = StreamerDirectory::new(false);
        dir.toggle_menu();
        assert!(dir.menu_open());
        dir.tap_outside();
        assert!(!dir.menu_open());
        dir.toggle_menu();
        dir.set_filter(FilterMode::Streamers);
        assert!(!dir.menu_open());
        assert_eq!(
            dir.filter_options(),
            [
                (FilterMode::All, false),
                (FilterMode::Pro, false),
                (FilterMode::Streamers, true)
            ]
        );
    }

    #[test]
    fn tooltips_toggle_one_at_a_time_on_touch() {
        let mut dir = StreamerDirectory::new(true);
        dir.loaded(Ok(roster()));
        dir.reveal();

        dir.tap_nickname(0);
        assert_eq!(dir.open_tooltip(), Some(0));
        dir.tap_nickname(3);
        assert_eq!(dir.open_tooltip(), Some(3));
        dir.tap_nickname(3);
        assert_eq!(dir.open_tooltip(), None);

        dir.tap_nickname(0);
        // Bob has no real name, so this acts like a tap elsewhere.
        dir.tap_nickname(1);
        assert_eq!(dir.open_tooltip(), None);

        dir.tap_nickname(0);
        dir.tap_outside();
        assert_eq!(dir.open_tooltip(), None);
    }

    #[test]
    fn tooltips_ignore_taps_on_desktop() {
        let mut dir = StreamerDirectory::new(false);
        dir.loaded(Ok(roster()));
        dir.reveal();
        dir.tap_nickname(0);
        assert_eq!(dir.open_tooltip(), None);
    }

    #[test]
    fn rerender_closes_tooltip() {
        let mut dir = StreamerDirectory::new(true);
        dir.loaded(Ok(roster()));
        dir.reveal();
        dir.tap_nickname(0);
        dir.set_search("a");
        assert_eq!(dir.open_tooltip(), None);
    }
}
