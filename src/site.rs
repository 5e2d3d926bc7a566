//! Fills a page shell with whichever directory sections it has room for.

use log::{error, info, warn};

use crate::config::Config;
use crate::counter::CounterDisplay;
use crate::html;
use crate::page::{self as mount, Page};
use crate::streamers::{FilterMode, RevealGate, StreamerDirectory};
use crate::tournaments::TournamentDirectory;
use crate::{Result, StreamerRecord, TournamentRecord};

/// Interactions to apply to the streamer section before writing it out.
#[derive(Debug, Clone, Default)]
pub struct Interactions {
    pub filter: FilterMode,
    pub search: String,
    pub reveal: bool,
}

impl Interactions {
    pub fn apply(&self, dir: &mut StreamerDirectory) {
        dir.set_filter(self.filter);
        dir.set_search(&self.search);
        if self.reveal {
            dir.reveal();
        }
    }
}

/// Loads both collections concurrently and writes each present section into
/// `template`. Sections whose mount points are missing are skipped. A failed
/// load or write only affects its own section.
pub async fn build_page(template: &str, config: &Config, actions: &Interactions) -> String {
    let mut page = Page::new(template);
    let loader = config.loader();
    let with_streamers = page.has_streamers();
    let with_tournaments = page.has_tournaments();
    if !with_streamers {
        warn!("Template has no streamer mount points, skipping section");
    }
    if !with_tournaments {
        warn!("Template has no tournament mount points, skipping section");
    }

    let (streamers, tournaments) = tokio::join!(
        async {
            if with_streamers {
                Some(loader.load::<StreamerRecord>(&config.streamers_path).await)
            } else {
                None
            }
        },
        async {
            if with_tournaments {
                Some(loader.load::<TournamentRecord>(&config.tournaments_path).await)
            } else {
                None
            }
        }
    );

    if let Some(result) = streamers {
        let mut dir = StreamerDirectory::new(config.is_touch());
        dir.loaded(result);
        actions.apply(&mut dir);
        commit(&mut page, "streamer", |draft| write_streamers(draft, &dir));
    }
    if let Some(result) = tournaments {
        let mut dir = TournamentDirectory::new();
        dir.loaded(result);
        commit(&mut page, "tournament", |draft| write_tournaments(draft, &dir));
    }
    page.into_string()
}

/// Runs `write` on a copy of `page` and keeps the result only if it succeeded.
fn commit<F>(page: &mut Page, section: &str, write: F)
where
    F: FnOnce(&mut Page) -> Result<()>,
{
    let mut draft = page.clone();
    match write(&mut draft) {
        Ok(()) => *page = draft,
        Err(e) => error!("Could not write {} section, leaving it as authored: {}", section, e),
    }
}

pub fn write_streamers(page: &mut Page, dir: &StreamerDirectory) -> Result<()> {
    page.set_inner(mount::STREAMERS_COUNTER, &dir.counter().to_string())?;
    if dir.gate() != RevealGate::Revealed {
        return Ok(());
    }
    info!("Writing {} streamer cards", dir.container().len());
    page.set_inner(mount::STREAMERS_CONTAINER, &html::streamer_cards(dir.container()))?;
    page.remove_class(mount::STREAMERS_CONTAINER, "hidden")?;
    if page.has_element(mount::FILTER_CONTAINER) {
        page.remove_class(mount::FILTER_CONTAINER, "hidden")?;
    }
    if page.has_element(mount::SHOW_STREAMERS_BUTTON) {
        page.set_attribute(mount::SHOW_STREAMERS_BUTTON, "style", "display: none")?;
    }
    if page.has_element(mount::FILTER_BUTTON) {
        page.set_inner(mount::FILTER_BUTTON, dir.filter().label())?;
    }
    if page.has_element(mount::FILTER_OPTIONS) {
        for (mode, active) in dir.filter_options() {
            page.toggle_class_in(
                mount::FILTER_OPTIONS,
                "filter-option",
                "data-filter",
                mode.key(),
                "active",
                active,
            )?;
        }
    }
    if page.has_element(mount::SEARCH_INPUT) {
        page.set_attribute(mount::SEARCH_INPUT, "value", dir.query())?;
    }
    Ok(())
}

pub fn write_tournaments(page: &mut Page, dir: &TournamentDirectory) -> Result<()> {
    if dir.counter() != CounterDisplay::Pending {
        page.set_inner(mount::TOURNAMENTS_COUNTER, &dir.counter().to_string())?;
    }
    page.set_inner(
        mount::TOURNAMENTS_CONTAINER,
        &html::tournament_container(dir.container()),
    )
}
