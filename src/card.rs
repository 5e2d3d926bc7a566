//! Maps single records to render-ready card descriptions.
//!
//! Cards hold raw text; escaping happens when the `html` adapter turns them
//! into markup.

use log::error;

use crate::tournaments::{format_date, PlacementClass};
use crate::{has_text, Platform, StreamerRecord, TournamentRecord};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Icon {
    Twitch,
    YouTube,
}

/// A link that opens in a new browsing context without referrer or opener.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Anchor {
    pub href: String,
    pub class: &'static str,
    pub label: &'static str,
    pub icon: Option<Icon>,
}

impl Anchor {
    fn build(href: Option<&str>, class: &'static str, label: &'static str) -> Option<Self> {
        href.filter(|h| has_text(Some(*h))).map(|h| Anchor {
            href: h.to_owned(),
            class,
            label,
            icon: None,
        })
    }

    fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StreamerCard {
    pub nickname: String,
    /// Real name, shown as a tooltip on the nickname.
    pub tooltip: Option<String>,
    pub liquipedia: Option<String>,
    pub links: Vec<Anchor>,
}

impl StreamerCard {
    pub fn has_tooltip(&self) -> bool {
        self.tooltip.is_some()
    }
}

pub fn streamer_card(record: Option<&StreamerRecord>) -> StreamerCard {
    let Some(record) = record else {
        error!("Invalid streamer data");
        return StreamerCard::default();
    };

    let links = [
        Anchor::build(record.link(Platform::Twitch), "twitch", "Twitch")
            .map(|a| a.with_icon(Icon::Twitch)),
        Anchor::build(record.link(Platform::Hltv), "hltv", "HLTV"),
        Anchor::build(record.link(Platform::YouTube), "youtube", "YouTube")
            .map(|a| a.with_icon(Icon::YouTube)),
    ]
    .into_iter()
    .flatten()
    .collect();

    StreamerCard {
        nickname: record.nickname().to_owned(),
        tooltip: record.real_name().map(str::to_owned),
        liquipedia: record.link(Platform::Liquipedia).map(str::to_owned),
        links,
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TournamentCard {
    pub game: String,
    pub date: String,
    pub name: String,
    pub team: String,
    pub placement: String,
    pub placement_class: PlacementClass,
    pub teammates: Vec<String>,
    pub links: Vec<Anchor>,
}

pub fn tournament_card(record: Option<&TournamentRecord>) -> TournamentCard {
    let Some(record) = record else {
        error!("Invalid tournament data");
        return TournamentCard::default();
    };

    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let links = record.links.clone().unwrap_or_default();
    let placement = text(&record.placement);

    TournamentCard {
        game: text(&record.game),
        date: format_date(record.date.as_deref()),
        name: text(&record.name),
        team: text(&record.team),
        placement_class: PlacementClass::classify(&placement),
        placement,
        teammates: record.teammates.clone().unwrap_or_default(),
        links: [
            Anchor::build(links.info.as_deref(), "tournament-link info", "Info"),
            Anchor::build(links.website.as_deref(), "tournament-link website", "Website"),
            Anchor::build(links.bracket.as_deref(), "tournament-link bracket", "Bracket"),
        ]
        .into_iter()
        .flatten()
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StreamerLinks, TournamentLinks};
    use pretty_assertions::assert_eq;

    #[test]
    fn streamer_links_follow_fixed_order_and_skip_blanks() {
        let record = StreamerRecord {
            nickname: Some("s1mple".into()),
            name: Some("Oleksandr".into()),
            links: Some(StreamerLinks {
                youtube: Some("https://yt".into()),
                hltv: Some("   ".into()),
                twitch: Some("https://twitch".into()),
                liquipedia: Some("https://lp".into()),
            }),
        };
        let card = streamer_card(Some(&record));
        let classes: Vec<&str> = card.links.iter().map(|a| a.class).collect();
        assert_eq!(classes, vec!["twitch", "youtube"]);
        assert_eq!(card.links[0].icon, Some(Icon::Twitch));
        assert_eq!(card.liquipedia.as_deref(), Some("https://lp"));
        assert_eq!(card.tooltip.as_deref(), Some("Oleksandr"));
    }

    #[test]
    fn blank_name_has_no_tooltip() {
        let record = StreamerRecord {
            nickname: Some("anon".into()),
            name: Some(" ".into()),
            links: None,
        };
        let card = streamer_card(Some(&record));
        assert!(!card.has_tooltip());
        assert!(card.links.is_empty());
    }

    #[test]
    fn missing_record_degrades_to_empty_card() {
        assert_eq!(streamer_card(None), StreamerCard::default());
        assert_eq!(tournament_card(None), TournamentCard::default());
    }

    #[test]
    fn tournament_card_fields() {
        let record = TournamentRecord {
            name: Some("Spring Cup".into()),
            game: Some("CS2".into()),
            team: Some("Wolves".into()),
            date: Some("not a date".into()),
            placement: Some("2nd".into()),
            teammates: Some(vec!["a".into(), "b".into()]),
            links: Some(TournamentLinks {
                bracket: Some("https://b".into()),
                info: Some("https://i".into()),
                website: None,
            }),
        };
        let card = tournament_card(Some(&record));
        assert_eq!(card.date, "");
        assert_eq!(card.placement, "2nd");
        assert_eq!(card.placement_class, PlacementClass::Second);
        assert_eq!(card.teammates, vec!["a", "b"]);
        let labels: Vec<&str> = card.links.iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Info", "Bracket"]);
    }
}
