//! Markup for card descriptions. All record text goes through `html_escape`.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::card::{Anchor, Icon, StreamerCard, TournamentCard};
use crate::tournaments::TournamentContainer;

const TWITCH_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="currentColor"><path d="M11.571 4.714h1.715v5.143H11.57zm4.715 0H18v5.143h-1.714zM6 0L1.714 4.286v15.428h5.143V24l4.286-4.286h3.428L22.286 12V0zm14.571 11.143l-3.428 3.428h-3.429l-3 3v-3H6.857V1.714h13.714z"/></svg>"#;
const YOUTUBE_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="currentColor"><path d="M19.615 3.184c-3.604-.246-11.631-.245-15.23 0-3.897.266-4.356 2.62-4.385 8.816.029 6.185.484 8.549 4.385 8.816 3.6.245 11.626.246 15.23 0 3.897-.266 4.356-2.62 4.385-8.816-.029-6.185-.484-8.549-4.385-8.816zm-10.615 12.816v-8l8 3.993-8 4.007z"/></svg>"#;

const EXTERNAL: &str = r#"target="_blank" rel="noopener noreferrer""#;

fn icon_svg(icon: Icon) -> &'static str {
    match icon {
        Icon::Twitch => TWITCH_ICON,
        Icon::YouTube => YOUTUBE_ICON,
    }
}

pub fn anchor(a: &Anchor) -> String {
    let label = match a.icon {
        Some(icon) => format!("{} {}", icon_svg(icon), a.label),
        None => a.label.to_owned(),
    };
    format!(
        r#"<a href="{}" class="{}" {}>{}</a>"#,
        attr(&a.href),
        a.class,
        EXTERNAL,
        label
    )
}

pub fn streamer_card(card: &StreamerCard) -> String {
    let nickname = match &card.tooltip {
        Some(name) => format!(
            r#"<span class="nickname" data-name="{}" data-has-name="true" style="cursor: pointer">{}<span class="tooltip">{}</span></span>"#,
            attr(name),
            text(&card.nickname),
            text(name)
        ),
        None => format!(r#"<span class="nickname">{}</span>"#, text(&card.nickname)),
    };
    let info = card
        .liquipedia
        .as_ref()
        .map(|href| {
            format!(
                r#"<a href="{}" class="info-icon" {} title="View on Liquipedia">i</a>"#,
                attr(href),
                EXTERNAL
            )
        })
        .unwrap_or_default();
    let links: String = card.links.iter().map(anchor).collect();

    format!(
        r#"<article class="streamer-card"><h2 class="streamer-header">{nickname}{info}</h2><div class="links">{links}</div></article>"#
    )
}

pub fn tournament_card(card: &TournamentCard) -> String {
    let teammates = if card.teammates.is_empty() {
        String::new()
    } else {
        let badges: String = card
            .teammates
            .iter()
            .map(|t| format!(r#"<span class="teammate-badge">{}</span>"#, text(t)))
            .collect();
        format!(
            r#"<div class="tournament-teammates"><span class="teammates-label">With:</span><div class="teammates-list">{badges}</div></div>"#
        )
    };
    let links: String = card.links.iter().map(anchor).collect();

    format!(
        concat!(
            r#"<article class="tournament-card">"#,
            r#"<div class="tournament-header"><div class="tournament-game">{}</div><div class="tournament-date">{}</div></div>"#,
            r#"<h2 class="tournament-name">{}</h2>"#,
            r#"<div class="tournament-team">Team: {}</div>"#,
            r#"<div class="tournament-placement {}"><span class="placement-label">Result:</span><span class="placement-value">{}</span></div>"#,
            "{}",
            r#"<div class="tournament-links">{}</div>"#,
            "</article>"
        ),
        text(&card.game),
        text(&card.date),
        text(&card.name),
        text(&card.team),
        card.placement_class.css_class(),
        text(&card.placement),
        teammates,
        links
    )
}

pub fn streamer_cards(cards: &[StreamerCard]) -> String {
    cards.iter().map(streamer_card).collect::<Vec<_>>().join("\n")
}

pub fn tournament_container(container: &TournamentContainer) -> String {
    match container {
        TournamentContainer::Cards(cards) => {
            cards.iter().map(tournament_card).collect::<Vec<_>>().join("\n")
        }
        TournamentContainer::Error(msg) => format!(r#"<div class="error">{}</div>"#, text(msg)),
    }
}
