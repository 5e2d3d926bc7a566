use serde::{Deserialize, Serialize};

pub mod card;
pub mod config;
pub mod counter;
pub mod error;
pub mod html;
pub mod loader;
pub mod page;
pub mod site;
pub mod streamers;
pub mod tournaments;

pub use error::{Error, Result};

/// One entry of `streamers.json`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerRecord {
    pub nickname: Option<String>,
    pub name: Option<String>,
    pub links: Option<StreamerLinks>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerLinks {
    pub twitch: Option<String>,
    pub hltv: Option<String>,
    pub youtube: Option<String>,
    pub liquipedia: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Platform {
    Twitch,
    Hltv,
    YouTube,
    Liquipedia,
}

impl StreamerRecord {
    pub fn nickname(&self) -> &str {
        self.nickname.as_deref().unwrap_or_default()
    }

    /// Returns the link for `platform` if it is present and not blank.
    pub fn link(&self, platform: Platform) -> Option<&str> {
        let links = self.links.as_ref()?;
        let href = match platform {
            Platform::Twitch => links.twitch.as_deref(),
            Platform::Hltv => links.hltv.as_deref(),
            Platform::YouTube => links.youtube.as_deref(),
            Platform::Liquipedia => links.liquipedia.as_deref(),
        };
        href.filter(|h| has_text(Some(*h)))
    }

    pub fn real_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| has_text(Some(*n)))
    }
}

/// One entry of `tournaments.json`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentRecord {
    pub name: Option<String>,
    pub game: Option<String>,
    pub team: Option<String>,
    pub date: Option<String>,
    pub placement: Option<String>,
    pub teammates: Option<Vec<String>>,
    pub links: Option<TournamentLinks>,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentLinks {
    pub info: Option<String>,
    pub website: Option<String>,
    pub bracket: Option<String>,
}

/// True for a string with at least one non-whitespace character.
pub fn has_text(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}
