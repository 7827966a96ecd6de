//! Artist model and request bodies.

use serde::{Deserialize, Serialize};

use super::ArtistShow;

/// A performing artist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeking_description: Option<String>,
}

/// Artist with its shows split around the current time.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Artist entry in the alphabetical listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

/// Artist entry in search results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistSearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Request body for creating an artist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateArtistRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

/// Request body for editing an artist; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArtistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub seeking_venue: Option<bool>,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl Artist {
    /// Apply an edit in place.
    pub fn apply(&mut self, update: UpdateArtistRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(genres) = update.genres {
            self.genres = genres;
        }
        if let Some(seeking_venue) = update.seeking_venue {
            self.seeking_venue = seeking_venue;
        }
        self.phone = update.phone.or(self.phone.take());
        self.image_link = update.image_link.or(self.image_link.take());
        self.website = update.website.or(self.website.take());
        self.facebook_link = update.facebook_link.or(self.facebook_link.take());
        self.seeking_description = update
            .seeking_description
            .or(self.seeking_description.take());
    }
}
