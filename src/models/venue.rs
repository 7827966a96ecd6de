//! Venue model and request bodies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::VenueShow;

/// A venue that hosts shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seeking_description: Option<String>,
}

/// Venue with its shows split around the current time.
#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Venue entry in listings and search results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing a city and state.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Request body for creating a venue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateVenueRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
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
    pub seeking_talent: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

/// Request body for editing a venue; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVenueRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
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
    pub seeking_talent: Option<bool>,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl Venue {
    /// Apply an edit in place.
    pub fn apply(&mut self, update: UpdateVenueRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(genres) = update.genres {
            self.genres = genres;
        }
        if let Some(seeking_talent) = update.seeking_talent {
            self.seeking_talent = seeking_talent;
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

/// Group venues already ordered by state and city into areas.
pub fn group_into_areas(venues: Vec<Venue>, upcoming: &HashMap<i64, i64>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    for venue in venues {
        let summary = VenueSummary {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
        };
        match areas.last_mut() {
            Some(area) if area.city == venue.city && area.state == venue.state => {
                area.venues.push(summary)
            }
            _ => areas.push(Area {
                city: venue.city,
                state: venue.state,
                venues: vec![summary],
            }),
        }
    }
    areas
}

/// Body of the venue and artist search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub search_term: Option<String>,
}

/// Search hits plus their count.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<T: Serialize> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Venue {
        Venue {
            id: 1,
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            genres: vec!["Jazz".to_string()],
            image_link: None,
            website: None,
            facebook_link: None,
            seeking_talent: true,
            seeking_description: None,
        }
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let mut v = venue();
        v.apply(UpdateVenueRequest {
            name: Some("The Hop".to_string()),
            seeking_talent: Some(false),
            website: Some("https://hop.example".to_string()),
            ..Default::default()
        });
        assert_eq!(v.name, "The Hop");
        assert!(!v.seeking_talent);
        assert_eq!(v.phone.as_deref(), Some("123-123-1234"));
        assert_eq!(v.website.as_deref(), Some("https://hop.example"));
        assert_eq!(v.genres, vec!["Jazz"]);
    }

    #[test]
    fn test_group_into_areas() {
        let mut hop = venue();
        hop.id = 1;
        let mut park = venue();
        park.id = 3;
        park.name = "Park Square Live Music & Coffee".to_string();
        let mut dueling = venue();
        dueling.id = 2;
        dueling.name = "The Dueling Pianos Bar".to_string();
        dueling.city = "New York".to_string();
        dueling.state = "NY".to_string();

        let upcoming = HashMap::from([(3, 2)]);
        let areas = group_into_areas(vec![hop, park, dueling], &upcoming);

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "San Francisco");
        assert_eq!(areas[0].venues.len(), 2);
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 0);
        assert_eq!(areas[0].venues[1].num_upcoming_shows, 2);
        assert_eq!(areas[1].state, "NY");
        assert_eq!(areas[1].venues[0].name, "The Dueling Pianos Bar");
    }

    #[test]
    fn test_detail_flattens_venue() {
        let detail = VenueDetail {
            venue: venue(),
            past_shows: vec![],
            upcoming_shows: vec![],
            past_shows_count: 0,
            upcoming_shows_count: 0,
        };
        let value = serde_json::to_value(detail).unwrap();
        assert_eq!(value["name"], "The Musical Hop");
        assert_eq!(value["genres"][0], "Jazz");
        assert_eq!(value["upcoming_shows_count"], 0);
    }
}
