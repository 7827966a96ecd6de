//! Show model: an artist playing a venue at a given time.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A show joined with the names and images of its artist and venue.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_image_link: Option<String>,
    pub artist_id: i64,
    pub artist_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show as seen from its venue's page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// A show as seen from its artist's page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl From<ShowListing> for VenueShow {
    fn from(show: ShowListing) -> Self {
        Self {
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link,
            start_time: show.start_time,
        }
    }
}

impl From<ShowListing> for ArtistShow {
    fn from(show: ShowListing) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            venue_image_link: show.venue_image_link,
            start_time: show.start_time,
        }
    }
}

/// Request body for listing a new show.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShowRequest {
    pub artist_id: Option<i64>,
    pub venue_id: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
}

/// Split shows into `(past, upcoming)`; a show starting exactly now is upcoming.
pub fn partition_shows<T>(shows: Vec<ShowListing>, now: DateTime<Utc>) -> (Vec<T>, Vec<T>)
where
    T: From<ShowListing>,
{
    let (past, upcoming): (Vec<_>, Vec<_>) =
        shows.into_iter().partition(|show| show.start_time < now);
    (
        past.into_iter().map(T::from).collect(),
        upcoming.into_iter().map(T::from).collect(),
    )
}

/// Whether `time` has a four-digit year, the only range [`format_start_time`] keeps fixed-width.
pub fn is_storable_start_time(time: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&time.year())
}

/// Fixed-width UTC timestamp used for the `start_time` column, so text order is time order.
pub fn format_start_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn listing(id: i64, start_time: DateTime<Utc>) -> ShowListing {
        ShowListing {
            id,
            venue_id: 1,
            venue_name: "The Musical Hop".to_string(),
            venue_image_link: None,
            artist_id: 4,
            artist_name: "Guns N Petals".to_string(),
            artist_image_link: Some("https://img.example/gnp.jpg".to_string()),
            start_time,
        }
    }

    #[test]
    fn test_partition_shows_around_now() {
        let now = Utc.with_ymd_and_hms(2030, 6, 1, 20, 0, 0).unwrap();
        let shows = vec![
            listing(1, now - Duration::days(30)),
            listing(2, now),
            listing(3, now + Duration::hours(2)),
            listing(4, now - Duration::seconds(1)),
        ];

        let (past, upcoming): (Vec<VenueShow>, Vec<VenueShow>) = partition_shows(shows, now);

        assert_eq!(past.len(), 2);
        assert_eq!(upcoming.len(), 2);
        assert!(past.iter().all(|s| s.start_time < now));
        assert!(upcoming.iter().all(|s| s.start_time >= now));
        assert_eq!(upcoming[0].artist_name, "Guns N Petals");
    }

    #[test]
    fn test_artist_projection_keeps_venue_fields() {
        let show: ArtistShow = listing(1, Utc::now()).into();
        assert_eq!(show.venue_id, 1);
        assert_eq!(show.venue_name, "The Musical Hop");
    }

    #[test]
    fn test_storable_start_time_years() {
        let ok = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(is_storable_start_time(&ok));
        assert_eq!(format_start_time(&ok), "9999-12-31T23:59:59Z");

        let too_late = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_storable_start_time(&too_late));
        let too_early = Utc.with_ymd_and_hms(-1, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_storable_start_time(&too_early));
    }

    #[test]
    fn test_format_start_time_is_fixed_width() {
        let t = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        assert_eq!(format_start_time(&t), "2019-05-21T21:30:00Z");
        let later = t + Duration::milliseconds(1500);
        assert_eq!(format_start_time(&later).len(), format_start_time(&t).len());
    }
}
