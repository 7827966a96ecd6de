//! Database repository for CRUD operations.
//!
//! Uses prepared statements, and transactions wherever a write depends on a prior read.

use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    decode_genres, encode_genres, format_start_time, group_into_areas, Area, Artist,
    ArtistSearchHit, ArtistSummary, Category, CreateArtistRequest, CreateVenueRequest, Drink,
    NewQuestion, Question, ShowListing, UpdateArtistRequest, UpdateVenueRequest, Venue,
    VenueSummary,
};
use crate::quiz::ALL_CATEGORIES;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, genres, image_link, website, \
     facebook_link, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, genres, image_link, website, \
     facebook_link, seeking_venue, seeking_description";

const SHOW_LISTING_SELECT: &str = r#"SELECT s.id, s.start_time,
              v.id AS venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
              a.id AS artist_id, a.name AS artist_name, a.image_link AS artist_image_link
       FROM shows s
       JOIN venues v ON v.id = s.venue_id
       JOIN artists a ON a.id = s.artist_id"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== CATEGORY OPERATIONS ====================

    /// List all categories.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query("SELECT id, type FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        let row = sqlx::query("SELECT id, type FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    // ==================== QUESTION OPERATIONS ====================

    /// List all questions in id order.
    pub async fn list_questions(&self) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM questions ORDER BY id",
            QUESTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(question_from_row).collect())
    }

    /// Count all questions.
    pub async fn count_questions(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    /// List the questions of one category, or of all categories for the `0` sentinel.
    pub async fn questions_in_category(&self, category_id: i64) -> Result<Vec<Question>, AppError> {
        if category_id == ALL_CATEGORIES {
            return self.list_questions().await;
        }

        let rows = sqlx::query(&format!(
            "SELECT {} FROM questions WHERE category = ? ORDER BY id",
            QUESTION_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(question_from_row).collect())
    }

    /// Case-insensitive substring search over the question text.
    pub async fn search_questions(&self, term: &str) -> Result<Vec<Question>, AppError> {
        let needle = term.to_lowercase();
        let questions = self.list_questions().await?;

        Ok(questions
            .into_iter()
            .filter(|q| contains_folded(&q.question, &needle))
            .collect())
    }

    /// Insert a new question.
    pub async fn create_question(&self, new: &NewQuestion) -> Result<Question, AppError> {
        let result = sqlx::query(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.question)
        .bind(&new.answer)
        .bind(new.category)
        .bind(new.difficulty)
        .execute(&self.pool)
        .await?;

        Ok(Question {
            id: result.last_insert_rowid(),
            question: new.question.clone(),
            answer: new.answer.clone(),
            category: new.category,
            difficulty: new.difficulty,
        })
    }

    /// Delete a question.
    pub async fn delete_question(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Question {} not found", id)));
        }
        Ok(())
    }

    // ==================== VENUE OPERATIONS ====================

    /// Venues grouped by city and state, each with its upcoming show count.
    pub async fn venue_areas(&self, now: DateTime<Utc>) -> Result<Vec<Area>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM venues ORDER BY state, city, id",
            VENUE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        let venues: Vec<Venue> = rows.iter().map(venue_from_row).collect();

        let counts = self.upcoming_counts("venue_id", now).await?;
        Ok(group_into_areas(venues, &counts))
    }

    /// Case-insensitive substring search over venue names.
    pub async fn search_venues(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<VenueSummary>, AppError> {
        let needle = term.to_lowercase();
        let rows = sqlx::query("SELECT id, name FROM venues ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let counts = self.upcoming_counts("venue_id", now).await?;
        Ok(rows
            .iter()
            .filter(|row| contains_folded(row.get("name"), &needle))
            .map(|row| {
                let id: i64 = row.get("id");
                VenueSummary {
                    id,
                    name: row.get("name"),
                    num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
                }
            })
            .collect())
    }

    /// Get a venue by ID.
    pub async fn get_venue(&self, id: i64) -> Result<Option<Venue>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(venue_from_row))
    }

    /// Create a new venue.
    pub async fn create_venue(&self, request: &CreateVenueRequest) -> Result<Venue, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO venues (
                name, city, state, address, phone, genres, image_link, website,
                facebook_link, seeking_talent, seeking_description
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&request.name)
        .bind(&request.city)
        .bind(&request.state)
        .bind(&request.address)
        .bind(&request.phone)
        .bind(encode_genres(&request.genres))
        .bind(&request.image_link)
        .bind(&request.website)
        .bind(&request.facebook_link)
        .bind(request.seeking_talent as i32)
        .bind(&request.seeking_description)
        .execute(&self.pool)
        .await?;

        Ok(Venue {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            city: request.city.clone(),
            state: request.state.clone(),
            address: request.address.clone(),
            phone: request.phone.clone(),
            genres: request.genres.clone(),
            image_link: request.image_link.clone(),
            website: request.website.clone(),
            facebook_link: request.facebook_link.clone(),
            seeking_talent: request.seeking_talent,
            seeking_description: request.seeking_description.clone(),
        })
    }

    /// Apply an edit to a venue.
    pub async fn update_venue(
        &self,
        id: i64,
        request: UpdateVenueRequest,
    ) -> Result<Venue, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut venue = row
            .as_ref()
            .map(venue_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", id)))?;

        venue.apply(request);

        sqlx::query(
            r#"UPDATE venues SET
                name = ?, city = ?, state = ?, address = ?, phone = ?, genres = ?,
                image_link = ?, website = ?, facebook_link = ?, seeking_talent = ?,
                seeking_description = ?
            WHERE id = ?"#,
        )
        .bind(&venue.name)
        .bind(&venue.city)
        .bind(&venue.state)
        .bind(&venue.address)
        .bind(&venue.phone)
        .bind(encode_genres(&venue.genres))
        .bind(&venue.image_link)
        .bind(&venue.website)
        .bind(&venue.facebook_link)
        .bind(venue.seeking_talent as i32)
        .bind(&venue.seeking_description)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(venue)
    }

    /// Delete a venue together with its shows.
    pub async fn delete_venue(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Venue {} not found", id)));
        }
        Ok(())
    }

    // ==================== ARTIST OPERATIONS ====================

    /// List artists alphabetically.
    pub async fn list_artists(&self) -> Result<Vec<ArtistSummary>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM artists ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| ArtistSummary {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Case-insensitive substring search over artist names.
    pub async fn search_artists(
        &self,
        term: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ArtistSearchHit>, AppError> {
        let needle = term.to_lowercase();
        let rows = sqlx::query("SELECT id, name FROM artists ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let counts = self.upcoming_counts("artist_id", now).await?;
        Ok(rows
            .iter()
            .filter(|row| contains_folded(row.get("name"), &needle))
            .map(|row| {
                let id: i64 = row.get("id");
                ArtistSearchHit {
                    id,
                    name: row.get("name"),
                    num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
                }
            })
            .collect())
    }

    /// Get an artist by ID.
    pub async fn get_artist(&self, id: i64) -> Result<Option<Artist>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM artists WHERE id = ?",
            ARTIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(artist_from_row))
    }

    /// Create a new artist.
    pub async fn create_artist(&self, request: &CreateArtistRequest) -> Result<Artist, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO artists (
                name, city, state, phone, genres, image_link, website,
                facebook_link, seeking_venue, seeking_description
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&request.name)
        .bind(&request.city)
        .bind(&request.state)
        .bind(&request.phone)
        .bind(encode_genres(&request.genres))
        .bind(&request.image_link)
        .bind(&request.website)
        .bind(&request.facebook_link)
        .bind(request.seeking_venue as i32)
        .bind(&request.seeking_description)
        .execute(&self.pool)
        .await?;

        Ok(Artist {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            city: request.city.clone(),
            state: request.state.clone(),
            phone: request.phone.clone(),
            genres: request.genres.clone(),
            image_link: request.image_link.clone(),
            website: request.website.clone(),
            facebook_link: request.facebook_link.clone(),
            seeking_venue: request.seeking_venue,
            seeking_description: request.seeking_description.clone(),
        })
    }

    /// Apply an edit to an artist.
    pub async fn update_artist(
        &self,
        id: i64,
        request: UpdateArtistRequest,
    ) -> Result<Artist, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "SELECT {} FROM artists WHERE id = ?",
            ARTIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let mut artist = row
            .as_ref()
            .map(artist_from_row)
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))?;

        artist.apply(request);

        sqlx::query(
            r#"UPDATE artists SET
                name = ?, city = ?, state = ?, phone = ?, genres = ?, image_link = ?,
                website = ?, facebook_link = ?, seeking_venue = ?, seeking_description = ?
            WHERE id = ?"#,
        )
        .bind(&artist.name)
        .bind(&artist.city)
        .bind(&artist.state)
        .bind(&artist.phone)
        .bind(encode_genres(&artist.genres))
        .bind(&artist.image_link)
        .bind(&artist.website)
        .bind(&artist.facebook_link)
        .bind(artist.seeking_venue as i32)
        .bind(&artist.seeking_description)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(artist)
    }

    // ==================== SHOW OPERATIONS ====================

    /// List all shows by start time.
    pub async fn list_shows(&self) -> Result<Vec<ShowListing>, AppError> {
        let rows = sqlx::query(&format!("{} ORDER BY s.start_time, s.id", SHOW_LISTING_SELECT))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(show_from_row).collect()
    }

    /// Shows played at one venue.
    pub async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<ShowListing>, AppError> {
        let rows = sqlx::query(&format!(
            "{} WHERE s.venue_id = ? ORDER BY s.start_time, s.id",
            SHOW_LISTING_SELECT
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(show_from_row).collect()
    }

    /// Shows played by one artist.
    pub async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<ShowListing>, AppError> {
        let rows = sqlx::query(&format!(
            "{} WHERE s.artist_id = ? ORDER BY s.start_time, s.id",
            SHOW_LISTING_SELECT
        ))
        .bind(artist_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(show_from_row).collect()
    }

    /// List a new show after checking that its artist and venue exist.
    pub async fn create_show(
        &self,
        artist_id: i64,
        venue_id: i64,
        start_time: DateTime<Utc>,
    ) -> Result<ShowListing, AppError> {
        let start_time = start_time.trunc_subsecs(0);
        let mut tx = self.pool.begin().await?;

        let artist = sqlx::query("SELECT name, image_link FROM artists WHERE id = ?")
            .bind(artist_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", artist_id)))?;
        let venue = sqlx::query("SELECT name, image_link FROM venues WHERE id = ?")
            .bind(venue_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Venue {} not found", venue_id)))?;

        let result =
            sqlx::query("INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?, ?, ?)")
                .bind(artist_id)
                .bind(venue_id)
                .bind(format_start_time(&start_time))
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(ShowListing {
            id: result.last_insert_rowid(),
            venue_id,
            venue_name: venue.get("name"),
            venue_image_link: venue.get("image_link"),
            artist_id,
            artist_name: artist.get("name"),
            artist_image_link: artist.get("image_link"),
            start_time,
        })
    }

    /// Upcoming show counts keyed by `venue_id` or `artist_id`.
    async fn upcoming_counts(
        &self,
        key_column: &'static str,
        now: DateTime<Utc>,
    ) -> Result<HashMap<i64, i64>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {key} AS owner_id, COUNT(*) AS upcoming FROM shows \
             WHERE start_time >= ? GROUP BY {key}",
            key = key_column
        ))
        .bind(format_start_time(&now))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("owner_id"), row.get("upcoming")))
            .collect())
    }

    // ==================== DRINK OPERATIONS ====================

    /// List all drinks.
    pub async fn list_drinks(&self) -> Result<Vec<Drink>, AppError> {
        let rows = sqlx::query("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(drink_from_row).collect()
    }

    /// Get a drink by ID.
    pub async fn get_drink(&self, id: i64) -> Result<Option<Drink>, AppError> {
        let row = sqlx::query("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(drink_from_row).transpose()
    }

    /// Find a drink by exact title.
    pub async fn find_drink_by_title(&self, title: &str) -> Result<Option<Drink>, AppError> {
        let row = sqlx::query("SELECT id, title, recipe FROM drinks WHERE title = ? LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(drink_from_row).transpose()
    }

    /// Insert a new drink.
    pub async fn create_drink(&self, title: &str, recipe: &Value) -> Result<Drink, AppError> {
        let result = sqlx::query("INSERT INTO drinks (title, recipe) VALUES (?, ?)")
            .bind(title)
            .bind(recipe.to_string())
            .execute(&self.pool)
            .await?;

        Ok(Drink {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            recipe: recipe.clone(),
        })
    }

    /// Replace the title and/or recipe of a drink.
    pub async fn update_drink(
        &self,
        id: i64,
        title: Option<&str>,
        recipe: Option<&Value>,
    ) -> Result<Drink, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, title, recipe FROM drinks WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut drink = row
            .as_ref()
            .map(drink_from_row)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Drink {} not found", id)))?;

        if let Some(title) = title {
            drink.title = title.to_string();
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe.clone();
        }

        sqlx::query("UPDATE drinks SET title = ?, recipe = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(drink.recipe.to_string())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(drink)
    }

    /// Delete a drink.
    pub async fn delete_drink(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Drink {} not found", id)));
        }
        Ok(())
    }
}

/// Whether `text` contains `needle`, where `needle` is already lowercased.
///
/// SQLite's LIKE only folds ASCII, so matching happens here with Unicode case folding.
pub fn contains_folded(text: &str, needle: &str) -> bool {
    needle.is_empty() || text.to_lowercase().contains(needle)
}

// Helper functions for row conversion

fn category_from_row(row: &SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        kind: row.get("type"),
    }
}

fn question_from_row(row: &SqliteRow) -> Question {
    Question {
        id: row.get("id"),
        question: row.get("question"),
        answer: row.get("answer"),
        category: row.get("category"),
        difficulty: row.get("difficulty"),
    }
}

fn venue_from_row(row: &SqliteRow) -> Venue {
    let genres: String = row.get("genres");
    let seeking_talent: i32 = row.get("seeking_talent");
    Venue {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        state: row.get("state"),
        address: row.get("address"),
        phone: row.get("phone"),
        genres: decode_genres(&genres),
        image_link: row.get("image_link"),
        website: row.get("website"),
        facebook_link: row.get("facebook_link"),
        seeking_talent: seeking_talent != 0,
        seeking_description: row.get("seeking_description"),
    }
}

fn artist_from_row(row: &SqliteRow) -> Artist {
    let genres: String = row.get("genres");
    let seeking_venue: i32 = row.get("seeking_venue");
    Artist {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        state: row.get("state"),
        phone: row.get("phone"),
        genres: decode_genres(&genres),
        image_link: row.get("image_link"),
        website: row.get("website"),
        facebook_link: row.get("facebook_link"),
        seeking_venue: seeking_venue != 0,
        seeking_description: row.get("seeking_description"),
    }
}

fn show_from_row(row: &SqliteRow) -> Result<ShowListing, AppError> {
    let raw_start: String = row.get("start_time");
    let start_time = DateTime::parse_from_rfc3339(&raw_start)
        .map_err(|e| AppError::Database(format!("Bad start_time {:?}: {}", raw_start, e)))?
        .with_timezone(&Utc);

    Ok(ShowListing {
        id: row.get("id"),
        venue_id: row.get("venue_id"),
        venue_name: row.get("venue_name"),
        venue_image_link: row.get("venue_image_link"),
        artist_id: row.get("artist_id"),
        artist_name: row.get("artist_name"),
        artist_image_link: row.get("artist_image_link"),
        start_time,
    })
}

fn drink_from_row(row: &SqliteRow) -> Result<Drink, AppError> {
    let recipe: String = row.get("recipe");
    Ok(Drink {
        id: row.get("id"),
        title: row.get("title"),
        recipe: serde_json::from_str(&recipe)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_folded_ascii() {
        assert!(contains_folded("Whose autobiography is entitled...", "title"));
        assert!(contains_folded("Which TITLE did Hanks hold?", "title"));
        assert!(!contains_folded("What movie earned Tom Hanks an Oscar?", "title"));
        assert!(contains_folded("anything", ""));
    }

    #[test]
    fn test_contains_folded_non_ascii() {
        let needle = "école".to_lowercase();
        assert!(contains_folded("Quelle est la meilleure ÉCOLE?", &needle));
        assert!(contains_folded("ΣΟΦΙΑ", &"σοφ".to_lowercase()));
    }

    #[test]
    fn test_contains_folded_wildcards_are_literal() {
        assert!(!contains_folded("100 percent", "100%"));
        assert!(contains_folded("a_b", "a_b"));
        assert!(!contains_folded("axb", "a_b"));
    }
}
