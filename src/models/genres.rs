//! Text encoding for genre lists.
//!
//! Genres are stored in a single TEXT column as a JSON array. Rows written by the
//! older Postgres-backed app use the array literal form `{Jazz,"Rock n Roll"}`,
//! which [`decode_genres`] still reads.

/// Encode a genre list for storage.
pub fn encode_genres(genres: &[String]) -> String {
    serde_json::Value::from(genres.to_vec()).to_string()
}

/// Decode a stored genre list.
pub fn decode_genres(stored: &str) -> Vec<String> {
    let trimmed = stored.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).unwrap_or_else(|e| {
            tracing::warn!("Unreadable genre list {:?}: {}", stored, e);
            Vec::new()
        });
    }

    let body = trimmed.strip_prefix('{').unwrap_or(trimmed);
    decode_array_literal(body.strip_suffix('}').unwrap_or(body))
}

/// Split the body of an array literal on commas outside double quotes.
fn decode_array_literal(body: &str) -> Vec<String> {
    let mut genres = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '\\' if quoted => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ',' if !quoted => push_genre(&mut genres, &mut current),
            _ => current.push(c),
        }
    }
    push_genre(&mut genres, &mut current);

    genres
}

fn push_genre(genres: &mut Vec<String>, current: &mut String) {
    let genre = std::mem::take(current);
    let genre = genre.trim();
    if !genre.is_empty() {
        genres.push(genre.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_is_json_array() {
        let genres = vec!["Jazz".to_string(), "Rock n Roll".to_string()];
        assert_eq!(encode_genres(&genres), r#"["Jazz","Rock n Roll"]"#);
    }

    #[test]
    fn test_decode_legacy_array_literal() {
        assert_eq!(
            decode_genres(r#"{Jazz,"Rock n Roll",Swing}"#),
            vec!["Jazz", "Rock n Roll", "Swing"]
        );
        assert!(decode_genres("{}").is_empty());
        assert!(decode_genres("").is_empty());
    }

    #[test]
    fn test_decode_legacy_quoted_commas_and_escapes() {
        assert_eq!(
            decode_genres(r#"{"Rock, Roll",Jazz}"#),
            vec!["Rock, Roll", "Jazz"]
        );
        assert_eq!(
            decode_genres(r#"{"Say \"Hi\"","Back\\slash"}"#),
            vec![r#"Say "Hi""#, r"Back\slash"]
        );
    }

    #[test]
    fn test_decode_garbage_json_is_empty() {
        assert!(decode_genres("[\"Jazz\"").is_empty());
    }

    proptest! {
        #[test]
        fn prop_genres_round_trip(genres in prop::collection::vec(".*", 0..8)) {
            prop_assert_eq!(decode_genres(&encode_genres(&genres)), genres);
        }
    }
}
