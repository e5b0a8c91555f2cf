//! Normalization of the recommendation service's semi-structured reply into
//! flat display strings and structured enrichment requests.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::backend::client::RECOMMEND_ENDPOINT;
use crate::backend::types::SongRequest;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct RecommendedSong {
    song: String,
    artist: String,
}

/// Strips a fenced-code wrapper (a leading marker line such as ```` ```json ````
/// and a trailing ```` ``` ````) if present, then trims. Unfenced text passes
/// through untouched apart from trimming.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The marker line may carry a language tag; the body starts after it.
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = &rest[newline + 1..];
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the raw recommendation text as a mapping from language name to an
/// ordered song list and flattens it into `"{song} by {artist}"` strings,
/// languages in encounter order, songs in list order.
pub fn flatten_recommendations(raw: &str) -> Result<Vec<String>, AppError> {
    let body = strip_code_fence(raw);
    let grouped: IndexMap<String, Vec<RecommendedSong>> =
        serde_json::from_str(body).map_err(|e| AppError::malformed(RECOMMEND_ENDPOINT, e.to_string()))?;

    let mut flat = Vec::new();
    for (language, songs) in &grouped {
        tracing::debug!(language = %language, count = songs.len(), "Flattening recommendation group");
        for song in songs {
            flat.push(format!("{} by {}", song.song, song.artist));
        }
    }
    Ok(flat)
}

/// Splits each flat `"{song} by {artist}"` entry into a structured request:
/// song before the first `" by "`, artists split on commas, all trimmed.
/// An entry without the delimiter becomes a request with no artists.
pub fn parse_song_requests(entries: &[String]) -> Vec<SongRequest> {
    entries
        .iter()
        .map(|entry| match entry.split_once(" by ") {
            Some((song, artists)) => SongRequest {
                song: song.trim().to_string(),
                artists: artists
                    .split(',')
                    .map(|artist| artist.trim().to_string())
                    .filter(|artist| !artist.is_empty())
                    .collect(),
            },
            None => SongRequest {
                song: entry.trim().to_string(),
                artists: Vec::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FENCED: &str = "```json\n{\"English\": [{\"song\": \"Happy\", \"artist\": \"Pharrell Williams\"}, {\"song\": \"Good Life\", \"artist\": \"OneRepublic\"}], \"Spanish\": [{\"song\": \"Vivir Mi Vida\", \"artist\": \"Marc Anthony\"}]}\n```";

    #[test]
    fn strips_fence_with_language_tag() {
        let stripped = strip_code_fence("```json\n{\"a\": 1}\n```");
        assert_eq!(stripped, "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let stripped = strip_code_fence("```\n{\"a\": 1}\n```");
        assert_eq!(stripped, "{\"a\": 1}");
    }

    #[test]
    fn tolerates_missing_fence() {
        let stripped = strip_code_fence("  {\"a\": 1}  ");
        assert_eq!(stripped, "{\"a\": 1}");
    }

    #[test]
    fn flattens_languages_in_encounter_order() {
        let flat = flatten_recommendations(FENCED).unwrap();
        assert_eq!(
            flat,
            vec![
                "Happy by Pharrell Williams",
                "Good Life by OneRepublic",
                "Vivir Mi Vida by Marc Anthony",
            ]
        );
    }

    #[test]
    fn flattens_unfenced_payload_identically() {
        let unfenced = strip_code_fence(FENCED).to_string();
        assert_eq!(
            flatten_recommendations(&unfenced).unwrap(),
            flatten_recommendations(FENCED).unwrap()
        );
    }

    #[test]
    fn flat_count_is_sum_of_group_counts() {
        let raw = "{\"A\": [{\"song\": \"s1\", \"artist\": \"x\"}], \"B\": [{\"song\": \"s2\", \"artist\": \"y\"}, {\"song\": \"s3\", \"artist\": \"z\"}], \"C\": []}";
        let flat = flatten_recommendations(raw).unwrap();
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let err = flatten_recommendations("not json at all").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = flatten_recommendations("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
    }

    #[test]
    fn splits_song_and_multiple_artists() {
        let requests =
            parse_song_requests(&["Song X by Artist A, Artist B".to_string()]);
        assert_eq!(
            requests,
            vec![SongRequest {
                song: "Song X".to_string(),
                artists: vec!["Artist A".to_string(), "Artist B".to_string()],
            }]
        );
    }

    #[test]
    fn splits_only_on_first_delimiter() {
        let requests = parse_song_requests(&["Stand by Me by Ben E. King".to_string()]);
        assert_eq!(requests[0].song, "Stand");
        assert_eq!(requests[0].artists, vec!["Me by Ben E. King"]);
    }

    #[test]
    fn entry_without_delimiter_degrades_to_bare_song() {
        let requests = parse_song_requests(&["Instrumental #4".to_string()]);
        assert_eq!(requests[0].song, "Instrumental #4");
        assert!(requests[0].artists.is_empty());
    }
}
