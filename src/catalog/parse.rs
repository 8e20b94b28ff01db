use crate::models::{SortKey, Song, UNKNOWN_ARTIST, UNKNOWN_TITLE};

use super::sort::sort_songs;

/// Field delimiter of the song list resource.
const FIELD_DELIMITER: char = '|';

/// Parse the pipe-delimited song list into an artist-sorted catalog.
///
/// Empty lines are ignored and the first remaining line is treated as the
/// header. Rows are never rejected: a missing or blank title/artist is
/// replaced with a placeholder so a damaged line still shows up in results.
pub fn parse_catalog(text: &str) -> Vec<Song> {
    let mut songs: Vec<Song> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .skip(1)
        .map(parse_line)
        .collect();

    sort_songs(&mut songs, SortKey::Artist);
    songs
}

fn parse_line(line: &str) -> Song {
    let mut fields = line.split(FIELD_DELIMITER);
    let title = clean_field(fields.next(), UNKNOWN_TITLE);
    let artist = clean_field(fields.next(), UNKNOWN_ARTIST);
    Song::new(title, artist)
}

fn clean_field(field: Option<&str>, placeholder: &str) -> String {
    let value = field.map(strip_quote_pair).map(str::trim).unwrap_or("");
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Remove one wrapping quote from each end. Doubled interior quotes written by
/// the converter are left as they are.
fn strip_quote_pair(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::song_id;

    #[test]
    fn header_is_skipped_and_quotes_removed() {
        let songs = parse_catalog("\"Title\"|\"Artist\"\n\"Tennessee Whiskey\"|\"Chris Stapleton\"\n");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Tennessee Whiskey");
        assert_eq!(songs[0].artist, "Chris Stapleton");
        assert_eq!(songs[0].id, song_id("tennessee whiskey", "chris stapleton"));
    }

    #[test]
    fn interior_quotes_are_not_unescaped() {
        let songs = parse_catalog("h\n\"Say \"\"Hello\"\"\"|\"Band\"\n");
        assert_eq!(songs[0].title, "Say \"\"Hello\"\"");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let songs = parse_catalog("h\n\"Lonely Title\"\n|\"Only Artist\"\n\"\"|\"\"\n");
        assert_eq!(songs.len(), 3);
        assert!(songs
            .iter()
            .any(|s| s.title == "Lonely Title" && s.artist == UNKNOWN_ARTIST));
        assert!(songs
            .iter()
            .any(|s| s.title == UNKNOWN_TITLE && s.artist == "Only Artist"));
        assert!(songs
            .iter()
            .any(|s| s.title == UNKNOWN_TITLE && s.artist == UNKNOWN_ARTIST));
    }

    #[test]
    fn blank_and_crlf_lines_are_tolerated() {
        let songs = parse_catalog("h\r\n\r\n\"A\"|\"B\"\r\n\n");
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].artist, "B");
    }

    #[test]
    fn single_quote_characters_are_kept() {
        let songs = parse_catalog("h\n\"|Solo\"\n");
        assert_eq!(songs[0].title, "\"");
        assert_eq!(songs[0].artist, "Solo\"");
    }

    #[test]
    fn duplicates_are_preserved() {
        let songs = parse_catalog("h\n\"Hello\"|\"Adele\"\n\"Hello\"|\"Adele\"\n");
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].id, songs[1].id);
    }

    #[test]
    fn header_only_yields_empty_catalog() {
        assert!(parse_catalog("Title|Artist\n").is_empty());
        assert!(parse_catalog("").is_empty());
    }
}
