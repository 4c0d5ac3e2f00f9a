use firetv_model::ContentItem;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{fill, fill_list};
use crate::providers::OmdbTitle;

static DIGITS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)").expect("digits regex should compile"));

const NOT_AVAILABLE: &str = "N/A";

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(", ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `"142 min"` -> `142`
pub fn parse_runtime(runtime: &str) -> Option<u32> {
    DIGITS_REGEX
        .captures(runtime)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `"$28,767,189"` -> `28767189.0`
pub fn parse_box_office(box_office: &str) -> Option<f64> {
    if box_office.trim() == NOT_AVAILABLE {
        return None;
    }
    let digits: String = box_office
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    digits.trim().parse().ok()
}

pub fn parse_rating(rating: &str) -> Option<f64> {
    if rating.trim() == NOT_AVAILABLE {
        return None;
    }
    rating.trim().parse().ok()
}

/// Fill gaps in a movie from an OMDB record. Anything other than a movie is
/// returned unchanged.
pub fn enrich_with_omdb(mut item: ContentItem, omdb: &OmdbTitle) -> ContentItem {
    if !item.kind.is_movie() {
        return item;
    }

    let poster = present(&omdb.poster).map(str::to_string);
    fill(&mut item.poster, || poster.clone());
    fill(&mut item.backdrop, || poster);
    fill_list(&mut item.genres, || {
        present(&omdb.genre).map(split_list).unwrap_or_default()
    });
    fill(&mut item.plot, || present(&omdb.plot).map(str::to_string));
    fill(&mut item.runtime_minutes, || {
        present(&omdb.runtime).and_then(parse_runtime)
    });
    let rating = present(&omdb.imdb_rating).and_then(parse_rating);
    fill(&mut item.rating, || rating);
    fill(&mut item.user_rating, || rating);
    fill(&mut item.release_date, || {
        present(&omdb.released).map(str::to_string)
    });
    fill(&mut item.director, || present(&omdb.director).map(str::to_string));
    fill_list(&mut item.cast, || {
        present(&omdb.actors).map(split_list).unwrap_or_default()
    });
    fill(&mut item.box_office, || {
        present(&omdb.box_office).and_then(parse_box_office)
    });
    fill_list(&mut item.awards, || {
        present(&omdb.awards)
            .map(|a| vec![a.to_string()])
            .unwrap_or_default()
    });
    fill(&mut item.country, || present(&omdb.country).map(str::to_string));
    fill(&mut item.language, || present(&omdb.language).map(str::to_string));
    fill(&mut item.imdb_id, || present(&omdb.imdb_id).map(str::to_string));

    item
}
