//! Conversion of per-source payloads into [`firetv_model::ContentItem`].
//!
//! Watchmode builds the base item. TVMaze and OMDB only fill fields that are
//! still empty, so for any field the first source to supply it wins:
//! existing item, then TVMaze, then OMDB.

mod omdb;
mod tvmaze;
mod watchmode;

pub use omdb::{enrich_with_omdb, parse_box_office, parse_rating, parse_runtime};
pub use tvmaze::{best_tvmaze_match, enrich_with_tvmaze, strip_html};
pub use watchmode::{from_watchmode, merge_watchmode_details};

/// First candidate that is present and not blank.
pub(crate) fn first_text<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Fill `slot` from `value` if it is currently empty.
pub(crate) fn fill<T>(slot: &mut Option<T>, value: impl FnOnce() -> Option<T>) {
    if slot.is_none() {
        *slot = value();
    }
}

pub(crate) fn fill_list(slot: &mut Vec<String>, value: impl FnOnce() -> Vec<String>) {
    if slot.is_empty() {
        *slot = value();
    }
}
