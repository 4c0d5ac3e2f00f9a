use firetv_model::{ContentItem, ContentKind};

use super::first_text;
use crate::providers::{WatchmodeDetails, WatchmodeTitle, tvmaze::leading_year};

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn nonzero<T: PartialEq + Default>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

/// Base item from a Watchmode listing row.
pub fn from_watchmode(raw: &WatchmodeTitle) -> ContentItem {
    let id = raw
        .id
        .or(raw.tmdb_id)
        .map(|id| id.to_string())
        .unwrap_or_default();
    let title = first_text([
        raw.title.as_deref(),
        raw.original_title.as_deref(),
        raw.name.as_deref(),
    ])
    .unwrap_or_default();
    let kind = raw
        .kind
        .as_deref()
        .map(ContentKind::from_source_label)
        .unwrap_or_default();

    let mut item = ContentItem::new(id, title, kind);
    item.plot = first_text([raw.plot_overview.as_deref(), raw.overview.as_deref()]);
    item.poster = first_text([
        raw.poster.as_deref(),
        raw.poster_path.as_deref(),
        raw.poster_url.as_deref(),
    ]);
    item.backdrop = first_text([
        raw.backdrop.as_deref(),
        raw.backdrop_path.as_deref(),
        raw.backdrop_url.as_deref(),
    ]);
    item.release_date =
        first_text([raw.release_date.as_deref(), raw.first_air_date.as_deref()]);
    item.user_rating = positive(raw.user_rating).or(positive(raw.vote_average));
    item.rating = item.user_rating;
    item.year = nonzero(raw.year)
        .or_else(|| item.release_date.as_deref().and_then(leading_year));
    item.end_year = nonzero(raw.end_year);
    item.imdb_id = first_text([raw.imdb_id.as_deref()]);
    item.tmdb_id = nonzero(raw.tmdb_id).or(nonzero(raw.id));
    item.runtime_minutes = nonzero(raw.runtime_minutes).or(nonzero(raw.runtime));
    item.genres = raw.genre_names.clone().unwrap_or_default();
    item.critic_score = positive(raw.critic_score).or(positive(raw.vote_average));
    item.us_rating = first_text([raw.us_rating.as_deref()]);
    item.original_language = first_text([raw.original_language.as_deref()]);
    item
}

/// Overlay a details response onto a listing item. Details win wherever they
/// carry a value.
pub fn merge_watchmode_details(
    mut item: ContentItem,
    details: &WatchmodeDetails,
) -> ContentItem {
    if let Some(title) = first_text([details.title.as_deref()]) {
        item.title = title;
    }
    if let Some(kind) = details.kind.as_deref() {
        item.kind = ContentKind::from_source_label(kind);
    }

    let pick_text = |new: Option<&str>, old: Option<String>| {
        first_text([new]).or(old)
    };
    item.plot = pick_text(details.plot_overview.as_deref(), item.plot.take());
    item.poster = pick_text(details.poster.as_deref(), item.poster.take());
    item.backdrop = pick_text(details.backdrop.as_deref(), item.backdrop.take());
    item.release_date =
        pick_text(details.release_date.as_deref(), item.release_date.take());
    item.imdb_id = pick_text(details.imdb_id.as_deref(), item.imdb_id.take());
    item.us_rating = pick_text(details.us_rating.as_deref(), item.us_rating.take());
    item.original_language = pick_text(
        details.original_language.as_deref(),
        item.original_language.take(),
    );

    item.user_rating = positive(details.user_rating).or(item.user_rating);
    item.rating = positive(details.user_rating).or(item.rating);
    item.critic_score = positive(details.critic_score).or(item.critic_score);
    item.year = nonzero(details.year).or(item.year);
    item.end_year = nonzero(details.end_year).or(item.end_year);
    item.tmdb_id = nonzero(details.tmdb_id).or(item.tmdb_id);
    item.runtime_minutes =
        nonzero(details.runtime_minutes).or(item.runtime_minutes);

    if let Some(genres) = details.genre_names.as_ref().filter(|g| !g.is_empty()) {
        item.genres = genres.clone();
    }
    if let Some(networks) =
        details.network_names.as_ref().filter(|n| !n.is_empty())
    {
        item.network_names = networks.clone();
    }
    item
}
