use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Catalog content category as reported by the metadata sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContentKind {
    #[default]
    Movie,
    Tv,
    Documentary,
    TvSeries,
}

impl ContentKind {
    pub fn is_movie(&self) -> bool {
        matches!(self, ContentKind::Movie)
    }

    /// Maps the loose type strings used by Watchmode and TVMaze.
    pub fn from_source_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "tv" | "tv_miniseries" | "tv_special" => ContentKind::Tv,
            "tv_series" | "scripted" | "reality" | "animation" => {
                ContentKind::TvSeries
            }
            "documentary" | "short_film" => ContentKind::Documentary,
            _ => ContentKind::Movie,
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Movie => write!(f, "movie"),
            ContentKind::Tv => write!(f, "tv"),
            ContentKind::Documentary => write!(f, "documentary"),
            ContentKind::TvSeries => write!(f, "tv_series"),
        }
    }
}

/// Airing schedule published by TVMaze.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    pub time: String,
    pub days: Vec<String>,
}

/// Normalized catalog entry.
///
/// Each metadata source fills a subset of these fields; the normalizers in
/// `firetv-core` only ever fill gaps, so the first source to provide a value
/// keeps it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ContentKind,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub rating: Option<f64>,
    pub release_date: Option<String>,
    pub year: Option<i32>,
    pub end_year: Option<i32>,
    pub genres: Vec<String>,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<u64>,
    pub tvmaze_id: Option<u64>,
    pub plot: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub user_rating: Option<f64>,
    pub critic_score: Option<f64>,
    pub us_rating: Option<String>,
    pub original_language: Option<String>,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub box_office: Option<f64>,
    pub awards: Vec<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub network_names: Vec<String>,
    pub season_count: Option<u32>,
    pub episode_count: Option<u32>,
    pub status: Option<String>,
    pub official_site: Option<String>,
    pub schedule: Option<Schedule>,
}

impl ContentItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ContentKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            ..Self::default()
        }
    }

    /// Natural key used by the per-title caches: `"{title}-{year}"`, or the
    /// bare title when the year is unknown.
    pub fn cache_key(&self) -> String {
        match self.year {
            Some(year) => format!("{}-{}", self.title, year),
            None => self.title.clone(),
        }
    }

    /// Whether any field a detail view renders is still missing.
    pub fn needs_enrichment(&self) -> bool {
        let common = self.poster.is_none()
            || self.plot.is_none()
            || self.genres.is_empty()
            || self.runtime_minutes.is_none();

        if self.kind.is_movie() {
            common || self.director.is_none() || self.cast.is_empty()
        } else {
            common
                || self.network_names.is_empty()
                || self.status.is_none()
                || self.season_count.is_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_labels_map_to_kinds() {
        assert_eq!(ContentKind::from_source_label("movie"), ContentKind::Movie);
        assert_eq!(
            ContentKind::from_source_label("tv_series"),
            ContentKind::TvSeries
        );
        assert_eq!(
            ContentKind::from_source_label("Scripted"),
            ContentKind::TvSeries
        );
        assert_eq!(
            ContentKind::from_source_label("tv_miniseries"),
            ContentKind::Tv
        );
        assert_eq!(
            ContentKind::from_source_label("something-new"),
            ContentKind::Movie
        );
    }

    #[test]
    fn cache_key_uses_title_and_year() {
        let mut item = ContentItem::new("1", "Dune", ContentKind::Movie);
        assert_eq!(item.cache_key(), "Dune");
        item.year = Some(2021);
        assert_eq!(item.cache_key(), "Dune-2021");
    }

    #[test]
    fn movie_enrichment_requires_credits() {
        let mut item = ContentItem::new("1", "Heat", ContentKind::Movie);
        item.poster = Some("p.jpg".into());
        item.plot = Some("Cops and robbers".into());
        item.genres = vec!["Crime".into()];
        item.runtime_minutes = Some(170);
        assert!(item.needs_enrichment());

        item.director = Some("Michael Mann".into());
        item.cast = vec!["Al Pacino".into()];
        assert!(!item.needs_enrichment());
    }

    #[test]
    fn show_enrichment_requires_seasons() {
        let mut item = ContentItem::new("2", "Severance", ContentKind::TvSeries);
        item.poster = Some("p.jpg".into());
        item.plot = Some("Work/life".into());
        item.genres = vec!["Drama".into()];
        item.runtime_minutes = Some(55);
        item.network_names = vec!["Apple TV+".into()];
        item.status = Some("Running".into());
        assert!(item.needs_enrichment());

        item.season_count = Some(2);
        assert!(!item.needs_enrichment());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_shape_uses_type_and_camel_case() {
        let mut item = ContentItem::new("7", "Up", ContentKind::TvSeries);
        item.imdb_id = Some("tt1049413".into());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "tv_series");
        assert_eq!(json["imdbId"], "tt1049413");
    }
}
