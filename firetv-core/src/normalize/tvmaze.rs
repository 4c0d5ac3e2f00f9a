use firetv_model::{ContentItem, Schedule};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{fill, fill_list, first_text};
use crate::providers::{TvMazeSeason, TvMazeShow};

static HTML_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("html tag regex should compile"));

/// Drop anything that looks like a markup tag.
pub fn strip_html(text: &str) -> String {
    HTML_TAG_REGEX.replace_all(text, "").trim().to_string()
}

/// Fill gaps in `item` from a TVMaze show and its seasons.
///
/// Poster comes from the original-size image, then the medium one. Network
/// falls back to the web channel. Season and episode counts come from the
/// season list, episodes being the sum of every season's episode order.
pub fn enrich_with_tvmaze(
    mut item: ContentItem,
    show: &TvMazeShow,
    seasons: &[TvMazeSeason],
) -> ContentItem {
    let image = show.image.as_ref();

    fill(&mut item.poster, || {
        image.and_then(|i| {
            first_text([i.original.as_deref(), i.medium.as_deref()])
        })
    });
    fill(&mut item.backdrop, || {
        image.and_then(|i| first_text([i.original.as_deref()]))
    });
    fill_list(&mut item.genres, || show.genres.clone());
    fill(&mut item.plot, || {
        show.summary
            .as_deref()
            .map(strip_html)
            .filter(|s| !s.is_empty())
    });
    fill(&mut item.runtime_minutes, || {
        show.runtime.or(show.average_runtime).filter(|r| *r > 0)
    });
    fill_list(&mut item.network_names, || {
        show.network
            .as_ref()
            .or(show.web_channel.as_ref())
            .map(|channel| vec![channel.name.clone()])
            .unwrap_or_default()
    });
    fill(&mut item.status, || first_text([show.status.as_deref()]));
    fill(&mut item.official_site, || {
        first_text([show.official_site.as_deref()])
    });
    fill(&mut item.tvmaze_id, || Some(show.id).filter(|id| *id > 0));
    fill(&mut item.imdb_id, || {
        show.externals
            .as_ref()
            .and_then(|e| first_text([e.imdb.as_deref()]))
    });
    fill(&mut item.original_language, || {
        first_text([show.language.as_deref()])
    });

    if !item.kind.is_movie() {
        fill(&mut item.user_rating, || {
            show.rating.as_ref().and_then(|r| r.average)
        });
        fill(&mut item.schedule, || {
            show.schedule.as_ref().map(|s| Schedule {
                time: s.time.clone(),
                days: s.days.clone(),
            })
        });
        fill(&mut item.end_year, || show.end_year());
        fill(&mut item.year, || show.premiere_year());
    }

    let episodes: u32 = seasons.iter().filter_map(|s| s.episode_order).sum();
    fill(&mut item.season_count, || {
        u32::try_from(seasons.len()).ok().filter(|n| *n > 0)
    });
    fill(&mut item.episode_count, || Some(episodes).filter(|n| *n > 0));

    item
}

/// Pick the search result that best matches a release year.
///
/// An exact premiere-year match wins outright. Otherwise the result whose
/// premiere year is closest wins, and with no year to compare against the
/// first result is returned.
pub fn best_tvmaze_match(
    results: &[TvMazeShow],
    year: Option<i32>,
) -> Option<&TvMazeShow> {
    let first = results.first()?;
    let Some(year) = year else {
        return Some(first);
    };

    let distance = |show: &TvMazeShow| {
        (show.premiere_year().unwrap_or(0) - year).unsigned_abs()
    };

    let mut best = first;
    for show in results {
        let Some(show_year) = show.premiere_year() else {
            continue;
        };
        if show_year == year {
            return Some(show);
        }
        if distance(show) < distance(best) {
            best = show;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use firetv_model::ContentKind;

    use super::*;
    use crate::providers::tvmaze::{TvMazeChannel, TvMazeImage, TvMazeRating};

    fn show(id: u64, name: &str, premiered: Option<&str>) -> TvMazeShow {
        TvMazeShow {
            id,
            name: name.into(),
            premiered: premiered.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn strips_markup_from_summaries() {
        assert_eq!(
            strip_html("<p><b>Dark</b> is a German <i>thriller</i>.</p>"),
            "Dark is a German thriller."
        );
    }

    #[test]
    fn fills_gaps_without_overwriting() {
        let mut item = ContentItem::new("1", "Dark", ContentKind::TvSeries);
        item.poster = Some("watchmode.jpg".into());

        let tvmaze = TvMazeShow {
            id: 17861,
            name: "Dark".into(),
            status: Some("Ended".into()),
            summary: Some("<p>A missing child</p>".into()),
            image: Some(TvMazeImage {
                medium: Some("m.jpg".into()),
                original: Some("o.jpg".into()),
            }),
            network: None,
            web_channel: Some(TvMazeChannel {
                id: Some(1),
                name: "Netflix".into(),
            }),
            rating: Some(TvMazeRating { average: Some(8.7) }),
            ended: Some("2020-06-27".into()),
            ..Default::default()
        };
        let seasons = vec![
            TvMazeSeason { id: 1, episode_order: Some(10), ..Default::default() },
            TvMazeSeason { id: 2, episode_order: Some(8), ..Default::default() },
            TvMazeSeason { id: 3, episode_order: None, ..Default::default() },
        ];

        let item = enrich_with_tvmaze(item, &tvmaze, &seasons);
        assert_eq!(item.poster.as_deref(), Some("watchmode.jpg"));
        assert_eq!(item.backdrop.as_deref(), Some("o.jpg"));
        assert_eq!(item.plot.as_deref(), Some("A missing child"));
        assert_eq!(item.network_names, ["Netflix"]);
        assert_eq!(item.season_count, Some(3));
        assert_eq!(item.episode_count, Some(18));
        assert_eq!(item.user_rating, Some(8.7));
        assert_eq!(item.end_year, Some(2020));
        assert_eq!(item.tvmaze_id, Some(17861));
    }

    #[test]
    fn medium_image_is_the_poster_fallback() {
        let item = ContentItem::new("1", "X", ContentKind::Movie);
        let tvmaze = TvMazeShow {
            image: Some(TvMazeImage {
                medium: Some("m.jpg".into()),
                original: None,
            }),
            ..Default::default()
        };
        let item = enrich_with_tvmaze(item, &tvmaze, &[]);
        assert_eq!(item.poster.as_deref(), Some("m.jpg"));
        assert_eq!(item.season_count, None);
        assert_eq!(item.user_rating, None);
    }

    #[test]
    fn exact_year_wins() {
        let results = vec![
            show(1, "The Office", Some("2001-07-09")),
            show(2, "The Office", Some("2005-03-24")),
            show(3, "The Office", Some("2004-01-01")),
        ];
        assert_eq!(best_tvmaze_match(&results, Some(2005)).unwrap().id, 2);
    }

    #[test]
    fn closest_year_wins_without_exact_match() {
        let results = vec![
            show(1, "Shogun", Some("1980-09-15")),
            show(2, "Shogun", None),
            show(3, "Shogun", Some("2024-02-27")),
        ];
        assert_eq!(best_tvmaze_match(&results, Some(2023)).unwrap().id, 3);
    }

    #[test]
    fn first_result_without_year() {
        let results = vec![show(9, "A", Some("2010-01-01")), show(4, "B", None)];
        assert_eq!(best_tvmaze_match(&results, None).unwrap().id, 9);
        assert!(best_tvmaze_match(&[], Some(2000)).is_none());
    }
}
