//! Per-user watch list entries and the queries over them.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;
pub const DEFAULT_PRIORITY: u8 = 3;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_NEXT_LIMIT: usize = 10;

fn check_priority(priority: u8) -> Result<u8> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(priority)
    } else {
        Err(ModelError::OutOfRange {
            field: "priority",
            min: i64::from(MIN_PRIORITY),
            max: i64::from(MAX_PRIORITY),
        })
    }
}

fn clean_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

/// Genres arrive either as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum GenreInput {
    One(String),
    Many(Vec<String>),
}

impl GenreInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            GenreInput::One(genre) => clean_genres(vec![genre]),
            GenreInput::Many(genres) => clean_genres(genres),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WatchListItem {
    pub id: Uuid,
    pub user_id: String,
    pub content_id: String,
    pub content_type: String,
    pub title: String,
    pub priority: u8,
    pub genre: Vec<String>,
    /// Minutes.
    pub estimated_duration: f64,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AddWatchListRequest {
    pub content_id: String,
    pub content_type: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre: Option<GenreInput>,
    pub estimated_duration: f64,
}

/// An add request with its fields checked and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchListItem {
    pub content_id: String,
    pub content_type: String,
    pub title: String,
    pub priority: u8,
    pub genre: Vec<String>,
    pub estimated_duration: f64,
}

impl AddWatchListRequest {
    pub fn validate(self) -> Result<NewWatchListItem> {
        let content_id = self.content_id.trim().to_string();
        if content_id.is_empty() {
            return Err(ModelError::EmptyField("contentId"));
        }
        let content_type = self.content_type.trim().to_string();
        if content_type.is_empty() {
            return Err(ModelError::EmptyField("contentType"));
        }
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ModelError::EmptyField("title"));
        }
        let priority = check_priority(self.priority.unwrap_or(DEFAULT_PRIORITY))?;
        let estimated_duration = check_duration(self.estimated_duration)?;

        Ok(NewWatchListItem {
            content_id,
            content_type,
            title,
            priority,
            genre: self.genre.map(GenreInput::into_vec).unwrap_or_default(),
            estimated_duration,
        })
    }
}

fn check_duration(minutes: f64) -> Result<f64> {
    if minutes.is_finite() && minutes >= 0.0 {
        Ok(minutes)
    } else {
        Err(ModelError::InvalidValue {
            field: "estimatedDuration",
            reason: "must be a non-negative number of minutes",
        })
    }
}

/// Partial update; absent fields are left alone.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UpdateWatchListRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre: Option<GenreInput>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub estimated_duration: Option<f64>,
}

impl UpdateWatchListRequest {
    pub fn apply_to(self, item: &mut WatchListItem) -> Result<()> {
        let priority = self.priority.map(check_priority).transpose()?;
        let duration = self.estimated_duration.map(check_duration).transpose()?;

        if let Some(priority) = priority {
            item.priority = priority;
        }
        if let Some(genre) = self.genre {
            item.genre = genre.into_vec();
        }
        if let Some(duration) = duration {
            item.estimated_duration = duration;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum WatchListSort {
    #[default]
    AddedAt,
    Priority,
    Title,
    EstimatedDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WatchListQuery {
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limit: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_by: WatchListSort,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_order: SortOrder,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content_type: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<u8>,
}

impl WatchListQuery {
    /// One-based page, never zero.
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(current_page: usize, items_per_page: usize, total_items: usize) -> Self {
        let total_pages = total_items.div_ceil(items_per_page.max(1));
        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WatchListPage {
    pub data: Vec<WatchListItem>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WatchListOverview {
    pub total_items: usize,
    pub total_estimated_duration: f64,
    pub average_priority: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PriorityCount {
    pub priority: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WatchListStatistics {
    pub overview: WatchListOverview,
    /// Most common first.
    pub genre_distribution: Vec<LabelCount>,
    /// Most common first.
    pub content_type_distribution: Vec<LabelCount>,
    /// Lowest priority first.
    pub priority_distribution: Vec<PriorityCount>,
}

/// Body returned after a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RemovedWatchListItem {
    pub id: Uuid,
    pub title: String,
}
