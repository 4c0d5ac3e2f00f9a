//! Per-user watch lists kept in memory.

use std::{cmp::Ordering, collections::HashMap, fmt, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use firetv_model::{
    AddWatchListRequest, LabelCount, ModelError, Pagination, PriorityCount,
    RemovedWatchListItem, SortOrder, UpdateWatchListRequest, WatchListItem,
    WatchListOverview, WatchListPage, WatchListQuery, WatchListSort,
    WatchListStatistics,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchListError {
    #[error("{0}")]
    Invalid(#[from] ModelError),

    #[error("Item already exists in watchlist")]
    Duplicate,

    #[error("Watchlist item not found")]
    NotFound,
}

/// Items are owned by one user. Every lookup is scoped to the caller, so an
/// id belonging to someone else reads as not found.
pub struct WatchListStore {
    items: DashMap<Uuid, WatchListItem>,
    // (user id, content id) -> item id
    by_content: DashMap<(String, String), Uuid>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for WatchListStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchListStore")
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl WatchListStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            items: DashMap::new(),
            by_content: DashMap::new(),
            clock,
        }
    }

    pub fn add(
        &self,
        user_id: &str,
        request: AddWatchListRequest,
    ) -> Result<WatchListItem, WatchListError> {
        let request = request.validate()?;

        let id = Uuid::now_v7();
        match self
            .by_content
            .entry((user_id.to_string(), request.content_id.clone()))
        {
            Entry::Occupied(_) => return Err(WatchListError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = self.clock.now();
        let item = WatchListItem {
            id,
            user_id: user_id.to_string(),
            content_id: request.content_id,
            content_type: request.content_type,
            title: request.title,
            priority: request.priority,
            genre: request.genre,
            estimated_duration: request.estimated_duration,
            added_at: now,
            updated_at: now,
        };
        self.items.insert(id, item.clone());
        info!("User {} added {} to their watch list", user_id, item.title);
        Ok(item)
    }

    pub fn get(&self, user_id: &str, id: &Uuid) -> Result<WatchListItem, WatchListError> {
        self.items
            .get(id)
            .filter(|item| item.user_id == user_id)
            .map(|item| item.value().clone())
            .ok_or(WatchListError::NotFound)
    }

    /// Apply a partial update. Nothing changes when any field is invalid.
    pub fn update(
        &self,
        user_id: &str,
        id: &Uuid,
        request: UpdateWatchListRequest,
    ) -> Result<WatchListItem, WatchListError> {
        let mut item = self
            .items
            .get_mut(id)
            .filter(|item| item.user_id == user_id)
            .ok_or(WatchListError::NotFound)?;

        request.apply_to(&mut item)?;
        item.updated_at = self.clock.now();
        Ok(item.clone())
    }

    pub fn remove(
        &self,
        user_id: &str,
        id: &Uuid,
    ) -> Result<RemovedWatchListItem, WatchListError> {
        let (_, item) = self
            .items
            .remove_if(id, |_, item| item.user_id == user_id)
            .ok_or(WatchListError::NotFound)?;
        self.by_content
            .remove(&(item.user_id.clone(), item.content_id.clone()));
        debug!("Removed {} from the watch list of {}", item.id, user_id);
        Ok(RemovedWatchListItem {
            id: item.id,
            title: item.title,
        })
    }

    /// Filtered, sorted and paginated view of one user's list.
    pub fn list(&self, user_id: &str, query: &WatchListQuery) -> WatchListPage {
        let mut items: Vec<WatchListItem> = self
            .owned_by(user_id)
            .into_iter()
            .filter(|item| matches_filters(item, query))
            .collect();

        items.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            let ordering = match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let page = query.page();
        let limit = query.limit();
        let pagination = Pagination::new(page, limit, items.len());
        let data = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        WatchListPage { data, pagination }
    }

    /// Highest priority first, oldest additions first within a priority.
    pub fn next_to_watch(&self, user_id: &str, limit: usize) -> Vec<WatchListItem> {
        let mut items = self.owned_by(user_id);
        items.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.added_at.cmp(&b.added_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        items.truncate(limit);
        items
    }

    pub fn statistics(&self, user_id: &str) -> WatchListStatistics {
        let items = self.owned_by(user_id);
        if items.is_empty() {
            return WatchListStatistics::default();
        }

        let total_items = items.len();
        let total_estimated_duration =
            items.iter().map(|item| item.estimated_duration).sum();
        let priority_sum: u32 = items.iter().map(|item| u32::from(item.priority)).sum();

        let mut genres: HashMap<&str, usize> = HashMap::new();
        let mut content_types: HashMap<&str, usize> = HashMap::new();
        let mut priorities: HashMap<u8, usize> = HashMap::new();
        for item in &items {
            for genre in &item.genre {
                *genres.entry(genre.as_str()).or_default() += 1;
            }
            *content_types.entry(item.content_type.as_str()).or_default() += 1;
            *priorities.entry(item.priority).or_default() += 1;
        }

        let mut priority_distribution: Vec<PriorityCount> = priorities
            .into_iter()
            .map(|(priority, count)| PriorityCount { priority, count })
            .collect();
        priority_distribution.sort_by_key(|p| p.priority);

        WatchListStatistics {
            overview: WatchListOverview {
                total_items,
                total_estimated_duration,
                average_priority: f64::from(priority_sum) / total_items as f64,
            },
            genre_distribution: by_count(genres),
            content_type_distribution: by_count(content_types),
            priority_distribution,
        }
    }

    fn owned_by(&self, user_id: &str) -> Vec<WatchListItem> {
        self.items
            .iter()
            .filter(|item| item.user_id == user_id)
            .map(|item| item.value().clone())
            .collect()
    }
}

fn matches_filters(item: &WatchListItem, query: &WatchListQuery) -> bool {
    query
        .content_type
        .as_deref()
        .is_none_or(|kind| item.content_type == kind)
        && query
            .genre
            .as_deref()
            .is_none_or(|genre| item.genre.iter().any(|g| g == genre))
        && query.priority.is_none_or(|p| item.priority == p)
}

fn compare(a: &WatchListItem, b: &WatchListItem, sort_by: WatchListSort) -> Ordering {
    match sort_by {
        WatchListSort::AddedAt => a.added_at.cmp(&b.added_at),
        WatchListSort::Priority => a.priority.cmp(&b.priority),
        WatchListSort::Title => a.title.cmp(&b.title),
        WatchListSort::EstimatedDuration => {
            a.estimated_duration.total_cmp(&b.estimated_duration)
        }
    }
}

/// Most common first, ties by name.
fn by_count(counts: HashMap<&str, usize>) -> Vec<LabelCount> {
    let mut labels: Vec<LabelCount> = counts
        .into_iter()
        .map(|(name, count)| LabelCount {
            name: name.to_string(),
            count,
        })
        .collect();
    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    labels
}
