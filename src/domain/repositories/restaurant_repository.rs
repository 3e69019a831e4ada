//! Repository trait for restaurant storage and search.

use crate::domain::entities::{NewRestaurant, Restaurant};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveTime;

/// Open/closed filter evaluated at a given wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenStatusFilter {
    pub at: NaiveTime,
    pub open: bool,
}

/// Search, filter, and pagination criteria for restaurant listings.
///
/// All criteria are optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    /// Case-insensitive substring match on name, description, and city.
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub open_status: Option<OpenStatusFilter>,
    pub offset: i64,
    pub limit: i64,
}

impl RestaurantFilter {
    /// Creates an unfiltered query for the given page window.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    /// Adds free-text search. Blank keywords are ignored.
    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = non_blank(keyword);
        self
    }

    /// Adds exact (case-insensitive) location filters.
    pub fn with_location(
        mut self,
        city: Option<String>,
        state: Option<String>,
        zip_code: Option<String>,
    ) -> Self {
        self.city = non_blank(city);
        self.state = non_blank(state);
        self.zip_code = non_blank(zip_code);
        self
    }

    /// Adds inclusive bounds on the aggregate rating.
    pub fn with_rating_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_rating = min;
        self.max_rating = max;
        self
    }

    /// Adds the open-now / closed-now filter.
    pub fn with_open_status(mut self, status: Option<OpenStatusFilter>) -> Self {
        self.open_status = status;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One page of search results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct RestaurantPage {
    pub items: Vec<Restaurant>,
    pub total: i64,
}

/// Repository interface for restaurants.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRestaurantRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_restaurant.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Persists a new restaurant with a zero rating.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the owner already has a restaurant.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_restaurant: NewRestaurant) -> Result<Restaurant, AppError>;

    /// Finds a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>, AppError>;

    /// Finds the restaurant owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_owner(&self, owner_id: i64) -> Result<Option<Restaurant>, AppError>;

    /// Returns one page of restaurants matching the filter, ordered by
    /// registration time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn search(&self, filter: RestaurantFilter) -> Result<RestaurantPage, AppError>;

    /// Counts all restaurants.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
