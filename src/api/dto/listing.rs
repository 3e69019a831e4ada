//! Query parameters and response for the restaurant listing.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use super::restaurant::RestaurantResponse;
use crate::application::services::{ListingQuery, RestaurantListing};

/// Listing query string.
///
/// Uses `serde_with` to parse numbers and booleans from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListRestaurantsQuery {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub min_rating: Option<f64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub max_rating: Option<f64>,

    /// `true` for open now, `false` for closed now.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub open: Option<bool>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl From<ListRestaurantsQuery> for ListingQuery {
    fn from(q: ListRestaurantsQuery) -> Self {
        ListingQuery {
            keyword: q.keyword,
            city: q.city,
            state: q.state,
            zip_code: q.zip_code,
            min_rating: q.min_rating,
            max_rating: q.max_rating,
            open: q.open,
            page: q.page,
            page_size: q.page_size,
        }
    }
}

/// One page of restaurants.
#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantListResponse {
    pub restaurants: Vec<RestaurantResponse>,
    /// Entries on this page.
    pub restaurant_count: usize,
    /// Matches across all pages.
    pub total_count: i64,
    pub result_per_page: u32,
    pub page: u32,
}

impl From<RestaurantListing> for RestaurantListResponse {
    fn from(listing: RestaurantListing) -> Self {
        let restaurants: Vec<RestaurantResponse> =
            listing.items.into_iter().map(Into::into).collect();

        Self {
            restaurant_count: restaurants.len(),
            restaurants,
            total_count: listing.total,
            result_per_page: listing.page_size,
            page: listing.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> Option<ListRestaurantsQuery> {
        let uri: Uri = format!("/restaurants?{query}").parse().unwrap();
        Query::<ListRestaurantsQuery>::try_from_uri(&uri)
            .ok()
            .map(|Query(q)| q)
    }

    #[test]
    fn test_query_parses_from_strings() {
        let q = parse("keyword=fig&min_rating=3.5&open=true&page=2&page_size=5").unwrap();

        assert_eq!(q.keyword.as_deref(), Some("fig"));
        assert_eq!(q.min_rating, Some(3.5));
        assert_eq!(q.open, Some(true));
        assert_eq!(q.page, Some(2));
        assert_eq!(q.page_size, Some(5));
        assert_eq!(q.max_rating, None);
    }

    #[test]
    fn test_query_rejects_non_numeric_page() {
        assert!(parse("page=abc").is_none());
    }
}
