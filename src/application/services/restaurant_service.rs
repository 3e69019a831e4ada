//! Restaurant registration, lookup, and listing.

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::{
    MAX_RATING, MIN_RATING, NewRestaurant, Restaurant, RestaurantDetails, is_valid_rating,
};
use crate::domain::media::{MediaError, MediaHost, MediaUpload, StoredMedia};
use crate::domain::repositories::{OpenStatusFilter, RestaurantFilter, RestaurantRepository};
use crate::error::AppError;

/// Retry policy for avatar uploads.
///
/// Delays double from `2 × base_delay_ms` and are capped at five seconds.
#[derive(Debug, Clone, Copy)]
pub struct UploadRetryPolicy {
    pub max_retries: usize,
    pub base_delay_ms: u64,
}

impl UploadRetryPolicy {
    fn strategy(self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms.max(1))
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(self.max_retries)
    }
}

impl Default for UploadRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
        }
    }
}

/// Tunables for [`RestaurantService`].
#[derive(Debug, Clone)]
pub struct RestaurantSettings {
    /// Page size when the client does not supply one.
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_avatar_bytes: usize,
    /// Offset applied to UTC when evaluating opening hours.
    pub hours_offset: FixedOffset,
    pub upload_retry: UploadRetryPolicy,
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        Self {
            default_page_size: 5,
            max_page_size: 50,
            max_avatar_bytes: 5 * 1024 * 1024,
            hours_offset: Utc.fix(),
            upload_retry: UploadRetryPolicy::default(),
        }
    }
}

/// Listing request after query-string parsing.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub open: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// One page of a restaurant listing.
#[derive(Debug, Clone)]
pub struct RestaurantListing {
    pub items: Vec<Restaurant>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Service for restaurant registration and retrieval.
///
/// Registration enforces one restaurant per owner, requires an image avatar,
/// and uploads it to the media host before anything is persisted.
pub struct RestaurantService<R: RestaurantRepository + ?Sized = dyn RestaurantRepository> {
    repository: Arc<R>,
    media: Arc<dyn MediaHost>,
    settings: RestaurantSettings,
}

impl<R: RestaurantRepository + ?Sized> RestaurantService<R> {
    /// Creates a new restaurant service.
    pub fn new(repository: Arc<R>, media: Arc<dyn MediaHost>, settings: RestaurantSettings) -> Self {
        Self {
            repository,
            media,
            settings,
        }
    }

    pub fn settings(&self) -> &RestaurantSettings {
        &self.settings
    }

    /// Registers the caller's restaurant.
    ///
    /// # Flow
    ///
    /// 1. Reject if the owner already has a restaurant
    /// 2. Reject a missing, non-image, empty, or oversized avatar
    /// 3. Upload the avatar (retrying transient failures)
    /// 4. Persist the restaurant, deleting the uploaded avatar if that fails
    /// 5. Re-read the stored record
    ///
    /// `details` must already have passed field validation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the owner already has a restaurant.
    /// Returns [`AppError::Validation`] if the avatar is missing or invalid.
    /// Returns [`AppError::Upstream`] if the media host upload fails.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn register(
        &self,
        owner_id: i64,
        details: RestaurantDetails,
        avatar: Option<MediaUpload>,
    ) -> Result<Restaurant, AppError> {
        if self.repository.find_by_owner(owner_id).await?.is_some() {
            return Err(AppError::conflict(
                "User restaurant already exists",
                json!({ "owner_id": owner_id }),
            ));
        }

        let avatar = avatar.ok_or_else(|| {
            AppError::bad_request("Avatar is required", json!({ "field": "avatar" }))
        })?;
        self.check_avatar(&avatar)?;

        let stored = self.upload_avatar(&avatar).await?;

        let new_restaurant = NewRestaurant {
            owner_id,
            details: details.normalized(),
            avatar_url: stored.url.clone(),
        };

        let created = match self.repository.create(new_restaurant).await {
            Ok(created) => created,
            Err(e) => {
                self.discard_avatar(&stored).await;
                return Err(e);
            }
        };

        let confirmed = self
            .repository
            .find_by_id(created.id)
            .await?
            .ok_or_else(|| {
                AppError::internal(
                    "Something went wrong while registering the restaurant",
                    json!({ "id": created.id }),
                )
            })?;

        metrics::counter!("restaurants_registered_total").increment(1);
        tracing::info!(restaurant_id = confirmed.id, owner_id, "Restaurant registered");

        Ok(confirmed)
    }

    /// Retrieves a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the restaurant does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_restaurant(&self, id: i64) -> Result<Restaurant, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Restaurant not found", json!({ "id": id })))
    }

    /// Retrieves the restaurant owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user owns no restaurant.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_owned_restaurant(&self, owner_id: i64) -> Result<Restaurant, AppError> {
        self.repository.find_by_owner(owner_id).await?.ok_or_else(|| {
            AppError::not_found(
                "No restaurant registered for this user",
                json!({ "owner_id": owner_id }),
            )
        })
    }

    /// Lists restaurants matching the query, one page at a time.
    ///
    /// An empty page is reported as not found, whether or not other pages
    /// have results.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid page, page size, or rating bound.
    /// Returns [`AppError::NotFound`] if the requested page is empty.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_restaurants(&self, query: ListingQuery) -> Result<RestaurantListing, AppError> {
        let page = query.page.unwrap_or(1);
        let page_size = query.page_size.unwrap_or(self.settings.default_page_size);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if page_size == 0 || page_size > self.settings.max_page_size {
            return Err(AppError::bad_request(
                format!(
                    "Page size must be between 1 and {}",
                    self.settings.max_page_size
                ),
                json!({ "page_size": page_size }),
            ));
        }

        for bound in [query.min_rating, query.max_rating].into_iter().flatten() {
            if !is_valid_rating(bound) {
                return Err(AppError::bad_request(
                    "Rating filter out of range",
                    json!({ "min": MIN_RATING, "max": MAX_RATING, "value": bound }),
                ));
            }
        }

        if let (Some(min), Some(max)) = (query.min_rating, query.max_rating)
            && min > max
        {
            return Err(AppError::bad_request(
                "min_rating must not exceed max_rating",
                json!({ "min_rating": min, "max_rating": max }),
            ));
        }

        let offset = (i64::from(page) - 1) * i64::from(page_size);
        let open_status = query.open.map(|open| OpenStatusFilter {
            at: self.local_time(),
            open,
        });

        let filter = RestaurantFilter::new(offset, i64::from(page_size))
            .with_keyword(query.keyword)
            .with_location(query.city, query.state, query.zip_code)
            .with_rating_range(query.min_rating, query.max_rating)
            .with_open_status(open_status);

        let result = self.repository.search(filter).await?;

        if result.items.is_empty() {
            return Err(AppError::not_found(
                "No restaurants found",
                json!({ "page": page, "page_size": page_size, "total": result.total }),
            ));
        }

        Ok(RestaurantListing {
            items: result.items,
            total: result.total,
            page,
            page_size,
        })
    }

    /// Counts all restaurants. Used by health checks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    fn local_time(&self) -> NaiveTime {
        Utc::now().with_timezone(&self.settings.hours_offset).time()
    }

    fn check_avatar(&self, avatar: &MediaUpload) -> Result<(), AppError> {
        if !avatar.is_image() {
            return Err(AppError::bad_request(
                "Avatar must be an image",
                json!({ "content_type": avatar.content_type }),
            ));
        }

        if avatar.is_empty() {
            return Err(AppError::bad_request(
                "Avatar file is empty",
                json!({ "field": "avatar" }),
            ));
        }

        if avatar.len() > self.settings.max_avatar_bytes {
            return Err(AppError::bad_request(
                "Avatar file is too large",
                json!({ "max_bytes": self.settings.max_avatar_bytes, "size": avatar.len() }),
            ));
        }

        Ok(())
    }

    /// Uploads with exponential backoff, retrying only transient failures.
    async fn upload_avatar(&self, avatar: &MediaUpload) -> Result<StoredMedia, AppError> {
        let media = self.media.as_ref();

        RetryIf::spawn(
            self.settings.upload_retry.strategy(),
            || media.upload(avatar),
            |e: &MediaError| {
                let transient = e.is_transient();
                if transient {
                    metrics::counter!("media_upload_retries_total").increment(1);
                    tracing::warn!(error = %e, file = %avatar.file_name, "Avatar upload failed, retrying");
                }
                transient
            },
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, file = %avatar.file_name, "Avatar upload failed");
            AppError::upstream(
                "Avatar upload failed",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    async fn discard_avatar(&self, stored: &StoredMedia) {
        if let Err(e) = self.media.delete(&stored.public_id).await {
            tracing::warn!(error = %e, public_id = %stored.public_id, "Failed to delete orphaned avatar");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::MockMediaHost;
    use crate::domain::repositories::{MockRestaurantRepository, RestaurantPage};

    fn details() -> RestaurantDetails {
        RestaurantDetails {
            name: "Blue Fig".to_string(),
            description: "Mediterranean".to_string(),
            owner_name: "Sam Doe".to_string(),
            email: "Owner@BlueFig.Example".to_string(),
            phone_number: "555-0100".to_string(),
            opening_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
        }
    }

    fn restaurant(id: i64, owner_id: i64) -> Restaurant {
        Restaurant {
            id,
            owner_id,
            details: details().normalized(),
            avatar_url: "https://media.example/avatar.png".to_string(),
            rating: 0.0,
            review_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn avatar() -> MediaUpload {
        MediaUpload {
            file_name: "avatar.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn stored() -> StoredMedia {
        StoredMedia {
            url: "https://media.example/avatar.png".to_string(),
            public_id: "restaurants/avatar".to_string(),
        }
    }

    fn settings() -> RestaurantSettings {
        RestaurantSettings {
            upload_retry: UploadRetryPolicy {
                max_retries: 2,
                base_delay_ms: 1,
            },
            ..RestaurantSettings::default()
        }
    }

    fn service(
        repo: MockRestaurantRepository,
        media: MockMediaHost,
    ) -> RestaurantService<MockRestaurantRepository> {
        RestaurantService::new(Arc::new(repo), Arc::new(media), settings())
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner().times(1).returning(|_| Ok(None));
        media.expect_upload().times(1).returning(|_| Ok(stored()));
        repo.expect_create()
            .withf(|new| {
                new.owner_id == 7
                    && new.details.email == "owner@bluefig.example"
                    && new.avatar_url == "https://media.example/avatar.png"
            })
            .times(1)
            .returning(|new| Ok(restaurant(1, new.owner_id)));
        repo.expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|id| Ok(Some(restaurant(id, 7))));

        let result = service(repo, media)
            .register(7, details(), Some(avatar()))
            .await;

        let created = result.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.owner_id, 7);
    }

    #[tokio::test]
    async fn test_register_rejects_second_restaurant() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner()
            .times(1)
            .returning(|owner| Ok(Some(restaurant(1, owner))));
        repo.expect_create().never();
        media.expect_upload().never();

        let result = service(repo, media)
            .register(7, details(), Some(avatar()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_register_requires_avatar() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner().returning(|_| Ok(None));
        media.expect_upload().never();

        let result = service(repo, media).register(7, details(), None).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_rejects_non_image_avatar() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner().returning(|_| Ok(None));
        media.expect_upload().never();

        let upload = MediaUpload {
            content_type: "application/pdf".to_string(),
            ..avatar()
        };
        let result = service(repo, media)
            .register(7, details(), Some(upload))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_register_retries_transient_upload_failures() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();
        let mut seq = mockall::Sequence::new();

        repo.expect_find_by_owner().returning(|_| Ok(None));
        media
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(MediaError::Transport("connection reset".into())));
        media
            .expect_upload()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(stored()));
        repo.expect_create()
            .returning(|new| Ok(restaurant(3, new.owner_id)));
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(restaurant(id, 7))));

        let result = service(repo, media)
            .register(7, details(), Some(avatar()))
            .await;

        assert_eq!(result.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_register_upload_failure_is_upstream_error() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner().returning(|_| Ok(None));
        // 1 attempt + 2 retries
        media
            .expect_upload()
            .times(3)
            .returning(|_| Err(MediaError::Transport("timeout".into())));
        repo.expect_create().never();

        let result = service(repo, media)
            .register(7, details(), Some(avatar()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_register_does_not_retry_rejected_upload() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner().returning(|_| Ok(None));
        media.expect_upload().times(1).returning(|_| {
            Err(MediaError::Rejected {
                status: 401,
                body: "invalid signature".into(),
            })
        });

        let result = service(repo, media)
            .register(7, details(), Some(avatar()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Upstream { .. }));
    }

    #[tokio::test]
    async fn test_register_deletes_avatar_when_persist_fails() {
        let mut repo = MockRestaurantRepository::new();
        let mut media = MockMediaHost::new();

        repo.expect_find_by_owner().returning(|_| Ok(None));
        media.expect_upload().returning(|_| Ok(stored()));
        repo.expect_create().times(1).returning(|_| {
            Err(AppError::conflict(
                "User restaurant already exists",
                json!({}),
            ))
        });
        media
            .expect_delete()
            .withf(|public_id| public_id == "restaurants/avatar")
            .times(1)
            .returning(|_| Ok(()));

        let result = service(repo, media)
            .register(7, details(), Some(avatar()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_restaurant_not_found() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo, MockMediaHost::new()).get_restaurant(42).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_uses_default_page_size() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_search()
            .withf(|filter| filter.offset == 5 && filter.limit == 5 && filter.open_status.is_none())
            .times(1)
            .returning(|_| {
                Ok(RestaurantPage {
                    items: vec![restaurant(6, 1)],
                    total: 6,
                })
            });

        let listing = service(repo, MockMediaHost::new())
            .list_restaurants(ListingQuery {
                page: Some(2),
                ..ListingQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(listing.page_size, 5);
        assert_eq!(listing.page, 2);
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.total, 6);
    }

    #[tokio::test]
    async fn test_list_passes_open_status() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_search()
            .withf(|filter| filter.open_status.is_some_and(|s| s.open))
            .times(1)
            .returning(|_| {
                Ok(RestaurantPage {
                    items: vec![restaurant(1, 1)],
                    total: 1,
                })
            });

        let result = service(repo, MockMediaHost::new())
            .list_restaurants(ListingQuery {
                open: Some(true),
                ..ListingQuery::default()
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_empty_page_is_not_found() {
        let mut repo = MockRestaurantRepository::new();
        repo.expect_search().returning(|_| {
            Ok(RestaurantPage {
                items: vec![],
                total: 0,
            })
        });

        let result = service(repo, MockMediaHost::new())
            .list_restaurants(ListingQuery {
                city: Some("Nowhere".to_string()),
                ..ListingQuery::default()
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_paging() {
        let svc = service(MockRestaurantRepository::new(), MockMediaHost::new());

        let zero_page = svc
            .list_restaurants(ListingQuery {
                page: Some(0),
                ..ListingQuery::default()
            })
            .await;
        assert!(matches!(zero_page.unwrap_err(), AppError::Validation { .. }));

        let huge_page = svc
            .list_restaurants(ListingQuery {
                page_size: Some(500),
                ..ListingQuery::default()
            })
            .await;
        assert!(matches!(huge_page.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_rating_range() {
        let svc = service(MockRestaurantRepository::new(), MockMediaHost::new());

        let result = svc
            .list_restaurants(ListingQuery {
                min_rating: Some(4.0),
                max_rating: Some(2.0),
                ..ListingQuery::default()
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
