#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use chrono::NaiveTime;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use restaurant_service::api::handlers::health_handler;
use restaurant_service::api::routes::{protected_routes, public_routes};
use restaurant_service::application::services::{RestaurantSettings, UploadRetryPolicy};
use restaurant_service::domain::entities::{NewRestaurant, Restaurant, RestaurantDetails};
use restaurant_service::domain::media::{MediaError, MediaHost, MediaUpload, StoredMedia};
use restaurant_service::domain::repositories::RestaurantRepository;
use restaurant_service::infrastructure::cache::{CacheResult, CacheService, NullCache};
use restaurant_service::infrastructure::memory::MemoryStore;
use restaurant_service::state::{AppState, Backends};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const MAX_AVATAR_BYTES: usize = 64 * 1024;

/// Media host double counting upload attempts.
#[derive(Default)]
pub struct FakeMediaHost {
    uploads: AtomicUsize,
    deletes: AtomicUsize,
    failing: AtomicBool,
}

impl FakeMediaHost {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Makes every following upload fail with a transient error.
    pub fn fail_uploads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, upload: &MediaUpload) -> Result<StoredMedia, MediaError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediaError::Transport("connection reset".to_string()));
        }
        Ok(StoredMedia {
            url: format!("https://media.test/avatars/{n}/{}", upload.file_name),
            public_id: format!("avatars/{n}"),
        })
    }

    async fn delete(&self, _public_id: &str) -> Result<(), MediaError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Map-backed cache that keeps entries until invalidated.
#[derive(Default)]
pub struct MapCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MapCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl CacheService for MapCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// In-memory application wired for HTTP tests.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub media: Arc<FakeMediaHost>,
}

impl TestApp {
    /// Issues a bearer token for `user_id`.
    pub async fn token_for(&self, user_id: i64) -> String {
        let (_, raw) = self
            .state
            .auth_service
            .issue_token(user_id, &format!("user-{user_id}"))
            .await
            .unwrap();
        raw
    }

    /// Inserts a restaurant directly, bypassing the upload path.
    pub async fn seed_restaurant(&self, owner_id: i64, details: RestaurantDetails) -> Restaurant {
        RestaurantRepository::create(
            self.store.as_ref(),
            NewRestaurant {
                owner_id,
                details,
                avatar_url: format!("https://media.test/avatars/seed-{owner_id}.png"),
            },
        )
        .await
        .unwrap()
    }
}

pub fn test_settings() -> RestaurantSettings {
    RestaurantSettings {
        max_avatar_bytes: MAX_AVATAR_BYTES,
        upload_retry: UploadRetryPolicy {
            max_retries: 1,
            base_delay_ms: 1,
        },
        ..RestaurantSettings::default()
    }
}

/// Routes as mounted by the server, without rate limiting.
pub fn spawn_app() -> TestApp {
    spawn_app_with_cache(Arc::new(NullCache::new()))
}

pub fn spawn_app_with_cache(cache: Arc<dyn CacheService>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(FakeMediaHost::default());

    let state = AppState::new(
        Backends {
            restaurants: store.clone(),
            reviews: store.clone(),
            tokens: store.clone(),
            media: media.clone(),
            cache,
        },
        test_settings(),
        SIGNING_SECRET.to_string(),
    );

    let api = public_routes().merge(protected_routes(state.clone(), MAX_AVATAR_BYTES));
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api)
        .with_state(state.clone());

    TestApp {
        server: TestServer::new(app).unwrap(),
        state,
        store,
        media,
    }
}

pub fn details(name: &str, city: &str) -> RestaurantDetails {
    RestaurantDetails {
        name: name.to_string(),
        description: format!("{name} serves food"),
        owner_name: "Sam Owner".to_string(),
        email: "owner@example.com".to_string(),
        phone_number: "+1 555 0100".to_string(),
        // Equal times mean open around the clock.
        opening_time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        closing_time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        address: "1 Main St".to_string(),
        city: city.to_string(),
        state: "CA".to_string(),
        zip_code: "94110".to_string(),
    }
}

pub fn avatar_part() -> Part {
    Part::bytes(vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3])
        .file_name("avatar.png")
        .mime_type("image/png")
}

/// A complete, valid registration form.
pub fn registration_form(name: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("description", "Wood-fired pizza")
        .add_text("owner_name", "Sam Owner")
        .add_text("email", " Owner@Example.com ")
        .add_text("phone_number", "+1 (555) 010-0100")
        .add_text("opening_time", "09:00")
        .add_text("closing_time", "22:00")
        .add_text("address", "1 Main St")
        .add_text("city", "San Francisco")
        .add_text("state", "CA")
        .add_text("zip_code", "94110")
        .add_part("avatar", avatar_part())
}
