//! DTOs for restaurant registration and lookup.

use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::domain::entities::{Restaurant, RestaurantDetails, parse_clock_time};
use crate::domain::media::MediaUpload;
use crate::error::AppError;

/// Digits with optional `+`, spaces, dots, dashes, and parentheses.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().-]{5,24}$").expect("valid phone regex"));

const AVATAR_FIELD: &str = "avatar";

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be empty")));
    }
    Ok(())
}

fn clock_time(value: &str) -> Result<(), ValidationError> {
    match parse_clock_time(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("clock_time")
            .with_message(Cow::Borrowed("must be a time in HH:MM format"))),
    }
}

/// Text fields of the registration form.
#[derive(Debug, Default, Validate)]
pub struct RegisterRestaurantForm {
    #[validate(custom(function = "non_blank"), length(max = 120))]
    pub name: String,

    #[validate(custom(function = "non_blank"), length(max = 2000))]
    pub description: String,

    #[validate(custom(function = "non_blank"), length(max = 120))]
    pub owner_name: String,

    #[validate(
        custom(function = "non_blank"),
        email(message = "must be a valid email address")
    )]
    pub email: String,

    #[validate(
        custom(function = "non_blank"),
        regex(path = *PHONE_REGEX, message = "must be a valid phone number")
    )]
    pub phone_number: String,

    #[validate(custom(function = "clock_time"))]
    pub opening_time: String,

    #[validate(custom(function = "clock_time"))]
    pub closing_time: String,

    #[validate(custom(function = "non_blank"), length(max = 200))]
    pub address: String,

    #[validate(custom(function = "non_blank"), length(max = 100))]
    pub city: String,

    #[validate(custom(function = "non_blank"), length(max = 100))]
    pub state: String,

    #[validate(custom(function = "non_blank"), length(max = 20))]
    pub zip_code: String,
}

impl RegisterRestaurantForm {
    /// Reads the text fields and the optional `avatar` file from a multipart body.
    ///
    /// Text values are trimmed before they are stored, so validation sees the
    /// same values that get persisted. Unknown fields are ignored. An `avatar`
    /// part with no file name and no content counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the body is not valid multipart or
    /// exceeds the upload limit.
    pub async fn from_multipart(
        mut multipart: Multipart,
    ) -> Result<(Self, Option<MediaUpload>), AppError> {
        let mut form = Self::default();
        let mut avatar = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == AVATAR_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;

                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }

                avatar = Some(MediaUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?.trim().to_owned();
            match name.as_str() {
                "name" => form.name = value,
                "description" => form.description = value,
                "owner_name" => form.owner_name = value,
                "email" => form.email = value,
                "phone_number" => form.phone_number = value,
                "opening_time" => form.opening_time = value,
                "closing_time" => form.closing_time = value,
                "address" => form.address = value,
                "city" => form.city = value,
                "state" => form.state = value,
                "zip_code" => form.zip_code = value,
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok((form, avatar))
    }

    /// Converts a validated form into domain details.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if an opening time does not parse.
    pub fn into_details(self) -> Result<RestaurantDetails, AppError> {
        let opening_time = parse_time_field("opening_time", &self.opening_time)?;
        let closing_time = parse_time_field("closing_time", &self.closing_time)?;

        Ok(RestaurantDetails {
            name: self.name,
            description: self.description,
            owner_name: self.owner_name,
            email: self.email,
            phone_number: self.phone_number,
            opening_time,
            closing_time,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        })
    }
}

fn parse_time_field(field: &str, value: &str) -> Result<chrono::NaiveTime, AppError> {
    parse_clock_time(value).ok_or_else(|| {
        let mut details = serde_json::Map::new();
        details.insert(field.to_string(), json!(["must be a time in HH:MM format"]));
        AppError::bad_request("Validation failed", details.into())
    })
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::bad_request(
        "Invalid multipart body",
        json!({ "reason": e.body_text(), "status": e.status().as_u16() }),
    )
}

/// Restaurant as returned by the API and stored in the read cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub owner_name: String,
    pub email: String,
    pub phone_number: String,
    pub opening_time: String,
    pub closing_time: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub avatar_url: String,
    pub rating: f64,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(r: Restaurant) -> Self {
        let d = r.details;
        Self {
            id: r.id,
            owner_id: r.owner_id,
            name: d.name,
            description: d.description,
            owner_name: d.owner_name,
            email: d.email,
            phone_number: d.phone_number,
            opening_time: d.opening_time.format("%H:%M").to_string(),
            closing_time: d.closing_time.format("%H:%M").to_string(),
            address: d.address,
            city: d.city,
            state: d.state,
            zip_code: d.zip_code,
            avatar_url: r.avatar_url,
            rating: r.rating,
            review_count: r.review_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
