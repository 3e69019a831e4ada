//! Helpers for classifying database errors.

/// Unique constraint guarding one restaurant per owner.
pub const RESTAURANT_OWNER_KEY: &str = "restaurants_owner_id_key";
/// Unique constraint guarding one review per user per restaurant.
pub const REVIEW_USER_KEY: &str = "reviews_restaurant_user_key";

/// Returns true if `e` is a unique violation on the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}
