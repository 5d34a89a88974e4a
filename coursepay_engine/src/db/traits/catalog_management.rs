use crate::{
    db::OrderStoreError,
    db_types::{Course, User},
};

/// Read-only access to courses and users.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_course(&self, course_id: &str) -> Result<Option<Course>, OrderStoreError>;

    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, OrderStoreError>;
}
