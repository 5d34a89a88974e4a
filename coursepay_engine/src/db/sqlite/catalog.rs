use sqlx::SqliteConnection;

use crate::{
    db::OrderStoreError,
    db_types::{Course, User},
};

pub async fn fetch_course(course_id: &str, conn: &mut SqliteConnection) -> Result<Option<Course>, OrderStoreError> {
    // Drained with fetch_all for the same reason as the order queries
    let courses: Vec<Course> = sqlx::query_as("SELECT id, title, description, category, price FROM courses WHERE id = ?")
        .bind(course_id)
        .fetch_all(conn)
        .await?;
    Ok(courses.into_iter().next())
}

pub async fn fetch_user(user_id: &str, conn: &mut SqliteConnection) -> Result<Option<User>, OrderStoreError> {
    let users: Vec<User> =
        sqlx::query_as("SELECT id, name, email FROM users WHERE id = ?").bind(user_id).fetch_all(conn).await?;
    Ok(users.into_iter().next())
}
