//! Read-only queries about a user's purchases.

use std::{collections::HashMap, fmt::Debug};

use log::trace;

use crate::{
    cpe_api::{
        errors::AccountApiError,
        order_objects::{CourseSummary, Purchase},
    },
    db::traits::{CatalogManagement, OrderManagement},
};

pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: OrderManagement + CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// All paid orders for the user with their course details, most recently verified first.
    ///
    /// Courses that have since been removed from the catalog are reported as `None` rather than hiding the purchase.
    pub async fn purchases_for_user(&self, user_id: &str) -> Result<Vec<Purchase>, AccountApiError> {
        let orders = self.db.fetch_paid_orders_for_user(user_id).await?;
        trace!("🔄️ User {user_id} has {} paid orders", orders.len());
        let mut courses = HashMap::<String, Option<CourseSummary>>::new();
        let mut purchases = Vec::with_capacity(orders.len());
        for order in orders {
            if !courses.contains_key(&order.course_id) {
                let course = self.db.fetch_course(&order.course_id).await?.map(CourseSummary::from);
                courses.insert(order.course_id.clone(), course);
            }
            let course = courses.get(&order.course_id).cloned().flatten();
            purchases.push(Purchase { order, course });
        }
        Ok(purchases)
    }
}
