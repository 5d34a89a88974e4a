use std::collections::HashMap;

use coursepay_common::Secret;
use coursepay_engine::{
    db_types::Order,
    events::EventProducers,
    order_objects::{VerifiedPayment, WebhookOutcome},
    test_utils::{
        prepare_env::{create_database, random_db_path, run_migrations},
        test_doubles::{FakeGateway, RecordingMailer},
    },
    OrderFlowApi,
    OrderFlowConfig,
    OrderFlowError,
    SqliteDatabase,
};
use cucumber::World;
use log::*;

pub const KEY_SECRET: &str = "rzp_cucumber_secret";
pub const WEBHOOK_SECRET: &str = "whsec_cucumber";

#[derive(Default, Debug, World)]
pub struct PaymentWorld {
    pub system: Option<OrderSystem>,
    /// Orders created in the scenario, by the name the scenario gave them.
    pub orders: HashMap<String, Order>,
    pub last_error: Option<OrderFlowError>,
    pub last_verification: Option<VerifiedPayment>,
    pub last_webhook: Option<WebhookOutcome>,
}

#[derive(Debug)]
pub struct OrderSystem {
    pub db_path: String,
    pub api: OrderFlowApi<SqliteDatabase, FakeGateway, RecordingMailer>,
    pub mailer: RecordingMailer,
}

impl PaymentWorld {
    pub fn system(&self) -> &OrderSystem {
        self.system.as_ref().expect("Order system not initialised")
    }

    pub fn api(&self) -> &OrderFlowApi<SqliteDatabase, FakeGateway, RecordingMailer> {
        &self.system().api
    }

    pub fn order(&self, name: &str) -> &Order {
        self.orders.get(name).unwrap_or_else(|| panic!("Order {name} has not been created"))
    }
}

impl OrderSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        create_database(&url).await;
        run_migrations(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let mailer = RecordingMailer::default();
        let config = OrderFlowConfig {
            currency: "INR".into(),
            key_secret: Secret::new(KEY_SECRET.to_string()),
            webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
        };
        let api = OrderFlowApi::new(db, FakeGateway::default(), mailer.clone(), config, EventProducers::default());
        Self { db_path: url, api, mailer }
    }
}
