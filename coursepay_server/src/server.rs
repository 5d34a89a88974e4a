use std::time::Duration;

use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    Error,
    HttpRequest,
    HttpResponse,
    HttpServer,
};
use coursepay_engine::{
    create_database_if_missing,
    events::{EventHandlers, EventHooks, EventProducers, OrderFailedEvent, OrderPaidEvent},
    AccountApi,
    OrderFlowApi,
    OrderFlowConfig,
    SqliteDatabase,
};
use futures::FutureExt;
use log::*;
use razorpay_tools::RazorpayApi;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    data_objects::JsonResponse,
    errors::ServerError,
    integrations::{RazorpayGateway, SendGridMailer},
    routes::{health, CreateOrderRoute, MyOrdersRoute, RazorpayWebhookRoute, VerifyPaymentRoute},
};

pub const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    create_database_if_missing(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let razorpay = RazorpayApi::new(config.razorpay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = RazorpayGateway::new(razorpay);
    let mailer = SendGridMailer::new(config.email.clone())?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, order_audit_hooks());
    let producers = handlers.producers();
    tokio::spawn(handlers.start_handlers());
    let srv = create_server_instance(config, db, gateway, mailer, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
    mailer: SendGridMailer,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let flow_config = OrderFlowConfig {
        currency: config.razorpay.currency.clone(),
        key_secret: config.razorpay.key_secret.clone(),
        webhook_secret: config.razorpay.webhook_secret.clone(),
    };
    let auth_config = config.auth.clone();
    let srv = HttpServer::new(move || {
        let orders_api =
            OrderFlowApi::new(db.clone(), gateway.clone(), mailer.clone(), flow_config.clone(), producers.clone());
        let accounts_api = AccountApi::new(db.clone());
        let verifier = TokenVerifier::new(&auth_config);
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase, RazorpayGateway, SendGridMailer>::new())
            .service(VerifyPaymentRoute::<SqliteDatabase, RazorpayGateway, SendGridMailer>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new());
        let webhook_scope =
            web::scope("/webhook").service(RazorpayWebhookRoute::<SqliteDatabase, RazorpayGateway, SendGridMailer>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cps::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(verifier))
            .service(health)
            .service(api_scope)
            .service(webhook_scope)
            .default_service(web::to(not_found))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("💻️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Malformed JSON bodies get the same error format as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| -> Error {
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(JsonResponse::failure("Route not found"))
}

/// Writes an audit line for every order that reaches a terminal state, whichever path delivered the outcome.
pub fn order_audit_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_paid(|ev: OrderPaidEvent| {
            async move {
                info!(
                    "🪝️ Order #{} [{}] paid: {} {} for course {} by {} (via {:?})",
                    ev.order.id,
                    ev.order.gateway_order_id,
                    ev.order.currency,
                    ev.order.amount,
                    ev.order.course_id,
                    ev.order.user_id,
                    ev.source
                );
            }
            .boxed()
        })
        .on_order_failed(|ev: OrderFailedEvent| {
            async move {
                info!(
                    "🪝️ Order #{} [{}] failed for course {} by {} (via {:?})",
                    ev.order.id, ev.order.gateway_order_id, ev.order.course_id, ev.order.user_id, ev.source
                );
            }
            .boxed()
        });
    hooks
}
