//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST delegate to the engine. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here is async, and all I/O (database, payment gateway,
//! e-mail) is awaited.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use bytes::Bytes;
use coursepay_engine::{
    notifications::EmailTransport,
    order_objects::WebhookOutcome,
    traits::PaymentGateway,
    AccountApi,
    OrderFlowApi,
    OrderFlowError,
    PaymentGatewayDatabase,
};
use log::*;
use razorpay_tools::WEBHOOK_SIGNATURE_HEADER;

use crate::{
    auth::JwtClaims,
    data_objects::{
        CreateOrderParams,
        CreateOrderResponse,
        PurchasesResponse,
        VerifyPaymentParams,
        VerifyPaymentResponse,
        WebhookResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl PaymentGatewayDatabase, PaymentGateway, EmailTransport);
/// Starts checkout for a course.
///
/// Responds with `201 Created`, the new pending order and the details the browser needs to open the Razorpay checkout
/// widget. Users that already own the course get a `409 Conflict`.
pub async fn create_order<B, G, E>(
    claims: JwtClaims,
    body: web::Json<CreateOrderParams>,
    api: web::Data<OrderFlowApi<B, G, E>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
    E: EmailTransport,
{
    let params = body.into_inner();
    debug!("💻️ POST create order for course '{}' by {}", params.course_id, claims.sub);
    let created = api.create_order(&claims.sub, &params.course_id).await?;
    Ok(HttpResponse::Created().json(CreateOrderResponse::from(created)))
}

route!(verify_payment => Post "/orders/verify" impl PaymentGatewayDatabase, PaymentGateway, EmailTransport);
/// Verifies the payment details that the checkout widget returned to the browser.
///
/// Replays of an already verified payment succeed with `alreadyVerified: true`.
pub async fn verify_payment<B, G, E>(
    claims: JwtClaims,
    body: web::Json<VerifyPaymentParams>,
    api: web::Data<OrderFlowApi<B, G, E>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
    E: EmailTransport,
{
    let params = body.into_inner();
    debug!("💻️ POST verify payment for {} by {}", params.razorpay_order_id, claims.sub);
    let verified = api.verify_payment(&claims.sub, params.into()).await?;
    Ok(HttpResponse::Ok().json(VerifyPaymentResponse::from(verified)))
}

route!(my_orders => Get "/orders/mine" impl PaymentGatewayDatabase);
pub async fn my_orders<B: PaymentGatewayDatabase>(
    claims: JwtClaims,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET purchases for {}", claims.sub);
    let purchases = api.purchases_for_user(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(PurchasesResponse::from(purchases)))
}

//----------------------------------------------   Webhooks  --------------------------------------------------
route!(razorpay_webhook => Post "/razorpay" impl PaymentGatewayDatabase, PaymentGateway, EmailTransport);
/// Receives server-to-server notifications from Razorpay.
///
/// The signature in the `X-Razorpay-Signature` header covers the raw request body, so the body is taken as bytes and
/// only decoded once the signature has been checked. Every correctly signed notification is acknowledged with a 200,
/// whether or not it changed anything, so that Razorpay stops redelivering it.
pub async fn razorpay_webhook<B, G, E>(
    req: HttpRequest,
    body: Bytes,
    api: web::Data<OrderFlowApi<B, G, E>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    G: PaymentGateway,
    E: EmailTransport,
{
    trace!("💻️ Received Razorpay webhook ({} bytes)", body.len());
    let signature = req
        .headers()
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            warn!("💻️ Razorpay webhook received without a signature header");
            OrderFlowError::InvalidRequest("Missing webhook signature".into())
        })?;
    let outcome = api.process_webhook(&body, signature).await?;
    let response = match outcome {
        WebhookOutcome::Applied(order) => WebhookResponse {
            success: true,
            processed: true,
            message: format!("Order {} marked as {}", order.gateway_order_id, order.status),
        },
        WebhookOutcome::NotProcessed(reason) => {
            WebhookResponse { success: true, processed: false, message: reason.to_string() }
        },
    };
    Ok(HttpResponse::Ok().json(response))
}
