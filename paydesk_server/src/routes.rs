//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module
//! neat and tidy 🙏
//!
//! Since each worker thread processes its requests sequentially, handlers must never block the
//! current thread. Database and upstream calls are all async, so handlers stay thin: extract
//! the typed payload, call the engine API, map the result.
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use fx_feed::FxFeedApi;
use log::*;
use paydesk_engine::{
    db_types::{NewCurrency, NewOrder, NewPaymentType, NewReturnType, NewUser},
    order_objects::{CoordinatorOrderQuery, HistoryQuery, SentOrderQuery},
    AuditApi,
    CatalogApi,
    OrderFlowApi,
    ReportApi,
    SqliteDatabase,
    UserApi,
};

use crate::{
    data_objects::{
        EditOrderParams,
        JsonResponse,
        LoginRequest,
        PayOrderParams,
        RegisterUserRequest,
        ReturnOrderParams,
        SendOrderParams,
        UserProfile,
    },
    errors::ServerError,
    helpers::{hash_password, verify_password},
};

type OrderApi = web::Data<OrderFlowApi<SqliteDatabase>>;
type Catalogs = web::Data<CatalogApi<SqliteDatabase>>;
type Users = web::Data<UserApi<SqliteDatabase>>;
type Audit = web::Data<AuditApi<SqliteDatabase>>;
type Reports = web::Data<ReportApi<SqliteDatabase>>;

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
#[post("/auth/register")]
pub async fn register(body: web::Json<RegisterUserRequest>, api: Users) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received registration request for {}", req.email);
    let password_hash = hash_password(&req.password)?;
    let user = api
        .register_user(&NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email.trim().to_lowercase(),
            password_hash,
            role: req.role,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

#[post("/auth/login")]
pub async fn login(body: web::Json<LoginRequest>, api: Users) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    trace!("💻️ Received login request for {}", req.email);
    // Same response for a missing user and a wrong password; no probing which emails exist.
    let user = api
        .fetch_user_by_email(req.email.trim().to_lowercase().as_str())
        .await?
        .ok_or_else(|| ServerError::AuthenticationError("Invalid email or password".to_string()))?;
    if !verify_password(&req.password, &user.password_hash) {
        debug!("💻️ Failed login attempt for user #{}", user.id);
        return Err(ServerError::AuthenticationError("Invalid email or password".to_string()));
    }
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

//----------------------------------------------  Catalogs  ----------------------------------------------------
#[get("/catalogs/currencies")]
pub async fn currencies(api: Catalogs) -> Result<HttpResponse, ServerError> {
    let rows = api.currencies().await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/catalogs/currencies")]
pub async fn add_currency(body: web::Json<NewCurrency>, api: Catalogs) -> Result<HttpResponse, ServerError> {
    let row = api.add_currency(&body.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

#[put("/catalogs/currencies/{id}")]
pub async fn update_currency(
    path: web::Path<i64>,
    body: web::Json<NewCurrency>,
    api: Catalogs,
) -> Result<HttpResponse, ServerError> {
    let row = api.update_currency(path.into_inner(), &body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/catalogs/currencies/{id}")]
pub async fn delete_currency(path: web::Path<i64>, api: Catalogs) -> Result<HttpResponse, ServerError> {
    api.delete_currency(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Currency deleted")))
}

#[get("/catalogs/payment-types")]
pub async fn payment_types(api: Catalogs) -> Result<HttpResponse, ServerError> {
    let rows = api.payment_types().await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/catalogs/payment-types")]
pub async fn add_payment_type(body: web::Json<NewPaymentType>, api: Catalogs) -> Result<HttpResponse, ServerError> {
    let row = api.add_payment_type(&body.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

#[put("/catalogs/payment-types/{id}")]
pub async fn update_payment_type(
    path: web::Path<i64>,
    body: web::Json<NewPaymentType>,
    api: Catalogs,
) -> Result<HttpResponse, ServerError> {
    let row = api.update_payment_type(path.into_inner(), &body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/catalogs/payment-types/{id}")]
pub async fn delete_payment_type(path: web::Path<i64>, api: Catalogs) -> Result<HttpResponse, ServerError> {
    api.delete_payment_type(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Payment type deleted")))
}

#[get("/catalogs/return-types")]
pub async fn return_types(api: Catalogs) -> Result<HttpResponse, ServerError> {
    let rows = api.return_types().await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/catalogs/return-types")]
pub async fn add_return_type(body: web::Json<NewReturnType>, api: Catalogs) -> Result<HttpResponse, ServerError> {
    let row = api.add_return_type(&body.into_inner()).await?;
    Ok(HttpResponse::Created().json(row))
}

#[put("/catalogs/return-types/{id}")]
pub async fn update_return_type(
    path: web::Path<i64>,
    body: web::Json<NewReturnType>,
    api: Catalogs,
) -> Result<HttpResponse, ServerError> {
    let row = api.update_return_type(path.into_inner(), &body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

#[delete("/catalogs/return-types/{id}")]
pub async fn delete_return_type(path: web::Path<i64>, api: Catalogs) -> Result<HttpResponse, ServerError> {
    api.delete_return_type(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Return type deleted")))
}

//----------------------------------------------  Exchange  ----------------------------------------------------
#[post("/exchange/update")]
pub async fn update_exchange_rates(
    feed: web::Data<FxFeedApi>,
    api: Catalogs,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received exchange-rate refresh request");
    let sheet = feed.fetch_rates().await?;
    let updated = api.apply_rate_sheet(&sheet.rates).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Exchange rates updated for {updated} currencies"))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
#[post("/orders")]
pub async fn create_order(body: web::Json<NewOrder>, api: OrderApi) -> Result<HttpResponse, ServerError> {
    let order = api.create_order(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

#[get("/orders/by-coordinator/{id}")]
pub async fn orders_for_coordinator(
    path: web::Path<i64>,
    query: web::Query<CoordinatorOrderQuery>,
    api: OrderApi,
) -> Result<HttpResponse, ServerError> {
    let rows = api.orders_for_coordinator(path.into_inner(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/orders/sent")]
pub async fn sent_orders(query: web::Query<SentOrderQuery>, api: OrderApi) -> Result<HttpResponse, ServerError> {
    let rows = api.sent_orders(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/orders/history")]
pub async fn order_history(query: web::Query<HistoryQuery>, api: OrderApi) -> Result<HttpResponse, ServerError> {
    let rows = api.order_history(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/orders/{id}")]
pub async fn order_detail(path: web::Path<i64>, api: OrderApi) -> Result<HttpResponse, ServerError> {
    let order = api.fetch_order(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/orders/{id}/send")]
pub async fn send_order(
    path: web::Path<i64>,
    body: web::Json<SendOrderParams>,
    api: OrderApi,
) -> Result<HttpResponse, ServerError> {
    let order = api.send_order(path.into_inner(), body.actor_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/orders/{id}/return")]
pub async fn return_order(
    path: web::Path<i64>,
    body: web::Json<ReturnOrderParams>,
    api: OrderApi,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    let order = api.return_order(path.into_inner(), params.analyst_id, params.reason.as_deref()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/orders/{id}/pay")]
pub async fn pay_order(
    path: web::Path<i64>,
    body: web::Json<PayOrderParams>,
    api: OrderApi,
) -> Result<HttpResponse, ServerError> {
    let order = api.pay_order(path.into_inner(), body.analyst_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[put("/orders/{id}")]
pub async fn edit_order(
    path: web::Path<i64>,
    body: web::Json<EditOrderParams>,
    api: OrderApi,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    let order = api.edit_order(path.into_inner(), params.coordinator_id, &params.update).await?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Audit  ----------------------------------------------------
#[get("/audit-log")]
pub async fn audit_log(api: Audit) -> Result<HttpResponse, ServerError> {
    let entries = api.list_entries().await?;
    Ok(HttpResponse::Ok().json(entries))
}

//----------------------------------------------  Reports  ----------------------------------------------------
#[get("/reports/summary")]
pub async fn report_summary(api: Reports) -> Result<HttpResponse, ServerError> {
    let summary = api.summary().await?;
    Ok(HttpResponse::Ok().json(summary))
}
