use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use fx_feed::FxFeedApi;
use paydesk_engine::{AuditApi, CatalogApi, OrderFlowApi, ReportApi, SqliteDatabase, UserApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        add_currency,
        add_payment_type,
        add_return_type,
        audit_log,
        create_order,
        currencies,
        delete_currency,
        delete_payment_type,
        delete_return_type,
        edit_order,
        health,
        login,
        order_detail,
        order_history,
        orders_for_coordinator,
        pay_order,
        payment_types,
        register,
        report_summary,
        return_order,
        return_types,
        send_order,
        sent_orders,
        update_currency,
        update_exchange_rates,
        update_payment_type,
        update_return_type,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    // Sqlite creates a missing database file, but not a missing parent directory, and the
    // default URL keeps the store under data/.
    if let Some(path) = config.database_url.strip_prefix("sqlite://") {
        if let Some(dir) = std::path::Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
    }
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    // Bootstrap the schema once if absent; a no-op on an up-to-date store.
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let feed = FxFeedApi::new(config.fx.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db, feed)?;
    srv.await.map_err(|e| ServerError::BackendError(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    feed: FxFeedApi,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("paydesk::access_log"))
            .configure(|cfg| configure(cfg, db.clone(), feed.clone()))
            .service(health)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Wires the engine APIs and every `/api` route into the app. Shared between the real server
/// and the endpoint tests so both exercise the same surface.
pub fn configure(cfg: &mut web::ServiceConfig, db: SqliteDatabase, feed: FxFeedApi) {
    cfg.app_data(web::Data::new(OrderFlowApi::new(db.clone())))
        .app_data(web::Data::new(CatalogApi::new(db.clone())))
        .app_data(web::Data::new(UserApi::new(db.clone())))
        .app_data(web::Data::new(AuditApi::new(db.clone())))
        .app_data(web::Data::new(ReportApi::new(db)))
        .app_data(web::Data::new(feed))
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| ServerError::InvalidRequestBody(err.to_string()).into()),
        )
        .service(
            web::scope("/api")
                .service(register)
                .service(login)
                .service(currencies)
                .service(add_currency)
                .service(update_currency)
                .service(delete_currency)
                .service(payment_types)
                .service(add_payment_type)
                .service(update_payment_type)
                .service(delete_payment_type)
                .service(return_types)
                .service(add_return_type)
                .service(update_return_type)
                .service(delete_return_type)
                .service(update_exchange_rates)
                .service(create_order)
                .service(orders_for_coordinator)
                // The fixed-path order routes must register ahead of the `{id}` matchers.
                .service(sent_orders)
                .service(order_history)
                .service(send_order)
                .service(return_order)
                .service(pay_order)
                .service(order_detail)
                .service(edit_order)
                .service(audit_log)
                .service(report_summary),
        );
}
