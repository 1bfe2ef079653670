//! # PayDesk Engine
//!
//! The PayDesk engine tracks payment orders through their review workflow and keeps the audit
//! trail that makes the workflow trustworthy. This library contains the core logic; it is
//! server-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`] behind the traits in [`mod@traits`]).
//!    SQLite is the supported backend. You should never need to access the database directly;
//!    use the public API instead. The exception is the data types used in the database, which
//!    are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@api`]). Orders, catalogs, actors, the audit trail and
//!    reports each get a thin API struct, generic over the backend traits.
//!
//! The central invariant lives in the order ledger: every state-changing operation writes its
//! audit entry in the same transaction as the state change. A reader can always reconstruct
//! how an order got where it is.
pub mod api;
pub mod db_types;
pub mod order_objects;
pub mod traits;

mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    audit_api::AuditApi,
    catalog_api::CatalogApi,
    order_flow_api::OrderFlowApi,
    report_api::ReportApi,
    report_objects,
    user_api::UserApi,
};
pub use sqlite::SqliteDatabase;
pub use traits::{
    AuditManagement,
    AuthApiError,
    CatalogError,
    CatalogManagement,
    OrderLedger,
    PaymentOrderError,
    Reporting,
    UserManagement,
};
