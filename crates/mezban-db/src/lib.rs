//! # mezban-db: Storage Layer for Mezban POS
//!
//! This crate provides durable storage for the Mezban POS ledger.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Mezban POS Data Flow                          │
//! │                                                                     │
//! │  UI shell operation ("record sale", "get analytics", ...)           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   mezban-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌──────────────────┐    │   │
//! │  │  │   Store    │  │ Repositories │  │    Snapshots     │    │   │
//! │  │  │ (pool.rs)  │  │ product      │  │ export: bytes    │    │   │
//! │  │  │            │◄─│ settings     │  │ import: backup,  │    │   │
//! │  │  │ SqlitePool │  │ sale         │  │  swap, verify,   │    │   │
//! │  │  │ Migrations │  │ analytics    │  │  rollback        │    │   │
//! │  │  └────────────┘  └──────────────┘  └──────────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite file (settings · products · sales · sale_items)             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Exposed to the UI Shell
//!
//! | Operation            | Entry point                                  |
//! |----------------------|----------------------------------------------|
//! | list_products        | [`ProductRepository::list`]                  |
//! | add_product          | [`ProductRepository::add`]                   |
//! | delete_product       | [`ProductRepository::delete`]                |
//! | get_settings         | [`SettingsRepository::get`]                  |
//! | save_settings        | [`SettingsRepository::save`]                 |
//! | record_sale          | [`SaleRepository::record`]                   |
//! | get_transactions     | [`SaleRepository::get_transactions`]         |
//! | delete_transaction   | [`SaleRepository::delete_transaction`]       |
//! | get_analytics        | [`AnalyticsRepository::snapshot`]            |
//! | export_snapshot      | [`snapshot::export_snapshot`]                |
//! | import_snapshot      | [`snapshot::import_snapshot`]                |
//!
//! Receipt rendering stays in `mezban-core` - it consumes a resolved
//! sale and never touches storage.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mezban_db::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("mezban.db")).await?;
//! let products = store.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
pub use snapshot::{export_snapshot, import_snapshot};

// Repository re-exports for convenience
pub use repository::analytics::AnalyticsRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;
