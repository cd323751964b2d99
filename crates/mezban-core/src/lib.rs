//! # mezban-core: Pure Business Logic for Mezban POS
//!
//! This crate is the **heart** of Mezban POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Mezban POS Architecture                       │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                     UI Shell (out of tree)                  │   │
//! │  │    Catalog UI ──► Sale UI ──► Reports UI ──► Receipt UI     │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │ named operations                   │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ mezban-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────────┐ ┌───────────────┐  │   │
//! │  │  │  types  │ │  money  │ │ validation │ │    receipt    │  │   │
//! │  │  │ Product │ │  Money  │ │   rules    │ │   Document    │  │   │
//! │  │  │  Sale   │ │ Rounding│ │   checks   │ │  pagination   │  │   │
//! │  │  └─────────┘ └─────────┘ └────────────┘ └───────────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  mezban-db (Storage Layer)                  │   │
//! │  │        SQLite queries, migrations, repositories,            │   │
//! │  │        whole-store snapshots                                │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Settings, Sale, Transaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`analytics`] - Pure derivations over the aggregated sale history
//! - [`receipt`] - Fixed-width receipt document generator
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mezban_core::Money` instead of
// `use mezban_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency tag used when a store has never saved settings.
///
/// Matches the seed row the schema inserts on first startup.
pub const DEFAULT_CURRENCY: &str = "PKR";

/// Unit label applied to products created without one.
pub const DEFAULT_UNIT: &str = "item";

/// Maximum line items allowed in a single sale.
///
/// Prevents runaway sales and keeps receipts printable in one sitting.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: f64 = 999.0;
