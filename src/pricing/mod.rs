//! Pricing engine for billboard rental contracts.
//!
//! Resolves unit prices from the pricing table (with flipped-size and
//! default-list fallbacks) and turns a contract draft into its totals.
//! Everything except `queries`, `services` and `routes` is pure.

pub mod calculators;
pub mod defaults;
pub mod draft;
pub mod lookup;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod size;
pub mod status;

// Re-export commonly used items
pub use calculators::{calculate_contract_totals, round_money, ContractQuote, ContractSummary};
pub use draft::{ContractDraftState, DraftUpdate};
pub use lookup::{resolve_price, PriceSource, PricingTable, ResolvedPrice};
pub use models::{Billboard, PricingEntry, PricingMode};
pub use routes::router;
pub use services::PricingError;
pub use status::{classify_contract, ContractStatus};
