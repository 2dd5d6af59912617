//! Outbound Wildberries seller API client.
//!
//! One [`WbClient`] is built per seller account token. Every endpoint the
//! backend talks to is a variant of [`endpoint::Endpoint`], so request
//! construction is exhaustively checked, and each variant carries the rate
//! budget the marketplace documents for it. The client shapes requests to
//! those budgets but never retries; a failed call is terminal for the
//! current sync cycle.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod throttle;
pub mod types;

pub use client::{Hosts, WbClient};
pub use endpoint::{CardCursor, Endpoint, RateBucket, ReportRequest, ReportType};
pub use error::ClientError;
pub use types::{CardsPage, GoodsPrice, PriceUpdate, WbCard, WbIncome, WbOrder, WbStock};
