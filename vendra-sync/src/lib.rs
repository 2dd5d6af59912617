//! Periodic marketplace sync jobs.
//!
//! Each job walks every seller account under management, pulls the relevant
//! marketplace feed through [`vendra_client::WbClient`] and upserts the rows
//! on their natural keys. A failing account is logged and skipped so one bad
//! token never starves the rest; a failing database write aborts the cycle.

pub mod cards;
pub mod jobs;
pub mod orders;
pub mod stocks;

#[cfg(test)]
mod testutil;
