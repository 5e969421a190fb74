//! Classification and reporting for EV charging site maintenance tracking.
//!
//! Rows of the tracking sheet (columns A..R) are filtered on construction
//! status, classified into [`types::ClassifiedSite`] values against an
//! explicit evaluation date, then folded into a [`types::SummaryView`].
pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod region;
pub mod reports;
pub mod terminals;
pub mod text;
pub mod types;
pub mod util;

pub use error::{AppError, Result};
