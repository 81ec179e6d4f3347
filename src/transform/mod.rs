//! Revenue transformations.
//!
//! # Example
//!
//! ```
//! use revenue_forecast::transform::{inv_log_revenue, log_revenue};
//!
//! let y = log_revenue(1500.0);
//! assert!((inv_log_revenue(y) - 1500.0).abs() < 1e-9);
//! ```

pub mod log;

pub use log::{inv_log_revenue, inv_log_series, log_revenue, log_series};
