//! Core console logic: resource records, table listing, CSV export, the
//! backend client and transaction anomaly detection.

pub mod anomaly;
pub mod backend;
pub mod error;
pub mod export;
pub mod listing;
pub mod models;

pub use anomaly::{AnomalyDetector, AnomalyError, AnomalyInput, AnomalyOutput, DetectorRef};
pub use backend::{AdminBackend, BackendRef, RestBackend};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use listing::{Listing, Page, Searchable};
