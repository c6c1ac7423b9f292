//! Launch-record query engine.
//!
//! Loads a table of rocket launches and answers the two dashboard views:
//! per-site success breakdowns and payload-mass / outcome scatter points.

pub mod color;
pub mod data;
pub mod engine;
pub mod error;
pub mod state;

pub use data::model::{LaunchDataset, LaunchRecord, LaunchSite, Outcome, PayloadRange, SiteSelector};
pub use engine::{Breakdown, LaunchQueryEngine, PayloadPoint, Slice};
pub use error::{DatasetError, QueryError};
