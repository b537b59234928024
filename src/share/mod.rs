pub mod access;
pub mod handlers;
pub mod models;
pub mod store;

pub use models::{AccessReport, AccessSummary, DeviceType, ShareLink, SharedPlanView};
pub use store::{ShareError, ShareStore};
