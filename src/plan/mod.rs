pub mod handlers;
pub mod models;
pub mod store;

pub use models::{completion_percentage, PlanData, PlanRecord};
pub use store::{PlanStore, StoreError};
