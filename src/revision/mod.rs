pub mod handlers;
pub mod ledger;
pub mod migration;
pub mod models;

pub use ledger::{LedgerError, RevisionLedger};
pub use migration::{normalize, StoredRevisions, CANONICAL_KEY};
pub use models::{Revision, SignRequest};
