//! Service layer providing the listing operations on top of models.
//! - Separates business rules from data access.
//! - Reuses entity definitions and helpers in the `models` crate.
//! - Every multi-step operation runs inside one database transaction.

pub mod errors;
pub mod upload;
pub mod building;
#[cfg(test)]
pub mod test_support;

pub use building::{BuildingDraft, BuildingFilter, BuildingService};
pub use upload::UploadedFile;
