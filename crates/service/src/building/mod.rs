pub mod filter;
pub mod repository;
pub mod service;

pub use filter::BuildingFilter;
pub use repository::{BuildingRepository, SeaOrmBuildingRepository, SeaOrmUserRepository, UserRepository};
pub use service::{BuildingDraft, BuildingService};
