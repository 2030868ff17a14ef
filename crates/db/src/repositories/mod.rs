//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod model_repo;
pub mod processed_image_repo;
pub mod product_repo;
pub mod profile_repo;
pub mod session_repo;
pub mod user_repo;

pub use model_repo::ModelRepo;
pub use processed_image_repo::ProcessedImageRepo;
pub use product_repo::ProductRepo;
pub use profile_repo::ProfileRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
