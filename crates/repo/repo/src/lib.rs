pub mod error;
pub mod repository;
pub mod testing;

pub use error::RepoError;
pub use repository::CaseRepository;
