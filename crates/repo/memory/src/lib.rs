mod repository;

pub use repository::MemoryCaseRepository;
