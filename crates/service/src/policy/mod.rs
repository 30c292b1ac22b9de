//! Policy module: repository seam, storage implementations and the service
//! handlers call into.

pub mod repository;
pub mod repo;
pub mod service;

pub use repository::PolicyRepository;
pub use service::PolicyService;
