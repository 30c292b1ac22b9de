pub mod memory;
pub mod seaorm;

pub use memory::InMemoryPolicyRepository;
pub use seaorm::SeaOrmPolicyRepository;
