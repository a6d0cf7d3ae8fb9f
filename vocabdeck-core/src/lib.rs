pub mod errors;
pub mod filters;
pub mod generate;
pub mod models;
pub mod repo;
pub mod scheduler;
pub mod session;

pub use errors::*;
pub use filters::*;
pub use generate::*;
pub use models::*;
pub use repo::*;
pub use scheduler::*;
pub use session::*;
