pub mod catalog;
pub mod job_type;

pub use catalog::*;
pub use job_type::*;
