pub mod plan;
pub mod resume;
