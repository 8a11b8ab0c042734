pub mod ids;
pub mod statement;
pub mod underwriting;
