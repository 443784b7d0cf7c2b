pub mod dashboard;
pub mod fields;
pub mod market;
pub mod position;
pub mod transaction;
