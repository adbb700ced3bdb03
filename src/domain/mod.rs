pub mod models;
pub mod release;
