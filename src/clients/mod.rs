pub mod fact_writer;
pub mod models;
pub mod table;
