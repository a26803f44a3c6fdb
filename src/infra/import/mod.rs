pub mod csv;
pub mod header;
pub mod xlsx;
