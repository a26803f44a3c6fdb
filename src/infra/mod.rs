pub mod import;
pub mod print;
