pub mod cell;
pub mod document;
pub mod selection;
pub mod table;
