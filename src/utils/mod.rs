pub mod blob;
pub mod date;
pub(crate) mod excel_date;
pub mod formatting;
pub mod path;
pub mod table;
pub mod time;
