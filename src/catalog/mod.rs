pub mod currency_catalog;
pub mod entry;
