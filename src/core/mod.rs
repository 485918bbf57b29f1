pub mod amount;
pub mod asset;
pub mod currency;
pub mod direction;
