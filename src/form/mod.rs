pub mod generation;
pub mod notice;
pub mod requests;
pub mod seed;
pub mod transaction;
pub mod validation;
pub mod verification;
