pub mod rate_converter;
