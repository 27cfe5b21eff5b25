pub mod catalog;
pub mod currency;
pub mod rounding;
pub mod selector;
