pub mod calculator;
pub mod projection;
pub mod recommendation;
pub mod result;
pub mod risk;
