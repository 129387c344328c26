pub mod attempt;
pub mod result;
