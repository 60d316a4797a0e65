pub mod scale;
pub mod units;
