pub mod rendering;
pub mod scenarios;
