pub mod admission;
pub mod availability;
pub mod catalog;
pub mod overlap;
pub mod unit_query;
