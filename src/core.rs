pub mod calendar;
pub mod prices;
pub mod ranges;
pub mod report;
