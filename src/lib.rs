pub mod analyzers;
pub mod calendar;
pub mod figure;
pub mod output;
pub mod plots;
pub mod series;
