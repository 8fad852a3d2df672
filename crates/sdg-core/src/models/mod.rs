pub mod activity;
pub mod benchmark;
pub mod goal;
pub mod impact;
pub mod metric;
pub mod token_count;
