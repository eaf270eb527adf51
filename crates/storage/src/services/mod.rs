pub mod export;
pub mod filter;
pub mod filter_options;
pub mod ranking;
pub mod search;
pub mod sorting;
