/// CSV export of sweep results.
pub mod export;
