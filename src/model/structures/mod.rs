pub mod convergence;
pub mod matchup;
pub mod position;
pub mod raw_record;
