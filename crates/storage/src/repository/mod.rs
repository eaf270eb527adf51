pub mod results;

pub use results::ResultsRepository;
