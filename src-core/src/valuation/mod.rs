pub(crate) mod valuation_calculator;
pub(crate) mod valuation_errors;
pub(crate) mod valuation_model;
pub(crate) mod valuation_repository;
pub(crate) mod valuation_service;
pub(crate) mod valuation_traits;


pub use valuation_calculator::calculate_valuation_series;
pub use valuation_errors::ValuationError;
pub use valuation_model::{DailyValuationDB, ValuationPoint};
pub use valuation_repository::ValuationRepository;
pub use valuation_service::ValuationService;
pub use valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
