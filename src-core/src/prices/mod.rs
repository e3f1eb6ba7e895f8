pub(crate) mod prices_constants;
pub(crate) mod prices_errors;
pub(crate) mod prices_model;
pub(crate) mod prices_repository;
pub(crate) mod prices_service;
pub(crate) mod prices_traits;

pub use prices_constants::*;
pub use prices_errors::PriceError;
pub use prices_model::{DataSource, PriceQuote, PriceQuoteDB, PriceSeries, PriceUpdate};
pub use prices_repository::PriceRepository;
pub use prices_service::PriceService;
pub use prices_traits::{PriceRepositoryTrait, PriceServiceTrait};
