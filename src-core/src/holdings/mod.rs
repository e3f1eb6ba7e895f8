pub(crate) mod holdings_calculator;
pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod lot_store;


pub use holdings_calculator::{AppliedTransaction, HoldingsState};
pub use holdings_errors::HoldingsError;
pub use holdings_model::{ConsumedLot, Lot, LotStatus, ProductHolding};
pub use lot_store::LotStore;
