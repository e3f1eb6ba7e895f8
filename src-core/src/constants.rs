/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for stored market prices
pub const PRICE_DECIMAL_PRECISION: u32 = 2;
