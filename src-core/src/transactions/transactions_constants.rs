/// Transaction type tag for purchases
pub const TRANSACTION_TYPE_BUY: &str = "BUY";

/// Transaction type tag for sales
pub const TRANSACTION_TYPE_SELL: &str = "SELL";

/// Transaction type tag for unsealing inventory
pub const TRANSACTION_TYPE_OPEN: &str = "OPEN";
