/// Data source tag for manually entered price observations
pub const DATA_SOURCE_MANUAL: &str = "MANUAL";

/// Data source tag for observations ingested from an external price table
pub const DATA_SOURCE_IMPORT: &str = "IMPORT";
