//! Collector constants.

/// Date layouts recognised by the unconfigured-field type sniffing.
pub const TUP_DATE_FORMATS_SNIFFED: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];
/// Datetime layouts recognised by the unconfigured-field type sniffing.
pub const TUP_DATETIME_FORMATS_SNIFFED: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Separators split by the default dto-name derivation.
pub const TUP_NAME_SEPARATORS: [char; 3] = ['_', '-', ' '];
