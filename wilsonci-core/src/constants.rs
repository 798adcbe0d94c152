/// Confidence level used throughout the paper's tables.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Two-sided 95% standard normal quantile, Φ⁻¹(0.975).
///
/// Only used as a reference value in tests and docs; the calculator always
/// derives `z` from the requested confidence level.
pub const Z_95: f64 = 1.959963984540054;

/// Delimiter separating selected options inside a multi-select answer cell.
pub const DEFAULT_MULTI_SELECT_DELIMITER: char = ';';
