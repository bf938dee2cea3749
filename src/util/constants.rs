// DomainLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DomainLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DomainLens";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Dataset limits
// =============================================================================

/// Default dataset location, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "data/data.csv";

/// Default field delimiter for the dataset file.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Maximum dataset file size in bytes. The whole table is held in memory.
pub const MAX_DATASET_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

/// Default maximum number of data rows accepted from a dataset.
pub const DEFAULT_MAX_ROWS: usize = 200_000;

/// Smallest user-configurable row cap.
pub const MIN_MAX_ROWS: usize = 1;

/// Hard upper bound on the row cap (prevents configuration mistakes).
pub const ABSOLUTE_MAX_ROWS: usize = 2_000_000;

// =============================================================================
// Schema vocabulary defaults
// =============================================================================

/// Canonical brand codes, in display order.
pub const DEFAULT_BRAND_CODES: &[&str] = &["AFI", "ADG", "RH"];

/// Measure vocabulary, in display order.
pub const DEFAULT_MEASURES: &[&str] = &["Quality", "Accessibility", "Timeliness", "Completeness"];

/// Measure selected when a dataset is first shown and after a reset.
pub const DEFAULT_ACTIVE_MEASURE: &str = "Quality";

/// Built-in moat labels keyed by moat number.
pub const DEFAULT_MOAT_LABELS: &[(&str, &str)] = &[
    ("1", "Supply Chain & Demand Planning"),
    ("2", "Warehouse & Distribution"),
    ("3", "Customer Success"),
];

/// Domain value excluded from every grouped view (case-insensitive).
pub const EXCLUDED_DOMAIN: &str = "Other";

// =============================================================================
// Measure colour ramp
// =============================================================================

/// Lowest and highest measure values; inputs are clamped to this range.
pub const MEASURE_MIN: f64 = 0.0;
pub const MEASURE_MAX: f64 = 100.0;

/// Hue degrees per measure point (0 = red, 100 = green at 120 degrees).
pub const HUE_PER_POINT: f64 = 1.2;

/// Fixed saturation percentage for measure colours.
pub const MEASURE_SATURATION: f64 = 80.0;

/// Lightness ramp: `LIGHTNESS_AT_ZERO - value * LIGHTNESS_PER_POINT`.
pub const LIGHTNESS_AT_ZERO: f64 = 90.0;
pub const LIGHTNESS_PER_POINT: f64 = 0.4;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
