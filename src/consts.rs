// ---------------------------------------------------------------------------
// Application-wide constants
// ---------------------------------------------------------------------------

/// Sentinel shown first in the sheet dropdown meaning "no sheet selected".
pub const NO_VALUE: &str = "----";

/// Extensions (lower-case, no dot) treated as spreadsheets with sheets.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Image extension appended to exported plot file names.
pub const IMAGE_EXTENSION: &str = "png";

/// Number of samples used to draw a fitting function curve.
pub const CURVE_SAMPLES: usize = 200;

/// Rows shown in the data preview table.
pub const PREVIEW_ROWS: usize = 100;

pub const WINDOW_SIZE: [f32; 2] = [1200.0, 800.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [600.0, 400.0];
