/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Google Sheets API defaults
pub const DEFAULT_SHEETS_API_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_SHEETS_REQUEST_TIMEOUT_SECS: u64 = 30;

// Refresh defaults
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30 * 60;

// Register sheet header names
pub const DEFAULT_UPLOADED_TO_CATALOG_COLUMN: &str = "Uppladdad_i_Catalog";
pub const DEFAULT_UPLOADED_TO_REGISTER_COLUMN: &str = "Uppladdad_i_Register";
pub const DEFAULT_NAME_COLUMN: &str = "Golden_Standard_Name";

// Swedish product sheet
pub const DEFAULT_SE_SHEET_ID: &str = "12p32y4q_UrdaK3SvMutiflX0ukFQ8IJgP8hRaNwOvuE";
pub const DEFAULT_SE_REGISTER_WORKSHEET: u64 = 1645599058;
pub const DEFAULT_SE_CATALOG_WORKSHEET: u64 = 886259106;

// Credential environment variables
pub const SERVICE_ACCOUNT_FILE_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_SHEETS_ACCESS_TOKEN";
pub const API_KEY_ENV: &str = "GOOGLE_SHEETS_API_KEY";
