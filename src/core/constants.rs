/// Application-wide constants to avoid magic values throughout the codebase.
///
/// Storage keys, endpoint paths, timing defaults, and the report geometry all
/// live here so the layout rules can be read in one place.
/// Persisted client-side storage keys
pub mod storage_keys {
    /// Bearer token of the current session
    pub const SESSION_TOKEN: &str = "arbflow.session_token";
    /// Uploaded branding logo (base64 of the encoded image)
    pub const BRANDING_LOGO: &str = "arbflow.branding_logo";
    /// File name of the on-disk key/value store inside the data directory
    pub const STATE_FILE: &str = "state.json";
}

/// Server endpoints, relative to the configured base URL
pub mod endpoints {
    /// Tenant analytics snapshot
    pub const DASHBOARD: &str = "/api/v1/analytics/dashboard";
    /// Credential submission for data-source integrations
    pub const INTEGRATIONS: &str = "/api/v1/integrations/";
    /// Query parameter scoping the dashboard to one property
    pub const PROPERTY_QUERY_PARAM: &str = "property_id";
    /// Default integration provider
    pub const DEFAULT_PROVIDER: &str = "google_analytics";
}

/// HTTP status code constants
pub mod http_status {
    /// HTTP 401 Unauthorized - session invalid or expired
    pub const UNAUTHORIZED: u16 = 401;
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
    /// Maximum accepted timeout in seconds (1 hour)
    pub const MAX_TIMEOUT_SECONDS: u64 = 3600;
    /// How long the manual-sync indicator stays visible
    pub const DEFAULT_SYNC_INDICATOR_MS: u64 = 2000;
}

/// Default configuration values
pub mod defaults {
    /// Local development API server
    pub const API_BASE_URL: &str = "http://localhost:8000";
    /// Config file searched for in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".arbflow.toml";
    /// Data directory name under the platform's local data dir
    pub const DATA_DIR_NAME: &str = "arbflow";
}

/// Export file naming
pub mod export_names {
    /// Fallback when the company name has no usable characters
    pub const FALLBACK_TENANT: &str = "Workspace";
    /// Suffix of the delimited export
    pub const DELIMITED_SUFFIX: &str = "_Data";
    /// Extension of the delimited export
    pub const DELIMITED_EXT: &str = "csv";
    /// Suffix of the report export
    pub const REPORT_SUFFIX: &str = "_Performance_Report";
    /// Extension of the report export
    pub const REPORT_EXT: &str = "pdf";
    /// Header row of the delimited export
    pub const DELIMITED_HEADER: [&str; 4] = ["Source", "Campaign", "Users", "Views"];
    /// Header row of the report table
    pub const REPORT_TABLE_HEADER: [&str; 3] = ["Source", "Users", "Views"];
}

/// Process exit codes of the command-line driver
pub mod exit_codes {
    /// Success, including "nothing to export"
    pub const SUCCESS: i32 = 0;
    /// Any error
    pub const FAILURE: i32 = 1;
    /// The session is missing or was rejected; log in again
    pub const SESSION_EXPIRED: i32 = 2;
}

/// Report page geometry, in millimetres on an A4 portrait page
pub mod report_layout {
    /// Page width
    pub const PAGE_WIDTH: f64 = 210.0;
    /// Page height
    pub const PAGE_HEIGHT: f64 = 297.0;
    /// Left edge of every block
    pub const LEFT_MARGIN: f64 = 14.0;
    /// Top edge of the first block
    pub const TOP_MARGIN: f64 = 10.0;
    /// Gap between the logo block and the title
    pub const BLOCK_MARGIN: f64 = 15.0;
    /// Title baseline when there is no logo
    pub const TITLE_OFFSET_WITHOUT_LOGO: f64 = 20.0;
    /// Distance from the title to the subtitle
    pub const SUBTITLE_GAP: f64 = 8.0;
    /// Distance from the subtitle to the top of the table
    pub const TABLE_GAP: f64 = 10.0;
    /// Height of one table row
    pub const ROW_HEIGHT: f64 = 8.0;
    /// Space kept free at the bottom of each page
    pub const BOTTOM_MARGIN: f64 = 15.0;
    /// Default display width of the logo
    pub const DEFAULT_LOGO_WIDTH: f64 = 40.0;
    /// Tallest logo drawn; taller logos are scaled down with their width
    pub const MAX_LOGO_HEIGHT: f64 = 60.0;
    /// Footer baseline, measured from the top of the page
    pub const FOOTER_BASELINE: f64 = 288.0;
    /// Widths of the source/users/views columns
    pub const COLUMN_WIDTHS: [f64; 3] = [92.0, 45.0, 45.0];
    /// Title font size in points
    pub const TITLE_FONT_SIZE: f64 = 18.0;
    /// Subtitle font size in points
    pub const SUBTITLE_FONT_SIZE: f64 = 11.0;
    /// Table font size in points
    pub const TABLE_FONT_SIZE: f64 = 10.0;
    /// Footer font size in points
    pub const FOOTER_FONT_SIZE: f64 = 8.0;
}
