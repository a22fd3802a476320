// src/config.rs
use crate::constants::{
    APPLICATION_NAME, APPLICATION_VERSION, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_SHEET_NAME,
    EXTRACTOR_MESSAGING_TIMEOUT, MAX_CONTENT_LENGTH_LIMIT, SHEETS_API_BASE_URL,
    SHEETS_REQUEST_TIMEOUT, SPREADSHEETS_SCOPE,
};
use crate::error::AppError;
use crate::types::{SheetTitle, SpreadsheetId, ValidatedUrl, ValidationError};
use clap::Parser;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Spreadsheet URL (e.g., "https://docs.google.com/spreadsheets/d/<id>/edit")
    #[arg(long, env = "PAGE2SHEET_SPREADSHEET_URL")]
    pub spreadsheet_url: Option<String>,

    /// Capture a single page instead of reading tab events from stdin
    #[arg(short, long)]
    pub url: Option<String>,

    /// Sheets API origin (override for proxies and local testing)
    #[arg(long, default_value = SHEETS_API_BASE_URL)]
    pub api_base_url: String,

    /// Deadline for each Sheets API request, in seconds
    #[arg(long, default_value_t = SHEETS_REQUEST_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Deadline for fetching the page itself, in seconds
    #[arg(long, default_value_t = EXTRACTOR_MESSAGING_TIMEOUT.as_secs())]
    pub messaging_timeout_secs: u64,

    /// Maximum number of characters of page text stored per row
    #[arg(long, default_value_t = DEFAULT_MAX_CONTENT_LENGTH)]
    pub max_content_length: usize,

    /// OAuth scope to request (repeatable)
    #[arg(long = "scope")]
    pub scopes: Vec<String>,

    /// Write every capture to one sheet instead of one sheet per domain
    #[arg(long, default_value_t = false)]
    pub no_domain_sheets: bool,

    /// Sheet used when per-domain sheets are disabled
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub default_sheet: String,

    /// Let concurrent captures for the same sheet run without coordination
    #[arg(long, default_value_t = false)]
    pub no_serialize: bool,

    /// Command printing an access token when GOOGLE_OAUTH_ACCESS_TOKEN is unset
    #[arg(long, default_value = "gcloud auth print-access-token")]
    pub token_command: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Capture configuration as loaded, before validation.
///
/// Constructed once and shared read-only by every cycle; each cycle validates
/// it again with [`CaptureConfig::validate`], which never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub spreadsheet_url: String,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub messaging_timeout: Duration,
    pub max_content_length: usize,
    pub oauth_scopes: Vec<String>,
    pub create_domain_sheets: bool,
    pub default_sheet_name: String,
    pub serialize_per_sheet: bool,
    pub user_agent: String,
}

/// Where captured rows go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRouting {
    /// One sheet per hostname of the triggering tab.
    PerDomain,
    /// Every row goes to this sheet.
    Fixed(SheetTitle),
}

/// A configuration that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub spreadsheet_id: SpreadsheetId,
    pub api_base_url: ValidatedUrl,
    pub api_timeout: Duration,
    pub messaging_timeout: Duration,
    pub max_content_length: usize,
    pub oauth_scopes: Vec<String>,
    pub routing: SheetRouting,
    pub serialize_per_sheet: bool,
}

impl CaptureConfig {
    /// Configuration for `spreadsheet_url` with every other setting at its default.
    pub fn for_spreadsheet(spreadsheet_url: impl Into<String>) -> Self {
        Self {
            spreadsheet_url: spreadsheet_url.into(),
            ..Self::default()
        }
    }

    /// Resolves a capture configuration from CLI input and environment.
    pub fn resolve(cli: &CommandLineInput) -> Result<Self, AppError> {
        let spreadsheet_url = cli.spreadsheet_url.clone().ok_or_else(|| {
            AppError::MissingConfiguration(
                "--spreadsheet-url or PAGE2SHEET_SPREADSHEET_URL must be set".to_string(),
            )
        })?;

        let oauth_scopes = if cli.scopes.is_empty() {
            vec![SPREADSHEETS_SCOPE.to_string()]
        } else {
            cli.scopes.clone()
        };

        Ok(CaptureConfig {
            spreadsheet_url,
            api_base_url: cli.api_base_url.clone(),
            api_timeout: Duration::from_secs(cli.timeout_secs),
            messaging_timeout: Duration::from_secs(cli.messaging_timeout_secs),
            max_content_length: cli.max_content_length,
            oauth_scopes,
            create_domain_sheets: !cli.no_domain_sheets,
            default_sheet_name: cli.default_sheet.clone(),
            serialize_per_sheet: !cli.no_serialize,
            ..CaptureConfig::default()
        })
    }

    /// Checks the configuration without side effects.
    pub fn validate(&self) -> Result<ValidatedConfig, ValidationError> {
        if self.spreadsheet_url.trim().is_empty() {
            return Err(ValidationError::EmptyField("spreadsheet_url"));
        }
        let spreadsheet_id = SpreadsheetId::from_url(&self.spreadsheet_url)?;
        let api_base_url = ValidatedUrl::parse(&self.api_base_url)?;

        if self.max_content_length == 0 || self.max_content_length > MAX_CONTENT_LENGTH_LIMIT {
            return Err(ValidationError::OutOfBounds {
                field: "max_content_length",
                value: self.max_content_length as u64,
                min: 1,
                max: MAX_CONTENT_LENGTH_LIMIT as u64,
            });
        }

        if self.api_timeout.is_zero() {
            return Err(ValidationError::EmptyField("api_timeout"));
        }
        if self.messaging_timeout.is_zero() {
            return Err(ValidationError::EmptyField("messaging_timeout"));
        }

        if self.oauth_scopes.iter().all(|scope| scope.trim().is_empty()) {
            return Err(ValidationError::EmptyField("oauth_scopes"));
        }

        let routing = if self.create_domain_sheets {
            SheetRouting::PerDomain
        } else {
            SheetRouting::Fixed(SheetTitle::new(self.default_sheet_name.clone())?)
        };

        Ok(ValidatedConfig {
            spreadsheet_id,
            api_base_url,
            api_timeout: self.api_timeout,
            messaging_timeout: self.messaging_timeout,
            max_content_length: self.max_content_length,
            oauth_scopes: self.oauth_scopes.clone(),
            routing,
            serialize_per_sheet: self.serialize_per_sheet,
        })
    }

    /// Browser URL of the spreadsheet, when the ID can be extracted.
    pub fn spreadsheet_view_url(&self) -> Option<String> {
        SpreadsheetId::from_url(&self.spreadsheet_url).ok().map(|id| {
            format!(
                "https://docs.google.com/spreadsheets/d/{}/edit",
                id.as_str()
            )
        })
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            spreadsheet_url: String::new(),
            api_base_url: SHEETS_API_BASE_URL.to_string(),
            api_timeout: SHEETS_REQUEST_TIMEOUT,
            messaging_timeout: EXTRACTOR_MESSAGING_TIMEOUT,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            oauth_scopes: vec![SPREADSHEETS_SCOPE.to_string()],
            create_domain_sheets: true,
            default_sheet_name: DEFAULT_SHEET_NAME.to_string(),
            serialize_per_sheet: true,
            user_agent: format!("{}/{}", APPLICATION_NAME, APPLICATION_VERSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET_URL: &str =
        "https://docs.google.com/spreadsheets/d/1xZUtDQM0ogdr7YKwwSQ0I3MqU0OWqn48e0DGdNfw2qQ/edit?usp=sharing";

    #[test]
    fn test_defaults_validate() {
        let validated = CaptureConfig::for_spreadsheet(SHEET_URL).validate().unwrap();
        assert_eq!(
            validated.spreadsheet_id.as_str(),
            "1xZUtDQM0ogdr7YKwwSQ0I3MqU0OWqn48e0DGdNfw2qQ"
        );
        assert_eq!(validated.max_content_length, 100);
        assert_eq!(validated.api_timeout, Duration::from_secs(30));
        assert_eq!(validated.routing, SheetRouting::PerDomain);
        assert_eq!(
            validated.oauth_scopes,
            vec!["https://www.googleapis.com/auth/spreadsheets".to_string()]
        );
    }

    #[test]
    fn test_malformed_spreadsheet_url_is_rejected() {
        let config = CaptureConfig::for_spreadsheet("https://docs.google.com/spreadsheets/");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSpreadsheetUrl(_))
        ));

        assert!(CaptureConfig::default().validate().is_err());
    }

    #[test]
    fn test_bounds_are_checked() {
        let mut config = CaptureConfig::for_spreadsheet(SHEET_URL);
        config.max_content_length = 0;
        assert!(config.validate().is_err());

        let mut config = CaptureConfig::for_spreadsheet(SHEET_URL);
        config.api_timeout = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = CaptureConfig::for_spreadsheet(SHEET_URL);
        config.oauth_scopes.clear();
        assert!(config.validate().is_err());

        let mut config = CaptureConfig::for_spreadsheet(SHEET_URL);
        config.api_base_url = "ftp://sheets".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_fixed_sheet_routing() {
        let mut config = CaptureConfig::for_spreadsheet(SHEET_URL);
        config.create_domain_sheets = false;
        let validated = config.validate().unwrap();
        assert_eq!(
            validated.routing,
            SheetRouting::Fixed(SheetTitle::new("ScrapedData").unwrap())
        );

        config.default_sheet_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_is_pure() {
        let config = CaptureConfig::for_spreadsheet(SHEET_URL);
        let before = config.clone();
        let _ = config.validate();
        let _ = config.validate();
        assert_eq!(config, before);
    }

    #[test]
    fn test_resolve_from_cli() {
        let cli = CommandLineInput::parse_from([
            "page2sheet",
            "--spreadsheet-url",
            SHEET_URL,
            "--max-content-length",
            "250",
            "--no-domain-sheets",
            "--scope",
            "https://www.googleapis.com/auth/drive.file",
        ]);
        let config = CaptureConfig::resolve(&cli).unwrap();
        assert_eq!(config.max_content_length, 250);
        assert!(!config.create_domain_sheets);
        assert_eq!(
            config.oauth_scopes,
            vec!["https://www.googleapis.com/auth/drive.file".to_string()]
        );
        assert!(config.serialize_per_sheet);
    }

    #[test]
    fn test_spreadsheet_view_url() {
        let config = CaptureConfig::for_spreadsheet(SHEET_URL);
        assert_eq!(
            config.spreadsheet_view_url().as_deref(),
            Some("https://docs.google.com/spreadsheets/d/1xZUtDQM0ogdr7YKwwSQ0I3MqU0OWqn48e0DGdNfw2qQ/edit")
        );
    }
}
