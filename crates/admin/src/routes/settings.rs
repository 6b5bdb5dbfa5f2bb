//! Stock settings routes.
//!
//! Settings are validated here and again by the repository; nothing is
//! written unless every field passes.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use stocksense_core::{SettingsError, StockSettings};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

// =============================================================================
// Form
// =============================================================================

/// Raw settings form as submitted.
///
/// Fields are strings so a bad value can be echoed back with an error
/// instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub stock_coverage_days: String,
    pub low_stock_threshold: String,
    pub medium_stock_threshold: String,
    pub reorder_point: String,
    /// Checkbox; present only when ticked.
    pub email_notifications: Option<String>,
}

/// An error attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl SettingsForm {
    /// Pre-fill the form from stored settings.
    #[must_use]
    pub fn from_settings(settings: &StockSettings) -> Self {
        Self {
            stock_coverage_days: settings.stock_coverage_days.to_string(),
            low_stock_threshold: settings.low_stock_threshold.to_string(),
            medium_stock_threshold: settings.medium_stock_threshold.to_string(),
            reorder_point: settings.reorder_point.normalize().to_string(),
            email_notifications: settings.email_notifications.then(|| "on".to_string()),
        }
    }

    /// Whether the notifications checkbox is ticked.
    #[must_use]
    pub fn notifications_enabled(&self) -> bool {
        self.email_notifications.is_some()
    }

    /// Parse and validate into settings.
    ///
    /// # Errors
    ///
    /// Returns every field error: parse failures first, then constraint
    /// violations.
    pub fn parse(&self) -> Result<StockSettings, Vec<FieldError>> {
        let mut errors = Vec::new();

        let coverage = parse_field::<i32>(
            "stock_coverage_days",
            &self.stock_coverage_days,
            &mut errors,
        );
        let low = parse_field::<i32>("low_stock_threshold", &self.low_stock_threshold, &mut errors);
        let medium = parse_field::<i32>(
            "medium_stock_threshold",
            &self.medium_stock_threshold,
            &mut errors,
        );
        let reorder_point =
            parse_field::<Decimal>("reorder_point", &self.reorder_point, &mut errors);

        let (Some(stock_coverage_days), Some(low), Some(medium), Some(reorder_point)) =
            (coverage, low, medium, reorder_point)
        else {
            return Err(errors);
        };

        let settings = StockSettings {
            stock_coverage_days,
            low_stock_threshold: low,
            medium_stock_threshold: medium,
            reorder_point,
            email_notifications: self.notifications_enabled(),
        };

        settings
            .validate()
            .map_err(|violations| violations.iter().map(field_error).collect::<Vec<_>>())?;
        Ok(settings)
    }
}

fn parse_field<T: FromStr>(
    field: &'static str,
    raw: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = raw.trim().parse::<T>().ok();
    if value.is_none() {
        errors.push(FieldError {
            field,
            message: format!("\"{}\" is not a valid number", raw.trim()),
        });
    }
    value
}

fn field_error(violation: &SettingsError) -> FieldError {
    let field = match violation {
        SettingsError::CoverageOutOfRange(_) => "stock_coverage_days",
        SettingsError::LowThresholdNotPositive(_) => "low_stock_threshold",
        SettingsError::ThresholdsInverted { .. } => "medium_stock_threshold",
        SettingsError::ReorderPointOutOfRange(_) => "reorder_point",
    };
    FieldError {
        field,
        message: violation.to_string(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub current_path: String,
    pub shop: String,
    pub form: SettingsForm,
    pub errors: Vec<FieldError>,
    pub success_message: Option<String>,
    pub is_stored: bool,
}

impl SettingsTemplate {
    /// Re-render a rejected form, keeping what the user typed.
    #[must_use]
    pub fn rejected(
        shop: &str,
        form: SettingsForm,
        errors: Vec<FieldError>,
        is_stored: bool,
    ) -> Self {
        Self {
            current_path: "/settings".to_string(),
            shop: shop.to_string(),
            form,
            errors,
            success_message: None,
            is_stored,
        }
    }

    /// Error message for one field, if any.
    #[must_use]
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SettingsQueryParams {
    pub saved: Option<String>,
}

/// Settings page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SettingsQueryParams>,
) -> Result<SettingsTemplate, AppError> {
    let stored = SettingsRepository::new(state.pool()).get(state.shop()).await?;
    let is_stored = stored.is_some();
    let settings = stored.map(|s| s.settings).unwrap_or_default();

    Ok(SettingsTemplate {
        current_path: "/settings".to_string(),
        shop: state.shop().to_string(),
        form: SettingsForm::from_settings(&settings),
        errors: vec![],
        success_message: params.saved.map(|_| "Settings saved.".to_string()),
        is_stored,
    })
}

/// Save settings; re-render with errors if invalid.
#[instrument(skip(state, form))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<Response, AppError> {
    let settings = match form.parse() {
        Ok(settings) => settings,
        Err(errors) => {
            tracing::debug!(count = errors.len(), "Rejected settings form");
            let is_stored = SettingsRepository::new(state.pool())
                .get(state.shop())
                .await?
                .is_some();
            let template = SettingsTemplate::rejected(state.shop(), form, errors, is_stored);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    SettingsRepository::new(state.pool())
        .update(state.shop(), &settings)
        .await?;
    tracing::info!(shop = state.shop(), "Stock settings updated");

    Ok(Redirect::to("/settings?saved=1").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(coverage: &str, low: &str, medium: &str, rp: &str) -> SettingsForm {
        SettingsForm {
            stock_coverage_days: coverage.to_string(),
            low_stock_threshold: low.to_string(),
            medium_stock_threshold: medium.to_string(),
            reorder_point: rp.to_string(),
            email_notifications: None,
        }
    }

    #[test]
    fn test_valid_form_parses() {
        let settings = form("45", "5", "20", "0.25").parse().unwrap();
        assert_eq!(settings.stock_coverage_days, 45);
        assert_eq!(settings.low_stock_threshold, 5);
        assert_eq!(settings.medium_stock_threshold, 20);
        assert_eq!(settings.reorder_point, Decimal::new(25, 2));
        assert!(!settings.email_notifications);
    }

    #[test]
    fn test_non_numeric_fields_reported() {
        let errors = form("abc", "7", "", "0.1").parse().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["stock_coverage_days", "medium_stock_threshold"]);
    }

    #[test]
    fn test_inverted_thresholds_reported_on_medium() {
        let errors = form("30", "14", "7", "0.1").parse().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|e| e.field), Some("medium_stock_threshold"));
    }

    #[test]
    fn test_round_trips_defaults() {
        let defaults = StockSettings::default();
        let form = SettingsForm::from_settings(&defaults);
        assert_eq!(form.reorder_point, "0.1");
        assert!(form.notifications_enabled());
        assert_eq!(form.parse().unwrap(), defaults);
    }

    #[test]
    fn test_rejected_form_keeps_defaults_banner_for_unsaved_shop() {
        let bad = form("30", "14", "7", "0.1");
        let errors = bad.parse().unwrap_err();

        let unsaved =
            SettingsTemplate::rejected("demo.myshopify.com", bad.clone(), errors.clone(), false);
        let html = unsaved.render().unwrap();
        assert!(html.contains("showing defaults"));
        assert!(html.contains("Settings were not saved"));

        let saved = SettingsTemplate::rejected("demo.myshopify.com", bad, errors, true);
        assert!(!saved.render().unwrap().contains("showing defaults"));
    }
}
