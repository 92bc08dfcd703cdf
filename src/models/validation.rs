//! Field checks run on request payloads before anything touches the store.

use crate::error::AppError;

/// Collects field errors so a caller sees every problem at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value must be present and not blank.
    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{} is required", field));
        }
        self
    }

    /// For partial updates: absent is fine, blank is not.
    pub fn not_blank(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.required(field, v);
        }
        self
    }

    pub fn present<T>(&mut self, field: &str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.errors.push(format!("{} is required", field));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            let valid = v.split_once('@').is_some_and(|(local, domain)| {
                !local.is_empty()
                    && domain
                        .rsplit_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            });
            if !valid {
                self.errors.push(format!("{} must be a valid email address", field));
            }
        }
        self
    }

    /// Absent or blank passes; anything else must be an absolute URL.
    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if url::Url::parse(v).is_err() {
                self.errors.push(format!("{} must be an absolute URL", field));
            }
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if let Some(v) = value {
            if v.is_nan() || v < 0.0 {
                self.errors.push(format!("{} must not be negative", field));
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

/// Trims and drops blank optional text.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims entries, drops blanks and duplicates, keeps first-seen order.
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        let v = v.trim();
        if !v.is_empty() && !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}
