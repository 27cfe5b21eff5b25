use super::RequestInfo;
use crate::validation::{
    sanitize_input, sanitize_json, validate_company, validate_email, validate_message, validate_name,
    validate_phone, ValidationReport,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_source() -> String {
    "calculator".to_string()
}

/// Contact form submitted alongside a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub company: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub consent: bool,
    #[serde(default = "default_source")]
    pub source: String,
    /// Calculation the visitor was looking at, passed through untouched.
    #[serde(default)]
    pub roi_data: Option<serde_json::Value>,
}

impl LeadSubmission {
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.errors.extend(validate_name(&self.first_name, "First name"));
        report.errors.extend(validate_name(&self.last_name, "Last name"));
        report.errors.extend(validate_email(&self.email));
        report.errors.extend(validate_phone(self.phone.as_deref()));
        report.errors.extend(validate_company(&self.company));
        report.errors.extend(validate_message(self.message.as_deref()));

        if !self.consent {
            report.error("You must agree to the privacy policy to continue");
        }
        if is_blank(&self.phone) {
            report.warn("Phone number is recommended for faster follow-up");
        }
        if is_blank(&self.message) {
            report.warn("A message helps us better understand your needs");
        }
        report
    }

    /// Copy with every free-text field passed through [`sanitize_input`].
    pub fn sanitized(&self) -> Self {
        Self {
            first_name: sanitize_input(&self.first_name),
            last_name: sanitize_input(&self.last_name),
            email: sanitize_input(&self.email),
            phone: self.phone.as_deref().map(sanitize_input),
            company: sanitize_input(&self.company),
            message: self.message.as_deref().map(sanitize_input),
            consent: self.consent,
            source: sanitize_input(&self.source),
            roi_data: self.roi_data.as_ref().map(sanitize_json),
        }
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, str::is_empty)
}

/// An accepted lead, ready to record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: Uuid,
    pub submission: LeadSubmission,
    pub request: Option<RequestInfo>,
    /// Warnings raised during validation.
    pub warnings: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

impl LeadRecord {
    /// Sanitize a submission, then validate what will be stored. The
    /// report is returned on failure.
    pub fn accept(
        submission: LeadSubmission,
        request: Option<RequestInfo>,
    ) -> Result<Self, ValidationReport> {
        let submission = submission.sanitized();
        let report = submission.validate();
        if !report.is_valid() {
            return Err(report);
        }
        let record = Self {
            id: Uuid::new_v4(),
            submission,
            request,
            warnings: report.warnings,
            submitted_at: Utc::now(),
        };
        log::info!("accepted lead {} from {}", record.id, record.submission.company);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> LeadSubmission {
        serde_json::from_str(
            r#"{
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "company": "  Analytical Engines  ",
                "consent": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_from_json() {
        let lead = submission();
        assert_eq!(lead.source, "calculator");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.roi_data, None);
    }

    #[test]
    fn test_valid_lead_warns_on_missing_optionals() {
        let report = submission().validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_missing_consent() {
        let mut lead = submission();
        lead.consent = false;
        assert_eq!(
            lead.validate().errors,
            vec!["You must agree to the privacy policy to continue"]
        );
    }

    #[test]
    fn test_every_field_reported() {
        let lead = LeadSubmission {
            first_name: String::new(),
            last_name: "X".to_string(),
            email: "not-an-email".to_string(),
            phone: Some("123".to_string()),
            company: String::new(),
            message: Some("m".repeat(1001)),
            consent: false,
            source: default_source(),
            roi_data: None,
        };
        assert_eq!(lead.validate().errors.len(), 7);
    }

    #[test]
    fn test_accept_sanitizes() {
        let mut lead = submission();
        lead.message = Some("<script>steal()</script>Call me".to_string());
        let record = LeadRecord::accept(lead, None).unwrap();
        assert_eq!(record.submission.company, "Analytical Engines");
        assert_eq!(record.submission.message.as_deref(), Some("Call me"));
        assert_eq!(record.warnings.len(), 1);
    }

    #[test]
    fn test_accept_validates_sanitized_values() {
        let mut lead = submission();
        lead.first_name = " A".to_string();
        lead.company = "<>".to_string();
        let report = LeadRecord::accept(lead, None).unwrap_err();
        assert_eq!(
            report.errors,
            vec![
                "First name must be at least 2 characters",
                "Company name is required"
            ]
        );
    }

    #[test]
    fn test_accepted_record_passes_its_own_validation() {
        let mut lead = submission();
        lead.last_name = "  Byron<script>x()</script>  ".to_string();
        let record = LeadRecord::accept(lead, None).unwrap();
        assert_eq!(record.submission.last_name, "Byron");
        assert!(record.submission.validate().is_valid());
    }

    #[test]
    fn test_accept_sanitizes_roi_data() {
        let mut lead = submission();
        lead.roi_data = Some(serde_json::json!({
            "roi": 92,
            "category": "<b>Marketing</b>",
            "notes": ["javascript:alert(1)", " ok "],
            "nested": {"label": "<script>x()</script>Sales"}
        }));
        let record = LeadRecord::accept(lead, None).unwrap();
        assert_eq!(
            record.submission.roi_data,
            Some(serde_json::json!({
                "roi": 92,
                "category": "bMarketing/b",
                "notes": ["alert(1)", "ok"],
                "nested": {"label": "Sales"}
            }))
        );
    }

    #[test]
    fn test_accept_rejects_invalid() {
        let mut lead = submission();
        lead.email = String::new();
        let report = LeadRecord::accept(lead, None).unwrap_err();
        assert_eq!(report.errors, vec!["Email address is required"]);
    }
}
