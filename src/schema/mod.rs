//! Customer Attribute Schema
//!
//! The fixed schema the wizard collects: every field the prediction backend
//! expects, its wire key, its control kind, and its step assignment. The
//! table here is the single source of truth — rendering, input coercion, and
//! payload serialization are all driven from it.

use serde::{Deserialize, Serialize};

/// One allowed value for a select control: (wire value, display label)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

const YES_NO: &[SelectOption] = &[opt("Yes", "Yes"), opt("No", "No")];

const YES_NO_NO_INTERNET: &[SelectOption] = &[
    opt("Yes", "Yes"),
    opt("No", "No"),
    opt("No internet service", "No internet service"),
];

/// How a field is edited and coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free numeric input, parsed as f64
    Numeric,
    /// Integer flag (0/1), edited as a select
    Flag(&'static [SelectOption]),
    /// Categorical value from a fixed option set
    Select(&'static [SelectOption]),
}

/// A single input control: wire key, human label, control kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

/// One wizard step: title plus its ordered fields
#[derive(Debug, Clone, Copy)]
pub struct StepSpec {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Number of wizard steps
pub const TOTAL_STEPS: usize = STEPS.len();

/// The full step table. Field order within a step is display order; the
/// union of all steps covers every `CustomerProfile` field exactly once.
pub const STEPS: [StepSpec; 4] = [
    StepSpec {
        title: "Customer Demographics",
        fields: &[
            FieldSpec {
                key: "gender",
                label: "Gender",
                kind: FieldKind::Select(&[opt("Male", "Male"), opt("Female", "Female")]),
            },
            FieldSpec {
                key: "SeniorCitizen",
                label: "Senior Citizen",
                kind: FieldKind::Flag(&[opt("0", "No"), opt("1", "Yes")]),
            },
            FieldSpec {
                key: "Partner",
                label: "Partner",
                kind: FieldKind::Select(YES_NO),
            },
            FieldSpec {
                key: "Dependents",
                label: "Dependents",
                kind: FieldKind::Select(YES_NO),
            },
        ],
    },
    StepSpec {
        title: "Account & Contract",
        fields: &[
            FieldSpec {
                key: "tenure",
                label: "Tenure (Months)",
                kind: FieldKind::Numeric,
            },
            FieldSpec {
                key: "Contract",
                label: "Contract",
                kind: FieldKind::Select(&[
                    opt("Month-to-month", "Month-to-month"),
                    opt("One year", "One year"),
                    opt("Two year", "Two year"),
                ]),
            },
            FieldSpec {
                key: "PaperlessBilling",
                label: "Paperless Billing",
                kind: FieldKind::Select(YES_NO),
            },
            FieldSpec {
                key: "PaymentMethod",
                label: "Payment Method",
                kind: FieldKind::Select(&[
                    opt("Electronic check", "Electronic check"),
                    opt("Mailed check", "Mailed check"),
                    opt("Bank transfer (automatic)", "Bank transfer (automatic)"),
                    opt("Credit card (automatic)", "Credit card (automatic)"),
                ]),
            },
        ],
    },
    StepSpec {
        title: "Service Details",
        fields: &[
            FieldSpec {
                key: "PhoneService",
                label: "Phone Service",
                kind: FieldKind::Select(YES_NO),
            },
            FieldSpec {
                key: "MultipleLines",
                label: "Multiple Lines",
                kind: FieldKind::Select(&[
                    opt("Yes", "Yes"),
                    opt("No", "No"),
                    opt("No phone service", "No phone service"),
                ]),
            },
            FieldSpec {
                key: "InternetService",
                label: "Internet Service",
                kind: FieldKind::Select(&[
                    opt("DSL", "DSL"),
                    opt("Fiber optic", "Fiber optic"),
                    opt("No", "No"),
                ]),
            },
            FieldSpec {
                key: "OnlineSecurity",
                label: "Online Security",
                kind: FieldKind::Select(YES_NO_NO_INTERNET),
            },
            FieldSpec {
                key: "OnlineBackup",
                label: "Online Backup",
                kind: FieldKind::Select(YES_NO_NO_INTERNET),
            },
            FieldSpec {
                key: "DeviceProtection",
                label: "Device Protection",
                kind: FieldKind::Select(YES_NO_NO_INTERNET),
            },
            FieldSpec {
                key: "TechSupport",
                label: "Tech Support",
                kind: FieldKind::Select(YES_NO_NO_INTERNET),
            },
            FieldSpec {
                key: "StreamingTV",
                label: "Streaming TV",
                kind: FieldKind::Select(YES_NO_NO_INTERNET),
            },
            FieldSpec {
                key: "StreamingMovies",
                label: "Streaming Movies",
                kind: FieldKind::Select(YES_NO_NO_INTERNET),
            },
        ],
    },
    StepSpec {
        title: "Charges & Prediction",
        fields: &[
            FieldSpec {
                key: "MonthlyCharges",
                label: "Monthly Charges",
                kind: FieldKind::Numeric,
            },
            FieldSpec {
                key: "TotalCharges",
                label: "Total Charges",
                kind: FieldKind::Numeric,
            },
        ],
    },
];

/// Fields shown on a step (1-based, clamped)
pub fn step_fields(step: usize) -> &'static [FieldSpec] {
    let idx = step.clamp(1, TOTAL_STEPS) - 1;
    STEPS[idx].fields
}

/// Title of a step (1-based, clamped)
pub fn step_title(step: usize) -> &'static str {
    let idx = step.clamp(1, TOTAL_STEPS) - 1;
    STEPS[idx].title
}

/// Look up a field spec anywhere in the table
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    STEPS
        .iter()
        .flat_map(|step| step.fields.iter())
        .find(|f| f.key == key)
}

/// The complete set of customer attributes being edited.
///
/// Serializes to exactly the wire payload the backend expects; serde renames
/// carry the backend's mixed-case key names. Declaration order is wire order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: u8,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: f64,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            gender: "Male".to_string(),
            senior_citizen: 0,
            partner: "No".to_string(),
            dependents: "No".to_string(),
            tenure: 12.0,
            phone_service: "Yes".to_string(),
            multiple_lines: "No".to_string(),
            internet_service: "DSL".to_string(),
            online_security: "No".to_string(),
            online_backup: "No".to_string(),
            device_protection: "No".to_string(),
            tech_support: "No".to_string(),
            streaming_tv: "No".to_string(),
            streaming_movies: "No".to_string(),
            contract: "Month-to-month".to_string(),
            paperless_billing: "Yes".to_string(),
            payment_method: "Electronic check".to_string(),
            monthly_charges: 70.0,
            total_charges: 700.0,
        }
    }
}

/// Coerce raw numeric input. Invalid or empty input becomes NaN — it is
/// never folded to 0, so a bad edit stays visibly bad instead of silently
/// feeding the model a real value.
fn parse_numeric(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

impl CustomerProfile {
    /// Store a raw edit into the named field, coercing per the field's
    /// declared kind. Unknown keys are ignored. Touches nothing else.
    pub fn set_raw(&mut self, key: &str, raw: &str) {
        match key {
            "gender" => self.gender = raw.to_string(),
            "SeniorCitizen" => self.senior_citizen = u8::from(raw.trim() == "1"),
            "Partner" => self.partner = raw.to_string(),
            "Dependents" => self.dependents = raw.to_string(),
            "tenure" => self.tenure = parse_numeric(raw),
            "PhoneService" => self.phone_service = raw.to_string(),
            "MultipleLines" => self.multiple_lines = raw.to_string(),
            "InternetService" => self.internet_service = raw.to_string(),
            "OnlineSecurity" => self.online_security = raw.to_string(),
            "OnlineBackup" => self.online_backup = raw.to_string(),
            "DeviceProtection" => self.device_protection = raw.to_string(),
            "TechSupport" => self.tech_support = raw.to_string(),
            "StreamingTV" => self.streaming_tv = raw.to_string(),
            "StreamingMovies" => self.streaming_movies = raw.to_string(),
            "Contract" => self.contract = raw.to_string(),
            "PaperlessBilling" => self.paperless_billing = raw.to_string(),
            "PaymentMethod" => self.payment_method = raw.to_string(),
            "MonthlyCharges" => self.monthly_charges = parse_numeric(raw),
            "TotalCharges" => self.total_charges = parse_numeric(raw),
            _ => tracing::warn!("ignoring edit to unknown field: {}", key),
        }
    }

    /// Current value of the named field as its wire string, for display and
    /// for matching against select option values. NaN renders as empty.
    pub fn get_raw(&self, key: &str) -> String {
        fn num(v: f64) -> String {
            if v.is_nan() { String::new() } else { format_number(v) }
        }
        match key {
            "gender" => self.gender.clone(),
            "SeniorCitizen" => self.senior_citizen.to_string(),
            "Partner" => self.partner.clone(),
            "Dependents" => self.dependents.clone(),
            "tenure" => num(self.tenure),
            "PhoneService" => self.phone_service.clone(),
            "MultipleLines" => self.multiple_lines.clone(),
            "InternetService" => self.internet_service.clone(),
            "OnlineSecurity" => self.online_security.clone(),
            "OnlineBackup" => self.online_backup.clone(),
            "DeviceProtection" => self.device_protection.clone(),
            "TechSupport" => self.tech_support.clone(),
            "StreamingTV" => self.streaming_tv.clone(),
            "StreamingMovies" => self.streaming_movies.clone(),
            "Contract" => self.contract.clone(),
            "PaperlessBilling" => self.paperless_billing.clone(),
            "PaymentMethod" => self.payment_method.clone(),
            "MonthlyCharges" => num(self.monthly_charges),
            "TotalCharges" => num(self.total_charges),
            _ => String::new(),
        }
    }
}

/// Render a numeric value without a trailing `.0` when it is integral
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
