//! Feature names, display categories and value validation.
//!
//! The backend returns the expected feature names in model order
//! (`mean_radius`, `mean_texture`, ..., `worst_fractal_dimension`). The
//! names carry their own grouping: `*_error` features are standard errors,
//! `worst_*` features are the largest observed values, and everything else
//! is treated as a mean value.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Display group for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    MeanValues,
    StandardError,
    WorstValues,
}

impl FeatureCategory {
    /// All categories in display order.
    pub const ALL: [FeatureCategory; 3] = [
        FeatureCategory::MeanValues,
        FeatureCategory::StandardError,
        FeatureCategory::WorstValues,
    ];

    /// Classify a feature name. `"error"` wins over `"worst"`.
    pub fn of(name: &str) -> Self {
        if name.contains("error") {
            FeatureCategory::StandardError
        } else if name.contains("worst") {
            FeatureCategory::WorstValues
        } else {
            FeatureCategory::MeanValues
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FeatureCategory::MeanValues => "Mean Values",
            FeatureCategory::StandardError => "Standard Error",
            FeatureCategory::WorstValues => "Worst Values",
        }
    }
}

/// Feature names partitioned by category, input order kept within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedFeatures {
    pub mean_values: Vec<String>,
    pub standard_error: Vec<String>,
    pub worst_values: Vec<String>,
}

impl CategorizedFeatures {
    pub fn get(&self, category: FeatureCategory) -> &[String] {
        match category {
            FeatureCategory::MeanValues => &self.mean_values,
            FeatureCategory::StandardError => &self.standard_error,
            FeatureCategory::WorstValues => &self.worst_values,
        }
    }

    fn get_mut(&mut self, category: FeatureCategory) -> &mut Vec<String> {
        match category {
            FeatureCategory::MeanValues => &mut self.mean_values,
            FeatureCategory::StandardError => &mut self.standard_error,
            FeatureCategory::WorstValues => &mut self.worst_values,
        }
    }

    pub fn len(&self) -> usize {
        self.mean_values.len() + self.standard_error.len() + self.worst_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty groups in display order.
    pub fn groups(&self) -> impl Iterator<Item = (FeatureCategory, &[String])> {
        FeatureCategory::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, names)| !names.is_empty())
    }
}

/// Partition feature names into the three display categories.
pub fn categorize<S: AsRef<str>>(features: &[S]) -> CategorizedFeatures {
    let mut out = CategorizedFeatures::default();
    for name in features {
        let name = name.as_ref();
        out.get_mut(FeatureCategory::of(name)).push(name.to_string());
    }
    out
}

/// Human label for a feature name: `worst_concave_points` and
/// `worst concave points` both become `Worst Concave Points`.
///
/// Underscores become spaces, then every alphanumeric character that starts
/// a word is upper-cased.
pub fn feature_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if word_start && c.is_alphanumeric() {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        word_start = !c.is_alphanumeric();
    }
    label
}

// ── Validation ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    NotANumber,
}

/// A rejected form entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub feature: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self.kind {
            FieldErrorKind::Required => "This field is required",
            FieldErrorKind::NotANumber => "Enter a finite number",
        }
    }
}

/// Parse one raw entry. Surrounding whitespace is ignored; `NaN` and
/// infinities are rejected even though `f64::from_str` accepts them.
pub fn parse_feature_value(raw: &str) -> Result<f64, FieldErrorKind> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldErrorKind::Required);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FieldErrorKind::NotANumber),
    }
}

/// Coerce every expected feature to a number, collecting all field errors
/// in feature order. Entries for names outside `features` are ignored.
pub fn coerce_values(
    features: &[String],
    values: &HashMap<String, String>,
) -> Result<BTreeMap<String, f64>, Vec<FieldError>> {
    let mut numeric = BTreeMap::new();
    let mut errors = Vec::new();

    for name in features {
        let raw = values.get(name).map(String::as_str).unwrap_or("");
        match parse_feature_value(raw) {
            Ok(v) => {
                numeric.insert(name.clone(), v);
            }
            Err(kind) => errors.push(FieldError { feature: name.clone(), kind }),
        }
    }

    if errors.is_empty() {
        Ok(numeric)
    } else {
        Err(errors)
    }
}
