//! Candidate record collected during intake.

use serde::{Deserialize, Serialize};

/// One of the fields collected before the technical questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    FullName,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    TechStack,
}

impl CandidateField {
    /// All fields, in collection order.
    pub const ALL: [CandidateField; 7] = [
        Self::FullName,
        Self::Email,
        Self::Phone,
        Self::Experience,
        Self::Position,
        Self::Location,
        Self::TechStack,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Experience => "Years of experience",
            Self::Position => "Desired position",
            Self::Location => "Location",
            Self::TechStack => "Tech stack",
        }
    }
}

impl std::fmt::Display for CandidateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FullName => "full_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Experience => "experience",
            Self::Position => "position",
            Self::Location => "location",
            Self::TechStack => "tech_stack",
        };
        write!(f, "{s}")
    }
}

/// Free-text answers keyed by field. A field is `Some` only once the flow has
/// moved past the step that collects it. Values are stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
}

impl CandidateRecord {
    pub fn get(&self, field: CandidateField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub(crate) fn set(&mut self, field: CandidateField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Number of fields collected so far.
    pub fn len(&self) -> usize {
        CandidateField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the collected fields as a markdown list.
    pub fn summary(&self) -> String {
        let mut parts = vec!["# Candidate".to_string()];
        for field in CandidateField::ALL {
            if let Some(value) = self.get(field) {
                parts.push(format!("- **{}:** {}", field.label(), value));
            }
        }
        parts.join("\n")
    }

    fn slot(&self, field: CandidateField) -> &Option<String> {
        match field {
            CandidateField::FullName => &self.full_name,
            CandidateField::Email => &self.email,
            CandidateField::Phone => &self.phone,
            CandidateField::Experience => &self.experience,
            CandidateField::Position => &self.position,
            CandidateField::Location => &self.location,
            CandidateField::TechStack => &self.tech_stack,
        }
    }

    fn slot_mut(&mut self, field: CandidateField) -> &mut Option<String> {
        match field {
            CandidateField::FullName => &mut self.full_name,
            CandidateField::Email => &mut self.email,
            CandidateField::Phone => &mut self.phone,
            CandidateField::Experience => &mut self.experience,
            CandidateField::Position => &mut self.position,
            CandidateField::Location => &mut self.location,
            CandidateField::TechStack => &mut self.tech_stack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let record = CandidateRecord::default();
        assert!(record.is_empty());
        for field in CandidateField::ALL {
            assert!(record.get(field).is_none());
        }
    }

    #[test]
    fn set_and_get_by_field() {
        let mut record = CandidateRecord::default();
        record.set(CandidateField::FullName, "Jane Doe");
        record.set(CandidateField::TechStack, "Python, Go");
        assert_eq!(record.get(CandidateField::FullName), Some("Jane Doe"));
        assert_eq!(record.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.get(CandidateField::TechStack), Some("Python, Go"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let mut record = CandidateRecord::default();
        record.set(CandidateField::FullName, "Jane Doe");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"full_name": "Jane Doe"}));
    }

    #[test]
    fn display_matches_serde() {
        for field in CandidateField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(format!("\"{field}\""), json);
        }
    }

    #[test]
    fn summary_lists_collected_fields_in_order() {
        let mut record = CandidateRecord::default();
        record.set(CandidateField::Email, "jane@x.com");
        record.set(CandidateField::FullName, "Jane Doe");

        let summary = record.summary();
        assert!(summary.contains("- **Full name:** Jane Doe"));
        assert!(summary.contains("- **Email:** jane@x.com"));
        assert!(!summary.contains("Phone"));
        let name_at = summary.find("Full name").unwrap();
        let email_at = summary.find("Email").unwrap();
        assert!(name_at < email_at);
    }
}
