use serde::{Deserialize, Serialize};

/// One row of the symptom catalog. Identity is the row index within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CatalogRecord {
    pub symptom: String,
    pub possible_condition: String,
    pub recommended_action: String,
}

impl CatalogRecord {
    #[cfg(test)]
    pub fn new(
        symptom: impl Into<String>,
        possible_condition: impl Into<String>,
        recommended_action: impl Into<String>,
    ) -> Self {
        Self {
            symptom: symptom.into(),
            possible_condition: possible_condition.into(),
            recommended_action: recommended_action.into(),
        }
    }

    /// Three-field markdown block shown to the user on a catalog hit.
    pub fn to_markdown(&self) -> String {
        format!(
            "**Symptom:** {}\n\n**Possible Condition:** {}\n\n**Recommended Action:** {}",
            self.symptom, self.possible_condition, self.recommended_action
        )
    }
}
