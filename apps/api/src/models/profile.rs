use serde::{Deserialize, Deserializer, Serialize};

/// One input on the intake form.
#[derive(Debug, Clone, Copy)]
pub struct IntakeField {
    pub label: &'static str,
    pub name: &'static str,
    pub input_type: &'static str,
}

/// Intake form layout, in display order.
pub const INTAKE_FIELDS: &[IntakeField] = &[
    IntakeField { label: "Name", name: "name", input_type: "text" },
    IntakeField { label: "Age", name: "age", input_type: "number" },
    IntakeField { label: "Gender", name: "gender", input_type: "text" },
    IntakeField { label: "Height (cm)", name: "height", input_type: "number" },
    IntakeField { label: "Weight (kg)", name: "weight", input_type: "number" },
    IntakeField { label: "Goal", name: "goal", input_type: "text" },
    IntakeField { label: "Fitness Level", name: "level", input_type: "text" },
    IntakeField { label: "Workout Location", name: "location", input_type: "text" },
    IntakeField { label: "Diet Type", name: "diet", input_type: "text" },
];

/// The user's fitness profile as submitted by the intake form.
///
/// Form posts carry every value as a string; JSON callers may send
/// `age`, `height` and `weight` as numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub age: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub height: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub weight: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub goal: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub level: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub location: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub diet: String,
}

impl UserProfile {
    /// Value for a form field by its `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "age" => &self.age,
            "gender" => &self.gender,
            "height" => &self.height,
            "weight" => &self.weight,
            "goal" => &self.goal,
            "level" => &self.level,
            "location" => &self.location,
            "diet" => &self.diet,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Checks that every field is filled in and that the numeric fields are positive numbers.
    pub fn validate(&self) -> Result<(), String> {
        for field in INTAKE_FIELDS {
            let value = self.get(field.name).unwrap_or_default();
            if value.trim().is_empty() {
                return Err(format!("{} is required", field.label));
            }
            if field.input_type == "number" {
                match value.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() && n > 0.0 => {}
                    _ => return Err(format!("{} must be a positive number", field.label)),
                }
            }
        }
        Ok(())
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
        Flag(bool),
        Null(()),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s.trim().to_string(),
        Scalar::Number(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
        Scalar::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_profile() -> UserProfile {
        serde_json::from_value(json!({
            "name": "Asha",
            "age": "29",
            "gender": "female",
            "height": "165",
            "weight": "58",
            "goal": "build strength",
            "level": "beginner",
            "location": "home",
            "diet": "vegetarian"
        }))
        .unwrap()
    }

    #[test]
    fn test_complete_profile_validates() {
        assert!(complete_profile().validate().is_ok());
    }

    #[test]
    fn test_numbers_accepted_from_json() {
        let profile: UserProfile = serde_json::from_value(json!({
            "name": "Ravi", "age": 34, "gender": "male", "height": 178.5, "weight": 82,
            "goal": "fat loss", "level": "intermediate", "location": "gym", "diet": "non-veg"
        }))
        .unwrap();
        assert_eq!(profile.age, "34");
        assert_eq!(profile.height, "178.5");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_missing_field_names_label() {
        let mut profile = complete_profile();
        profile.location = "  ".to_string();
        assert_eq!(profile.validate().unwrap_err(), "Workout Location is required");
    }

    #[test]
    fn test_absent_field_defaults_to_empty() {
        let profile: UserProfile = serde_json::from_value(json!({"name": "Asha"})).unwrap();
        assert_eq!(profile.validate().unwrap_err(), "Age is required");
    }

    #[test]
    fn test_non_numeric_age_rejected() {
        let mut profile = complete_profile();
        profile.age = "twenty".to_string();
        assert_eq!(profile.validate().unwrap_err(), "Age must be a positive number");
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut profile = complete_profile();
        profile.weight = "-3".to_string();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_values_are_trimmed() {
        let profile: UserProfile =
            serde_json::from_value(json!({"goal": "  run a 10k  "})).unwrap();
        assert_eq!(profile.goal, "run a 10k");
    }

    #[test]
    fn test_intake_fields_cover_profile() {
        let profile = complete_profile();
        assert_eq!(INTAKE_FIELDS.len(), 9);
        for field in INTAKE_FIELDS {
            assert!(profile.get(field.name).is_some(), "{}", field.name);
        }
    }
}
