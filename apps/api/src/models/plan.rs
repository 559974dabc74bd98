use serde::{Deserialize, Serialize};

/// Canonical plan shape. Every model response is normalized into this before it is
/// stored, rendered, spoken or downloaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPlan {
    pub workout_plan: Vec<WorkoutDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_plan: Option<DietPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietPlan {
    pub meals: Vec<Meal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal_time: String,
    pub options: Vec<String>,
}

impl NormalizedPlan {
    pub fn has_workouts(&self) -> bool {
        !self.workout_plan.is_empty()
    }

    /// Meals of the diet section, empty when there is none.
    pub fn meals(&self) -> &[Meal] {
        self.diet_plan.as_ref().map(|d| d.meals.as_slice()).unwrap_or(&[])
    }

    pub fn notes(&self) -> Option<&str> {
        self.diet_plan.as_ref().and_then(|d| d.notes.as_deref())
    }

    /// A plan is worth showing when it has at least one workout day or one meal.
    pub fn is_empty(&self) -> bool {
        !self.has_workouts() && self.meals().is_empty()
    }
}
