// Prompt text for plan generation.

use crate::models::profile::UserProfile;

/// Coach prompt template. Every `{field}` placeholder is replaced by the matching
/// profile value before sending.
pub const PLAN_PROMPT_TEMPLATE: &str = r#"You are an AI fitness coach. Generate a day-wise workout and sample diet plan for:
Name: {name}
Age: {age}
Gender: {gender}
Height: {height}
Weight: {weight}
Goal: {goal}
Fitness Level: {level}
Workout Location: {location}
Diet: {diet}
Output ONLY in JSON format with days, exercises, meals.
Use this structure:
{
  "workout_plan": [
    {
      "day": "Monday",
      "focus": "Upper body strength",
      "exercises": [
        {"name": "Push-ups", "sets": 3, "reps": "12", "rest": "60 seconds"}
      ]
    }
  ],
  "diet_plan": {
    "meals": [
      {"meal_time": "Breakfast", "options": ["Oatmeal with berries"]}
    ],
    "notes": "Hydration and general guidance"
  }
}"#;

/// Interpolates the profile into the coach prompt.
///
/// The template is scanned once, so a value that itself looks like `{field}` is
/// copied verbatim. Braces that do not name a profile field (the JSON example)
/// are left alone.
pub fn build_plan_prompt(profile: &UserProfile) -> String {
    let mut prompt = String::with_capacity(PLAN_PROMPT_TEMPLATE.len() + 128);
    let mut rest = PLAN_PROMPT_TEMPLATE;

    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after
            .find('}')
            .and_then(|close| profile.get(&after[..close]).map(|v| (close, v)));
        match value {
            Some((close, value)) => {
                prompt.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                prompt.push('{');
                rest = after;
            }
        }
    }
    prompt.push_str(rest);
    prompt
}
