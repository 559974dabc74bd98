//! Shape normalization — turns whatever JSON the model produced into a `NormalizedPlan`.
//!
//! The model is asked for `workout_plan` / `diet_plan`, but in practice answers in several
//! encodings of the same data: arrays of days, objects keyed `week1` or `day1` or by
//! weekday, meals keyed by meal time, `options` vs `items`, bare strings instead of
//! objects, fenced code blocks around the JSON, prose before the JSON, and so on.
//! Every known shape is folded into the canonical model here; anything else is a
//! `PlanParseError`.
//!
//! Key lookups are alias-based and insensitive to case, `_`, `-` and spaces, so
//! `workout_plan`, `workoutPlan` and `Workout Plan` are the same key.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::plan::{DietPlan, Exercise, Meal, NormalizedPlan, WorkoutDay};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanParseError {
    #[error("The plan response was empty.")]
    Empty,

    #[error("Failed to parse plan data: {0}")]
    InvalidJson(String),

    #[error("No plan data found.")]
    NoPlanData,

    #[error("Unrecognized plan shape: expected an object or array, got {0}")]
    UnrecognizedShape(&'static str),
}

const WORKOUT_KEYS: &[&str] = &[
    "workoutplan",
    "workout",
    "workouts",
    "workoutschedule",
    "exerciseplan",
    "trainingplan",
    "days",
];
const DIET_KEYS: &[&str] = &[
    "dietplan",
    "diet",
    "mealplan",
    "meals",
    "nutritionplan",
    "nutrition",
];
const CONTAINER_KEYS: &[&str] = &["plan", "fitnessplan", "data", "result", "response"];

const DAY_LABEL_KEYS: &[&str] = &["day", "dayname", "name", "title"];
const DAY_FOCUS_KEYS: &[&str] = &["focus", "focusarea", "type", "musclegroup", "workouttype"];
const DAY_EXERCISE_KEYS: &[&str] = &["exercises", "workout", "activities", "routine"];
const NESTED_DAY_KEYS: &[&str] = &["days", "schedule"];

const EXERCISE_NAME_KEYS: &[&str] = &["name", "exercise", "exercisename", "activity", "title"];
const SETS_KEYS: &[&str] = &["sets"];
const REPS_KEYS: &[&str] = &["reps", "repetitions"];
const DURATION_KEYS: &[&str] = &["duration", "time"];
const REST_KEYS: &[&str] = &["rest", "resttime", "restperiod", "restbetweensets"];

const MEAL_LIST_KEYS: &[&str] = &["meals", "mealplan", "dailymeals"];
const MEAL_TIME_KEYS: &[&str] = &["mealtime", "meal", "time", "name", "title"];
const MEAL_OPTION_KEYS: &[&str] = &["options", "items", "foods", "food", "suggestions", "menu"];
const OPTION_TEXT_KEYS: &[&str] = &["name", "item", "food", "description", "meal", "dish"];
const NOTES_KEYS: &[&str] = &["notes", "note", "tips"];

const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Parses completion text into JSON.
///
/// Code fences are stripped first. When the text as a whole is not JSON, the span from
/// the first `{` or `[` to the last matching closer is tried, which recovers JSON
/// surrounded by prose.
pub fn parse_completion(text: &str) -> Result<Value, PlanParseError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(PlanParseError::Empty);
    }

    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(err) => json_span(text)
            .and_then(|span| serde_json::from_str(span).ok())
            .ok_or_else(|| PlanParseError::InvalidJson(err.to_string())),
    }
}

/// Parses completion text and normalizes it in one step.
pub fn normalize_completion(text: &str) -> Result<NormalizedPlan, PlanParseError> {
    normalize_plan(&parse_completion(text)?)
}

/// Normalizes any known plan encoding into the canonical model.
pub fn normalize_plan(raw: &Value) -> Result<NormalizedPlan, PlanParseError> {
    let plan = match raw {
        Value::Object(map) => {
            // `{ "error": ..., "raw": "<completion>" }` is what a failed parse leaves behind.
            if let Some(raw_text) = lookup(map, &["raw"]).and_then(Value::as_str) {
                if !has_plan_keys(map) {
                    return normalize_completion(raw_text);
                }
            }
            plan_from_object(unwrap_containers(map))
        }
        Value::Array(items) => match items.first() {
            Some(Value::Object(first))
                if items.len() == 1 && has_plan_keys(first) && !looks_like_day(first) =>
            {
                plan_from_object(unwrap_containers(first))
            }
            _ => NormalizedPlan {
                workout_plan: workout_days(raw),
                diet_plan: None,
            },
        },
        // Double-encoded JSON.
        Value::String(text) => return normalize_completion(text),
        other => return Err(PlanParseError::UnrecognizedShape(kind(other))),
    };

    if plan.is_empty() {
        return Err(PlanParseError::NoPlanData);
    }
    Ok(plan)
}

fn plan_from_object(map: &Map<String, Value>) -> NormalizedPlan {
    let workout_plan = match lookup(map, WORKOUT_KEYS) {
        Some(section) => workout_days(section),
        None => {
            // Days or weeks sitting directly on the root.
            let scheduled: Map<String, Value> = map
                .iter()
                .filter(|(k, _)| is_day_key(k) || is_week_key(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            workout_days_from_map(&scheduled)
        }
    };

    let mut diet_plan = lookup(map, DIET_KEYS).and_then(diet_plan);
    if let Some(diet) = diet_plan.as_mut() {
        if diet.notes.is_none() {
            diet.notes = lookup(map, NOTES_KEYS).and_then(notes_text);
        }
    }

    NormalizedPlan {
        workout_plan,
        diet_plan,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Workout section
// ────────────────────────────────────────────────────────────────────────────

fn workout_days(section: &Value) -> Vec<WorkoutDay> {
    match section {
        Value::Array(items) => {
            let mut days = Vec::with_capacity(items.len());
            for item in items {
                if let Some(day) = workout_day(item, None, days.len()) {
                    days.push(day);
                }
            }
            days
        }
        Value::Object(map) => match lookup(map, NESTED_DAY_KEYS) {
            Some(nested) => workout_days(nested),
            None => workout_days_from_map(map),
        },
        _ => Vec::new(),
    }
}

fn workout_days_from_map(map: &Map<String, Value>) -> Vec<WorkoutDay> {
    // Next to `day1`/`week1`/`monday` keys, anything else (`notes`, `goal`) is not a day.
    let has_day_keys = map.keys().any(|k| is_day_key(k) || is_week_key(k));
    let mut days = Vec::new();
    for (key, value) in ordered_entries(map) {
        if has_day_keys && !is_day_key(key) && !is_week_key(key) {
            continue;
        }
        if is_week_key(key) {
            days.extend(workout_days(value));
        } else if let Some(day) = workout_day(value, Some(key), days.len()) {
            days.push(day);
        }
    }
    days
}

fn workout_day(value: &Value, key: Option<&str>, index: usize) -> Option<WorkoutDay> {
    let fallback_label = || key.map(humanize_key).unwrap_or_else(|| format!("Day {}", index + 1));

    match value {
        Value::Object(map) => {
            let day = first_text(map, DAY_LABEL_KEYS)
                .map(|label| match label.parse::<u32>() {
                    Ok(n) => format!("Day {n}"),
                    Err(_) => label,
                })
                .unwrap_or_else(fallback_label);
            let exercises = lookup(map, DAY_EXERCISE_KEYS)
                .map(exercises)
                .unwrap_or_default();
            Some(WorkoutDay {
                day,
                focus: first_text(map, DAY_FOCUS_KEYS),
                exercises,
            })
        }
        Value::Array(_) => Some(WorkoutDay {
            day: fallback_label(),
            focus: None,
            exercises: exercises(value),
        }),
        // `"day7": "Rest"`
        Value::String(s) if !s.trim().is_empty() => Some(WorkoutDay {
            day: fallback_label(),
            focus: Some(s.trim().to_string()),
            exercises: Vec::new(),
        }),
        _ => None,
    }
}

fn exercises(value: &Value) -> Vec<Exercise> {
    match value {
        Value::Array(items) => items.iter().filter_map(|item| exercise(item, None)).collect(),
        Value::Object(map) if lookup(map, EXERCISE_NAME_KEYS).is_some() => {
            exercise(value, None).into_iter().collect()
        }
        // Keyed by exercise name.
        Value::Object(map) => map
            .iter()
            .filter_map(|(name, detail)| exercise(detail, Some(name.as_str())))
            .collect(),
        Value::String(_) => exercise(value, None).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn exercise(value: &Value, key: Option<&str>) -> Option<Exercise> {
    match value {
        Value::Object(map) => {
            let name = first_text(map, EXERCISE_NAME_KEYS).or_else(|| key.map(str::to_string))?;
            Some(Exercise {
                name,
                sets: first_text(map, SETS_KEYS),
                reps: first_text(map, REPS_KEYS),
                duration: first_text(map, DURATION_KEYS),
                rest: first_text(map, REST_KEYS),
            })
        }
        Value::String(s) => {
            let text = s.trim();
            if text.is_empty() {
                return None;
            }
            // `"Squats": "3x12"` keeps the prescription next to the name.
            Some(match key {
                Some(name) => Exercise {
                    name: name.to_string(),
                    reps: Some(text.to_string()),
                    ..Exercise::default()
                },
                None => Exercise {
                    name: text.to_string(),
                    ..Exercise::default()
                },
            })
        }
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Diet section
// ────────────────────────────────────────────────────────────────────────────

fn diet_plan(section: &Value) -> Option<DietPlan> {
    let plan = match section {
        Value::Array(items) => DietPlan {
            meals: meals_from_array(items),
            notes: None,
        },
        Value::Object(map) => {
            let notes = lookup(map, NOTES_KEYS).and_then(notes_text);
            let meals = match lookup(map, MEAL_LIST_KEYS) {
                Some(Value::Array(items)) => meals_from_array(items),
                Some(Value::Object(keyed)) => meals_from_map(keyed),
                _ => meals_from_map(map),
            };
            DietPlan { meals, notes }
        }
        Value::String(s) if !s.trim().is_empty() => DietPlan {
            meals: Vec::new(),
            notes: Some(s.trim().to_string()),
        },
        _ => return None,
    };

    if plan.meals.is_empty() && plan.notes.is_none() {
        None
    } else {
        Some(plan)
    }
}

fn meals_from_array(items: &[Value]) -> Vec<Meal> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| meal(item, None, i))
        .collect()
}

fn meals_from_map(map: &Map<String, Value>) -> Vec<Meal> {
    map.iter()
        .filter(|(key, value)| {
            !is_alias(key, NOTES_KEYS)
                && matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_))
        })
        .enumerate()
        .filter_map(|(i, (key, value))| meal(value, Some(key.as_str()), i))
        .collect()
}

fn meal(value: &Value, key: Option<&str>, index: usize) -> Option<Meal> {
    let fallback_time = || key.map(humanize_key).unwrap_or_else(|| format!("Meal {}", index + 1));

    match value {
        Value::Object(map) => {
            let meal_time = first_text(map, MEAL_TIME_KEYS).unwrap_or_else(fallback_time);
            let options = match lookup(map, MEAL_OPTION_KEYS) {
                Some(options) => option_list(options),
                None => first_text(map, &["description"]).into_iter().collect(),
            };
            Some(Meal { meal_time, options })
        }
        Value::Array(_) | Value::String(_) => {
            let options = option_list(value);
            if options.is_empty() {
                return None;
            }
            Some(Meal {
                meal_time: fallback_time(),
                options,
            })
        }
        _ => None,
    }
}

fn option_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(option_text).collect(),
        other => option_text(other).into_iter().collect(),
    }
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let text = first_text(map, OPTION_TEXT_KEYS)?;
            Some(match first_text(map, &["quantity", "portion", "amount"]) {
                Some(quantity) => format!("{text} ({quantity})"),
                None => text,
            })
        }
        other => scalar_text(other),
    }
}

fn notes_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        other => scalar_text(other),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Key and value helpers
// ────────────────────────────────────────────────────────────────────────────

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn is_alias(key: &str, aliases: &[&str]) -> bool {
    let key = normalize_key(key);
    aliases.iter().any(|alias| *alias == key)
}

/// First value whose key matches an alias, honoring alias priority.
fn lookup<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        map.iter()
            .find(|(key, value)| normalize_key(key) == *alias && !value.is_null())
            .map(|(_, value)| value)
    })
}

fn first_text(map: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        map.iter()
            .filter(|(key, _)| normalize_key(key) == *alias)
            .find_map(|(_, value)| scalar_text(value))
    })
}

/// Display text for scalars. Arrays of scalars are joined with ", ".
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|v| !v.is_array() && !v.is_object())
                .filter_map(scalar_text)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn has_plan_keys(map: &Map<String, Value>) -> bool {
    lookup(map, WORKOUT_KEYS).is_some()
        || lookup(map, DIET_KEYS).is_some()
        || map.keys().any(|k| is_day_key(k) || is_week_key(k))
}

fn looks_like_day(map: &Map<String, Value>) -> bool {
    lookup(map, DAY_EXERCISE_KEYS).is_some() || lookup(map, DAY_FOCUS_KEYS).is_some()
}

/// Descends through wrapper objects such as `{ "plan": { ... } }`.
fn unwrap_containers(mut map: &Map<String, Value>) -> &Map<String, Value> {
    while !has_plan_keys(map) {
        match lookup(map, CONTAINER_KEYS) {
            Some(Value::Object(inner)) => map = inner,
            _ => break,
        }
    }
    map
}

fn is_week_key(key: &str) -> bool {
    normalize_key(key)
        .strip_prefix("week")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

fn is_day_key(key: &str) -> bool {
    let key = normalize_key(key);
    if WEEKDAYS.contains(&key.as_str()) {
        return true;
    }
    key.strip_prefix("day")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

fn numeric_suffix(key: &str) -> Option<u32> {
    let digits: String = key
        .trim()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// `dayN`/`weekN` keys in numeric order (`day10` after `day9`); anything else stays
/// at its document position.
fn ordered_entries(map: &Map<String, Value>) -> Vec<(&str, &Value)> {
    let is_numbered = |k: &str| (is_day_key(k) || is_week_key(k)) && numeric_suffix(k).is_some();
    let mut entries: Vec<(&str, &Value)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let slots: Vec<usize> = (0..entries.len()).filter(|&i| is_numbered(entries[i].0)).collect();
    let mut numbered: Vec<(&str, &Value)> = slots.iter().map(|&i| entries[i]).collect();
    numbered.sort_by_key(|(k, _)| (is_day_key(k), numeric_suffix(k)));
    for (slot, entry) in slots.into_iter().zip(numbered) {
        entries[slot] = entry;
    }
    entries
}

/// `day1` → `Day 1`, `mid_morning_snack` → `Mid Morning Snack`.
fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.trim().chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if let Some(p) = prev {
            let boundary = (p.is_ascii_alphabetic() && c.is_ascii_digit())
                || (p.is_ascii_lowercase() && c.is_ascii_uppercase());
            if boundary {
                spaced.push(' ');
            }
        }
        spaced.push(c);
        prev = Some(c);
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day_names(plan: &NormalizedPlan) -> Vec<&str> {
        plan.workout_plan.iter().map(|d| d.day.as_str()).collect()
    }

    #[test]
    fn test_canonical_shape() {
        let raw = json!({
            "workout_plan": [
                {
                    "day": "Monday",
                    "focus": "Upper body",
                    "exercises": [
                        {"name": "Push-ups", "sets": 3, "reps": "12", "rest": "60s"},
                        {"name": "Plank", "duration": "45 seconds"}
                    ]
                },
                {"day": "Tuesday", "focus": "Cardio", "exercises": [{"name": "Jog", "duration": "20 min"}]}
            ],
            "diet_plan": {
                "meals": [
                    {"meal_time": "Breakfast", "options": ["Oats with banana", "Greek yogurt"]},
                    {"meal_time": "Dinner", "options": ["Grilled paneer"]}
                ],
                "notes": "Drink 3L of water daily."
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Monday", "Tuesday"]);
        let push_ups = &plan.workout_plan[0].exercises[0];
        assert_eq!(push_ups.name, "Push-ups");
        assert_eq!(push_ups.sets.as_deref(), Some("3"));
        assert_eq!(push_ups.reps.as_deref(), Some("12"));
        assert_eq!(push_ups.rest.as_deref(), Some("60s"));
        assert_eq!(plan.workout_plan[0].exercises[1].duration.as_deref(), Some("45 seconds"));
        assert_eq!(plan.meals().len(), 2);
        assert_eq!(plan.meals()[0].options, vec!["Oats with banana", "Greek yogurt"]);
        assert_eq!(plan.notes(), Some("Drink 3L of water daily."));
    }

    #[test]
    fn test_week_keyed_workouts_are_flattened_in_order() {
        let raw = json!({
            "workout_plan": {
                "week2": [{"day": "Week 2 Monday", "exercises": []}],
                "week1": [
                    {"day": "Week 1 Monday", "exercises": ["Squats"]},
                    {"day": "Week 1 Wednesday", "exercises": ["Lunges"]}
                ]
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(
            day_names(&plan),
            vec!["Week 1 Monday", "Week 1 Wednesday", "Week 2 Monday"]
        );
        assert_eq!(plan.workout_plan[0].exercises[0].name, "Squats");
    }

    #[test]
    fn test_week_containing_day_keys() {
        let raw = json!({
            "workout_plan": {
                "week1": {
                    "day1": {"focus": "Legs", "exercises": [{"exercise": "Squat", "reps": 10}]},
                    "day2": {"focus": "Rest"}
                }
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Day 1", "Day 2"]);
        assert_eq!(plan.workout_plan[0].exercises[0].name, "Squat");
        assert_eq!(plan.workout_plan[1].focus.as_deref(), Some("Rest"));
    }

    #[test]
    fn test_day_keyed_workouts_sort_numerically() {
        let raw = json!({
            "workout_plan": {
                "day10": {"focus": "Mobility"},
                "day2": {"focus": "Pull"},
                "day1": {"focus": "Push"}
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Day 1", "Day 2", "Day 10"]);
        assert_eq!(plan.workout_plan[2].focus.as_deref(), Some("Mobility"));
    }

    #[test]
    fn test_day_keys_sort_next_to_non_day_keys() {
        let raw = json!({
            "workout_plan": {
                "day2": {"focus": "Pull"},
                "day1": {"focus": "Push"},
                "notes": "Warm up first"
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Day 1", "Day 2"]);
        assert_eq!(plan.workout_plan[0].focus.as_deref(), Some("Push"));
        assert_eq!(plan.workout_plan[1].focus.as_deref(), Some("Pull"));
    }

    #[test]
    fn test_numbered_keys_sort_in_place() {
        let map = json!({"goal": "x", "day3": 3, "monday": 0, "day1": 1});
        let Value::Object(map) = map else {
            unreachable!()
        };

        let keys: Vec<&str> = ordered_entries(&map).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["goal", "day1", "monday", "day3"]);
    }

    #[test]
    fn test_weekday_keys_keep_document_order() {
        let raw = json!({
            "workoutPlan": {
                "Monday": ["Burpees", "Mountain climbers"],
                "Wednesday": {"focus": "Core", "exercises": ["Plank"]},
                "Sunday": "Rest"
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Monday", "Wednesday", "Sunday"]);
        assert_eq!(plan.workout_plan[0].exercises.len(), 2);
        assert_eq!(plan.workout_plan[2].focus.as_deref(), Some("Rest"));
        assert!(plan.workout_plan[2].exercises.is_empty());
    }

    #[test]
    fn test_root_level_day_keys() {
        let raw = json!({
            "day1": {"focus": "Full body", "exercises": ["Deadlift"]},
            "day2": {"focus": "Cardio", "exercises": ["Cycling"]},
            "diet_plan": {"meals": [{"meal_time": "Lunch", "options": ["Rice and dal"]}]}
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Day 1", "Day 2"]);
        assert_eq!(plan.meals()[0].meal_time, "Lunch");
    }

    #[test]
    fn test_bare_array_of_days() {
        let raw = json!([
            {"day": 1, "focus": "Chest", "exercises": [{"name": "Bench press", "sets": "4"}]},
            {"day": 2, "focus": "Back", "exercises": [{"name": "Rows", "sets": "4"}]}
        ]);

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Day 1", "Day 2"]);
        assert!(plan.diet_plan.is_none());
    }

    #[test]
    fn test_single_element_array_wrapper() {
        let raw = json!([{
            "workout_plan": [{"day": "Monday", "exercises": ["Walk"]}],
            "diet_plan": {"meals": [{"meal": "Snack", "items": ["Almonds"]}]}
        }]);

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Monday"]);
        assert_eq!(plan.meals()[0].options, vec!["Almonds"]);
    }

    #[test]
    fn test_days_without_labels_are_numbered() {
        let raw = json!({"workout_plan": [{"focus": "A"}, {"focus": "B"}]});
        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Day 1", "Day 2"]);
    }

    #[test]
    fn test_nested_days_field() {
        let raw = json!({"workout_plan": {"days": [{"day": "Monday", "exercises": []}]}});
        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Monday"]);
    }

    #[test]
    fn test_items_instead_of_options() {
        let raw = json!({
            "diet_plan": {
                "meals": [
                    {"meal_time": "Breakfast", "items": ["Poha", "Tea"]},
                    {"meal_time": "Lunch", "items": [{"name": "Chapati", "quantity": "2"}, {"food": "Salad"}]}
                ]
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        assert!(plan.workout_plan.is_empty());
        assert_eq!(plan.meals()[0].options, vec!["Poha", "Tea"]);
        assert_eq!(plan.meals()[1].options, vec!["Chapati (2)", "Salad"]);
    }

    #[test]
    fn test_meals_keyed_by_meal_time() {
        let raw = json!({
            "diet_plan": {
                "breakfast": ["Eggs", "Toast"],
                "mid_morning_snack": "Apple",
                "dinner": {"options": ["Soup"]},
                "total_calories": 2200,
                "notes": ["Avoid sugar.", "Sleep 8 hours."]
            }
        });

        let plan = normalize_plan(&raw).unwrap();
        let times: Vec<&str> = plan.meals().iter().map(|m| m.meal_time.as_str()).collect();
        assert_eq!(times, vec!["Breakfast", "Mid Morning Snack", "Dinner"]);
        assert_eq!(plan.meals()[1].options, vec!["Apple"]);
        assert_eq!(plan.notes(), Some("Avoid sugar. Sleep 8 hours."));
    }

    #[test]
    fn test_meals_object_under_meals_key() {
        let raw = json!({"diet_plan": {"meals": {"lunch": ["Quinoa bowl"]}}});
        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(plan.meals()[0].meal_time, "Lunch");
    }

    #[test]
    fn test_diet_as_bare_array_with_root_notes() {
        let raw = json!({
            "meals": [{"meal_time": "Breakfast", "options": ["Smoothie"]}],
            "notes": "Eat slowly."
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(plan.meals()[0].options, vec!["Smoothie"]);
        assert_eq!(plan.notes(), Some("Eat slowly."));
    }

    #[test]
    fn test_container_wrapper_is_unwrapped() {
        let raw = json!({"plan": {"fitness_plan": {"workout_plan": [{"day": "Friday"}]}}});
        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Friday"]);
    }

    #[test]
    fn test_error_envelope_with_fenced_raw() {
        let raw = json!({
            "error": "JSON parse error",
            "raw": "```json\n{\"workout_plan\": [{\"day\": \"Monday\", \"exercises\": [\"Squats\"]}]}\n```"
        });

        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Monday"]);
    }

    #[test]
    fn test_exercises_keyed_by_name() {
        let raw = json!({
            "workout_plan": [{"day": "Monday", "exercises": {"Squats": "3x12", "Rows": {"sets": 3}}}]
        });

        let plan = normalize_plan(&raw).unwrap();
        let exercises = &plan.workout_plan[0].exercises;
        assert_eq!(exercises[0].name, "Squats");
        assert_eq!(exercises[0].reps.as_deref(), Some("3x12"));
        assert_eq!(exercises[1].name, "Rows");
        assert_eq!(exercises[1].sets.as_deref(), Some("3"));
    }

    #[test]
    fn test_parse_completion_strips_fences() {
        let value = parse_completion("```json\n{\"workout_plan\": []}\n```").unwrap();
        assert_eq!(value, json!({"workout_plan": []}));
    }

    #[test]
    fn test_parse_completion_recovers_json_from_prose() {
        let text = "Here is your plan:\n```json\n{\"diet_plan\": {\"meals\": []}}\n```\nStay consistent!";
        let value = parse_completion(text).unwrap();
        assert_eq!(value, json!({"diet_plan": {"meals": []}}));
    }

    #[test]
    fn test_parse_completion_rejects_prose() {
        let err = parse_completion("Sorry, I cannot help with that.").unwrap_err();
        assert!(matches!(err, PlanParseError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_completion_empty() {
        assert_eq!(parse_completion("  ```json\n```  ").unwrap_err(), PlanParseError::Empty);
    }

    #[test]
    fn test_double_encoded_json_string() {
        let raw = Value::String("{\"workout_plan\": [{\"day\": \"Monday\"}]}".to_string());
        let plan = normalize_plan(&raw).unwrap();
        assert_eq!(day_names(&plan), vec!["Monday"]);
    }

    #[test]
    fn test_object_without_plan_keys_is_no_plan_data() {
        let raw = json!({"message": "Here you go", "error": "quota"});
        assert_eq!(normalize_plan(&raw).unwrap_err(), PlanParseError::NoPlanData);
    }

    #[test]
    fn test_empty_sections_are_no_plan_data() {
        let raw = json!({"workout_plan": [], "diet_plan": {"meals": []}});
        assert_eq!(normalize_plan(&raw).unwrap_err(), PlanParseError::NoPlanData);
    }

    #[test]
    fn test_scalar_root_is_unrecognized() {
        assert_eq!(
            normalize_plan(&json!(42)).unwrap_err(),
            PlanParseError::UnrecognizedShape("number")
        );
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("day1"), "Day 1");
        assert_eq!(humanize_key("day_3"), "Day 3");
        assert_eq!(humanize_key("eveningSnack"), "Evening Snack");
        assert_eq!(humanize_key("Day 4"), "Day 4");
    }

    #[test]
    fn test_key_aliases_ignore_case_and_separators() {
        assert!(is_alias("Workout Plan", WORKOUT_KEYS));
        assert!(is_alias("diet-plan", DIET_KEYS));
        assert!(is_week_key("Week_2"));
        assert!(is_day_key("DAY 5"));
        assert!(is_day_key("thursday"));
        assert!(!is_day_key("day"));
    }
}
