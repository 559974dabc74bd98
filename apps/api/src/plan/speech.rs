//! Read-aloud script for a plan. The client hands `text` to its speech synthesizer
//! together with `lang` and `rate`.

use serde::Serialize;

use crate::models::plan::NormalizedPlan;

pub const SPEECH_LANG: &str = "en-US";
pub const SPEECH_RATE: f32 = 1.0;

#[derive(Debug, Clone, Serialize)]
pub struct SpeechScript {
    pub text: String,
    pub lang: &'static str,
    pub rate: f32,
}

impl SpeechScript {
    pub fn for_plan(plan: &NormalizedPlan) -> Self {
        Self {
            text: speech_script(plan),
            lang: SPEECH_LANG,
            rate: SPEECH_RATE,
        }
    }
}

/// Builds the spoken version of a plan: every workout day with its exercises,
/// then the meals and the diet notes.
pub fn speech_script(plan: &NormalizedPlan) -> String {
    let mut speech = String::new();

    for (idx, day) in plan.workout_plan.iter().enumerate() {
        speech.push_str(&format!("Day {}, {}", idx + 1, day.day));
        match &day.focus {
            Some(focus) => speech.push_str(&format!(", Focus: {focus}. ")),
            None => speech.push_str(". "),
        }
        for exercise in &day.exercises {
            speech.push_str(&format!("{}, ", exercise.name));
            if let Some(sets) = &exercise.sets {
                speech.push_str(&format!("{sets} sets, "));
            }
            if let Some(reps) = &exercise.reps {
                speech.push_str(&format!("{reps} reps, "));
            }
            if let Some(duration) = &exercise.duration {
                speech.push_str(&format!("{duration}, "));
            }
            if let Some(rest) = &exercise.rest {
                speech.push_str(&format!("Rest {rest}. "));
            }
        }
    }

    if !plan.meals().is_empty() {
        speech.push_str("Diet Plan. ");
        for meal in plan.meals() {
            speech.push_str(&format!("{}: ", meal.meal_time));
            for option in &meal.options {
                speech.push_str(&format!("{option}. "));
            }
        }
        if let Some(notes) = plan.notes() {
            speech.push_str(&format!("Notes: {notes}"));
        }
    }

    speech.trim_end().to_string()
}
