//! Server-rendered HTML views: landing page, intake form, plan page, error page.
//!
//! Every value that came from the user or the model goes through `escape`.

use std::fmt::Write;

use crate::models::plan::{Exercise, Meal, NormalizedPlan, WorkoutDay};
use crate::models::profile::INTAKE_FIELDS;

pub const NO_SAVED_PLAN: &str = "No saved plan found.";
pub const NO_PLAN_DATA: &str = "No plan data found.";
pub const PARSE_FAILED: &str = "Failed to parse plan data.";

const STYLE: &str = "body{font-family:system-ui,sans-serif;background:#dbeafe;margin:0;padding:2rem;color:#1f2937}\
main{max-width:64rem;margin:0 auto}\
.card{background:#fff;border-radius:1.5rem;padding:2rem;margin-bottom:2rem;box-shadow:0 10px 25px rgba(0,0,0,.1)}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(18rem,1fr));gap:1.5rem}\
.day,.meal{background:#eff6ff;border-radius:1rem;padding:1.5rem}\
.meal{background:#f0fdf4}\
.exercise{background:#fff;border-left:4px solid #60a5fa;border-radius:.75rem;padding:1rem;margin-top:.75rem}\
.notes{background:#f0fdf4;border-left:4px solid #4ade80;border-radius:.75rem;padding:1rem;margin-bottom:1.5rem}\
.badge{display:inline-block;width:2.5rem;height:2.5rem;line-height:2.5rem;text-align:center;border-radius:50%;background:#3b82f6;color:#fff;font-weight:700;margin-right:.75rem}\
label{display:flex;flex-direction:column;font-weight:600;gap:.25rem}\
input{padding:.5rem .75rem;border:1px solid #d1d5db;border-radius:.5rem}\
.button{display:inline-block;background:#2563eb;color:#fff;border:none;border-radius:9999px;padding:.75rem 1.5rem;text-decoration:none;font-weight:600;cursor:pointer}\
.hero{text-align:center;padding:4rem 1rem}";

/// Landing page feature list: (title, blurb).
const FEATURES: [(&str, &str); 3] = [
    (
        "Instant AI Plan",
        "Get your complete fitness roadmap instantly, no trainer required.",
    ),
    (
        "Custom Diet Tips",
        "Smart meal plans tailored to your goal, from weight loss to muscle gain.",
    ),
    (
        "Audio Plans",
        "Listen to your plan anytime, anywhere. Your coach on the go.",
    ),
];

/// Reads the stored plan aloud with the browser's speech synthesis, using the
/// script and voice settings served by `/api/plan/latest/speech`.
const SPEAK_SCRIPT: &str = "<script>\n\
document.getElementById('speak-plan').addEventListener('click', async () => {\n\
  if (!('speechSynthesis' in window)) { alert('Speech is not supported in this browser.'); return; }\n\
  const res = await fetch('/api/plan/latest/speech');\n\
  if (!res.ok) { alert('No saved plan found.'); return; }\n\
  const script = await res.json();\n\
  const utterance = new SpeechSynthesisUtterance(script.text);\n\
  utterance.lang = script.lang;\n\
  utterance.rate = script.rate;\n\
  window.speechSynthesis.cancel();\n\
  window.speechSynthesis.speak(utterance);\n\
});\n\
</script>\n";

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        escape(title)
    )
}

/// Hero section and feature list leading to the intake form.
pub fn render_landing_page() -> String {
    let mut features = String::new();
    for (title, blurb) in FEATURES {
        let _ = writeln!(
            features,
            "<article class=\"day\"><h3>{title}</h3><p>{blurb}</p></article>"
        );
    }

    let body = format!(
        "<section class=\"card hero\">\n\
         <h1>Transform Your Fitness Journey with AI</h1>\n\
         <p>Get your personalized workout and diet plan powered by \
         <strong>Google Gemini</strong>, customized just for your goals.</p>\n\
         <p><a class=\"button\" href=\"/start\">Get My Plan</a></p>\n\
         </section>\n\
         <section class=\"card\">\n<h2>Why Choose AI Fitness?</h2>\n\
         <div class=\"grid\">\n{features}</div>\n</section>\n"
    );
    page("AI Fitness Plan", &body)
}

/// The nine-field intake form. Submits to `POST /plan`.
pub fn render_intake_form() -> String {
    let mut fields = String::new();
    for field in INTAKE_FIELDS {
        let _ = writeln!(
            fields,
            "<label>{label}<input type=\"{kind}\" name=\"{name}\" placeholder=\"Enter {lower}\" required></label>",
            label = escape(field.label),
            kind = field.input_type,
            name = field.name,
            lower = escape(&field.label.to_lowercase()),
        );
    }

    let body = format!(
        "<form class=\"card\" method=\"post\" action=\"/plan\">\n\
         <h1>Let's Get Started!</h1>\n\
         <p>Fill in your details below to generate your personalized fitness plan.</p>\n\
         <div class=\"grid\">\n{fields}</div>\n\
         <p><button class=\"button\" type=\"submit\">Generate My Plan</button></p>\n\
         <p><small>Your data is only used to generate your fitness plan.</small></p>\n\
         </form>\n"
    );
    page("AI Fitness Plan", &body)
}

/// The plan page. Sections with no content are left out.
pub fn render_plan_page(plan: &NormalizedPlan) -> String {
    let mut body = String::from(
        "<header class=\"card\">\n<h1>Your AI Fitness &amp; Diet Plan</h1>\n\
         <p>Personalized just for you</p>\n\
         <p><button class=\"button\" id=\"speak-plan\" type=\"button\">Speak the Plan</button> \
         <a class=\"button\" href=\"/api/plan/latest/download\">Download the Plan</a></p>\n\
         </header>\n",
    );

    if plan.has_workouts() {
        body.push_str("<section class=\"card\">\n<h2>Workout Plan</h2>\n<div class=\"grid\">\n");
        for (index, day) in plan.workout_plan.iter().enumerate() {
            body.push_str(&day_card(index, day));
        }
        body.push_str("</div>\n</section>\n");
    }

    if plan.diet_plan.is_some() {
        body.push_str("<section class=\"card\">\n<h2>Diet Plan</h2>\n");
        if let Some(notes) = plan.notes() {
            let _ = writeln!(
                body,
                "<div class=\"notes\"><h3>Important Notes</h3><p>{}</p></div>",
                escape(notes)
            );
        }
        body.push_str("<div class=\"grid\">\n");
        for (index, meal) in plan.meals().iter().enumerate() {
            body.push_str(&meal_card(index, meal));
        }
        body.push_str("</div>\n</section>\n");
    }

    body.push_str(SPEAK_SCRIPT);
    page("Your AI Fitness & Diet Plan", &body)
}

fn day_card(index: usize, day: &WorkoutDay) -> String {
    let mut card = format!(
        "<article class=\"day\">\n<h3><span class=\"badge\">{}</span>{}</h3>\n",
        index + 1,
        escape(&day.day)
    );
    if let Some(focus) = &day.focus {
        let _ = writeln!(card, "<p><strong>{}</strong></p>", escape(focus));
    }
    for exercise in &day.exercises {
        card.push_str(&exercise_card(exercise));
    }
    card.push_str("</article>\n");
    card
}

fn exercise_card(exercise: &Exercise) -> String {
    let mut card = format!(
        "<div class=\"exercise\">\n<h4>{}</h4>\n",
        escape(&exercise.name)
    );
    let details = [
        ("Sets", &exercise.sets),
        ("Reps", &exercise.reps),
        ("Duration", &exercise.duration),
        ("Rest", &exercise.rest),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            let _ = writeln!(card, "<div>{label}: {}</div>", escape(value));
        }
    }
    card.push_str("</div>\n");
    card
}

fn meal_card(index: usize, meal: &Meal) -> String {
    let mut card = format!(
        "<article class=\"meal\">\n<h3><span class=\"badge\">{}</span>{}</h3>\n<ul>\n",
        index + 1,
        escape(&meal.meal_time)
    );
    for option in &meal.options {
        let _ = writeln!(card, "<li>{}</li>", escape(option));
    }
    card.push_str("</ul>\n</article>\n");
    card
}

/// Error card with a way back to the form.
pub fn render_error_page(message: &str) -> String {
    let body = format!(
        "<div class=\"card\">\n<h2>Error</h2>\n<p>{}</p>\n\
         <p><a class=\"button\" href=\"/start\">Go Back</a></p>\n</div>\n",
        escape(message)
    );
    page("Error", &body)
}
