use crate::models::plan::NormalizedPlan;

pub const DOWNLOAD_FILENAME: &str = "fitness-plan.json";
pub const DOWNLOAD_CONTENT_TYPE: &str = "application/json";

/// A plan rendered as a downloadable file.
#[derive(Debug, Clone)]
pub struct PlanDownload {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl PlanDownload {
    /// `Content-Disposition` value that makes browsers save the body under `filename`.
    pub fn disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Pretty-prints the plan as JSON with two-space indentation.
pub fn download_plan(plan: &NormalizedPlan) -> Result<PlanDownload, serde_json::Error> {
    Ok(PlanDownload {
        filename: DOWNLOAD_FILENAME,
        content_type: DOWNLOAD_CONTENT_TYPE,
        body: serde_json::to_vec_pretty(plan)?,
    })
}
