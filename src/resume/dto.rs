use serde::{Deserialize, Serialize};

use crate::resume::model::Template;

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub skill: String,
}

#[derive(Debug, Serialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: Template,
}

/// Photo upload: raw bytes base64-encoded by the client, embedded into the
/// record as a data URL.
#[derive(Debug, Deserialize)]
pub struct PhotoUpload {
    pub photo_b64: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_content_type() -> String {
    "image/jpeg".into()
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
