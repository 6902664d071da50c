use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Personal fields of the resume. Field names follow the document format
/// users already have on disk, so exported files stay importable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub summary: String,
    /// Profile photo embedded inline as a base64 data URL.
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub job_title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub organization: String,
    pub date: String,
}

/// Named visual themes for the rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Classic,
    Modern,
    Minimal,
    Creative,
    Professional,
    Elegant,
}

impl Template {
    /// Stylesheet class used by the rendered document.
    pub fn class_name(self) -> &'static str {
        match self {
            Template::Classic => "classic",
            Template::Modern => "modern",
            Template::Minimal => "minimal",
            Template::Creative => "creative",
            Template::Professional => "professional",
            Template::Elegant => "elegant",
        }
    }
}

/// The in-memory resume record. Deserialization tolerates missing fields so
/// user-supplied files import with defaults; serialization round-trips
/// field-for-field including list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeRecord {
    pub personal: PersonalInfo,
    /// Ordered skill list; no case-sensitive duplicates.
    #[serde(alias = "skillList")]
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub template: Template,
}

impl ResumeRecord {
    /// Appends a skill unless it is empty or already present (exact,
    /// case-sensitive match). Returns whether the list changed.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    /// Removes a skill by exact match. Removing an absent skill is a no-op.
    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s != skill);
        self.skills.len() != before
    }

    pub fn add_experience(&mut self, entry: ExperienceEntry) {
        self.experience.push(entry);
    }

    pub fn remove_experience(&mut self, index: usize) -> bool {
        if index < self.experience.len() {
            self.experience.remove(index);
            true
        } else {
            false
        }
    }

    pub fn add_education(&mut self, entry: EducationEntry) {
        self.education.push(entry);
    }

    pub fn remove_education(&mut self, index: usize) -> bool {
        if index < self.education.len() {
            self.education.remove(index);
            true
        } else {
            false
        }
    }

    pub fn add_certification(&mut self, entry: CertificationEntry) {
        self.certifications.push(entry);
    }

    pub fn remove_certification(&mut self, index: usize) -> bool {
        if index < self.certifications.len() {
            self.certifications.remove(index);
            true
        } else {
            false
        }
    }

    pub fn set_template(&mut self, template: Template) {
        self.template = template;
    }

    /// Stores a photo inline as a `data:` URL.
    pub fn attach_photo(&mut self, bytes: &[u8], content_type: &str) {
        let encoded = BASE64.encode(bytes);
        self.personal.photo = Some(format!("data:{content_type};base64,{encoded}"));
    }

    pub fn clear_photo(&mut self) {
        self.personal.photo = None;
    }

    /// Resets every field to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ResumeRecord {
        let mut r = ResumeRecord::default();
        r.personal.full_name = "Jane Doe".into();
        r.personal.email = "jane@example.com".into();
        r.personal.summary = "Engineer.".into();
        r.add_skill("Rust");
        r.add_skill("SQL");
        r.add_experience(ExperienceEntry {
            job_title: "Engineer".into(),
            company: "Acme".into(),
            duration: "2020-2023".into(),
            description: "Built things.".into(),
        });
        r.add_experience(ExperienceEntry {
            job_title: "Senior Engineer".into(),
            company: "Acme".into(),
            duration: "2023-".into(),
            description: String::new(),
        });
        r.add_education(EducationEntry {
            degree: "BSc".into(),
            institution: "State".into(),
            year: "2019".into(),
        });
        r.add_certification(CertificationEntry {
            name: "Cert".into(),
            organization: "Org".into(),
            date: "2021".into(),
        });
        r.set_template(Template::Modern);
        r
    }

    #[test]
    fn round_trip_preserves_every_field_and_order() {
        for record in [ResumeRecord::default(), sample_record()] {
            let json = serde_json::to_string(&record).expect("serialize");
            let back: ResumeRecord = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, record);
        }
    }

    #[test]
    fn round_trip_with_many_entries_keeps_insertion_order() {
        let mut r = ResumeRecord::default();
        for i in 0..10 {
            r.add_experience(ExperienceEntry {
                job_title: format!("Job {i}"),
                ..Default::default()
            });
        }
        let back: ResumeRecord =
            serde_json::from_str(&serde_json::to_string(&r).unwrap()).unwrap();
        let titles: Vec<String> = back.experience.iter().map(|e| e.job_title.clone()).collect();
        assert_eq!(
            titles,
            (0..10).map(|i| format!("Job {i}")).collect::<Vec<String>>()
        );
    }

    #[test]
    fn partial_import_defaults_missing_fields() {
        let record: ResumeRecord =
            serde_json::from_str(r#"{"personal":{"fullName":"Jane"},"experience":[]}"#)
                .expect("tolerant deserialize");
        assert_eq!(record.personal.full_name, "Jane");
        assert_eq!(record.personal.email, "");
        assert!(record.experience.is_empty());
        assert!(record.education.is_empty());
        assert!(record.skills.is_empty());
        assert_eq!(record.template, Template::Classic);
        assert_eq!(record.personal.photo, None);
    }

    #[test]
    fn legacy_skill_list_field_is_accepted() {
        let record: ResumeRecord =
            serde_json::from_str(r#"{"skillList":["Rust","Go"]}"#).expect("deserialize");
        assert_eq!(record.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn skills_never_duplicate() {
        let mut r = ResumeRecord::default();
        assert!(r.add_skill("Rust"));
        assert!(!r.add_skill("Rust"));
        assert!(!r.add_skill("  Rust  "));
        // Case-sensitive exact match: different case is a different skill.
        assert!(r.add_skill("rust"));
        assert!(!r.add_skill(""));
        assert_eq!(r.skills, vec!["Rust", "rust"]);
    }

    #[test]
    fn remove_skill_filters_exact_matches() {
        let mut r = ResumeRecord::default();
        r.add_skill("Rust");
        r.add_skill("SQL");
        assert!(r.remove_skill("Rust"));
        assert!(!r.remove_skill("Rust"));
        assert_eq!(r.skills, vec!["SQL"]);
    }

    #[test]
    fn remove_entry_out_of_range_is_reported() {
        let mut r = sample_record();
        assert!(r.remove_experience(0));
        assert_eq!(r.experience.len(), 1);
        assert!(!r.remove_experience(5));
        assert!(!r.remove_education(1));
        assert!(!r.remove_certification(1));
    }

    #[test]
    fn attach_photo_embeds_a_data_url() {
        let mut r = ResumeRecord::default();
        r.attach_photo(b"\x89PNG", "image/png");
        let photo = r.personal.photo.as_deref().expect("photo set");
        assert!(photo.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn clear_resets_to_default() {
        let mut r = sample_record();
        r.clear();
        assert_eq!(r, ResumeRecord::default());
    }
}
