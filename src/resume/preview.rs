use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::resume::debounce::Debouncer;
use crate::resume::model::{ResumeRecord, Template};
use crate::resume::repo::ResumeStore;
use crate::storage::BlobStore;

/// Rendered view of the resume: a pure projection of the record, re-derived
/// after every change. Blank repeatable entries are dropped and empty fields
/// fall back to the same placeholders the form preview shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreviewDocument {
    pub template: Template,
    pub name: String,
    pub contact: Vec<String>,
    pub summary: String,
    pub photo: Option<String>,
    pub experience: Vec<ExperienceView>,
    pub education: Vec<EducationView>,
    pub skills: Option<String>,
    pub certifications: Vec<CertificationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceView {
    pub job_title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationView {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationView {
    pub name: String,
    pub organization: String,
    pub date: String,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Projects the record into its rendered view.
pub fn render(record: &ResumeRecord) -> PreviewDocument {
    let personal = &record.personal;

    let contact = [
        &personal.email,
        &personal.phone,
        &personal.address,
        &personal.linkedin,
    ]
    .into_iter()
    .filter(|v| !v.is_empty())
    .cloned()
    .collect();

    let experience = record
        .experience
        .iter()
        .filter(|e| !e.job_title.is_empty() || !e.company.is_empty())
        .map(|e| ExperienceView {
            job_title: or_placeholder(&e.job_title, "Job Title"),
            company: or_placeholder(&e.company, "Company Name"),
            duration: or_placeholder(&e.duration, "Duration"),
            description: e.description.clone(),
        })
        .collect();

    let education = record
        .education
        .iter()
        .filter(|e| !e.degree.is_empty() || !e.institution.is_empty())
        .map(|e| EducationView {
            degree: or_placeholder(&e.degree, "Degree"),
            institution: or_placeholder(&e.institution, "Institution"),
            year: or_placeholder(&e.year, "Year"),
        })
        .collect();

    let certifications = record
        .certifications
        .iter()
        .filter(|c| !c.name.is_empty() || !c.organization.is_empty())
        .map(|c| CertificationView {
            name: or_placeholder(&c.name, "Certification Name"),
            organization: or_placeholder(&c.organization, "Issuing Organization"),
            date: or_placeholder(&c.date, "Date"),
        })
        .collect();

    let skills = if record.skills.is_empty() {
        None
    } else {
        Some(record.skills.join(" • "))
    };

    PreviewDocument {
        template: record.template,
        name: or_placeholder(&personal.full_name, "Your Name"),
        contact,
        summary: or_placeholder(
            &personal.summary,
            "Your professional summary will appear here...",
        ),
        photo: personal.photo.clone(),
        experience,
        education,
        skills,
        certifications,
    }
}

/// The live preview: a shared rendered document refreshed by a debounced
/// background re-render. Record mutations call [`PreviewCache::mark_dirty`];
/// the render fires once a quiet period passes with no further edits and
/// reads the record as persisted at that moment.
#[derive(Clone)]
pub struct PreviewCache {
    cache: Arc<RwLock<PreviewDocument>>,
    debouncer: Debouncer,
}

impl PreviewCache {
    pub fn spawn(store: Arc<dyn BlobStore>, quiet: Duration) -> Self {
        let cache = Arc::new(RwLock::new(PreviewDocument::default()));
        let debouncer = {
            let cache = cache.clone();
            Debouncer::new(quiet, move || {
                let cache = cache.clone();
                let store = store.clone();
                async move {
                    let record = ResumeStore::new(store).load().await;
                    *cache.write().await = render(&record);
                }
            })
        };
        let this = Self { cache, debouncer };
        // Initial render so the preview reflects persisted state on startup.
        this.mark_dirty();
        this
    }

    pub fn mark_dirty(&self) {
        self.debouncer.trigger();
    }

    pub async fn current(&self) -> PreviewDocument {
        self.cache.read().await.clone()
    }
}
