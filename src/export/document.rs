use std::fmt::Write;

use crate::resume::preview::PreviewDocument;

/// Fixed stylesheet wrapped around every exported document; the host's print
/// dialog takes it from here.
const PRINT_STYLESHEET: &str = r#"
    body {
        font-family: 'Times New Roman', serif;
        margin: 20px;
        line-height: 1.5;
        color: #333;
    }
    .resume-header {
        text-align: center;
        margin-bottom: 20px;
        padding-bottom: 15px;
        border-bottom: 2px solid #2c3e50;
    }
    .resume-header h1 {
        font-size: 24px;
        color: #2c3e50;
        margin-bottom: 10px;
    }
    .contact-info {
        display: flex;
        justify-content: center;
        flex-wrap: wrap;
        gap: 15px;
        font-size: 12px;
    }
    .profile-photo {
        width: 96px;
        height: 96px;
        object-fit: cover;
        border-radius: 50%;
        margin-bottom: 10px;
    }
    .resume-section {
        margin-bottom: 20px;
    }
    .resume-section h2 {
        font-size: 16px;
        color: #2c3e50;
        margin-bottom: 10px;
        border-bottom: 1px solid #2c3e50;
        padding-bottom: 2px;
    }
    .experience-entry, .education-entry, .certification-entry {
        margin-bottom: 15px;
    }
    .entry-header {
        display: flex;
        justify-content: space-between;
        margin-bottom: 5px;
    }
    .entry-title {
        font-weight: bold;
        font-size: 14px;
    }
    .entry-subtitle {
        font-style: italic;
        font-size: 14px;
    }
    .entry-date {
        font-size: 12px;
        color: #666;
    }
    .entry-body {
        font-size: 12px;
        margin-top: 5px;
        white-space: pre-line;
    }
    .skills-list {
        font-size: 12px;
        line-height: 1.6;
    }
    @media print {
        body { margin: 0; }
        .resume-header { page-break-after: avoid; }
        .resume-section { page-break-inside: avoid; }
    }
"#;

fn escape(text: &str) -> String {
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

fn entry(html: &mut String, kind: &str, title: &str, subtitle: &str, date: &str, body: &str) {
    let _ = write!(
        html,
        concat!(
            r#"<div class="{kind}-entry"><div class="entry-header"><div>"#,
            r#"<div class="entry-title">{title}</div>"#,
            r#"<div class="entry-subtitle">{subtitle}</div></div>"#,
            r#"<div class="entry-date">{date}</div></div>"#
        ),
        kind = kind,
        title = escape(title),
        subtitle = escape(subtitle),
        date = escape(date),
    );
    if !body.is_empty() {
        let _ = write!(html, r#"<div class="entry-body">{}</div>"#, escape(body));
    }
    html.push_str("</div>");
}

/// Assembles a standalone printable document from the rendered view and its
/// template choice. Pure function of the view; no state.
pub fn printable_document(doc: &PreviewDocument) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        concat!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">",
            "<title>Resume</title><style>{css}</style></head>",
            "<body class=\"{template}\">"
        ),
        css = PRINT_STYLESHEET,
        template = doc.template.class_name(),
    );

    html.push_str(r#"<div class="resume-header">"#);
    if let Some(photo) = &doc.photo {
        // The photo string can come straight from an imported file, so it
        // gets escaped like every other field.
        let _ = write!(
            html,
            r#"<img class="profile-photo" src="{}" alt="Profile Photo" />"#,
            escape(photo)
        );
    }
    let _ = write!(html, "<h1>{}</h1>", escape(&doc.name));
    if !doc.contact.is_empty() {
        html.push_str(r#"<div class="contact-info">"#);
        for item in &doc.contact {
            let _ = write!(html, "<span>{}</span>", escape(item));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");

    let _ = write!(
        html,
        r#"<div class="resume-section"><h2>Professional Summary</h2><p>{}</p></div>"#,
        escape(&doc.summary)
    );

    html.push_str(r#"<div class="resume-section"><h2>Work Experience</h2>"#);
    if doc.experience.is_empty() {
        html.push_str("<p>No work experience added yet.</p>");
    }
    for e in &doc.experience {
        entry(
            &mut html,
            "experience",
            &e.job_title,
            &e.company,
            &e.duration,
            &e.description,
        );
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="resume-section"><h2>Education</h2>"#);
    if doc.education.is_empty() {
        html.push_str("<p>No education added yet.</p>");
    }
    for e in &doc.education {
        entry(&mut html, "education", &e.degree, &e.institution, &e.year, "");
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="resume-section"><h2>Skills</h2>"#);
    match &doc.skills {
        Some(skills) => {
            let _ = write!(html, r#"<div class="skills-list">{}</div>"#, escape(skills));
        }
        None => html.push_str("<p>No skills added yet.</p>"),
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="resume-section"><h2>Certifications</h2>"#);
    if doc.certifications.is_empty() {
        html.push_str("<p>No certifications added yet.</p>");
    }
    for c in &doc.certifications {
        entry(
            &mut html,
            "certification",
            &c.name,
            &c.organization,
            &c.date,
            "",
        );
    }
    html.push_str("</div>");

    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::model::{ExperienceEntry, ResumeRecord, Template};
    use crate::resume::preview::render;

    #[test]
    fn document_carries_the_template_class() {
        let mut record = ResumeRecord::default();
        record.set_template(Template::Elegant);
        let html = printable_document(&render(&record));
        assert!(html.contains(r#"<body class="elegant">"#));
    }

    #[test]
    fn empty_sections_show_placeholders() {
        let html = printable_document(&render(&ResumeRecord::default()));
        assert!(html.contains("<h1>Your Name</h1>"));
        assert!(html.contains("No work experience added yet."));
        assert!(html.contains("No skills added yet."));
        assert!(html.contains("@media print"));
    }

    #[test]
    fn field_values_are_escaped() {
        let mut record = ResumeRecord::default();
        record.personal.full_name = "<script>alert(1)</script>".into();
        record.add_experience(ExperienceEntry {
            job_title: "Engineer & \"Lead\"".into(),
            company: "Acme".into(),
            ..Default::default()
        });
        let html = printable_document(&render(&record));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Engineer &amp; &quot;Lead&quot;"));
    }

    #[test]
    fn imported_photo_string_cannot_break_out_of_the_src_attribute() {
        let mut record = ResumeRecord::default();
        record.personal.photo = Some(r#""><script>alert(1)</script>"#.into());
        let html = printable_document(&render(&record));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn well_formed_data_url_photo_is_embedded() {
        let mut record = ResumeRecord::default();
        record.attach_photo(b"\x89PNG", "image/png");
        let html = printable_document(&render(&record));
        assert!(html.contains(r#"src="data:image/png;base64,"#));
    }

    #[test]
    fn entries_render_in_order() {
        let mut record = ResumeRecord::default();
        for title in ["Alpha", "Beta"] {
            record.add_experience(ExperienceEntry {
                job_title: title.into(),
                company: "Acme".into(),
                ..Default::default()
            });
        }
        let html = printable_document(&render(&record));
        let alpha = html.find("Alpha").expect("alpha present");
        let beta = html.find("Beta").expect("beta present");
        assert!(alpha < beta);
    }
}
