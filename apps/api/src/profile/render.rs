//! Profile View — markdown profile card for sharing.

use crate::profile::models::StudentProfile;

/// Renders the profile as a markdown card. Empty sections are left out.
pub fn render_profile_card(profile: &StudentProfile) -> String {
    let title = if profile.name.is_empty() {
        "Unnamed student"
    } else {
        profile.name.as_str()
    };
    let mut md = format!("# {title}\n\n");

    if !profile.complete {
        md.push_str("_Profile not complete yet: no resume has been processed._\n\n");
    }

    if !profile.academic_history.is_empty() {
        md.push_str("## Academic History\n\n");
        for a in &profile.academic_history {
            md.push_str(&format!("- **{}**, {}", a.degree, a.institution));
            if !a.year.is_empty() {
                md.push_str(&format!(" ({})", a.year));
            }
            if let Some(cgpa) = &a.cgpa {
                md.push_str(&format!(" | CGPA {cgpa}"));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if !profile.skills.is_empty() {
        md.push_str("## Skills\n\n");
        md.push_str(&profile.skills.join(", "));
        md.push_str("\n\n");
    }

    if !profile.experience.is_empty() {
        md.push_str("## Experience\n\n");
        for e in &profile.experience {
            md.push_str(&format!("### {} at {}\n", e.role, e.company));
            if !e.duration.is_empty() {
                md.push_str(&format!("_{}_\n", e.duration));
            }
            if !e.description.is_empty() {
                md.push_str(&format!("\n{}\n", e.description));
            }
            md.push('\n');
        }
    }

    if !profile.projects.is_empty() {
        md.push_str("## Projects\n\n");
        for p in &profile.projects {
            md.push_str(&format!("- **{}**", p.title));
            if !p.tech.is_empty() {
                md.push_str(&format!(" [{}]", p.tech));
            }
            if !p.description.is_empty() {
                md.push_str(&format!(": {}", p.description));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if !profile.achievements.is_empty() {
        md.push_str("## Achievements\n\n");
        for a in &profile.achievements {
            md.push_str(&format!("- **{}**", a.title));
            if !a.description.is_empty() {
                md.push_str(&format!(": {}", a.description));
            }
            md.push('\n');
        }
        md.push('\n');
    }

    if !profile.certificates.is_empty() {
        md.push_str("## Certificates\n\n");
        for c in &profile.certificates {
            md.push_str(&format!("- {} (uploaded {})\n", c.name, c.upload_date));
        }
        md.push('\n');
    }

    md
}
