//! Closed-vocabulary skills scan.
//!
//! Every vocabulary term is tested for a case-insensitive occurrence bounded
//! by non-word characters (or the text edges). Results follow vocabulary
//! order, not document order. Short terms such as `R` or `Go` can
//! false-positive on ordinary prose; that is the accepted cost of a fixed list.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Reference vocabulary, grouped by category.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Programming languages
    "C#",
    "C++",
    "CSS",
    "Go",
    "HTML",
    "Java",
    "JavaScript",
    "Kotlin",
    "MATLAB",
    "PHP",
    "Python",
    "R",
    "Ruby",
    "Rust",
    "Scala",
    "SQL",
    "Swift",
    "TypeScript",
    // Frameworks and libraries
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Laravel",
    "Spring",
    "Rails",
    "Next.js",
    "Nuxt.js",
    "Svelte",
    "jQuery",
    "Bootstrap",
    "Tailwind",
    // Databases
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "SQLite",
    "Oracle",
    "SQL Server",
    // Cloud and DevOps
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Jenkins",
    "Git",
    "GitHub",
    "GitLab",
    "CI/CD",
    "Terraform",
    "Ansible",
    // Tools and technologies
    "Linux",
    "Windows",
    "macOS",
    "REST API",
    "GraphQL",
    "Microservices",
    "Agile",
    "Scrum",
    "Machine Learning",
    "AI",
    "Data Science",
    "Analytics",
    "Tableau",
    "Power BI",
    // Soft skills
    "Leadership",
    "Communication",
    "Project Management",
    "Team Management",
    "Problem Solving",
    "Critical Thinking",
    "Analytical Skills",
    "Creativity",
    "Adaptability",
];

static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|&skill| (skill, term_pattern(skill)))
        .collect()
});

/// Words inside a multi-word term may be separated by any whitespace run,
/// so terms split across a line break still match.
fn term_pattern(term: &str) -> Regex {
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    RegexBuilder::new(&format!(r"(?:^|\W){body}(?:\W|$)"))
        .case_insensitive(true)
        .build()
        .unwrap()
}

/// All vocabulary terms present in `text`, deduplicated, in vocabulary order.
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for (skill, re) in SKILL_PATTERNS.iter() {
        if re.is_match(text) && !found.iter().any(|s| s == skill) {
            found.push(skill.to_string());
        }
    }
    found
}
