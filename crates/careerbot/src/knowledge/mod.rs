//! Static career knowledge table
//!
//! Maps academic majors to example careers, skills worth developing, and
//! learning resources. The table is literal data built once at startup and
//! embedded into every prompt as pretty-printed JSON.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::error::Result;

/// Reference data for one academic major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeEntry {
    /// Major name, unique within a table
    pub major: String,
    /// Example career paths
    pub careers: Vec<String>,
    /// Skills to develop
    pub skills: Vec<String>,
    /// Learning resources
    pub resources: Vec<String>,
}

impl KnowledgeEntry {
    fn from_literals(
        major: &str,
        careers: &[&str],
        skills: &[&str],
        resources: &[&str],
    ) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            major: major.to_string(),
            careers: owned(careers),
            skills: owned(skills),
            resources: owned(resources),
        }
    }
}

/// Ordered, immutable collection of knowledge entries keyed by major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeTable {
    entries: Vec<KnowledgeEntry>,
}

/// Build the fixed knowledge table
pub fn load() -> KnowledgeTable {
    KnowledgeTable {
        entries: vec![
            KnowledgeEntry::from_literals(
                "Computer Science",
                &["Software Engineer", "Data Scientist", "Cybersecurity Analyst"],
                &["Python", "Java", "Data Analysis", "Cybersecurity"],
                &["Coursera", "LeetCode", "TryHackMe"],
            ),
            KnowledgeEntry::from_literals(
                "Business",
                &["Marketing Manager", "Financial Analyst", "Entrepreneur"],
                &["Marketing", "Finance", "Leadership"],
                &["LinkedIn Learning", "Coursera", "Harvard Business Review"],
            ),
            KnowledgeEntry::from_literals(
                "Biology",
                &["Biomedical Researcher", "Environmental Scientist", "Pharmacist"],
                &["Research", "Lab Techniques", "Data Analysis"],
                &["PubMed", "Khan Academy", "Nature Journal"],
            ),
        ],
    }
}

impl KnowledgeTable {
    /// Look up a major by exact name
    pub fn get(&self, major: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.major == major)
    }

    /// Major names in table order
    pub fn majors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.major.as_str())
    }

    /// Iterate over entries in table order
    pub fn iter(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a pretty-printed JSON object keyed by major
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Serialize)]
struct EntryBody<'a> {
    careers: &'a [String],
    skills: &'a [String],
    resources: &'a [String],
}

impl Serialize for KnowledgeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.major,
                &EntryBody {
                    careers: &entry.careers,
                    skills: &entry.skills,
                    resources: &entry.resources,
                },
            )?;
        }
        map.end()
    }
}
