//! Heuristic word and phrase tables read by the content processor.
//!
//! Every table has a built-in default. A YAML file may override any subset of
//! tables; tables it leaves out keep their defaults.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const PROBLEM_PHRASES: &[&str] = &[
    "struggling with",
    "struggle with",
    "doesn't work",
    "does not work",
    "wish there was",
    "wish there were",
    "i wish",
    "time-consuming",
    "time consuming",
    "frustrating",
    "annoying",
    "pain in the",
    "hard to",
    "difficult to",
    "can't find",
    "cannot find",
    "no way to",
    "is there a way",
    "looking for a",
    "need a better",
    "need help",
    "takes forever",
    "takes hours",
    "waste of time",
    "wasting time",
    "too expensive",
    "too complicated",
    "keeps crashing",
    "problem with",
    "issue with",
    "tired of",
    "fed up",
    "hate",
    "sucks",
];

const DOMAINS: &[(&str, &[&str])] = &[
    (
        "business",
        &[
            "business", "customer", "customers", "client", "clients", "sales", "marketing",
            "startup", "revenue", "invoice", "invoices", "b2b", "crm", "leads", "company",
            "employees", "hiring", "contract", "vendor", "agency",
        ],
    ),
    (
        "tech",
        &[
            "software", "app", "api", "code", "coding", "developer", "bug", "server",
            "database", "deploy", "cloud", "integration", "plugin", "website", "browser",
            "script", "framework", "saas", "automation",
        ],
    ),
    (
        "productivity",
        &[
            "productivity", "workflow", "task", "tasks", "schedule", "calendar", "meeting",
            "meetings", "email", "notes", "organize", "tracking", "todo", "focus", "spreadsheet",
            "spreadsheets", "reminder", "project",
        ],
    ),
    (
        "health",
        &[
            "health", "doctor", "sleep", "diet", "exercise", "workout", "anxiety", "stress",
            "therapy", "medication", "fitness", "weight", "mental", "symptoms", "appointment",
            "nutrition", "clinic",
        ],
    ),
    (
        "finance",
        &[
            "money", "budget", "budgeting", "invoice", "invoices", "invoicing",
            "invoice tracking", "payment", "payments", "expense", "expenses", "tax", "taxes",
            "accounting", "bank", "investing", "savings", "debt", "bookkeeping", "receipts",
            "payroll", "credit",
        ],
    ),
    (
        "education",
        &[
            "learn", "learning", "student", "students", "teacher", "course", "courses", "class",
            "school", "study", "studying", "exam", "homework", "tutor", "university", "college",
            "lesson", "curriculum",
        ],
    ),
];

const HIGH_SEVERITY: &[&str] = &[
    "critical",
    "broken",
    "hate",
    "impossible",
    "terrible",
    "horrible",
    "nightmare",
    "unusable",
    "awful",
    "worst",
    "disaster",
    "crashing",
    "desperate",
    "can't stand",
    "driving me crazy",
    "losing money",
    "lost data",
];

const LOW_SEVERITY: &[&str] = &[
    "minor",
    "slight",
    "slightly",
    "would be nice",
    "nice to have",
    "occasionally",
    "not a big deal",
];

const URGENT: &[&str] = &[
    "urgent",
    "urgently",
    "asap",
    "immediately",
    "deadline",
    "emergency",
    "right now",
    "right away",
    "critical",
    "today",
    "blocking",
    "blocked",
    "desperately",
];

const NON_URGENT: &[&str] = &[
    "eventually",
    "someday",
    "no rush",
    "whenever",
    "low priority",
    "at some point",
    "long term",
    "not urgent",
];

const SCALE_WORDS: &[(&[&str], u64)] = &[
    (&["everyone", "everybody", "all of us", "every single"], 1_000_000),
    (&["most people", "most of us", "lots of people", "many people"], 100_000),
    (&["some", "some people", "others"], 10_000),
    (&["a few", "a couple", "few people"], 1_000),
    (&["i", "i'm", "me", "my", "myself"], 100),
];

const FRUSTRATION_WORDS: &[&str] = &[
    "frustrated",
    "frustrating",
    "annoying",
    "annoyed",
    "hate",
    "angry",
    "ugh",
    "ridiculous",
    "terrible",
    "awful",
    "useless",
    "worst",
    "fed up",
    "sick of",
    "tired of",
];

const EXCITEMENT_WORDS: &[&str] = &[
    "love",
    "amazing",
    "awesome",
    "excited",
    "great",
    "excellent",
    "fantastic",
    "perfect",
    "wonderful",
    "incredible",
    "best",
];

const ACTION_WORDS: &[&str] = &[
    "need", "want", "looking", "build", "create", "solve", "fix", "automate", "improve", "find",
    "help", "pay", "switch", "try", "buy",
];

const PROMOTIONAL_PHRASES: &[&str] = &[
    "check out my",
    "use my code",
    "discount code",
    "promo code",
    "sign up",
    "my startup",
    "affiliate",
    "limited time",
    "click here",
    "free trial",
];

/// A named topical vocabulary. Order in [`Lexicon::domains`] is significant:
/// the first domain reaching the hit threshold wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainVocabulary {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Phrases implying how many people share a problem, mapped to an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleWord {
    pub phrases: Vec<String>,
    pub users: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub problem_phrases: Vec<String>,
    pub domains: Vec<DomainVocabulary>,
    pub high_severity: Vec<String>,
    pub low_severity: Vec<String>,
    pub urgent: Vec<String>,
    pub non_urgent: Vec<String>,
    /// Checked in order; the first entry with a matching phrase wins.
    pub scale_words: Vec<ScaleWord>,
    pub frustration_words: Vec<String>,
    pub excitement_words: Vec<String>,
    pub action_words: Vec<String>,
    pub promotional_phrases: Vec<String>,
    /// Tokens excluded from keyword extraction. Empty by default.
    pub stop_words: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            problem_phrases: owned(PROBLEM_PHRASES),
            domains: DOMAINS
                .iter()
                .map(|(name, keywords)| DomainVocabulary {
                    name: (*name).to_string(),
                    keywords: owned(keywords),
                })
                .collect(),
            high_severity: owned(HIGH_SEVERITY),
            low_severity: owned(LOW_SEVERITY),
            urgent: owned(URGENT),
            non_urgent: owned(NON_URGENT),
            scale_words: SCALE_WORDS
                .iter()
                .map(|(phrases, users)| ScaleWord {
                    phrases: owned(phrases),
                    users: *users,
                })
                .collect(),
            frustration_words: owned(FRUSTRATION_WORDS),
            excitement_words: owned(EXCITEMENT_WORDS),
            action_words: owned(ACTION_WORDS),
            promotional_phrases: owned(PROMOTIONAL_PHRASES),
            stop_words: Vec::new(),
        }
    }
}

impl Lexicon {
    /// Lower-case every entry so matching can assume lower-cased input.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let lower = |list: &mut Vec<String>| {
            for entry in list.iter_mut() {
                *entry = entry.trim().to_lowercase();
            }
        };
        lower(&mut self.problem_phrases);
        for domain in &mut self.domains {
            lower(&mut domain.keywords);
        }
        lower(&mut self.high_severity);
        lower(&mut self.low_severity);
        lower(&mut self.urgent);
        lower(&mut self.non_urgent);
        for scale in &mut self.scale_words {
            lower(&mut scale.phrases);
        }
        lower(&mut self.frustration_words);
        lower(&mut self.excitement_words);
        lower(&mut self.action_words);
        lower(&mut self.promotional_phrases);
        lower(&mut self.stop_words);
        self
    }
}

/// Load a lexicon override from YAML and validate it.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_lexicon(path: &Path) -> Result<Lexicon, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let lexicon: Lexicon = serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })?;

    let lexicon = lexicon.normalized();
    validate_lexicon(&lexicon)?;
    Ok(lexicon)
}

fn validate_lexicon(lexicon: &Lexicon) -> Result<(), ConfigError> {
    if lexicon.problem_phrases.iter().all(String::is_empty) {
        return Err(ConfigError::Validation(
            "problem_phrases must contain at least one phrase".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for domain in &lexicon.domains {
        let name = domain.name.trim().to_lowercase();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "domain name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Validation(format!(
                "duplicate domain: '{}'",
                domain.name
            )));
        }
    }

    for scale in &lexicon.scale_words {
        if scale.users == 0 {
            return Err(ConfigError::Validation(format!(
                "scale entry [{}] has a user estimate of 0",
                scale.phrases.join(", ")
            )));
        }
    }

    Ok(())
}
