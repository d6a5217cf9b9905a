use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parse a comma-separated list, trimming and lowercasing every entry.
/// Falls back to `default` when the variable is unset or has no usable entries.
fn parse_env_list(var: &str, default: &[&str]) -> Vec<String> {
    let fallback = || default.iter().map(|s| s.to_string()).collect();

    match env::var(var) {
        Ok(val) => {
            let items: Vec<String> = val
                .split(',')
                .map(|item| item.trim().to_lowercase())
                .filter(|item| !item.is_empty())
                .collect();
            if items.is_empty() {
                tracing::warn!("{} is set but contains no entries. Using default.", var);
                fallback()
            } else {
                items
            }
        }
        Err(_) => fallback(),
    }
}

/// Label keywords that mark a fact as credential-bearing.
pub const DEFAULT_CREDENTIAL_LABEL_KEYWORDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "key",
    "code",
    "auth",
    "api_",
    "credential",
];

/// Leading words that mark a statement as a question rather than a fact.
pub const DEFAULT_QUESTION_WORDS: &[&str] = &["what", "where", "how", "who", "when", "why"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub guard: GuardConfig,
    pub surfacing: SurfacingConfig,
    pub extraction: ExtractionConfig,
    pub embeddings: EmbeddingsConfig,
    pub conflict: ConflictConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
}

impl DatabaseConfig {
    pub fn is_in_process(&self) -> bool {
        self.url == ":memory:"
    }
}

/// How credential keywords are matched against a fact label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMatch {
    /// Keyword may appear anywhere in the label ("my_api_token" matches "token").
    #[default]
    Substring,
    /// Keyword must be a whole `_`/`-`/space separated segment of the label.
    Word,
}

impl std::fmt::Display for LabelMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Word => write!(f, "word"),
        }
    }
}

impl std::str::FromStr for LabelMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "word" => Ok(Self::Word),
            _ => Err(format!("Unknown label match mode: {s}")),
        }
    }
}

/// Credential boundary configuration. The keyword set is data so it can be
/// extended without a code change.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    pub label_keywords: Vec<String>,
    pub label_match: LabelMatch,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            label_keywords: DEFAULT_CREDENTIAL_LABEL_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            label_match: LabelMatch::Substring,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurfacingConfig {
    /// Salience at or above which a fact may cross domain boundaries.
    pub salience_override: f32,
    pub max_facts: usize,
    pub max_context_chars: usize,
}

impl Default for SurfacingConfig {
    fn default() -> Self {
        Self {
            salience_override: 0.9,
            max_facts: 16,
            max_context_chars: 2048,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    pub storage_prefix: String,
    pub question_words: Vec<String>,
    /// Fallback only applies to values longer than this many characters.
    pub fallback_min_len: usize,
    /// Cleaned fallback text must be longer than this many characters.
    pub fallback_min_clean_len: usize,
    pub max_value_chars: usize,
    pub fallback_salience: f32,
    pub fact_salience: f32,
    pub edge_salience: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            storage_prefix: "remember:".to_string(),
            question_words: DEFAULT_QUESTION_WORDS.iter().map(|s| s.to_string()).collect(),
            fallback_min_len: 20,
            fallback_min_clean_len: 5,
            max_value_chars: 511,
            fallback_salience: 0.85,
            fact_salience: 0.8,
            edge_salience: 0.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    pub enabled: bool,
    pub model: String,
    pub dimensions: usize,
    /// Minimum cosine similarity to a causal prototype before a soft
    /// connective is accepted as a causal edge.
    pub causal_threshold: f32,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "hash/bow".to_string(),
            dimensions: 256,
            causal_threshold: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConflictConfig {
    pub max_warning_chars: usize,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            max_warning_chars: 511,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let surfacing = SurfacingConfig::default();
        let extraction = ExtractionConfig::default();
        let embeddings = EmbeddingsConfig::default();
        let conflict = ConflictConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("ZETA_DATABASE_URL").unwrap_or_else(|_| ":memory:".to_string()),
                auth_token: env::var("ZETA_DATABASE_AUTH_TOKEN").ok(),
            },
            guard: GuardConfig {
                label_keywords: parse_env_list(
                    "ZETA_CREDENTIAL_LABEL_KEYWORDS",
                    DEFAULT_CREDENTIAL_LABEL_KEYWORDS,
                ),
                label_match: parse_env_or("ZETA_CREDENTIAL_LABEL_MATCH", LabelMatch::Substring),
            },
            surfacing: SurfacingConfig {
                salience_override: parse_env_or(
                    "ZETA_SALIENCE_OVERRIDE",
                    surfacing.salience_override,
                ),
                max_facts: parse_env_or("ZETA_MAX_SURFACED_FACTS", surfacing.max_facts),
                max_context_chars: parse_env_or(
                    "ZETA_MAX_CONTEXT_CHARS",
                    surfacing.max_context_chars,
                ),
            },
            extraction: ExtractionConfig {
                storage_prefix: env::var("ZETA_STORAGE_PREFIX")
                    .map(|p| p.trim().to_lowercase())
                    .ok()
                    .filter(|p| !p.is_empty())
                    .unwrap_or(extraction.storage_prefix),
                question_words: parse_env_list("ZETA_QUESTION_WORDS", DEFAULT_QUESTION_WORDS),
                fallback_min_len: parse_env_or(
                    "ZETA_FALLBACK_MIN_LEN",
                    extraction.fallback_min_len,
                ),
                fallback_min_clean_len: parse_env_or(
                    "ZETA_FALLBACK_MIN_CLEAN_LEN",
                    extraction.fallback_min_clean_len,
                ),
                max_value_chars: parse_env_or("ZETA_MAX_VALUE_CHARS", extraction.max_value_chars),
                fallback_salience: parse_env_or(
                    "ZETA_FALLBACK_SALIENCE",
                    extraction.fallback_salience,
                ),
                fact_salience: parse_env_or("ZETA_FACT_SALIENCE", extraction.fact_salience),
                edge_salience: parse_env_or("ZETA_EDGE_SALIENCE", extraction.edge_salience),
            },
            embeddings: EmbeddingsConfig {
                enabled: parse_env_or("EMBEDDINGS_ENABLED", embeddings.enabled),
                model: env::var("EMBEDDING_MODEL").unwrap_or(embeddings.model),
                dimensions: parse_env_or("EMBEDDING_DIMENSIONS", embeddings.dimensions),
                causal_threshold: parse_env_or(
                    "SEMANTIC_CAUSAL_THRESHOLD",
                    embeddings.causal_threshold,
                ),
            },
            conflict: ConflictConfig {
                max_warning_chars: parse_env_or(
                    "ZETA_MAX_WARNING_CHARS",
                    conflict.max_warning_chars,
                ),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known embedding providers.
const KNOWN_EMBEDDING_PROVIDERS: &[&str] = &["hash", "local"];

/// Parse a model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_EMBEDDING_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Anything else names a local model, e.g. "BAAI/bge-small-en-v1.5"
    ("local", model)
}
