//! Filesystem-based rule loader.
//!
//! Discovers and parses rule files (`*.toml`) and converts them into domain
//! [`ClassRules`] ready to be stored and validated against.
//!
//! # Directory layout expected
//!
//! ```text
//! rules/
//! ├── user.toml
//! ├── billing/
//! │   ├── invoice.toml
//! │   └── payment.toml
//! └── README.md            ← ignored, not a .toml file
//! ```
//!
//! # Rule file format
//!
//! ```toml
//! [class]
//! name = "User"
//!
//! [properties.email]
//! required = true
//! unique   = true          # or a group property name: unique = "tenant"
//! type     = "email"       # color | number | range | url | email
//!
//! [properties.age]
//! min = 18
//! max = 130
//!
//! [properties.size]
//! options = ["s", "m", "l"]   # same as options = "s,m,l"
//! ```
//!
//! Properties keep the order they appear in the file. Directive keys are
//! kept verbatim (`minLength`, `maxLength`), including ones the validator
//! does not know.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use metaval_core::domain::{ClassRules, DomainError, PropertyRules, Value};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of one rule file.
#[derive(Debug, Deserialize, Clone)]
pub struct RuleManifest {
    pub class: ClassSection,
    /// `[properties.<name>]` tables, in file order.
    #[serde(default)]
    pub properties: toml::Table,
}

/// `[class]` section.
#[derive(Debug, Deserialize, Clone)]
pub struct ClassSection {
    /// Class name subjects are matched against, e.g. `"User"`.
    pub name: String,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`ClassRules`] from a rule file or a directory tree of rule files.
///
/// # Example
///
/// ```no_run
/// use metaval_adapters::TomlRuleLoader;
///
/// let loader = TomlRuleLoader::new("./rules");
/// let classes = loader.load_all()?;
/// println!("Loaded {} classes", classes.len());
/// # Ok::<(), metaval_core::domain::DomainError>(())
/// ```
pub struct TomlRuleLoader {
    root: PathBuf,
}

impl TomlRuleLoader {
    /// Create a loader pointed at a rule file or directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every valid rule file under the root.
    ///
    /// When the root is a single file it must be valid. In a directory, files
    /// that fail to parse or check are **skipped with a `WARN` log**, and a
    /// class declared twice keeps the first file's rules.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidRuleFile`] if the root does not exist or
    /// cannot be walked, or when a single-file root is invalid.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_all(&self) -> Result<Vec<ClassRules>, DomainError> {
        self.load(false)
    }

    /// Like [`load_all`](Self::load_all), but the first bad file or duplicate
    /// class fails the whole load.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load_strict(&self) -> Result<Vec<ClassRules>, DomainError> {
        self.load(true)
    }

    fn load(&self, strict: bool) -> Result<Vec<ClassRules>, DomainError> {
        if !self.root.exists() {
            return Err(DomainError::InvalidRuleFile(format!(
                "rules path not found: {}",
                self.root.display()
            )));
        }

        if self.root.is_file() {
            return Ok(vec![load_file(&self.root)?]);
        }

        let mut classes = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry
                .map_err(|e| DomainError::InvalidRuleFile(format!("directory walk error: {e}")))?;
            let path = entry.path();

            if !entry.file_type().is_file() || !is_rule_file(path) {
                continue;
            }

            let loaded = load_file(path).and_then(|rules| {
                if seen.insert(rules.class_name().to_owned()) {
                    Ok(rules)
                } else {
                    Err(DomainError::InvalidRuleFile(format!(
                        "'{}' declares class '{}' again",
                        path.display(),
                        rules.class_name()
                    )))
                }
            });

            match loaded {
                Ok(rules) => {
                    debug!(
                        class = %rules.class_name(),
                        properties = rules.len(),
                        "loaded rules"
                    );
                    classes.push(rules);
                }
                Err(e) if strict => return Err(e),
                Err(e) => {
                    warn!(
                        file  = %path.display(),
                        error = %e,
                        "skipping rule file due to load error"
                    );
                }
            }
        }

        debug!(count = classes.len(), "finished loading rules");
        Ok(classes)
    }
}

/// Read, parse and check one rule file.
pub fn load_file(path: &Path) -> Result<ClassRules, DomainError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        DomainError::InvalidRuleFile(format!("failed to read '{}': {e}", path.display()))
    })?;

    parse_rules(&raw).map_err(|e| match e {
        DomainError::InvalidRuleFile(msg) => {
            DomainError::InvalidRuleFile(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Parse and check rule file contents.
///
/// # Errors
///
/// [`DomainError::InvalidRuleFile`] for malformed TOML or unsupported value
/// shapes, [`DomainError::InvalidRule`] for a known directive holding a
/// wrongly-typed value.
pub fn parse_rules(raw: &str) -> Result<ClassRules, DomainError> {
    let manifest: RuleManifest =
        toml::from_str(raw).map_err(|e| DomainError::InvalidRuleFile(e.to_string()))?;

    let class = manifest.class.name.trim();
    if class.is_empty() {
        return Err(DomainError::InvalidRuleFile("class.name is empty".into()));
    }

    let mut rules = ClassRules::new(class);

    for (property, directives) in manifest.properties {
        let toml::Value::Table(directives) = directives else {
            return Err(DomainError::InvalidRuleFile(format!(
                "properties.{property} must be a table"
            )));
        };

        let mut property_rules = PropertyRules::new();
        for (key, value) in directives {
            let value = to_value(&value).ok_or_else(|| {
                DomainError::InvalidRuleFile(format!(
                    "properties.{property}.{key}: unsupported value '{value}'"
                ))
            })?;
            property_rules.set(key, value);
        }

        rules.insert(property, property_rules);
    }

    rules.check()?;
    Ok(rules)
}

/// Map a TOML value onto a rule value.
///
/// Arrays of scalars are joined with `,` so `options` can be written either
/// way. Tables and datetimes have no rule meaning.
fn to_value(value: &toml::Value) -> Option<Value> {
    match value {
        toml::Value::Boolean(b) => Some(Value::Bool(*b)),
        toml::Value::Integer(i) => Some(Value::Int(*i)),
        toml::Value::Float(f) => Some(Value::Float(*f)),
        toml::Value::String(s) => Some(Value::Text(s.clone())),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                toml::Value::Array(_) | toml::Value::Table(_) => None,
                scalar => to_value(scalar).map(|v| v.as_text().into_owned()),
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| Value::Text(parts.join(","))),
        toml::Value::Table(_) | toml::Value::Datetime(_) => None,
    }
}

fn is_rule_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}
