//! Analyzer configuration files.
//!
//! A configuration is a JSON document (comments and trailing commas allowed):
//!
//! ```json
//! {
//!   "extends": "./base.json",
//!   "checkClasses": true,
//!   "checkMethods": "false",
//!   "storeNodeTypes": true,
//!   "mockClasses": ["Mockery\\MockInterface"],
//!   "issueHandlers": { "PossiblyNullReference": "error", "MixedMethodCall": "suppress" }
//! }
//! ```
//!
//! Settings in a file override those of the file it extends.

use anyhow::{Context, Result, anyhow, bail};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::debug;

use vigil_checker::{AnalysisContext, Codebase, IssueBuffer, IssueLevel};
use vigil_common::IssueKind;

/// Accept `true` as well as `"true"`, `"yes"`, `"1"` and friends.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub check_classes: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub check_methods: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub store_node_types: Option<bool>,
    #[serde(default)]
    pub mock_classes: Option<Vec<String>>,
    /// Issue name to level.
    #[serde(default)]
    pub issue_handlers: Option<FxHashMap<String, IssueLevel>>,
}

/// Configuration with defaults applied and issue names validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnalyzerOptions {
    pub check_classes: bool,
    pub check_methods: bool,
    pub store_node_types: bool,
    pub mock_classes: Vec<String>,
    pub issue_levels: Vec<(IssueKind, IssueLevel)>,
}

impl Default for ResolvedAnalyzerOptions {
    fn default() -> Self {
        Self {
            check_classes: true,
            check_methods: true,
            store_node_types: false,
            mock_classes: Vec::new(),
            issue_levels: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Apply defaults and validate issue names.
    pub fn resolve(&self) -> Result<ResolvedAnalyzerOptions> {
        let mut resolved = ResolvedAnalyzerOptions::default();
        if let Some(check_classes) = self.check_classes {
            resolved.check_classes = check_classes;
        }
        if let Some(check_methods) = self.check_methods {
            resolved.check_methods = check_methods;
        }
        if let Some(store_node_types) = self.store_node_types {
            resolved.store_node_types = store_node_types;
        }
        if let Some(mock_classes) = &self.mock_classes {
            resolved.mock_classes.clone_from(mock_classes);
        }
        if let Some(handlers) = &self.issue_handlers {
            for (name, level) in handlers {
                let Some(kind) = IssueKind::from_name(name) else {
                    bail!("unknown issue type '{name}' in issueHandlers");
                };
                resolved.issue_levels.push((kind, *level));
            }
            resolved.issue_levels.sort_by_key(|(kind, _)| kind.code());
        }
        Ok(resolved)
    }
}

impl ResolvedAnalyzerOptions {
    /// A fresh top-level context with the configured checks enabled.
    #[must_use]
    pub fn new_context(&self) -> AnalysisContext {
        AnalysisContext {
            check_classes: self.check_classes,
            check_methods: self.check_methods,
            ..AnalysisContext::default()
        }
    }

    /// An issue buffer using the configured levels.
    #[must_use]
    pub fn new_issue_buffer(&self) -> IssueBuffer {
        let mut buffer = IssueBuffer::new();
        for (kind, level) in &self.issue_levels {
            buffer.set_level(*kind, *level);
        }
        buffer
    }

    pub fn apply_to_codebase(&self, codebase: &mut Codebase) {
        codebase.store_node_types = self.store_node_types;
        for class in &self.mock_classes {
            codebase.add_mock_class(class);
        }
    }
}

pub fn parse_config(source: &str) -> Result<AnalyzerConfig> {
    let stripped = strip_comments(source);
    let normalized = remove_trailing_commas(&stripped);
    let config = serde_json::from_str(&normalized).context("failed to parse analyzer config JSON")?;
    Ok(config)
}

/// Load `path`, following `extends` chains.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig> {
    let mut visited = FxHashSet::default();
    load_config_inner(path, &mut visited)
}

fn load_config_inner(path: &Path, visited: &mut FxHashSet<PathBuf>) -> Result<AnalyzerConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("config extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = parse_config(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    debug!(path = %path.display(), "loaded analyzer config");

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_config_inner(&base_path, visited)?;
        config = merge_configs(base, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("config has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

/// `child` wins field by field; issue handlers merge per issue.
fn merge_configs(base: AnalyzerConfig, child: AnalyzerConfig) -> AnalyzerConfig {
    let issue_handlers = match (base.issue_handlers, child.issue_handlers) {
        (Some(mut base_handlers), Some(child_handlers)) => {
            base_handlers.extend(child_handlers);
            Some(base_handlers)
        }
        (base_handlers, child_handlers) => child_handlers.or(base_handlers),
    };

    AnalyzerConfig {
        extends: None,
        check_classes: child.check_classes.or(base.check_classes),
        check_methods: child.check_methods.or(base.check_methods),
        store_node_types: child.store_node_types.or(base.store_node_types),
        mock_classes: child.mock_classes.or(base.mock_classes),
        issue_handlers,
    }
}

/// Drop `//` and `/* */` comments outside string literals.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    prev = skipped;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars.clone().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}
