use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result, Stage};

/// Chunk name → source file.
pub type EntryMap = BTreeMap<String, PathBuf>;

/// Alias prefix → directory. Keys keep declaration order.
pub type AliasMap = IndexMap<String, PathBuf>;

/// Identity of one of the fixed build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetId {
    /// Browser UI bundle plus the background script
    Main,
    /// Isolated worker bundle
    Worker,
}

impl TargetId {
    /// Every target, in plan order.
    pub const ALL: [TargetId; 2] = [TargetId::Main, TargetId::Worker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Worker => "worker",
        }
    }

    /// Chunk names this target emits, sorted.
    pub fn chunks(&self) -> &'static [&'static str] {
        match self {
            Self::Main => &["background", "web"],
            Self::Worker => &["worker"],
        }
    }

    /// Parse a target name, attributing a failure to `stage`.
    pub fn parse(name: &str, stage: Stage) -> Result<Self> {
        match name {
            "main" => Ok(Self::Main),
            "worker" => Ok(Self::Worker),
            other => Err(PlanError::UnknownTarget {
                name: other.to_string(),
                stage,
            }),
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetId {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Stage::TargetComposition)
    }
}

/// Global-object assumptions of a generated bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuntimeEnvironment {
    /// Browser page (`window`)
    #[default]
    Browser,
    /// Dedicated worker (`self`, no DOM)
    IsolatedWorker,
}

impl RuntimeEnvironment {
    /// Target name understood by the external engine.
    pub fn engine_target(&self) -> &'static str {
        match self {
            Self::Browser => "web",
            Self::IsolatedWorker => "webworker",
        }
    }
}

/// Engine features that are off unless a target opts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiments {
    #[serde(default)]
    pub async_web_assembly: bool,
}

/// Where bundles are written and how chunk files are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLayout {
    pub path: PathBuf,
    pub filename: String,
}

impl OutputLayout {
    pub const NAME_PLACEHOLDER: &'static str = "[name]";

    /// `<dir>/[name].js`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            filename: format!("{}.js", Self::NAME_PLACEHOLDER),
        }
    }

    /// Output file for a chunk.
    ///
    /// ```
    /// use tandem_config::OutputLayout;
    /// use std::path::PathBuf;
    ///
    /// let out = OutputLayout::new("dist");
    /// assert_eq!(out.chunk_file("web"), PathBuf::from("dist/web.js"));
    /// ```
    pub fn chunk_file(&self, chunk: &str) -> PathBuf {
        self.path
            .join(self.filename.replace(Self::NAME_PLACEHOLDER, chunk))
    }
}

/// How a class of source files is converted before entering the module graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTransformRule {
    /// Regular expression over file paths
    pub test: String,

    /// Processors, applied last to first by the engine
    #[serde(rename = "use")]
    pub processors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl ModuleTransformRule {
    pub fn new<I, S>(test: impl Into<String>, processors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            test: test.into(),
            processors: processors.into_iter().map(Into::into).collect(),
            exclude: None,
        }
    }

    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// Check that both patterns compile.
    pub fn check_patterns(&self) -> Result<()> {
        compile(&self.test)?;
        if let Some(exclude) = &self.exclude {
            compile(exclude)?;
        }
        Ok(())
    }

    /// Whether this rule claims `path`.
    pub fn matches(&self, path: &Path) -> Result<bool> {
        let subject = path.to_string_lossy();
        if !compile(&self.test)?.is_match(&subject) {
            return Ok(false);
        }
        match &self.exclude {
            Some(exclude) => Ok(!compile(exclude)?.is_match(&subject)),
            None => Ok(true),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| PlanError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Extension search order and path aliases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub extensions: Vec<String>,
    pub alias: AliasMap,
}

impl ResolutionConfig {
    /// Resolve an aliased import specifier (e.g. `@wasm/core` → `<pkg>/core`).
    ///
    /// An alias only matches a whole path segment, and the longest alias wins,
    /// so `@wasm/x` never resolves through `@`.
    pub fn resolve_alias(&self, specifier: &str) -> Option<PathBuf> {
        let mut best: Option<(&str, &PathBuf)> = None;
        for (alias, target) in &self.alias {
            let Some(rest) = specifier.strip_prefix(alias.as_str()) else {
                continue;
            };
            if !rest.is_empty() && !rest.starts_with('/') {
                continue;
            }
            if best.is_none_or(|(current, _)| alias.len() > current.len()) {
                best = Some((alias.as_str(), target));
            }
        }

        let (alias, target) = best?;
        let rest = specifier[alias.len()..].trim_start_matches('/');
        if rest.is_empty() {
            Some(target.clone())
        } else {
            Some(target.join(rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution() -> ResolutionConfig {
        let mut alias = AliasMap::new();
        alias.insert("@".into(), PathBuf::from("/app/web"));
        alias.insert("@wasm".into(), PathBuf::from("/app/pkg"));
        ResolutionConfig {
            extensions: vec![".ts".into()],
            alias,
        }
    }

    #[test]
    fn target_id_round_trips_names() {
        for id in TargetId::ALL {
            assert_eq!(id.as_str().parse::<TargetId>().unwrap(), id);
        }
    }

    #[test]
    fn target_id_rejects_unknown_names() {
        let err = TargetId::parse("service-worker", Stage::PluginAssembly).unwrap_err();
        assert!(matches!(
            err,
            PlanError::UnknownTarget { ref name, stage: Stage::PluginAssembly } if name == "service-worker"
        ));
    }

    #[test]
    fn alias_prefers_longest_match() {
        let res = resolution();
        assert_eq!(
            res.resolve_alias("@wasm/engine_bg.wasm"),
            Some(PathBuf::from("/app/pkg/engine_bg.wasm"))
        );
        assert_eq!(
            res.resolve_alias("@/components/App"),
            Some(PathBuf::from("/app/web/components/App"))
        );
        assert_eq!(res.resolve_alias("@wasm"), Some(PathBuf::from("/app/pkg")));
    }

    #[test]
    fn alias_requires_segment_boundary() {
        let res = resolution();
        assert_eq!(res.resolve_alias("@wasmer/sdk"), None);
        assert_eq!(res.resolve_alias("react"), None);
    }

    #[test]
    fn rule_honours_exclude() {
        let rule = ModuleTransformRule::new(r"\.tsx?$", ["ts-loader"]).with_exclude("node_modules");
        assert!(rule.matches(Path::new("/app/web/web.tsx")).unwrap());
        assert!(!rule.matches(Path::new("/app/node_modules/x/index.ts")).unwrap());
        assert!(!rule.matches(Path::new("/app/web/style.less")).unwrap());
    }

    #[test]
    fn rule_reports_bad_pattern() {
        let rule = ModuleTransformRule::new("(unclosed", ["noop"]);
        assert!(matches!(
            rule.check_patterns(),
            Err(PlanError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn chunk_file_substitutes_name() {
        let out = OutputLayout::new("/app/dist");
        assert_eq!(out.chunk_file("worker"), PathBuf::from("/app/dist/worker.js"));
    }
}
