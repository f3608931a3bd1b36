//! Auxiliary build steps and the per-(mode, target) table that selects them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, Stage};
use crate::layout::ProjectLayout;
use crate::mode::BuildMode;
use crate::types::TargetId;

/// Chunk injected into the generated HTML document.
pub const HTML_SHELL_CHUNK: &str = "web";
pub const HTML_SHELL_FILENAME: &str = "index.html";
pub const NATIVE_MODULE_EXTRA_ARGS: &str = "--target web --mode normal";

/// One auxiliary build step with its configuration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PluginStep {
    HtmlShell(HtmlShellOptions),
    NativeModule(NativeModuleOptions),
    BundleAnalyzer(BundleAnalyzerOptions),
}

impl PluginStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::HtmlShell(_) => "html-shell",
            Self::NativeModule(_) => "native-module",
            Self::BundleAnalyzer(_) => "bundle-analyzer",
        }
    }
}

/// Where generated `<script>` tags go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectPosition {
    Head,
    /// End of `<body>`
    #[default]
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlShellOptions {
    pub chunks: Vec<String>,
    pub filename: String,
    pub inject: InjectPosition,
    pub template: PathBuf,
}

/// wasm-pack invocation driven by the engine's watch loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeModuleOptions {
    pub crate_directory: PathBuf,
    pub watch_directories: Vec<PathBuf>,
    pub extra_args: String,
    /// Optimization level of the native artifact, independent of the outer mode
    pub force_mode: BuildMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleAnalyzerOptions {}

/// Optional steps a project can switch on in its config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginToggles {
    /// Bundle-size visualizer; production builds of `main` only
    #[serde(default)]
    pub bundle_analyzer: bool,
}

/// Selects the ordered plugin steps for a target.
#[derive(Debug, Clone)]
pub struct PluginAssembler<'a> {
    layout: &'a ProjectLayout,
    toggles: PluginToggles,
}

impl<'a> PluginAssembler<'a> {
    pub fn new(layout: &'a ProjectLayout) -> Self {
        Self {
            layout,
            toggles: PluginToggles::default(),
        }
    }

    pub fn with_toggles(mut self, toggles: PluginToggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Plugin steps for a target given by name.
    ///
    /// # Errors
    ///
    /// `PlanError::UnknownTarget` for anything but `main` and `worker`.
    pub fn assemble(&self, mode: BuildMode, target: &str) -> Result<Vec<PluginStep>> {
        let target = TargetId::parse(target, Stage::PluginAssembly)?;
        Ok(self.assemble_for(mode, target))
    }

    /// Every reachable sequence is one arm of this table.
    ///
    /// The HTML shell always comes first. In production the native module is
    /// expected to be prebuilt, so its step is left out.
    pub fn assemble_for(&self, mode: BuildMode, target: TargetId) -> Vec<PluginStep> {
        match (target, mode) {
            (TargetId::Main, BuildMode::Development) => {
                vec![self.html_shell(), self.native_module()]
            }
            (TargetId::Main, BuildMode::Production) if self.toggles.bundle_analyzer => {
                vec![
                    self.html_shell(),
                    PluginStep::BundleAnalyzer(BundleAnalyzerOptions::default()),
                ]
            }
            (TargetId::Main, BuildMode::Production) => vec![self.html_shell()],
            (TargetId::Worker, _) => Vec::new(),
        }
    }

    fn html_shell(&self) -> PluginStep {
        PluginStep::HtmlShell(HtmlShellOptions {
            chunks: vec![HTML_SHELL_CHUNK.to_string()],
            filename: HTML_SHELL_FILENAME.to_string(),
            inject: InjectPosition::Body,
            template: self.layout.template_path(),
        })
    }

    fn native_module(&self) -> PluginStep {
        PluginStep::NativeModule(NativeModuleOptions {
            crate_directory: self.layout.crate_root(),
            watch_directories: vec![self.layout.native_src_root()],
            extra_args: NATIVE_MODULE_EXTRA_ARGS.to_string(),
            force_mode: BuildMode::Production,
        })
    }
}
