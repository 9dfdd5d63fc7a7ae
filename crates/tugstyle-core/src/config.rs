//! Checkstyle configuration loading.
//!
//! Reads the subset of a Checkstyle configuration that drives rewriting:
//!
//! ```xml
//! <module name="Checker">
//!     <module name="SuppressionFilter">
//!         <property name="file" value="${config_loc}/suppressions.xml"/>
//!     </module>
//!     <module name="TreeWalker">
//!         <module name="NeedBraces">
//!             <property name="allowSingleLineStatement" value="true"/>
//!         </module>
//!     </module>
//! </module>
//! ```
//!
//! Modules under `TreeWalker` become [`ModuleConfig`]s in document order.
//! Property values may reference `${name}` properties supplied by the
//! caller; `config_loc` defaults to the directory holding the config file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use tracing::debug;

use crate::error::ConfigError;
use crate::options::RuleOptions;
use crate::suppress::Suppressions;

/// Caller-supplied values for `${name}` references.
pub type Properties = HashMap<String, String>;

/// `config_loc` for configurations that do not come from a file.
pub const DEFAULT_CONFIG_LOC: &str = "config/checkstyle";

/// One configured module under `TreeWalker`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    pub name: String,
    pub options: RuleOptions,
}

impl ModuleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: RuleOptions::new(),
        }
    }

    pub fn with_options(name: impl Into<String>, options: RuleOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

/// A loaded Checkstyle configuration.
#[derive(Debug, Clone, Default)]
pub struct CheckstyleConfig {
    pub modules: Vec<ModuleConfig>,
    pub suppressions: Suppressions,
}

impl CheckstyleConfig {
    /// Parse an inline configuration document.
    ///
    /// Relative suppression file paths resolve against the current
    /// directory.
    pub fn parse(xml: &str, properties: &Properties) -> Result<Self, ConfigError> {
        let properties = with_config_loc(properties, DEFAULT_CONFIG_LOC);
        parse_document(xml, &properties, None)
    }

    /// Load a configuration file.
    pub fn load(path: &Path, properties: &Properties) -> Result<Self, ConfigError> {
        let xml = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let properties = with_config_loc(properties, &base.to_string_lossy());
        parse_document(&xml, &properties, Some(base))
    }

    /// Module names in configuration order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    pub fn module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.name == name)
    }
}

fn with_config_loc(properties: &Properties, config_loc: &str) -> Properties {
    let mut properties = properties.clone();
    properties
        .entry("config_loc".to_string())
        .or_insert_with(|| config_loc.to_string());
    properties
}

fn parse_document(
    xml: &str,
    properties: &Properties,
    base: Option<&Path>,
) -> Result<CheckstyleConfig, ConfigError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options)?;
    let root = doc.root_element();
    if module_name(&root) != Some("Checker") {
        return Err(ConfigError::Structure(
            "root element must be <module name=\"Checker\">".to_string(),
        ));
    }

    let mut config = CheckstyleConfig::default();
    for child in modules(&root) {
        match module_name(&child) {
            Some("TreeWalker") => {
                for module in modules(&child) {
                    let Some(name) = module_name(&module) else {
                        continue;
                    };
                    let options = module_properties(&module, properties)?;
                    config
                        .modules
                        .push(ModuleConfig::with_options(name, options));
                }
            }
            Some("SuppressionFilter") => {
                let options = module_properties(&child, properties)?;
                config.suppressions = load_suppressions(&options, base)?;
            }
            Some(other) => debug!(module = other, "ignoring checker module"),
            None => {}
        }
    }
    Ok(config)
}

fn modules<'a, 'input>(node: &Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.has_tag_name("module"))
}

fn module_name<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    if node.has_tag_name("module") {
        node.attribute("name")
    } else {
        None
    }
}

fn module_properties(node: &Node<'_, '_>, properties: &Properties) -> Result<RuleOptions, ConfigError> {
    let mut options = RuleOptions::new();
    for property in node.children().filter(|n| n.has_tag_name("property")) {
        let (Some(name), Some(value)) = (property.attribute("name"), property.attribute("value"))
        else {
            continue;
        };
        options.insert(name, substitute(value, properties)?);
    }
    Ok(options)
}

fn load_suppressions(options: &RuleOptions, base: Option<&Path>) -> Result<Suppressions, ConfigError> {
    let Some(file) = options.get("file") else {
        return Ok(Suppressions::none());
    };
    let mut path = PathBuf::from(file);
    if path.is_relative() {
        if let Some(base) = base {
            if !path.exists() {
                path = base.join(path);
            }
        }
    }
    match Suppressions::load(&path) {
        Err(ConfigError::MissingFile { .. }) if options.bool("optional", false) => {
            debug!(path = %path.display(), "optional suppressions file not found");
            Ok(Suppressions::none())
        }
        other => other,
    }
}

/// Replace `${name}` references with property values.
///
/// `$$` is an escaped `$`. An unknown name is an error.
pub fn substitute(value: &str, properties: &Properties) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(body) = tail.strip_prefix('{') {
            let Some(end) = body.find('}') else {
                out.push_str(&rest[pos..]);
                return Ok(out);
            };
            let name = &body[..end];
            let replacement =
                properties
                    .get(name)
                    .ok_or_else(|| ConfigError::UnresolvedProperty {
                        name: name.to_string(),
                    })?;
            out.push_str(replacement);
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = tail;
        }
    }
    out.push_str(rest);
    Ok(out)
}
