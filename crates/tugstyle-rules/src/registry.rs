// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The rule registry: configured module names to rule instances.
//!
//! A [`RuleRegistry`] holds the configured modules that name known rules, in
//! configuration order. It is shared read-only across threads; every file
//! asks it for fresh rule instances, so rule state never leaks between
//! files.

use std::path::Path;

use tracing::debug;
use tugstyle_core::{CheckstyleConfig, ModuleConfig, RuleOptions, Suppressions};
use tugstyle_java::Rule;

use crate::rules::*;

macro_rules! rules {
    ($($rule:ident($options:pat) => $make:expr,)*) => {
        /// Names of every rule the registry can construct.
        pub const KNOWN_RULES: &[&str] = &[$($rule::NAME),*];

        /// Construct the rule called `name`, or `None` if there is no such
        /// rule.
        pub fn construct(name: &str, options: &RuleOptions) -> Option<Box<dyn Rule>> {
            let rule: Box<dyn Rule> = match name {
                $($rule::NAME => {
                    let $options: &RuleOptions = options;
                    Box::new($make)
                })*
                _ => return None,
            };
            Some(rule)
        }
    };
}

rules! {
    CovariantEquals(_) => CovariantEquals::new(),
    DefaultComesLast(options) => DefaultComesLast::new(options),
    EmptyBlock(options) => EmptyBlock::new(options),
    EmptyForInitializerPad(options) => EmptyForInitializerPad::new(options),
    EmptyForIteratorPad(options) => EmptyForIteratorPad::new(options),
    EmptyStatement(_) => EmptyStatement::new(),
    EqualsAvoidsNull(options) => EqualsAvoidsNull::new(options),
    ExplicitInitialization(options) => ExplicitInitialization::new(options),
    FallThrough(options) => FallThrough::new(options),
    FinalClass(_) => FinalClass::new(),
    FinalLocalVariable(_) => FinalLocalVariable::new(),
    GenericWhitespace(_) => GenericWhitespace::new(),
    HiddenField(options) => HiddenField::new(options),
    HideUtilityClassConstructor(_) => HideUtilityClassConstructor::new(),
    LeftCurly(options) => LeftCurly::new(options),
    MethodParamPad(options) => MethodParamPad::new(options),
    MultipleVariableDeclarations(_) => MultipleVariableDeclarations::new(),
    NeedBraces(options) => NeedBraces::new(options),
    NoFinalizer(_) => NoFinalizer::new(),
    NoWhitespaceAfter(options) => NoWhitespaceAfter::new(options),
    NoWhitespaceBefore(options) => NoWhitespaceBefore::new(options),
    OperatorWrap(options) => OperatorWrap::new(options),
    RightCurly(options) => RightCurly::new(options),
    SimplifyBooleanExpression(_) => SimplifyBooleanExpression::new(),
    SimplifyBooleanReturn(_) => SimplifyBooleanReturn::new(),
    StaticVariableName(options) => StaticVariableName::new(options),
    StringLiteralEquality(_) => StringLiteralEquality::new(),
    TypecastParenPad(options) => TypecastParenPad::new(options),
    UnnecessaryParentheses(options) => UnnecessaryParentheses::new(options),
}

pub fn is_known(name: &str) -> bool {
    KNOWN_RULES.contains(&name)
}

/// Configured rules, ready to be instantiated per file.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    modules: Vec<ModuleConfig>,
}

impl RuleRegistry {
    /// Keep the modules that name known rules. Unknown names are skipped.
    pub fn build(modules: impl IntoIterator<Item = ModuleConfig>) -> Self {
        let modules = modules
            .into_iter()
            .filter(|module| {
                let known = is_known(&module.name);
                if !known {
                    debug!(module = %module.name, "skipping module without a rewrite rule");
                }
                known
            })
            .collect();
        Self { modules }
    }

    /// The rules of `config`, minus the names in `excludes`.
    pub fn from_config<S: AsRef<str>>(config: &CheckstyleConfig, excludes: &[S]) -> Self {
        Self::build(config.modules.iter().filter_map(|module| {
            let excluded = excludes.iter().any(|e| e.as_ref() == module.name);
            if excluded {
                debug!(module = %module.name, "rule excluded");
            }
            (!excluded).then(|| module.clone())
        }))
    }

    /// Every known rule with default options, in name order.
    pub fn all() -> Self {
        let mut names = KNOWN_RULES.to_vec();
        names.sort_unstable();
        Self::build(names.into_iter().map(ModuleConfig::new))
    }

    /// Configured rule names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Fresh instances of every configured rule.
    pub fn instantiate(&self) -> Vec<Box<dyn Rule>> {
        self.modules
            .iter()
            .filter_map(|m| construct(&m.name, &m.options))
            .collect()
    }

    /// Fresh instances of the rules `suppressions` allows on `path`.
    pub fn instantiate_for(&self, path: &Path, suppressions: &Suppressions) -> Vec<Box<dyn Rule>> {
        self.modules
            .iter()
            .filter(|m| {
                let allowed = suppressions.accepts_check(path, &m.name);
                if !allowed {
                    debug!(rule = %m.name, path = %path.display(), "rule suppressed");
                }
                allowed
            })
            .filter_map(|m| construct(&m.name, &m.options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugstyle_core::config::Properties;

    #[test]
    fn test_every_known_rule_constructs_under_its_name() {
        for name in KNOWN_RULES {
            let rule = construct(name, &RuleOptions::new())
                .unwrap_or_else(|| panic!("{name} did not construct"));
            assert_eq!(rule.name(), *name);
        }
    }

    #[test]
    fn test_unknown_modules_are_skipped() {
        let registry = RuleRegistry::build([
            ModuleConfig::new("NeedBraces"),
            ModuleConfig::new("JavadocMethod"),
            ModuleConfig::new("EmptyStatement"),
        ]);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["NeedBraces", "EmptyStatement"]);
        assert_eq!(registry.instantiate().len(), 2);
    }

    #[test]
    fn test_from_config_applies_excludes_and_options() {
        let xml = r#"<?xml version="1.0"?>
<module name="Checker">
    <module name="TreeWalker">
        <module name="LeftCurly">
            <property name="option" value="nl"/>
        </module>
        <module name="HiddenField"/>
        <module name="LineLength"/>
    </module>
</module>
"#;
        let config = CheckstyleConfig::parse(xml, &Properties::new()).unwrap();
        let registry = RuleRegistry::from_config(&config, &["HiddenField"]);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["LeftCurly"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_instantiate_for_honors_check_suppressions() {
        let suppressions = Suppressions::parse(
            r#"<suppressions><suppress files="Legacy\.java" checks="FinalClass"/></suppressions>"#,
        )
        .unwrap();
        let registry = RuleRegistry::build([
            ModuleConfig::new("FinalClass"),
            ModuleConfig::new("NoFinalizer"),
        ]);
        let legacy = registry.instantiate_for(Path::new("src/Legacy.java"), &suppressions);
        assert_eq!(
            legacy.iter().map(|r| r.name().to_string()).collect::<Vec<_>>(),
            ["NoFinalizer"]
        );
        assert_eq!(registry.instantiate_for(Path::new("src/Main.java"), &suppressions).len(), 2);
    }

    #[test]
    fn test_all_is_sorted_and_complete() {
        let all = RuleRegistry::all();
        assert_eq!(all.len(), KNOWN_RULES.len());
        let names: Vec<_> = all.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
