// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Import queries and insertion for rules that introduce new type names.

use tugstyle_java::{CompilationUnit, Formatting, Ident, Import, NodeId};

/// The package part of a qualified name: `java.io` for `java.io.File`.
fn package_of(name: &str) -> &str {
    name.rsplit_once('.').map_or("", |(package, _)| package)
}

/// Whether `qualified` can be referred to by its simple name in `unit`.
pub(crate) fn is_imported(unit: &CompilationUnit, qualified: &str) -> bool {
    let package = package_of(qualified);
    package == "java.lang"
        || unit.imports.iter().any(|import| {
            import.static_prefix.is_none()
                && (import.name.name == qualified
                    || import
                        .name
                        .name
                        .strip_suffix(".*")
                        .is_some_and(|star| star == package))
        })
}

/// Add `import qualified;` unless it is already visible.
///
/// The new import goes after the last non-static import that sorts before
/// it, so existing groups keep their blank-line separators. Returns whether
/// an import was added.
pub(crate) fn add_import(unit: &mut CompilationUnit, qualified: &str) -> bool {
    if is_imported(unit, qualified) {
        return false;
    }
    let after = unit
        .imports
        .iter()
        .rposition(|import| import.static_prefix.is_none() && import.name.name.as_str() < qualified);
    let mut import = Import {
        id: NodeId::fresh(),
        fmt: Formatting::prefixed("\n"),
        static_prefix: None,
        name: Ident::new(qualified, Formatting::space()),
    };
    match after {
        Some(index) => unit.imports.insert(index + 1, import),
        None if unit.imports.is_empty() => {
            let lead = match &unit.package {
                Some(_) => "\n\n",
                None => "",
            };
            import.fmt.prefix = lead.to_string();
            if let Some(first) = unit.types.first_mut() {
                if !first.fmt.prefix.starts_with("\n\n") {
                    first.fmt.prefix = format!("\n\n{}", first.fmt.prefix.trim_start_matches('\n'));
                }
            }
            unit.imports.push(import);
        }
        None => {
            import.fmt.prefix = std::mem::replace(&mut unit.imports[0].fmt.prefix, "\n".into());
            unit.imports.insert(0, import);
        }
    }
    true
}
