// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Values of the `option` property.
//!
//! Each policy parses from the upper-cased Checkstyle spelling, which is
//! what [`RuleOptions::option`](tugstyle_core::RuleOptions::option) hands
//! to `FromStr`.

use std::str::FromStr;

use crate::format::is_blank;

/// Generates a unit enum with `FromStr` from its Checkstyle spellings.
macro_rules! policy {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

policy! {
    /// Padding inside or next to a delimiter.
    PadPolicy {
        NoSpace => "NOSPACE",
        Space => "SPACE",
    }
}

impl PadPolicy {
    /// The whitespace that should replace `gap`, or `None` when `gap`
    /// already conforms. Gaps containing a line break are left alone.
    pub fn fix(&self, gap: &str) -> Option<&'static str> {
        if gap.contains('\n') {
            return None;
        }
        match self {
            PadPolicy::NoSpace if !gap.is_empty() && is_blank(gap) => Some(""),
            PadPolicy::Space if gap.is_empty() => Some(" "),
            _ => None,
        }
    }

    /// Rewrite `gap` in place. Returns whether it changed.
    pub fn apply(&self, gap: &mut String) -> bool {
        match self.fix(gap) {
            Some(fixed) => {
                *gap = fixed.to_string();
                true
            }
            None => false,
        }
    }
}

policy! {
    /// Placement of `{`.
    LeftCurlyPolicy {
        Eol => "EOL",
        Nl => "NL",
        /// New line when the declaration or condition wraps, else end of line.
        Nlow => "NLOW",
    }
}

policy! {
    /// Placement of `}` before `else`, `catch` and `finally`.
    RightCurlyPolicy {
        Same => "SAME",
        Alone => "ALONE",
        AloneOrSingleline => "ALONE_OR_SINGLELINE",
    }
}

policy! {
    /// Which side of a line break an operator sits on.
    WrapPolicy {
        Nl => "NL",
        Eol => "EOL",
    }
}

policy! {
    /// What counts as a non-empty block.
    BlockPolicy {
        Statement => "STATEMENT",
        Text => "TEXT",
    }
}
