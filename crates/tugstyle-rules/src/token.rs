// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Checkstyle token names accepted by the `tokens` property.
//!
//! Only the tokens some rule understands are listed. Unknown names fail to
//! parse and are dropped by [`RuleOptions::tokens`](tugstyle_core::RuleOptions::tokens).

use std::str::FromStr;

use tugstyle_java::{AssignOp, BinaryOp};

/// Generates the token enum with `FromStr` from the Checkstyle spellings.
macro_rules! tokens {
    ($($variant:ident => $text:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Token {
            $($variant),+
        }

        impl Token {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Token::$variant => $text,)+
                }
            }
        }

        impl FromStr for Token {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Token::$variant),)+
                    _ => Err(()),
                }
            }
        }
    };
}

tokens! {
    // Declarations
    AnnotationDef => "ANNOTATION_DEF",
    ClassDef => "CLASS_DEF",
    CtorDef => "CTOR_DEF",
    EnumConstantDef => "ENUM_CONSTANT_DEF",
    EnumDef => "ENUM_DEF",
    InterfaceDef => "INTERFACE_DEF",
    MethodDef => "METHOD_DEF",
    VariableDef => "VARIABLE_DEF",
    ParameterDef => "PARAMETER_DEF",
    Lambda => "LAMBDA",
    ObjBlock => "OBJBLOCK",
    StaticInit => "STATIC_INIT",
    InstanceInit => "INSTANCE_INIT",

    // Statements
    LiteralCase => "LITERAL_CASE",
    LiteralCatch => "LITERAL_CATCH",
    LiteralDefault => "LITERAL_DEFAULT",
    LiteralDo => "LITERAL_DO",
    LiteralElse => "LITERAL_ELSE",
    LiteralFinally => "LITERAL_FINALLY",
    LiteralFor => "LITERAL_FOR",
    LiteralIf => "LITERAL_IF",
    LiteralNew => "LITERAL_NEW",
    LiteralSwitch => "LITERAL_SWITCH",
    LiteralSynchronized => "LITERAL_SYNCHRONIZED",
    LiteralTry => "LITERAL_TRY",
    LiteralWhile => "LITERAL_WHILE",

    // Punctuation
    ArrayDeclarator => "ARRAY_DECLARATOR",
    ArrayInit => "ARRAY_INIT",
    At => "AT",
    Bnot => "BNOT",
    Comma => "COMMA",
    Dec => "DEC",
    Dot => "DOT",
    Ellipsis => "ELLIPSIS",
    GenericEnd => "GENERIC_END",
    GenericStart => "GENERIC_START",
    Inc => "INC",
    IndexOp => "INDEX_OP",
    Lnot => "LNOT",
    MethodCall => "METHOD_CALL",
    MethodRef => "METHOD_REF",
    PostDec => "POST_DEC",
    PostInc => "POST_INC",
    Semi => "SEMI",
    SuperCtorCall => "SUPER_CTOR_CALL",
    Typecast => "TYPECAST",
    UnaryMinus => "UNARY_MINUS",
    UnaryPlus => "UNARY_PLUS",

    // Parenthesized operands
    Expr => "EXPR",
    Ident => "IDENT",
    NumDouble => "NUM_DOUBLE",
    NumFloat => "NUM_FLOAT",
    NumInt => "NUM_INT",
    NumLong => "NUM_LONG",
    StringLiteral => "STRING_LITERAL",
    LiteralNull => "LITERAL_NULL",
    LiteralFalse => "LITERAL_FALSE",
    LiteralTrue => "LITERAL_TRUE",

    // Assignments
    Assign => "ASSIGN",
    BandAssign => "BAND_ASSIGN",
    BorAssign => "BOR_ASSIGN",
    BsrAssign => "BSR_ASSIGN",
    BxorAssign => "BXOR_ASSIGN",
    DivAssign => "DIV_ASSIGN",
    MinusAssign => "MINUS_ASSIGN",
    ModAssign => "MOD_ASSIGN",
    PlusAssign => "PLUS_ASSIGN",
    SlAssign => "SL_ASSIGN",
    SrAssign => "SR_ASSIGN",
    StarAssign => "STAR_ASSIGN",

    // Operators
    Question => "QUESTION",
    Colon => "COLON",
    Equal => "EQUAL",
    NotEqual => "NOT_EQUAL",
    Div => "DIV",
    Plus => "PLUS",
    Minus => "MINUS",
    Star => "STAR",
    Mod => "MOD",
    Sr => "SR",
    Bsr => "BSR",
    Ge => "GE",
    Gt => "GT",
    Sl => "SL",
    Le => "LE",
    Lt => "LT",
    Bxor => "BXOR",
    Bor => "BOR",
    Lor => "LOR",
    Band => "BAND",
    Land => "LAND",
    TypeExtensionAnd => "TYPE_EXTENSION_AND",
    LiteralInstanceof => "LITERAL_INSTANCEOF",
}

impl Token {
    /// The token for a binary operator.
    pub fn of_binary(op: BinaryOp) -> Token {
        match op {
            BinaryOp::Mul => Token::Star,
            BinaryOp::Div => Token::Div,
            BinaryOp::Rem => Token::Mod,
            BinaryOp::Add => Token::Plus,
            BinaryOp::Sub => Token::Minus,
            BinaryOp::Shl => Token::Sl,
            BinaryOp::Shr => Token::Sr,
            BinaryOp::UShr => Token::Bsr,
            BinaryOp::Lt => Token::Lt,
            BinaryOp::Gt => Token::Gt,
            BinaryOp::Le => Token::Le,
            BinaryOp::Ge => Token::Ge,
            BinaryOp::Eq => Token::Equal,
            BinaryOp::Ne => Token::NotEqual,
            BinaryOp::BitAnd => Token::Band,
            BinaryOp::BitXor => Token::Bxor,
            BinaryOp::BitOr => Token::Bor,
            BinaryOp::And => Token::Land,
            BinaryOp::Or => Token::Lor,
        }
    }

    /// The token for an assignment operator.
    pub fn of_assign(op: AssignOp) -> Token {
        match op {
            AssignOp::Assign => Token::Assign,
            AssignOp::Add => Token::PlusAssign,
            AssignOp::Sub => Token::MinusAssign,
            AssignOp::Mul => Token::StarAssign,
            AssignOp::Div => Token::DivAssign,
            AssignOp::Rem => Token::ModAssign,
            AssignOp::BitAnd => Token::BandAssign,
            AssignOp::BitOr => Token::BorAssign,
            AssignOp::BitXor => Token::BxorAssign,
            AssignOp::Shl => Token::SlAssign,
            AssignOp::Shr => Token::SrAssign,
            AssignOp::UShr => Token::BsrAssign,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugstyle_core::RuleOptions;

    #[test]
    fn test_tokens_parse_and_unknown_are_dropped() {
        let options = RuleOptions::new().with("tokens", "LITERAL_IF, NOT_A_TOKEN,LAMBDA");
        let tokens = options.tokens([Token::ClassDef]);
        assert_eq!(
            tokens.into_iter().collect::<Vec<_>>(),
            vec![Token::Lambda, Token::LiteralIf]
        );
        assert_eq!(Token::of_binary(BinaryOp::UShr).as_str(), "BSR");
    }
}
