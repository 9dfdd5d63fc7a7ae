// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! One module per Checkstyle check. Each rule is a [`JavaVisitor`] value
//! constructed from its option bag.
//!
//! [`JavaVisitor`]: tugstyle_java::JavaVisitor

pub mod covariant_equals;
pub mod default_comes_last;
pub mod empty_block;
pub mod empty_for_initializer_pad;
pub mod empty_for_iterator_pad;
pub mod empty_statement;
pub mod equals_avoids_null;
pub mod explicit_initialization;
pub mod fall_through;
pub mod final_class;
pub mod final_local_variable;
pub mod generic_whitespace;
pub mod hidden_field;
pub mod hide_utility_class_constructor;
pub mod left_curly;
pub mod method_param_pad;
pub mod multiple_variable_declarations;
pub mod need_braces;
pub mod no_finalizer;
pub mod no_whitespace_after;
pub mod no_whitespace_before;
pub mod operator_wrap;
pub mod right_curly;
pub mod simplify_boolean_expression;
pub mod simplify_boolean_return;
pub mod static_variable_name;
pub mod string_literal_equality;
pub mod typecast_paren_pad;
pub mod unnecessary_parentheses;

pub use covariant_equals::CovariantEquals;
pub use default_comes_last::DefaultComesLast;
pub use empty_block::EmptyBlock;
pub use empty_for_initializer_pad::EmptyForInitializerPad;
pub use empty_for_iterator_pad::EmptyForIteratorPad;
pub use empty_statement::EmptyStatement;
pub use equals_avoids_null::EqualsAvoidsNull;
pub use explicit_initialization::ExplicitInitialization;
pub use fall_through::FallThrough;
pub use final_class::FinalClass;
pub use final_local_variable::FinalLocalVariable;
pub use generic_whitespace::GenericWhitespace;
pub use hidden_field::HiddenField;
pub use hide_utility_class_constructor::HideUtilityClassConstructor;
pub use left_curly::LeftCurly;
pub use method_param_pad::MethodParamPad;
pub use multiple_variable_declarations::MultipleVariableDeclarations;
pub use need_braces::NeedBraces;
pub use no_finalizer::NoFinalizer;
pub use no_whitespace_after::NoWhitespaceAfter;
pub use no_whitespace_before::NoWhitespaceBefore;
pub use operator_wrap::OperatorWrap;
pub use right_curly::RightCurly;
pub use simplify_boolean_expression::SimplifyBooleanExpression;
pub use simplify_boolean_return::SimplifyBooleanReturn;
pub use static_variable_name::StaticVariableName;
pub use string_literal_equality::StringLiteralEquality;
pub use typecast_paren_pad::TypecastParenPad;
pub use unnecessary_parentheses::UnnecessaryParentheses;
