//! Node kinds the completion engine distinguishes.

/// The closed set of syntax node kinds.
///
/// The external parser's node-type vocabulary is wider than this; anything
/// the completion heuristics never react to maps to `Other` rather than
/// being matched by type-name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SyntaxKind {
    /// Root of a parsed document.
    Script,
    /// A top-level expression statement.
    ExpressionStatement,
    /// A call such as `osc(30)` or `.color(1, 0, 0)`.
    CallExpression,
    /// A property access such as `osc(30).color` or `mouse.x`.
    MemberExpression,
    /// The parenthesized argument list of a call, parens and commas included.
    ArgList,
    /// An array literal such as `[3, 10, 2]`.
    ArrayExpression,
    /// An arrow function such as `() => time * 0.1`.
    ArrowFunction,
    /// An identifier in expression position.
    VariableName,
    /// The identifier after a `.` in a member expression.
    PropertyName,
    /// A numeric literal.
    Number,
    /// A string literal.
    String,
    /// A `//` comment.
    LineComment,
    /// A `/* */` comment.
    BlockComment,
    /// The `.` token.
    Dot,
    /// The `,` token.
    Comma,
    /// The `(` token.
    OpenParen,
    /// The `)` token.
    CloseParen,
    /// Any other operator or punctuation token.
    Operator,
    /// Anything the completion engine has no opinion about.
    Other,
}

impl SyntaxKind {
    /// Kinds whose interior suppresses completion entirely.
    pub fn is_no_completion(self) -> bool {
        matches!(
            self,
            SyntaxKind::String | SyntaxKind::LineComment | SyntaxKind::BlockComment
        )
    }

    /// Kinds that mark a fluent-chain context when found on the ancestor path.
    pub fn is_chain_link(self) -> bool {
        matches!(
            self,
            SyntaxKind::MemberExpression | SyntaxKind::PropertyName | SyntaxKind::CallExpression
        )
    }

    /// Kinds carrying an identifier whose text names a function or variable.
    pub fn is_name(self) -> bool {
        matches!(self, SyntaxKind::VariableName | SyntaxKind::PropertyName)
    }
}

#[cfg(test)]
mod kind_tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(SyntaxKind::String.is_no_completion());
        assert!(SyntaxKind::LineComment.is_no_completion());
        assert!(!SyntaxKind::ArgList.is_no_completion());

        assert!(SyntaxKind::MemberExpression.is_chain_link());
        assert!(SyntaxKind::CallExpression.is_chain_link());
        assert!(!SyntaxKind::ExpressionStatement.is_chain_link());

        assert!(SyntaxKind::VariableName.is_name());
        assert!(!SyntaxKind::Dot.is_name());
    }
}
