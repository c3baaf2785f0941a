//! Format Parser
//!
//! Builds the node chain for a format string. Each bracketed group becomes a
//! node without an action whose child is the group's contents; the suffix
//! after `]` becomes its guard.

use super::action::Action;
use super::lexer::{Lexer, Suffix, Token};
use super::tree::{FormatNode, Guard};
use crate::error::{FormatResult, FormatSpecError};

impl From<Suffix> for Guard {
    fn from(suffix: Suffix) -> Self {
        match suffix {
            Suffix::None => Guard::BareTest,
            Suffix::Always => Guard::Always,
            Suffix::Equal(n) => Guard::Equal(n),
            Suffix::Less(n) => Guard::Less(n),
            Suffix::Greater(n) => Guard::Greater(n),
            Suffix::NotEqual(n) => Guard::NotEqual(n),
        }
    }
}

/// Parse a format string into its root node. The empty format has no root.
pub fn parse(format: &str) -> FormatResult<Option<FormatNode>> {
    let tokens = Lexer::new(format).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let root = parser.parse_sequence()?;
    match parser.tokens.get(parser.pos) {
        Some(Token::Close { offset, .. }) => Err(FormatSpecError::UnopenedGroup { offset: *offset }),
        _ => Ok(root),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Nodes up to the next `]` or the end
    fn parse_sequence(&mut self) -> FormatResult<Option<FormatNode>> {
        let mut nodes = Vec::new();
        while let Some(token) = self.tokens.get(self.pos) {
            let node = match token {
                Token::Close { .. } => break,
                Token::Literal(bytes) => FormatNode::action(Action::Literal(bytes.clone())),
                Token::Field { field, offset } => {
                    FormatNode::action(Action::Field(*field)).at(*offset)
                }
                Token::Count { field, offset } => {
                    FormatNode::action(Action::Count(*field)).at(*offset)
                }
                Token::Open { offset } => {
                    let offset = *offset;
                    self.pos += 1;
                    nodes.push(self.parse_group(offset)?);
                    continue;
                }
                Token::Eof => break,
            };
            self.pos += 1;
            nodes.push(node);
        }
        Ok(FormatNode::sequence(nodes))
    }

    /// Contents of a group whose `[` was at `open`, through its `]`
    fn parse_group(&mut self, open: usize) -> FormatResult<FormatNode> {
        let contents = self.parse_sequence()?;
        let Some(Token::Close { suffix, offset }) = self.tokens.get(self.pos) else {
            return Err(FormatSpecError::UnclosedGroup { offset: open });
        };
        let (suffix, close) = (*suffix, *offset);
        self.pos += 1;
        let child = contents.ok_or(FormatSpecError::EmptyGroup { offset: open })?;
        // Comparison errors point at the suffix
        let at = if suffix == Suffix::None || suffix == Suffix::Always {
            open
        } else {
            close + 1
        };
        Ok(FormatNode::group(child, suffix.into()).at(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::context::Candidate;
    use crate::format::tree::FormatTree;

    fn render(format: &str, candidate: &Candidate) -> String {
        let tree = FormatTree::compile(format).unwrap();
        String::from_utf8(tree.render_to_vec(candidate)).unwrap()
    }

    #[test]
    fn test_empty_format() {
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn test_sequence_shape() {
        let root = parse("$w/$t").unwrap().unwrap();
        assert_eq!(root.guard(), Guard::Always);
        let second = root.next().unwrap();
        let third = second.next().unwrap();
        assert!(third.next().is_none());
    }

    #[test]
    fn test_group_shape() {
        let root = parse("[$b]>1x").unwrap().unwrap();
        assert_eq!(root.guard(), Guard::Greater(1));
        assert!(root.child().is_some());
        assert!(root.next().is_some());
    }

    #[test]
    fn test_nested_groups() {
        let root = parse("[a[$b]2]*").unwrap().unwrap();
        assert_eq!(root.guard(), Guard::Always);
        let inner = root.child().unwrap().next().unwrap();
        assert_eq!(inner.guard(), Guard::Equal(2));
    }

    #[test]
    fn test_render_bare_group() {
        let empty = Candidate::new("dog");
        let found = Candidate::new("dogs").with_dict_lemmas(["dog"]);
        assert_eq!(render("$w[ -> $b]", &empty), "dog");
        assert_eq!(render("$w[ -> $b]", &found), "dogs -> dog");
    }

    #[test]
    fn test_render_counts_and_comparisons() {
        let candidate = Candidate::new("saw")
            .with_dict_lemmas(["see", "saw"])
            .with_tag("V");
        assert_eq!(render("$w/$t #b", &candidate), "saw/V 2");
        assert_eq!(render("[$b]<2[ambiguous: $b]>1", &candidate), "ambiguous: see|saw");
        assert_eq!(render("[$b]!2[$B]*", &candidate), "");
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert_eq!(parse("a[$b"), Err(FormatSpecError::UnclosedGroup { offset: 1 }));
        assert_eq!(parse("$b]x"), Err(FormatSpecError::UnopenedGroup { offset: 2 }));
        assert_eq!(parse("[[$b]"), Err(FormatSpecError::UnclosedGroup { offset: 0 }));
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(parse("x[]"), Err(FormatSpecError::EmptyGroup { offset: 1 }));
        assert_eq!(parse("[]2"), Err(FormatSpecError::EmptyGroup { offset: 0 }));
    }

    #[test]
    fn test_comparison_needs_countable_field() {
        assert_eq!(
            FormatTree::compile("ab[$w]<3"),
            Err(FormatSpecError::UncountableComparison {
                operand: 3,
                offset: 6
            })
        );
        assert!(FormatTree::compile("[$w $c]<3").is_ok());
    }

    #[test]
    fn test_count_action_in_group() {
        let candidate = Candidate::new("x").with_lemma_classes(["a", "b", "c"]);
        assert_eq!(render("[#c classes]>2", &candidate), "3 classes");
        assert_eq!(render("[#c classes]>3", &candidate), "");
    }
}
