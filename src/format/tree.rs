//! Rule Tree
//!
//! A compiled format is a tree of [`FormatNode`]s. Each node may carry an
//! action, a child subtree it gates, and a next sibling that continues the
//! sequence. Rendering is a pure function of the tree and the candidate.
//!
//! ```text
//! "[$b]<2 ($c)"
//!
//! group <2 ──next──> "(" ──next──> $c ──next──> ")"
//!   │
//! child
//!   │
//!   $b
//! ```

use super::action::Action;
use super::context::OutputContext;
use crate::error::{FormatResult, FormatSpecError};

/// Condition a node must meet before it renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Guard {
    /// No condition
    #[default]
    Always,
    /// Bracketed group without a comparison. Suppressed when anything
    /// inside fails or nothing countable inside has values.
    BareTest,
    Less(usize),
    Equal(usize),
    NotEqual(usize),
    Greater(usize),
}

impl Guard {
    /// The comparison operand, for guards that compare a count
    #[inline]
    pub fn operand(self) -> Option<usize> {
        match self {
            Guard::Less(n) | Guard::Equal(n) | Guard::NotEqual(n) | Guard::Greater(n) => Some(n),
            Guard::Always | Guard::BareTest => None,
        }
    }

    #[inline]
    pub fn is_comparison(self) -> bool {
        self.operand().is_some()
    }

    /// Apply the comparison to `count`. Non-comparisons always hold.
    #[inline]
    pub fn holds(self, count: usize) -> bool {
        match self {
            Guard::Less(n) => count < n,
            Guard::Equal(n) => count == n,
            Guard::NotEqual(n) => count != n,
            Guard::Greater(n) => count > n,
            Guard::Always | Guard::BareTest => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatNode {
    action: Option<Action>,
    child: Option<Box<FormatNode>>,
    next: Option<Box<FormatNode>>,
    guard: Guard,
    hidden: bool,
    /// Byte offset in the format string, for error messages
    offset: usize,
}

impl FormatNode {
    /// A node that performs `action` unconditionally
    pub fn action(action: Action) -> Self {
        FormatNode {
            action: Some(action),
            child: None,
            next: None,
            guard: Guard::Always,
            hidden: false,
            offset: 0,
        }
    }

    /// A bracketed group gating `child`
    pub fn group(child: FormatNode, guard: Guard) -> Self {
        FormatNode {
            action: None,
            child: Some(Box::new(child)),
            next: None,
            guard,
            hidden: false,
            offset: 0,
        }
    }

    /// Link `nodes` into a sibling chain
    pub fn sequence(nodes: Vec<FormatNode>) -> Option<FormatNode> {
        nodes.into_iter().rev().fold(None, |next, mut node| {
            node.next = next.map(Box::new);
            Some(node)
        })
    }

    /// Put a comparison on this node's own count
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_next(mut self, next: FormatNode) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Never render this node or its child. It still takes part in counts
    /// and tests.
    pub fn hide(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn guard(&self) -> Guard {
        self.guard
    }

    pub fn child(&self) -> Option<&FormatNode> {
        self.child.as_deref()
    }

    pub fn next(&self) -> Option<&FormatNode> {
        self.next.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Count of the first countable action found depth first: own action,
    /// then child, then next.
    pub fn count<C: OutputContext + ?Sized>(&self, ctx: &C) -> Option<usize> {
        self.action
            .as_ref()
            .and_then(|action| action.count(ctx))
            .or_else(|| self.child.as_ref().and_then(|child| child.count(ctx)))
            .or_else(|| self.next.as_ref().and_then(|next| next.count(ctx)))
    }

    /// Like [`count`](Self::count), but a node with a comparison is opaque:
    /// only its next sibling is searched.
    pub fn count2<C: OutputContext + ?Sized>(&self, ctx: &C) -> Option<usize> {
        let own = if self.guard.is_comparison() {
            None
        } else {
            self.action
                .as_ref()
                .and_then(|action| action.count(ctx))
                .or_else(|| self.child.as_ref().and_then(|child| child.count2(ctx)))
        };
        own.or_else(|| self.next.as_ref().and_then(|next| next.count2(ctx)))
    }

    /// The node's own comparison. The count comes from the child if there is
    /// one, otherwise from this node onwards.
    pub fn evaluate_guard<C: OutputContext + ?Sized>(&self, ctx: &C) -> bool {
        if !self.guard.is_comparison() {
            return true;
        }
        let count = match &self.child {
            Some(child) => child.count(ctx),
            None => self.count(ctx),
        };
        // Trees are validated on construction, so a count is always found
        count.is_some_and(|count| self.guard.holds(count))
    }

    pub fn should_suppress<C: OutputContext + ?Sized>(&self, ctx: &C) -> bool {
        if self.guard == Guard::BareTest {
            return match &self.child {
                Some(child) => !child.passes_chain(ctx) || child.count2(ctx) == Some(0),
                None => true,
            };
        }
        !self.evaluate_guard(ctx)
    }

    /// Whether this node, its child chain (unless a bare test) and every
    /// later sibling pass their guards
    pub fn passes_chain<C: OutputContext + ?Sized>(&self, ctx: &C) -> bool {
        let mut node = Some(self);
        while let Some(current) = node {
            if !current.evaluate_guard(ctx) {
                return false;
            }
            if current.guard != Guard::BareTest {
                if let Some(child) = &current.child {
                    if !child.passes_chain(ctx) {
                        return false;
                    }
                }
            }
            node = current.next.as_deref();
        }
        true
    }

    /// Write this node and its siblings. Suppression hides a node and its
    /// child, never the siblings after it.
    pub fn render<C: OutputContext + ?Sized>(&self, ctx: &C, out: &mut Vec<u8>) {
        let mut node = Some(self);
        while let Some(current) = node {
            if !current.hidden && !current.should_suppress(ctx) {
                if let Some(action) = &current.action {
                    action.perform(ctx, out);
                }
                if let Some(child) = &current.child {
                    child.render(ctx, out);
                }
            }
            node = current.next.as_deref();
        }
    }

    /// Whether `count` finds anything, for any candidate
    fn has_countable(&self) -> bool {
        self.action.as_ref().is_some_and(Action::is_countable)
            || self.child.as_ref().is_some_and(|child| child.has_countable())
            || self.next.as_ref().is_some_and(|next| next.has_countable())
    }

    fn validate(&self) -> FormatResult<()> {
        let mut node = Some(self);
        while let Some(current) = node {
            if let Some(operand) = current.guard.operand() {
                let countable = match &current.child {
                    Some(child) => child.has_countable(),
                    None => current.has_countable(),
                };
                if !countable {
                    return Err(FormatSpecError::UncountableComparison {
                        operand,
                        offset: current.offset,
                    });
                }
            }
            if current.guard == Guard::BareTest && current.child.is_none() {
                return Err(FormatSpecError::EmptyGroup {
                    offset: current.offset,
                });
            }
            if let Some(child) = &current.child {
                child.validate()?;
            }
            node = current.next.as_deref();
        }
        Ok(())
    }
}

/// A validated, immutable format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTree {
    root: Option<FormatNode>,
    source: String,
}

impl FormatTree {
    /// Validate a hand-built tree. `None` is the empty format.
    pub fn new(root: Option<FormatNode>, source: impl Into<String>) -> FormatResult<Self> {
        if let Some(root) = &root {
            root.validate()?;
        }
        Ok(FormatTree {
            root,
            source: source.into(),
        })
    }

    /// Compile a format string
    pub fn compile(format: &str) -> FormatResult<Self> {
        let root = super::parser::parse(format)?;
        Self::new(root, format)
    }

    pub fn root(&self) -> Option<&FormatNode> {
        self.root.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render<C: OutputContext + ?Sized>(&self, ctx: &C, out: &mut Vec<u8>) {
        if let Some(root) = &self.root {
            root.render(ctx, out);
        }
    }

    pub fn render_to_vec<C: OutputContext + ?Sized>(&self, ctx: &C) -> Vec<u8> {
        let mut out = Vec::new();
        self.render(ctx, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::action::Field;
    use crate::format::context::Candidate;
    use proptest::prelude::*;
    use rstest::rstest;

    fn literal(text: &str) -> FormatNode {
        FormatNode::action(Action::Literal(text.as_bytes().to_vec()))
    }

    fn field(field: Field) -> FormatNode {
        FormatNode::action(Action::Field(field))
    }

    fn render(tree: &FormatTree, candidate: &Candidate) -> String {
        String::from_utf8(tree.render_to_vec(candidate)).unwrap()
    }

    fn with_lemmas(n: usize) -> Candidate {
        Candidate::new("w").with_dict_lemmas((0..n).map(|i| format!("l{}", i)))
    }

    #[test]
    fn test_bare_group_suppressed_when_empty() {
        // [$b]Y
        let root = FormatNode::group(field(Field::DictLemma), Guard::BareTest)
            .with_next(literal("Y"));
        let tree = FormatTree::new(Some(root), "[$b]Y").unwrap();
        assert_eq!(render(&tree, &with_lemmas(0)), "Y");
        assert_eq!(render(&tree, &with_lemmas(1)), "l0Y");
    }

    #[test]
    fn test_bare_group_without_countable_always_renders() {
        let root = FormatNode::group(field(Field::Word), Guard::BareTest);
        let tree = FormatTree::new(Some(root), "[$w]").unwrap();
        assert_eq!(render(&tree, &with_lemmas(0)), "w");
    }

    #[test]
    fn test_bare_group_suppressed_by_failing_inner_test() {
        // [x[$b]>1]
        let inner = FormatNode::group(field(Field::DictLemma), Guard::Greater(1));
        let root = FormatNode::group(literal("x").with_next(inner), Guard::BareTest);
        let tree = FormatTree::new(Some(root), "[x[$b]>1]").unwrap();
        assert_eq!(render(&tree, &with_lemmas(1)), "");
        assert_eq!(render(&tree, &with_lemmas(2)), "xl0|l1");
    }

    #[test]
    fn test_chain_short_circuit() {
        // [A$b]>0[B$c]>0: each group depends on its own condition only
        let root = FormatNode::sequence(vec![
            FormatNode::group(literal("A").with_next(field(Field::DictLemma)), Guard::Greater(0)),
            FormatNode::group(literal("B").with_next(field(Field::LemmaClass)), Guard::Greater(0)),
        ]);
        let tree = FormatTree::new(root, "[A$b]>0[B$c]>0").unwrap();

        let classes = Candidate::new("w").with_lemma_classes(["N"]);
        assert_eq!(render(&tree, &classes), "BN");
        assert_eq!(render(&tree, &with_lemmas(1)), "Al0");
        assert_eq!(render(&tree, &Candidate::new("w")), "");
    }

    #[test]
    fn test_failed_group_hides_only_itself() {
        let root = FormatNode::sequence(vec![
            literal("<"),
            FormatNode::group(literal("A").with_next(field(Field::DictLemma)), Guard::Equal(5)),
            literal(">"),
        ]);
        let tree = FormatTree::new(root, "").unwrap();
        assert_eq!(render(&tree, &with_lemmas(1)), "<>");
    }

    #[test]
    fn test_passes_chain_stops_at_first_failure() {
        let chain = FormatNode::group(field(Field::DictLemma), Guard::Equal(0))
            .with_next(FormatNode::group(field(Field::RuleLemma), Guard::Equal(0)));
        let candidate = with_lemmas(1);
        assert!(!chain.passes_chain(&candidate));
        assert!(chain.passes_chain(&with_lemmas(0)));
    }

    #[test]
    fn test_count2_skips_compared_subtrees() {
        // [$b]0$c: the compared group is opaque to count2
        let chain = FormatNode::group(field(Field::DictLemma), Guard::Equal(0))
            .with_next(field(Field::LemmaClass));
        let candidate = with_lemmas(3).with_lemma_classes(["a", "b"]);
        assert_eq!(chain.count(&candidate), Some(3));
        assert_eq!(chain.count2(&candidate), Some(2));
    }

    #[test]
    fn test_count_none_without_countable() {
        let chain = literal("a").with_next(field(Field::Word));
        assert_eq!(chain.count(&with_lemmas(2)), None);
        assert_eq!(chain.count2(&with_lemmas(2)), None);
    }

    #[test]
    fn test_guard_on_own_count() {
        // A field node with its own comparison and no child
        let node = field(Field::DictLemma).with_guard(Guard::Less(2));
        let tree = FormatTree::new(Some(node), "").unwrap();
        assert_eq!(render(&tree, &with_lemmas(1)), "l0");
        assert_eq!(render(&tree, &with_lemmas(2)), "");
    }

    #[test]
    fn test_hidden_node_counts_but_never_renders() {
        let hidden = FormatNode::group(field(Field::DictLemma), Guard::Always).hide();
        let root = FormatNode::group(hidden.with_next(literal("x")), Guard::BareTest);
        let tree = FormatTree::new(Some(root), "").unwrap();
        assert_eq!(render(&tree, &with_lemmas(0)), "");
        assert_eq!(render(&tree, &with_lemmas(2)), "x");
    }

    #[test]
    fn test_uncountable_comparison_rejected_at_build() {
        let root = literal("a").with_next(
            FormatNode::group(field(Field::Word), Guard::Less(2)).at(1),
        );
        assert_eq!(
            FormatTree::new(Some(root), "a[$w]<2"),
            Err(FormatSpecError::UncountableComparison {
                operand: 2,
                offset: 1
            })
        );
    }

    #[test]
    fn test_empty_tree_renders_nothing() {
        let tree = FormatTree::new(None, "").unwrap();
        assert_eq!(render(&tree, &with_lemmas(3)), "");
    }

    #[rstest]
    #[case(Guard::Less(2), vec![0, 1])]
    #[case(Guard::Equal(2), vec![2])]
    #[case(Guard::NotEqual(2), vec![0, 1, 3, 4])]
    #[case(Guard::Greater(2), vec![3, 4])]
    fn test_comparison_boundaries(#[case] guard: Guard, #[case] passing: Vec<usize>) {
        let node = FormatNode::group(field(Field::DictLemma), guard);
        let matched: Vec<usize> = (0..=4)
            .filter(|&n| node.evaluate_guard(&with_lemmas(n)))
            .collect();
        assert_eq!(matched, passing);
    }

    proptest! {
        #[test]
        fn prop_comparisons_match_arithmetic(n in 0usize..20) {
            for count in 0..=n + 2 {
                let candidate = with_lemmas(count);
                let check = |guard: Guard| {
                    FormatNode::group(field(Field::DictLemma), guard).evaluate_guard(&candidate)
                };
                prop_assert_eq!(check(Guard::Less(n)), count < n);
                prop_assert_eq!(check(Guard::Equal(n)), count == n);
                prop_assert_eq!(check(Guard::NotEqual(n)), count != n);
                prop_assert_eq!(check(Guard::Greater(n)), count > n);
            }
        }
    }
}
