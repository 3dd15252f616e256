//! Match trees.

use crate::{Arity, Miller, Symbol, Term};
use alloc::{rc::Rc, vec::Vec};
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use fnv::{FnvHashMap, FnvHashSet};

/// Index of a term bound while walking a match tree.
pub type Slot = usize;

/// Term to be instantiated once a match tree has found a rule.
///
/// The variables of the term are to be replaced by the terms bound to their slots.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Template<'s> {
    pub term: Term<'s>,
    pub vars: Vec<(Miller, Slot)>,
}

impl<'s> Template<'s> {
    /// Return the slot of a variable.
    pub fn slot(&self, v: Miller) -> Option<Slot> {
        self.vars.iter().find(|(w, _)| *w == v).map(|(_, s)| *s)
    }
}

impl<'s> Display for Template<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tm = self.term.display_with(|v, f| match self.slot(v) {
            Some(s) => write!(f, "${}", s),
            None => write!(f, "μ{}", v),
        });
        tm.fmt(f)
    }
}

/// Match tree node.
///
/// A match tree walks over the arguments of a term in pre-order.
/// The term at the current position is called the *focus*.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node<'s> {
    /// bind the focus to a slot
    S(Slot, Tree<'s>),
    /// continue with the first tree if the focus equals the term in the slot
    M(Slot, Tree<'s>, Tree<'s>),
    /// continue with the first tree if the focus is the symbol applied to as many arguments
    F(Symbol<'s>, Arity, Tree<'s>, Tree<'s>),
    /// move the focus to the next position
    N(Tree<'s>),
    /// move the focus to the first argument of the focus
    D(Tree<'s>),
    /// yield the result if the condition holds, else continue with the tree
    C(Template<'s>, Template<'s>, Tree<'s>),
    /// yield the result
    R(Template<'s>),
    /// no rule applies
    X,
}

/// Pointer to a match tree node that was created by a [`Trees`] store.
///
/// Like terms, trees are compared and hashed by address.
#[derive(Clone, Debug)]
pub struct Tree<'s>(Rc<Node<'s>>);

impl<'s> PartialEq for Tree<'s> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<'s> Eq for Tree<'s> {}

impl<'s> Hash for Tree<'s> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(Rc::as_ptr(&self.0), state)
    }
}

impl<'s> Deref for Tree<'s> {
    type Target = Node<'s>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'s> Tree<'s> {
    fn children(&self) -> impl Iterator<Item = &Self> {
        let (t, f) = match &**self {
            Node::S(_, t) | Node::N(t) | Node::D(t) | Node::C(_, _, t) => (Some(t), None),
            Node::M(_, t, f) | Node::F(_, _, t, f) => (Some(t), Some(f)),
            Node::R(_) | Node::X => (None, None),
        };
        t.into_iter().chain(f)
    }

    /// Return the number of distinct nodes in the tree.
    pub fn size(&self) -> usize {
        let mut seen = FnvHashSet::default();
        let mut todo = Vec::from([self]);
        while let Some(tree) = todo.pop() {
            if seen.insert(tree) {
                todo.extend(tree.children())
            }
        }
        seen.len()
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        write!(f, "{:1$}", "", 2 * depth)?;
        match &**self {
            Node::S(s, next) => {
                writeln!(f, "S(${})", s)?;
                next.fmt_indent(f, depth)
            }
            Node::M(s, t, e) => {
                writeln!(f, "M(${})", s)?;
                t.fmt_indent(f, depth + 1)?;
                e.fmt_indent(f, depth)
            }
            Node::F(sym, arity, t, e) => {
                writeln!(f, "F({}/{})", sym, arity)?;
                t.fmt_indent(f, depth + 1)?;
                e.fmt_indent(f, depth)
            }
            Node::N(next) => {
                writeln!(f, "N")?;
                next.fmt_indent(f, depth)
            }
            Node::D(next) => {
                writeln!(f, "D")?;
                next.fmt_indent(f, depth)
            }
            Node::C(cond, res, next) => {
                writeln!(f, "C({}) -> {}", cond, res)?;
                next.fmt_indent(f, depth)
            }
            Node::R(res) => writeln!(f, "R({})", res),
            Node::X => writeln!(f, "X"),
        }
    }
}

/// Display the tree with one node per line.
///
/// The true branch of a test is indented,
/// its false branch follows at the level of the test.
impl<'s> Display for Tree<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

/// Store that creates every tree node at most once.
///
/// ~~~
/// # use kompile::{Node, Trees};
/// let mut trees = Trees::new();
/// let x = trees.intern(Node::X);
/// let n1 = trees.intern(Node::N(x.clone()));
/// let n2 = trees.intern(Node::N(x));
/// assert!(n1 == n2);
/// assert_eq!(n1.size(), 2);
/// ~~~
#[derive(Default)]
pub struct Trees<'s>(FnvHashMap<Node<'s>, Tree<'s>>);

impl<'s> Trees<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return the unique tree for a node.
    pub fn intern(&mut self, node: Node<'s>) -> Tree<'s> {
        if let Some(tree) = self.0.get(&node) {
            return tree.clone();
        }
        let tree = Tree(Rc::new(node.clone()));
        self.0.insert(node, tree.clone());
        tree
    }

    /// Return the number of distinct nodes created so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
