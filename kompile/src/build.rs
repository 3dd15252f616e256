//! Construction of match trees from linear sequences.
//!
//! The builder runs all sequences of a symbol simultaneously.
//! Every sequence is represented by a *cursor* that points to
//! the next primitive to be executed.
//! All alive cursors are at the same position of the matched term,
//! and the builder emits the tree nodes that advance them,
//! splitting the set of cursors at every test.
//!
//! When some cursors descend into the arguments of the current position,
//! the other cursors are parked in a frame on a stack.
//! Once the arguments have been explored, the frame is popped and
//! its parked cursors are resumed.
//! The stack is persistent, so that both branches of a test
//! can continue with the same stack.

use crate::linear::{Leaf, Prim, Sequence};
use crate::tree::{Node, Slot, Template, Tree, Trees};
use crate::{Arity, Miller, Symbol, Term};
use alloc::vec::Vec;
use im::Vector;

#[derive(Clone)]
struct Cursor<'a, 's> {
    /// index of the rule that the sequence was created from
    rule: usize,
    seq: &'a Sequence<'s>,
    pos: usize,
    /// slots of the variables bound so far
    binds: Vector<(Miller, Slot)>,
}

impl<'a, 's> Cursor<'a, 's> {
    fn next(&self) -> Option<Prim<'s>> {
        self.seq.prims.get(self.pos).copied()
    }

    fn advance(mut self) -> Self {
        self.pos += 1;
        self
    }

    /// Advance over the given primitive, which has to be the next one.
    fn consume(self, prim: Prim<'s>) -> Self {
        assert_eq!(self.next(), Some(prim), "rule {} is out of sync", self.rule);
        self.advance()
    }

    fn bind(mut self, v: Miller, slot: Slot) -> Self {
        self.binds.push_back((v, slot));
        self.advance()
    }

    fn slot(&self, v: Miller) -> Slot {
        match self.binds.iter().find(|(w, _)| *w == v) {
            Some((_, slot)) => *slot,
            None => panic!("variable {} of rule {} is unbound", v, self.rule),
        }
    }

    fn template(&self, term: &Term<'s>, vars: &[Miller]) -> Template<'s> {
        let vars = vars.iter().map(|v| (*v, self.slot(*v))).collect();
        let term = term.clone();
        Template { term, vars }
    }

    fn tests(&self, sym: Symbol<'s>, arity: Arity) -> bool {
        self.next() == Some(Prim::F(sym, arity))
    }
}

#[derive(Clone)]
struct Frame<'a, 's> {
    /// cursors waiting for the descended position to be left
    parked: Vector<Cursor<'a, 's>>,
    /// number of positions after the descended position on its level
    left: usize,
}

#[derive(Clone)]
struct State<'a, 's> {
    /// cursors at the current position, ordered by rule
    alive: Vector<Cursor<'a, 's>>,
    /// number of positions after the current position on its level
    left: usize,
    stack: Vector<Frame<'a, 's>>,
    /// next free slot
    slot: Slot,
}

impl<'a, 's> State<'a, 's> {
    fn is_dead(&self) -> bool {
        self.alive.is_empty() && self.stack.iter().all(|fr| fr.parked.is_empty())
    }

    fn filter_map(&self, f: impl FnMut(Cursor<'a, 's>) -> Option<Cursor<'a, 's>>) -> Self {
        let alive = self.alive.iter().cloned().filter_map(f).collect();
        Self { alive, ..self.clone() }
    }

    fn has_bind(&self) -> bool {
        let is_bind = |c: &Cursor| matches!(c.next(), Some(Prim::S(_)));
        self.alive.iter().any(is_bind)
    }

    /// Return the slot that most cursors compare with.
    ///
    /// On equal counts, the slot of the earliest rule is chosen.
    fn common_slot(&self) -> Option<Slot> {
        let mut counts: Vec<(Slot, usize)> = Vec::new();
        for c in self.alive.iter() {
            if let Some(Prim::M(v)) = c.next() {
                let slot = c.slot(v);
                match counts.iter_mut().find(|(s, _)| *s == slot) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((slot, 1)),
                }
            }
        }
        counts.into_iter().rev().max_by_key(|(_, n)| *n).map(|(s, _)| s)
    }

    /// Return the symbol tested by the earliest rule.
    fn first_symbol(&self) -> Option<(Symbol<'s>, Arity)> {
        self.alive.iter().find_map(|c| match c.next()? {
            Prim::F(sym, arity) => Some((sym, arity)),
            _ => None,
        })
    }

    /// Return the number of arguments of the current position,
    /// if some cursors descend into it.
    fn descent(&self) -> Option<Arity> {
        let c = self.alive.iter().find(|c| c.next() == Some(Prim::D))?;
        match c.seq.prims[c.pos - 1] {
            Prim::F(_, arity) if arity > 0 => Some(arity),
            _ => panic!("rule {} descends without a symbol", c.rule),
        }
    }
}

fn merge<'a, 's>(c1: Vector<Cursor<'a, 's>>, c2: Vector<Cursor<'a, 's>>) -> Vector<Cursor<'a, 's>> {
    let mut all: Vec<_> = c1.into_iter().chain(c2).collect();
    all.sort_by_key(|c| c.rule);
    all.into_iter().collect()
}

struct Builder<'t, 's> {
    trees: &'t mut Trees<'s>,
}

impl<'t, 's> Builder<'t, 's> {
    fn build<'a>(&mut self, st: State<'a, 's>) -> Tree<'s> {
        if st.is_dead() {
            self.trees.intern(Node::X)
        } else if st.has_bind() {
            self.bind(st)
        } else if let Some(slot) = st.common_slot() {
            self.compare(st, slot)
        } else if let Some((sym, arity)) = st.first_symbol() {
            self.symbol(st, sym, arity)
        } else if let Some(arity) = st.descent() {
            self.descend(st, arity)
        } else {
            self.unwind(st)
        }
    }

    /// Emit a test, eliding it if both branches are the same.
    fn test<'a, F>(&mut self, yes: State<'a, 's>, no: State<'a, 's>, node: F) -> Tree<'s>
    where
        F: FnOnce(Tree<'s>, Tree<'s>) -> Node<'s>,
    {
        let (t, f) = (self.build(yes), self.build(no));
        if t == f {
            t
        } else {
            self.trees.intern(node(t, f))
        }
    }

    fn bind<'a>(&mut self, mut st: State<'a, 's>) -> Tree<'s> {
        let slot = st.slot;
        st.slot += 1;
        st = st.filter_map(|c| match c.next() {
            Some(Prim::S(v)) => Some(c.bind(v, slot)),
            _ => Some(c),
        });
        let next = self.build(st);
        self.trees.intern(Node::S(slot, next))
    }

    fn compare<'a>(&mut self, st: State<'a, 's>, slot: Slot) -> Tree<'s> {
        let compares = |c: &Cursor| matches!(c.next(), Some(Prim::M(v)) if c.slot(v) == slot);
        let yes = st.filter_map(|c| Some(if compares(&c) { c.advance() } else { c }));
        let no = st.filter_map(|c| (!compares(&c)).then(|| c));
        self.test(yes, no, |t, f| Node::M(slot, t, f))
    }

    fn symbol<'a>(&mut self, st: State<'a, 's>, sym: Symbol<'s>, arity: Arity) -> Tree<'s> {
        let yes = st.filter_map(|c| match c.next() {
            _ if c.tests(sym, arity) => Some(c.advance()),
            Some(Prim::F(..)) => None,
            _ => Some(c),
        });
        let no = st.filter_map(|c| (!c.tests(sym, arity)).then(|| c));
        self.test(yes, no, |t, f| Node::F(sym, arity, t, f))
    }

    fn descend<'a>(&mut self, st: State<'a, 's>, arity: Arity) -> Tree<'s> {
        let descends = |c: &Cursor| c.next() == Some(Prim::D);
        let (down, parked): (Vector<_>, Vector<_>) = st.alive.into_iter().partition(descends);
        let mut stack = st.stack;
        stack.push_back(Frame { parked, left: st.left });
        let alive = down.into_iter().map(Cursor::advance).collect();
        let left = arity - 1;
        let next = self.build(State { alive, left, stack, slot: st.slot });
        self.trees.intern(Node::D(next))
    }

    /// Move to the next position, resuming parked cursors when leaving a level.
    fn unwind<'a>(&mut self, mut st: State<'a, 's>) -> Tree<'s> {
        loop {
            if st.left > 0 {
                st.left -= 1;
                st.alive = st.alive.into_iter().map(|c| c.consume(Prim::N)).collect();
                let next = self.build(st);
                return self.trees.intern(Node::N(next));
            }
            match st.stack.pop_back() {
                Some(frame) => {
                    st.alive = merge(st.alive, frame.parked);
                    st.left = frame.left;
                }
                None => return self.terminal(st.alive),
            }
        }
    }

    /// Chain the leaves of all rules that matched, in rule order.
    fn terminal<'a>(&mut self, alive: Vector<Cursor<'a, 's>>) -> Tree<'s> {
        let mut tree = self.trees.intern(Node::X);
        for c in alive.iter().rev() {
            assert_eq!(c.next(), None, "rule {} is not exhausted", c.rule);
            let node = match &c.seq.leaf {
                Leaf::Re(rhs, vars) => Node::R(c.template(rhs, vars)),
                Leaf::CRe(cond, rhs, cvars, rvars) => {
                    Node::C(c.template(cond, cvars), c.template(rhs, rvars), tree)
                }
            };
            tree = self.trees.intern(node);
        }
        tree
    }
}

/// Build a match tree that finds the first rule whose sequence matches
/// a tuple of `arity` arguments.
///
/// Every sequence comes with the index of its rule,
/// and sequences have to be given in the order of their rules.
pub fn build_tree<'s>(
    seqs: &[(usize, &Sequence<'s>)],
    arity: Arity,
    trees: &mut Trees<'s>,
) -> Tree<'s> {
    let alive = seqs.iter().map(|&(rule, seq)| {
        let (pos, binds) = (0, Vector::new());
        Cursor { rule, seq, pos, binds }
    });
    let alive = alive.collect();
    let left = arity.saturating_sub(1);
    let (stack, slot) = (Vector::new(), 0);
    let tree = Builder { trees }.build(State { alive, left, stack, slot });
    debug!("Match tree for {} rules has {} nodes", seqs.len(), tree.size());
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::linearize;
    use crate::Spec;
    use alloc::string::ToString;

    fn tree<'s>(src: &'s str, sym: &str) -> (Tree<'s>, usize) {
        let spec = Spec::parse(src).unwrap();
        let sym = spec.syms.get(sym).unwrap();
        let rules = spec.sig.rules(&sym);
        let seqs: Vec<_> = rules.iter().map(|r| linearize(r).unwrap()).collect();
        let seqs: Vec<_> = seqs.iter().enumerate().collect();
        let mut trees = Trees::new();
        let arity = rules.first().map_or(0, |r| r.arity());
        (build_tree(&seqs, arity, &mut trees), trees.len())
    }

    const NAT: &str = r"
        nat : type.
        zero : nat.
        succ : nat -> nat.
        plus : nat -> nat -> nat.
    ";

    #[test]
    fn plus() {
        let rules = r"
            [y] plus zero y --> y.
            [x, y] plus (succ x) y --> succ (plus x y).
        ";
        let src = [NAT, rules].concat();
        let (tree, _) = tree(&src, "plus");
        let expected = [
            "F(zero/0)",
            "  N",
            "  S($0)",
            "  R($0)",
            "F(succ/1)",
            "  D",
            "  S($0)",
            "  N",
            "  S($1)",
            "  R((succ (plus $0 $1)))",
            "X",
        ];
        assert_eq!(tree.to_string(), expected.join("\n") + "\n");
    }

    #[test]
    fn no_rules() {
        let (tree, _) = tree(NAT, "plus");
        assert_eq!(*tree, Node::X);
    }

    #[test]
    fn nonlinear() {
        let src = r"
            b : type.
            true : b.
            false : b.
            eq : b -> b -> b.
            [x] eq x x --> true.
            [x, y] eq x y --> false.
        ";
        let (tree, _) = tree(src, "eq");
        let expected = ["S($0)", "N", "S($1)", "M($0)", "  R(true)", "R(false)"];
        assert_eq!(tree.to_string(), expected.join("\n") + "\n");
    }

    #[test]
    fn parked() {
        // the second rule waits while the first one inspects the arguments of `succ`
        let rules = r"
            [y] plus (succ zero) y --> y.
            [x] plus x zero --> x.
        ";
        let src = [NAT, rules].concat();
        let (tree, _) = tree(&src, "plus");
        let expected = [
            "S($0)",
            "F(succ/1)",
            "  D",
            "  F(zero/0)",
            "    N",
            "    S($1)",
            "    R($1)",
            "  N",
            "  F(zero/0)",
            "    R($0)",
            "  X",
            "N",
            "F(zero/0)",
            "  R($0)",
            "X",
        ];
        assert_eq!(tree.to_string(), expected.join("\n") + "\n");
    }

    #[test]
    fn shared() {
        let rules = r"
            [x] plus zero x --> zero.
            [x] plus (succ zero) x --> zero.
        ";
        let src = [NAT, rules].concat();
        let (t1, n) = tree(&src, "plus");
        let (t2, _) = tree(&src, "plus");
        // trees from different stores are not identical, but display equally
        assert_eq!(t1.to_string(), t2.to_string());
        assert!(t1.size() <= n);
    }
}
