//! Compiled rules behave like trying the rules one by one.

mod common;

use kompile::{Compiler, Nfs, Rewriter, Signature, Spec, Step, Symbol, Term, Terms};
use proptest::prelude::*;

/// Result of the first rule that matches the arguments and whose condition holds.
///
/// A condition holds if its innermost normal form is `true`.
fn first<'s>(
    sig: &Signature<'s>,
    f: Symbol<'s>,
    args: &[Term<'s>],
    terms: &mut Terms<'s>,
) -> Option<Term<'s>> {
    sig.rules(&f).iter().find_map(|rule| {
        let subst = rule.match_args(args)?;
        let by = |v: usize| subst[v].clone();
        if let Some(cond) = &rule.cond {
            let cond = terms.subst(cond, &by);
            if innermost(sig, &cond, terms).to_string() != "true" {
                return None;
            }
        }
        Some(terms.subst(&rule.rhs, &by))
    })
}

/// Normal form obtained by normalising arguments first and then applying the first rule.
fn innermost<'s>(sig: &Signature<'s>, tm: &Term<'s>, terms: &mut Terms<'s>) -> Term<'s> {
    let args: Vec<_> = tm.args().iter().map(|a| innermost(sig, a, terms)).collect();
    if let Some(f) = tm.symbol() {
        if let Some(rhs) = first(sig, f, &args, terms) {
            return innermost(sig, &rhs, terms);
        }
    }
    terms.apply(tm.head().clone(), args)
}

proptest! {
    #[test]
    fn tree_finds_first_rule(rules in common::rules(), args in common::args()) {
        let src = common::spec(&rules, &args);
        let mut spec = Spec::parse(&src).unwrap();
        prop_assert!(spec.diagnostics.is_empty());
        let f = spec.syms.get("f").unwrap();

        let mut compiler = Compiler::new(&spec.sig, true);
        let tree = compiler.tree(f, 2, &mut spec.terms);
        for tm in spec.evals.iter() {
            let expected = first(&spec.sig, f, tm.args(), &mut spec.terms);
            let found = tree.find(tm.args(), |_| true);
            let found = found.map(|m| m.instantiate(&mut spec.terms));
            prop_assert_eq!(found, expected, "{} with tree\n{}", tm, tree);
        }
    }

    #[test]
    fn strategy_finds_first_rule(rules in common::rules(), args in common::args()) {
        let src = common::spec(&rules, &args);
        let mut spec = Spec::parse(&src).unwrap();
        let f = spec.syms.get("f").unwrap();
        let truth = spec.truth();
        let evals = spec.evals.clone();

        let compiler = Compiler::new(&spec.sig, true);
        let mut rw = Rewriter::new(compiler, truth, &mut spec.terms);
        for tm in evals.iter() {
            let expected = first(&spec.sig, f, tm.args(), &mut spec.terms);
            // all arguments consist of constructors, so they are in normal form
            let empty = rw.step(tm, &mut spec.terms);
            let full = rw.step_with(tm, Nfs::full(2), &mut spec.terms);
            prop_assert_eq!(&empty, &expected);
            prop_assert_eq!(&full, &expected);
        }
    }

    #[test]
    fn batches_partition_rules(rules in common::rules(), idx in 0..4usize) {
        let src = common::spec(&rules, &[]);
        let mut spec = Spec::parse(&src).unwrap();
        let f = spec.syms.get("f").unwrap();
        let nfs = [Nfs::empty(), Nfs::empty().with(0), Nfs::empty().with(1), Nfs::full(2)];
        let nfs = nfs[idx];

        let mut compiler = Compiler::new(&spec.sig, false);
        let prepared = compiler.prepare(f, 2, &mut spec.terms);
        let compiled = compiler.compile(f, 2, nfs, &mut spec.terms);

        let mut forced = nfs;
        let mut applied = Vec::new();
        for step in compiled.strategy.steps() {
            match step {
                Step::Force(i) => {
                    prop_assert!(!forced.get(*i), "argument {} forced twice", i);
                    forced.set(*i)
                }
                Step::Apply(batch) => {
                    prop_assert!(!batch.rules.is_empty());
                    for r in batch.rules.iter() {
                        let needs = prepared.iter().find(|p| p.index == *r).unwrap().needs;
                        prop_assert!(needs.is_subset(forced));
                    }
                    applied.extend(batch.rules.iter().copied())
                }
            }
        }
        prop_assert_eq!(applied, (0..rules.len()).collect::<Vec<_>>());
    }

    #[test]
    fn deterministic(rules in common::rules()) {
        let src = common::spec(&rules, &[]);
        let mut spec = Spec::parse(&src).unwrap();
        let f = spec.syms.get("f").unwrap();
        let t1 = Compiler::new(&spec.sig, true).tree(f, 2, &mut spec.terms);
        let t2 = Compiler::new(&spec.sig, true).tree(f, 2, &mut spec.terms);
        prop_assert_eq!(t1.to_string(), t2.to_string());
    }

    #[test]
    fn nfs_round_trip(rules in common::rules(), args in common::args(), mask in 0..4u8) {
        let src = common::spec(&rules, &args);
        let mut spec = Spec::parse(&src).unwrap();
        let truth = spec.truth();
        let evals = spec.evals.clone();
        let nfs = (0..2).filter(|i| mask >> i & 1 == 1).fold(Nfs::empty(), Nfs::with);

        let mut rw = Rewriter::new(Compiler::new(&spec.sig, true), truth, &mut spec.terms);
        for tm in evals.iter() {
            let empty = rw.step(tm, &mut spec.terms);
            let some = rw.step_with(tm, nfs, &mut spec.terms);
            prop_assert_eq!(empty, some, "{} with normal forms {}", tm, nfs);
        }
    }

    #[test]
    fn normal_forms_agree(rules in common::rules(), args in common::open_args()) {
        let src = common::spec(&rules, &args);
        let mut spec = Spec::parse(&src).unwrap();
        let truth = spec.truth();
        let evals = spec.evals.clone();

        let mut lazy = Rewriter::new(Compiler::new(&spec.sig, false), truth, &mut spec.terms);
        let mut eager = Rewriter::new(Compiler::new(&spec.sig, true), truth, &mut spec.terms);
        for tm in evals.iter() {
            let expected = innermost(&spec.sig, tm, &mut spec.terms);
            prop_assert_eq!(&lazy.normalize(tm, &mut spec.terms), &expected);
            prop_assert_eq!(&eager.normalize(tm, &mut spec.terms), &expected);
        }
    }

    #[test]
    fn conditions_select_first_rule(rules in common::conditional_rules(), args in common::args()) {
        let src = common::conditional_spec(&rules, &args);
        let mut spec = Spec::parse(&src).unwrap();
        prop_assert!(spec.diagnostics.is_empty());
        let f = spec.syms.get("f").unwrap();
        let truth = spec.truth();
        let evals = spec.evals.clone();

        let mut rw = Rewriter::new(Compiler::new(&spec.sig, true), truth, &mut spec.terms);
        let tree = rw.compiler.tree(f, 2, &mut spec.terms);
        for tm in evals.iter() {
            let expected = first(&spec.sig, f, tm.args(), &mut spec.terms);
            let found = tree.find(tm.args(), |cond| {
                let cond = cond.instantiate(&mut spec.terms);
                rw.normalize(&cond, &mut spec.terms).to_string() == "true"
            });
            let found = found.map(|m| m.instantiate(&mut spec.terms));
            prop_assert_eq!(&found, &expected, "{} with tree\n{}", tm, tree);
            prop_assert_eq!(&rw.step(tm, &mut spec.terms), &expected);
        }
    }
}
