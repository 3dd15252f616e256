//! Small specifications with known compilation results.

use kompile::linear::linearize;
use kompile::{Compiler, Nfs, Rewriter, Spec, Step};

const NAT: &str = r"
    nat : type.
    zero : nat.
    succ : nat -> nat.
    three : nat.
    f : nat -> nat -> nat.
    [y] f zero y --> y.
    [x, y] f (succ x) y --> succ (f x y).
    #EVAL f (succ zero) three.
";

#[test]
fn one_step() {
    let mut spec = Spec::parse(NAT).unwrap();
    let f = spec.syms.get("f").unwrap();

    let seqs: Vec<_> = spec.sig.rules(&f).iter().map(|r| linearize(r).unwrap()).collect();
    assert_eq!(seqs[0].to_string(), "[F(zero), N, S(y)] -> Re(y)");
    assert_eq!(
        seqs[1].to_string(),
        "[F(succ), D, S(x), N, S(y)] -> Re((succ (f x y)))"
    );

    let mut compiler = Compiler::new(&spec.sig, true);
    let tree = compiler.tree(f, 2, &mut spec.terms);
    let tm = spec.evals[0].clone();
    let found = tree.find(tm.args(), |_| true).unwrap();
    let binds: Vec<_> = found.binds.iter().map(|t| t.to_string()).collect();
    assert_eq!(binds, ["zero", "three"]);

    let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
    let rhs = rw.step(&tm, &mut spec.terms).unwrap();
    assert_eq!(rhs.to_string(), "(succ (f zero three))");
}

#[test]
fn no_rules() {
    let src = r"
        a : type.
        c : a.
        k : a -> a -> a.
        #EVAL k c (k c c).
    ";
    let mut spec = Spec::parse(src).unwrap();
    let k = spec.syms.get("k").unwrap();
    let tm = spec.evals[0].clone();

    let mut compiler = Compiler::new(&spec.sig, true);
    for nfs in [Nfs::empty(), Nfs::empty().with(1), Nfs::full(2)] {
        let compiled = compiler.compile(k, 2, nfs, &mut spec.terms);
        assert_eq!(compiled.tree.to_string(), "X\n");
        assert!(compiled.strategy.steps().is_empty());
        assert_eq!(compiled.strategy.forced(), Nfs::empty());
    }

    let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
    assert_eq!(rw.step(&tm, &mut spec.terms), None);
    assert_eq!(rw.normalize(&tm, &mut spec.terms), tm);
}

#[test]
fn repeated_var() {
    let src = r"
        b : type.
        true : b.
        false : b.
        s : type.
        a : s.
        c : s.
        eq : s -> s -> b.
        [x] eq x x --> true.
        #EVAL eq a c.
        #EVAL eq a a.
    ";
    let mut spec = Spec::parse(src).unwrap();
    let eq = spec.syms.get("eq").unwrap();

    let mut compiler = Compiler::new(&spec.sig, true);
    let tree = compiler.tree(eq, 2, &mut spec.terms);
    assert_eq!(tree.to_string(), "S($0)\nN\nM($0)\n  R(true)\nX\n");

    let (ac, aa) = (&spec.evals[0], &spec.evals[1]);
    assert!(tree.find(ac.args(), |_| true).is_none());
    let found = tree.find(aa.args(), |_| true).unwrap();
    assert_eq!(found.binds.len(), 1);
    assert_eq!(found.instantiate(&mut spec.terms).to_string(), "true");
}

const ITE: &str = r"
    b : type.
    t : b.
    u : b.
    not : b -> b.
    ite : b -> b -> b -> b.
    [] not u --> t.
    [] not t --> u.
    [x, y] ite t x y --> x.
    [x, y] ite u x y --> y.
    #EVAL ite (not u) t (not t).
";

#[test]
fn forced_condition() {
    let mut spec = Spec::parse(ITE).unwrap();
    let ite = spec.syms.get("ite").unwrap();
    let tm = spec.evals[0].clone();

    let mut compiler = Compiler::new(&spec.sig, true);
    assert!(compiler.verdicts().must_force(ite, 3, 0));
    let compiled = compiler.compile(ite, 3, Nfs::empty(), &mut spec.terms);
    assert!(matches!(compiled.strategy.steps()[0], Step::Force(0)));

    let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
    let rhs = rw.step(&tm, &mut spec.terms).unwrap();
    assert_eq!(rhs.to_string(), "t");
    // claiming that the condition is normal when it is not loses the rewrite
    assert_eq!(rw.step_with(&tm, Nfs::empty().with(0), &mut spec.terms), None);
}

#[test]
fn nfs_on_off() {
    let mut spec = Spec::parse(ITE).unwrap();
    let tm = spec.evals[0].clone();

    let with = Compiler::new(&spec.sig, true);
    let without = Compiler::new(&spec.sig, false);
    assert!(without.verdicts().base(spec.syms.get("ite").unwrap(), 3).is_empty());

    let nf1 = Rewriter::new(with, spec.truth(), &mut spec.terms).normalize(&tm, &mut spec.terms);
    let nf2 = Rewriter::new(without, spec.truth(), &mut spec.terms).normalize(&tm, &mut spec.terms);
    assert_eq!(nf1, nf2);
    assert_eq!(nf1.to_string(), "t");
}

#[test]
fn cyclic_rules() {
    let src = r"
        a : type.
        c : a.
        k : a -> a.
        p : a -> a -> a.
        q : a -> a -> a.
        [x, y] p x y --> q y x.
        [x, y] q x y --> p y x.
        [x] k x --> p c x.
    ";
    let spec = Spec::parse(src).unwrap();
    let compiler = Compiler::new(&spec.sig, true);
    let verdicts = compiler.verdicts();
    let [k, p, q] = ["k", "p", "q"].map(|s| spec.syms.get(s).unwrap());
    // nothing ever inspects the arguments, so nothing needs to be forced
    for sym in [p, q] {
        assert_eq!(verdicts.base(sym, 2), Nfs::empty());
    }
    assert_eq!(verdicts.base(k, 1), Nfs::empty());
}
