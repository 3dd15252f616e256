//! Processing of files.

use crate::{Emit, Error, Opt};
use core::fmt::Write;
use kompile::linear::linearize;
use kompile::{Compiler, Nfs, Rewriter, Spec};
use std::path::Path;

/// Compile and evaluate a file, returning what should be printed.
pub fn process(path: &Path, opt: &Opt) -> Result<String, Error> {
    log::info!("Process {}", path.display());
    let src = std::fs::read_to_string(path)?;
    let mut spec = Spec::parse(&src)?;
    let mut out = String::new();

    for (rule, err) in &spec.diagnostics {
        writeln!(out, "Rejected rule {}: {:?}", rule, err)?;
    }

    let mut compiler = Compiler::new(&spec.sig, !opt.no_nfs);
    let syms: Vec<_> = spec.sig.symbols().collect();
    let with_rules = syms.iter().filter(|s| !spec.sig.rules(s).is_empty());

    for sym in with_rules {
        let arity = spec.sig.arity(sym).unwrap_or(0);
        if opt.emits(Emit::Sequences) {
            for rule in spec.sig.rules(sym) {
                let seq = linearize(rule).map_err(kompile::Error::from)?;
                writeln!(out, "{}: {}", sym, seq)?;
            }
        }
        if opt.emits(Emit::Trees) {
            let tree = compiler.tree(*sym, arity, &mut spec.terms);
            writeln!(out, "{}/{}:\n{}", sym, arity, tree)?;
        }
        if opt.emits(Emit::Strategies) {
            let base = compiler.verdicts().base(*sym, arity);
            let compiled = compiler.compile(*sym, arity, base, &mut spec.terms);
            writeln!(out, "{}/{} with {}:\n{}", sym, arity, base, compiled.strategy)?;
        }
    }

    if opt.emits(Emit::Nfs) {
        for sym in syms.iter() {
            let full = spec.sig.arity(sym).unwrap_or(0);
            for arity in 1..=full {
                writeln!(out, "{}/{}: {}", sym, arity, compiler.verdicts().base(*sym, arity))?;
            }
        }
    }

    if !opt.no_eval {
        let evals = spec.evals.clone();
        let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
        for tm in evals.iter() {
            let nf = rw.normalize(tm, &mut spec.terms);
            writeln!(out, "{} ~> {}", tm, nf)?;
        }
        log::info!("Compiled {} match tree nodes", rw.compiler.nodes());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn opt(emit: Vec<Emit>) -> Opt {
        let files = Vec::new();
        let (no_eval, no_nfs, jobs) = (false, false, None);
        Opt { emit, no_eval, no_nfs, jobs, files }
    }

    fn demo(name: &str) -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "..", "demos", name].iter().collect()
    }

    #[test]
    fn nat() {
        let out = process(&demo("nat.rw"), &opt(Vec::new())).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "(plus (succ (succ zero)) (succ zero)) ~> (succ (succ (succ zero)))");
        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with(" ~> (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ (succ zero)))))))))))))))))))))"));
        assert!(lines[3].ends_with(" ~> zero"));
    }

    #[test]
    fn emit() {
        let emit = vec![Emit::Sequences, Emit::Nfs];
        let out = process(&demo("bool.rw"), &Opt { no_eval: true, ..opt(emit) }).unwrap();
        assert!(out.contains("not: [F(true)] -> Re(false)\n"));
        assert!(out.contains("eq: [S(x), N, M(x)] -> Re(true)\n"));
        assert!(out.contains("ite/3: {0}\n"));
        assert!(!out.contains(" ~> "));
    }

    #[test]
    fn sort() {
        let out = process(&demo("sort.rw"), &opt(vec![Emit::Trees])).unwrap();
        assert!(out.contains("C((le $0 $1)) -> $1\n"));
        let sorted = "(cons zero (cons (succ zero) (cons (succ (succ zero)) \
                      (cons (succ (succ (succ zero))) nil))))";
        assert!(out.contains(&format!(" ~> {}\n", sorted)));
    }
}
