//! Random specifications over a small signature.

use proptest::prelude::*;

/// Declarations of constructors, of the function `f` that rules are given for,
/// and of a predicate `isa` that conditions can use.
pub const DECLS: &str = r"
    s : type.
    a : s.
    b : s.
    g : s -> s.
    h : s -> s -> s.
    f : s -> s -> s.
    bool : type.
    true : bool.
    false : bool.
    isa : s -> bool.
    [] isa a --> true.
    [y] isa (g y) --> isa y.
";

/// Pattern over the variables `x` and `y`.
pub fn pattern() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("x"), Just("y"), Just("a"), Just("b")].prop_map(String::from);
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|p| format!("(g {})", p)),
            (inner.clone(), inner).prop_map(|(p, q)| format!("(h {} {})", p, q)),
        ]
    })
}

/// Term without variables.
pub fn ground() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("a"), Just("b")].prop_map(String::from);
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| format!("(g {})", t)),
            (inner.clone(), inner).prop_map(|(t, u)| format!("(h {} {})", t, u)),
        ]
    })
}

/// Term without variables that may contain `f`.
pub fn open() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("a"), Just("b")].prop_map(String::from);
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| format!("(g {})", t)),
            (inner.clone(), inner.clone()).prop_map(|(t, u)| format!("(h {} {})", t, u)),
            (inner.clone(), inner).prop_map(|(t, u)| format!("(f {} {})", t, u)),
        ]
    })
}

pub fn rules() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((pattern(), pattern()), 0..6)
}

pub fn args() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((ground(), ground()), 1..8)
}

/// Rules with conditions, where `V` stands for a variable bound by the rule.
pub fn conditional_rules() -> impl Strategy<Value = Vec<(String, String, String)>> {
    let cond = prop_oneof![Just(""), Just("when true"), Just("when false"), Just("when isa V")];
    let rule = (pattern(), pattern(), cond.prop_map(String::from));
    prop::collection::vec(rule, 0..6)
}

pub fn open_args() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((open(), open()), 1..8)
}

/// Render rules for `f` and terms to be evaluated as a specification.
///
/// Every rule returns `h` applied to a constant identifying the rule and
/// a variable bound by the rule (if any),
/// so that results tell which rule was applied with which binding.
pub fn spec(rules: &[(String, String)], args: &[(String, String)]) -> String {
    let rules = rules.iter().map(|(p, q)| (p.clone(), q.clone(), String::new()));
    conditional_spec(&rules.collect::<Vec<_>>(), args)
}

/// Like [`spec`], but every rule comes with a possibly empty condition.
pub fn conditional_spec(rules: &[(String, String, String)], args: &[(String, String)]) -> String {
    let mut src = String::from(DECLS);
    for i in 0..rules.len() {
        src += &format!("r{} : s.\n", i);
    }
    for (i, (p, q, cond)) in rules.iter().enumerate() {
        let uses = |v: &str| p.contains(v) || q.contains(v);
        let v = ["x", "y"].into_iter().find(|v| uses(*v)).unwrap_or("a");
        let cond = cond.replace('V', v);
        src += &format!("[x, y] f {} {} --> h r{} {} {}.\n", p, q, i, v, cond);
    }
    for (t, u) in args {
        src += &format!("#EVAL f {} {}.\n", t, u);
    }
    src
}
