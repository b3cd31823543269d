use std::fmt;

use scryer_prolog::Term as MachineTerm;

/// A Prolog term bound in a solution.
///
/// Atoms, strings and unbound variables are all kept as plain text and are
/// not told apart; they render the same way. Numbers keep their exact
/// decimal text, so unbounded integers survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Number(String),
    List(Vec<Term>),
    Compound { functor: String, args: Vec<Term> },
}

impl Term {
    pub fn atom<S: Into<String>>(text: S) -> Term {
        Term::Atom(text.into())
    }

    pub fn int(value: i64) -> Term {
        Term::Number(value.to_string())
    }

    pub fn compound<S: Into<String>>(functor: S, args: Vec<Term>) -> Term {
        Term::Compound {
            functor: functor.into(),
            args,
        }
    }

    /// Name of the principal functor, or the text itself for atoms.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Atom(name) => Some(name),
            Term::Compound { functor, .. } => Some(functor),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Compound { args, .. } => args,
            _ => &[],
        }
    }
}

impl From<MachineTerm> for Term {
    fn from(term: MachineTerm) -> Term {
        match term {
            MachineTerm::Integer(n) => Term::Number(n.to_string()),
            MachineTerm::Rational(n) => Term::Number(n.to_string()),
            MachineTerm::Float(n) => Term::Number(n.to_string()),
            MachineTerm::Atom(text) | MachineTerm::String(text) | MachineTerm::Var(text) => {
                Term::Atom(text)
            }
            MachineTerm::List(items) => Term::List(items.into_iter().map(Term::from).collect()),
            MachineTerm::Compound(functor, args) => {
                Term::compound(functor, args.into_iter().map(Term::from).collect())
            }
            #[allow(unreachable_patterns)]
            other => Term::Atom(format!("{:?}", other)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Atom(text) | Term::Number(text) => write!(f, "{}", text),
            Term::List(items) => {
                write!(f, "[")?;
                write_args(f, items)?;
                write!(f, "]")
            }
            Term::Compound { functor, args } => {
                write!(f, "{}(", functor)?;
                write_args(f, args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter, args: &[Term]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i != 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}
