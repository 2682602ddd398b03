//! The closed formula tree produced by identification.
//!
//! Variable sets are `BTreeSet`s, so every rendering lists variables in id
//! order. Build trees through the smart constructors: they keep products
//! flat and elide empty sums, which the renderers rely on.

use std::collections::BTreeSet;

use causa_core::VarId;

#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// `P(vars)`.
    JointProba(BTreeSet<VarId>),
    /// `P(targets | conditions)`, conditions never empty.
    PosteriorProba(BTreeSet<VarId>, BTreeSet<VarId>),
    /// `Σ_vars f`.
    Sum(BTreeSet<VarId>, Box<Formula>),
    /// Product of the factors; the empty product is 1.
    Product(Vec<Formula>),
    Division(Box<Formula>, Box<Formula>),
    Plus(Vec<Formula>),
    Minus(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn joint(vars: BTreeSet<VarId>) -> Self {
        Self::JointProba(vars)
    }

    /// `P(targets | conditions)`; a conditional without conditions is a joint.
    pub fn posterior(targets: BTreeSet<VarId>, conditions: BTreeSet<VarId>) -> Self {
        let conditions: BTreeSet<VarId> = conditions.difference(&targets).copied().collect();
        if conditions.is_empty() {
            Self::JointProba(targets)
        } else {
            Self::PosteriorProba(targets, conditions)
        }
    }

    /// `Σ_vars f`, restricted to the variables free in `f`. Nested sums merge.
    pub fn sum(vars: BTreeSet<VarId>, f: Formula) -> Self {
        let free = f.free_variables();
        let vars: BTreeSet<VarId> = vars.intersection(&free).copied().collect();
        if vars.is_empty() {
            return f;
        }
        match f {
            Self::Sum(inner, g) => {
                let merged = vars.union(&inner).copied().collect();
                Self::Sum(merged, g)
            }
            other => Self::Sum(vars, Box::new(other)),
        }
    }

    /// Flattened product. A single factor is returned as is.
    pub fn product(factors: Vec<Formula>) -> Self {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Self::Product(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Product(flat)
        }
    }

    pub fn division(numerator: Formula, denominator: Formula) -> Self {
        Self::Division(Box::new(numerator), Box::new(denominator))
    }

    pub fn plus(terms: Vec<Formula>) -> Self {
        if terms.len() == 1 {
            let mut terms = terms;
            return terms.remove(0);
        }
        Self::Plus(terms)
    }

    pub fn minus(left: Formula, right: Formula) -> Self {
        Self::Minus(Box::new(left), Box::new(right))
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self::Product(Vec::new())
    }

    /// Variables the value of the formula depends on.
    pub fn free_variables(&self) -> BTreeSet<VarId> {
        match self {
            Self::JointProba(vars) => vars.clone(),
            Self::PosteriorProba(targets, conditions) => targets.union(conditions).copied().collect(),
            Self::Sum(vars, f) => f.free_variables().difference(vars).copied().collect(),
            Self::Product(fs) | Self::Plus(fs) => fs.iter().flat_map(Formula::free_variables).collect(),
            Self::Division(a, b) | Self::Minus(a, b) => {
                let mut vars = a.free_variables();
                vars.extend(b.free_variables());
                vars
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::JointProba(_) | Self::PosteriorProba(..))
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + match self {
            Self::JointProba(_) | Self::PosteriorProba(..) => 0,
            Self::Sum(_, f) => f.size(),
            Self::Product(fs) | Self::Plus(fs) => fs.iter().map(Formula::size).sum(),
            Self::Division(a, b) | Self::Minus(a, b) => a.size() + b.size(),
        }
    }
}
