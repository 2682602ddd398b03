//! LaTeX rendering.

use std::collections::BTreeSet;

use causa_core::{NameResolver, VarId};

use super::Formula;

impl Formula {
    pub fn to_latex(&self, names: &dyn NameResolver) -> String {
        match self {
            Self::JointProba(vars) => format!("P\\left({}\\right)", latex_list(names, vars)),
            Self::PosteriorProba(targets, conditions) => format!(
                "P\\left({}\\mid {}\\right)",
                latex_list(names, targets),
                latex_list(names, conditions)
            ),
            Self::Sum(vars, f) => format!("\\sum_{{{}}}{{{}}}", latex_list(names, vars), f.to_latex(names)),
            Self::Product(factors) if factors.is_empty() => "1".to_string(),
            Self::Product(factors) => factors
                .iter()
                .map(|f| f.to_latex_operand(names))
                .collect::<Vec<_>>()
                .join(" \\cdot "),
            Self::Division(a, b) => format!("\\frac{{{}}}{{{}}}", a.to_latex(names), b.to_latex(names)),
            Self::Plus(terms) => terms
                .iter()
                .map(|t| t.to_latex(names))
                .collect::<Vec<_>>()
                .join(" + "),
            Self::Minus(a, b) => format!("{} - {}", a.to_latex(names), b.to_latex_operand(names)),
        }
    }

    /// Sums and differences are parenthesized when used as an operand.
    fn to_latex_operand(&self, names: &dyn NameResolver) -> String {
        match self {
            Self::Plus(_) | Self::Minus(..) => format!("\\left({}\\right)", self.to_latex(names)),
            _ => self.to_latex(names),
        }
    }
}

pub fn latex_list(names: &dyn NameResolver, vars: &BTreeSet<VarId>) -> String {
    vars.iter()
        .map(|v| escape(&names.name_of(*v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape the characters LaTeX treats specially in math mode.
pub fn escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '_' | '#' | '%' | '&' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names;

    impl NameResolver for Names {
        fn name_of(&self, id: VarId) -> String {
            ["smoking", "tar", "lung_cancer"][id.index()].to_string()
        }
    }

    fn set(ids: &[u32]) -> BTreeSet<VarId> {
        ids.iter().map(|i| VarId(*i)).collect()
    }

    #[test]
    fn frontdoor_formula_in_latex() {
        let f = Formula::sum(
            set(&[1]),
            Formula::product(vec![
                Formula::posterior(set(&[1]), set(&[0])),
                Formula::sum(
                    set(&[0]),
                    Formula::product(vec![
                        Formula::posterior(set(&[2]), set(&[0, 1])),
                        Formula::joint(set(&[0])),
                    ]),
                ),
            ]),
        );
        assert_eq!(
            f.to_latex(&Names),
            "\\sum_{tar}{P\\left(tar\\mid smoking\\right) \\cdot \\sum_{smoking}{P\\left(lung\\_cancer\\mid smoking,tar\\right) \\cdot P\\left(smoking\\right)}}"
        );
    }

    #[test]
    fn differences_are_parenthesized_inside_products() {
        let diff = Formula::minus(Formula::joint(set(&[0])), Formula::joint(set(&[1])));
        let f = Formula::product(vec![diff, Formula::joint(set(&[2]))]);
        assert_eq!(
            f.to_latex(&Names),
            "\\left(P\\left(smoking\\right) - P\\left(tar\\right)\\right) \\cdot P\\left(lung\\_cancer\\right)"
        );
    }
}
