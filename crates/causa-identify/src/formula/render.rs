//! Indented plain-text rendering.
//!
//! ```text
//! sum on G for
//! | *
//! | | joint P(G)
//! | | P(R|D,G)
//! ```

use std::collections::BTreeSet;

use causa_core::{NameResolver, VarId};

use super::Formula;

const INDENT: &str = "| ";

impl Formula {
    /// One node per line, each child one `| ` deeper than its parent.
    pub fn render(&self, names: &dyn NameResolver) -> String {
        let mut lines = Vec::new();
        self.render_into(names, "", &mut lines);
        lines.join("\n")
    }

    fn render_into(&self, names: &dyn NameResolver, prefix: &str, out: &mut Vec<String>) {
        let deeper = format!("{prefix}{INDENT}");
        match self {
            Self::JointProba(vars) => out.push(format!("{prefix}joint P({})", name_list(names, vars))),
            Self::PosteriorProba(targets, conditions) => out.push(format!(
                "{prefix}P({}|{})",
                name_list(names, targets),
                name_list(names, conditions)
            )),
            Self::Sum(vars, f) => {
                out.push(format!("{prefix}sum on {} for", name_list(names, vars)));
                f.render_into(names, &deeper, out);
            }
            Self::Product(factors) if factors.is_empty() => out.push(format!("{prefix}1")),
            Self::Product(factors) => {
                out.push(format!("{prefix}*"));
                for factor in factors {
                    factor.render_into(names, &deeper, out);
                }
            }
            Self::Plus(terms) => {
                out.push(format!("{prefix}+"));
                for term in terms {
                    term.render_into(names, &deeper, out);
                }
            }
            Self::Division(a, b) => {
                out.push(format!("{prefix}/"));
                a.render_into(names, &deeper, out);
                b.render_into(names, &deeper, out);
            }
            Self::Minus(a, b) => {
                out.push(format!("{prefix}-"));
                a.render_into(names, &deeper, out);
                b.render_into(names, &deeper, out);
            }
        }
    }
}

/// Comma-separated names in id order.
pub fn name_list(names: &dyn NameResolver, vars: &BTreeSet<VarId>) -> String {
    vars.iter()
        .map(|v| names.name_of(*v))
        .collect::<Vec<_>>()
        .join(",")
}
