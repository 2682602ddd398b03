//! Dense discrete factor over an ordered list of variables.
//!
//! Values are stored row-major: the last variable of the scope varies fastest.
//! A CPT for `v` with parents `p1..pk` has scope `[p1, .., pk, v]`, so each
//! parent configuration owns a contiguous distribution over `v`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::VarId;
use crate::errors::ModelError;

#[derive(Debug, Clone, PartialEq)]
pub struct Potential {
    vars: Vec<VarId>,
    cards: Vec<usize>,
    values: Vec<f64>,
}

impl Potential {
    /// A zero-filled potential over `scope`.
    pub fn new(scope: &[(VarId, usize)]) -> Result<Self, ModelError> {
        let size = scope.iter().map(|(_, c)| *c).product();
        Self::from_values(scope, vec![0.0; size])
    }

    pub fn from_values(scope: &[(VarId, usize)], values: Vec<f64>) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::new();
        for (var, card) in scope {
            if !seen.insert(*var) {
                return Err(ModelError::InvalidPotential {
                    reason: format!("variable {var} appears twice in scope"),
                });
            }
            if *card == 0 {
                return Err(ModelError::InvalidPotential {
                    reason: format!("variable {var} has an empty domain"),
                });
            }
        }
        let expected: usize = scope.iter().map(|(_, c)| *c).product();
        if values.len() != expected {
            return Err(ModelError::InvalidPotential {
                reason: format!("expected {expected} values, got {}", values.len()),
            });
        }
        Ok(Self {
            vars: scope.iter().map(|(v, _)| *v).collect(),
            cards: scope.iter().map(|(_, c)| *c).collect(),
            values,
        })
    }

    pub fn scalar(value: f64) -> Self {
        Self {
            vars: Vec::new(),
            cards: Vec::new(),
            values: vec![value],
        }
    }

    pub fn vars(&self) -> &[VarId] {
        &self.vars
    }

    pub fn var_set(&self) -> BTreeSet<VarId> {
        self.vars.iter().copied().collect()
    }

    pub fn scope(&self) -> Vec<(VarId, usize)> {
        self.vars.iter().copied().zip(self.cards.iter().copied()).collect()
    }

    pub fn cardinality(&self, var: VarId) -> Option<usize> {
        self.position(var).map(|i| self.cards[i])
    }

    pub fn contains(&self, var: VarId) -> bool {
        self.position(var).is_some()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Value at a full assignment of the scope. Extra keys are ignored.
    pub fn get(&self, assignment: &BTreeMap<VarId, usize>) -> Option<f64> {
        let mut idx = Vec::with_capacity(self.vars.len());
        for (var, card) in self.vars.iter().zip(&self.cards) {
            let value = *assignment.get(var)?;
            if value >= *card {
                return None;
            }
            idx.push(value);
        }
        Some(self.values[self.offset(&idx)])
    }

    /// Every assignment of the scope, in storage order.
    pub fn assignments(&self) -> Assignments {
        Assignments::new(&self.cards)
    }

    fn position(&self, var: VarId) -> Option<usize> {
        self.vars.iter().position(|v| *v == var)
    }

    fn offset(&self, idx: &[usize]) -> usize {
        idx.iter()
            .zip(&self.cards)
            .fold(0, |acc, (i, card)| acc * card + i)
    }

    /// Offset of the cell selected by `idx`, an assignment of a wider scope
    /// whose positions for our variables are given by `map`.
    fn offset_mapped(&self, idx: &[usize], map: &[usize]) -> usize {
        map.iter()
            .zip(&self.cards)
            .fold(0, |acc, (pos, card)| acc * card + idx[*pos])
    }

    fn union_scope(&self, other: &Potential) -> Result<Vec<(VarId, usize)>, ModelError> {
        let mut scope = self.scope();
        for (var, card) in other.scope() {
            match self.cardinality(var) {
                Some(mine) if mine != card => {
                    return Err(ModelError::InvalidPotential {
                        reason: format!("variable {var} has cardinality {mine} and {card}"),
                    });
                }
                Some(_) => {}
                None => scope.push((var, card)),
            }
        }
        Ok(scope)
    }

    /// Pointwise combination over the union of both scopes.
    ///
    /// `op` receives the left value, the right value, and the assignment of
    /// the union scope (`vars`, `idx`) for diagnostics.
    pub fn try_combine<E, F>(&self, other: &Potential, mut op: F) -> Result<Potential, E>
    where
        E: From<ModelError>,
        F: FnMut(f64, f64, &[VarId], &[usize]) -> Result<f64, E>,
    {
        let scope = self.union_scope(other)?;
        let vars: Vec<VarId> = scope.iter().map(|(v, _)| *v).collect();
        let cards: Vec<usize> = scope.iter().map(|(_, c)| *c).collect();
        let left: Vec<usize> = (0..self.vars.len()).collect();
        let right: Vec<usize> = other
            .vars
            .iter()
            .filter_map(|v| vars.iter().position(|u| u == v))
            .collect();

        let mut values = Vec::with_capacity(cards.iter().product());
        for idx in Assignments::new(&cards) {
            let l = self.values[self.offset_mapped(&idx, &left)];
            let r = other.values[other.offset_mapped(&idx, &right)];
            values.push(op(l, r, &vars, &idx)?);
        }
        Ok(Potential { vars, cards, values })
    }

    pub fn combine<F>(&self, other: &Potential, mut op: F) -> Result<Potential, ModelError>
    where
        F: FnMut(f64, f64) -> f64,
    {
        self.try_combine(other, |l, r, _, _| Ok::<f64, ModelError>(op(l, r)))
    }

    pub fn product(&self, other: &Potential) -> Result<Potential, ModelError> {
        self.combine(other, |l, r| l * r)
    }

    /// Sum out every variable of `out` present in the scope.
    pub fn marginalize(&self, out: &BTreeSet<VarId>) -> Potential {
        let keep_pos: Vec<usize> = (0..self.vars.len())
            .filter(|i| !out.contains(&self.vars[*i]))
            .collect();
        if keep_pos.len() == self.vars.len() {
            return self.clone();
        }
        let vars: Vec<VarId> = keep_pos.iter().map(|i| self.vars[*i]).collect();
        let cards: Vec<usize> = keep_pos.iter().map(|i| self.cards[*i]).collect();
        let mut values = vec![0.0; cards.iter().product()];
        let kept = Potential {
            vars,
            cards,
            values: Vec::new(),
        };
        for (idx, value) in self.assignments().zip(&self.values) {
            values[kept.offset_mapped(&idx, &keep_pos)] += value;
        }
        Potential { values, ..kept }
    }

    /// Keep only the variables of `keep`, summing the rest out.
    pub fn margin(&self, keep: &BTreeSet<VarId>) -> Potential {
        let out = self.vars.iter().filter(|v| !keep.contains(v)).copied().collect();
        self.marginalize(&out)
    }

    /// Fix the variables of `values` that belong to the scope and drop them.
    pub fn extract(&self, values: &BTreeMap<VarId, usize>) -> Result<Potential, ModelError> {
        for (var, value) in values {
            if let Some(card) = self.cardinality(*var) {
                if *value >= card {
                    return Err(ModelError::InvalidPotential {
                        reason: format!("value {value} out of range for {var} (cardinality {card})"),
                    });
                }
            }
        }
        let keep_pos: Vec<usize> = (0..self.vars.len())
            .filter(|i| !values.contains_key(&self.vars[*i]))
            .collect();
        let vars: Vec<VarId> = keep_pos.iter().map(|i| self.vars[*i]).collect();
        let cards: Vec<usize> = keep_pos.iter().map(|i| self.cards[*i]).collect();
        let mut out = Vec::with_capacity(cards.iter().product());
        for (idx, value) in self.assignments().zip(&self.values) {
            let matches = self
                .vars
                .iter()
                .zip(&idx)
                .all(|(var, i)| values.get(var).map_or(true, |v| v == i));
            if matches {
                out.push(*value);
            }
        }
        Ok(Potential {
            vars,
            cards,
            values: out,
        })
    }

    /// Same factor with its scope laid out in `order`.
    pub fn reorder(&self, order: &[VarId]) -> Result<Potential, ModelError> {
        let same_set = order.len() == self.vars.len() && order.iter().all(|v| self.contains(*v));
        if !same_set {
            return Err(ModelError::InvalidPotential {
                reason: format!("{order:?} is not a permutation of {:?}", self.vars),
            });
        }
        let scope: Vec<(VarId, usize)> = order
            .iter()
            .filter_map(|v| self.cardinality(*v).map(|c| (*v, c)))
            .collect();
        let target = Potential::new(&scope)?;
        let map: Vec<usize> = self
            .vars
            .iter()
            .filter_map(|v| order.iter().position(|u| u == v))
            .collect();
        let mut values = vec![0.0; target.len()];
        for (idx, value) in self.assignments().zip(&self.values) {
            // `map[k]` is the new position of our k-th variable.
            let mut new_idx = vec![0; idx.len()];
            for (k, pos) in map.iter().enumerate() {
                new_idx[*pos] = idx[k];
            }
            values[target.offset(&new_idx)] = *value;
        }
        Ok(Potential { values, ..target })
    }

    /// Same values under new variable ids. Ids absent from `mapping` are kept.
    pub fn rename(&self, mapping: &BTreeMap<VarId, VarId>) -> Result<Potential, ModelError> {
        let scope: Vec<(VarId, usize)> = self
            .scope()
            .into_iter()
            .map(|(v, c)| (mapping.get(&v).copied().unwrap_or(v), c))
            .collect();
        Potential::from_values(&scope, self.values.clone())
    }

    pub fn scale(&self, factor: f64) -> Potential {
        Potential {
            values: self.values.iter().map(|v| v * factor).collect(),
            ..self.clone()
        }
    }

    /// Divide by the total mass.
    pub fn normalize(&self) -> Result<Potential, ModelError> {
        let total = self.sum();
        if total <= 0.0 {
            return Err(ModelError::ImpossibleEvidence {
                details: format!("potential over {:?} has zero mass", self.vars),
            });
        }
        Ok(self.scale(1.0 / total))
    }

    /// `self / Σ_{scope ∖ conditions} self`, i.e. the conditional table of the
    /// remaining variables given `conditions`. Impossible condition rows are 0.
    pub fn conditional(&self, conditions: &BTreeSet<VarId>) -> Result<Potential, ModelError> {
        let denominator = self.margin(conditions);
        self.combine(&denominator, |n, d| if d == 0.0 { 0.0 } else { n / d })
    }

    /// Scope-insensitive comparison with absolute tolerance `eps`.
    pub fn approx_eq(&self, other: &Potential, eps: f64) -> bool {
        if self.var_set() != other.var_set() {
            return false;
        }
        let Ok(aligned) = other.reorder(&self.vars) else {
            return false;
        };
        aligned.cards == self.cards
            && self
                .values
                .iter()
                .zip(&aligned.values)
                .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl fmt::Display for Potential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            return write!(f, "{}", self.values[0]);
        }
        for (idx, value) in self.assignments().zip(&self.values) {
            let cells: Vec<String> = self
                .vars
                .iter()
                .zip(&idx)
                .map(|(v, i)| format!("{v}={i}"))
                .collect();
            writeln!(f, "{}: {value:.6}", cells.join(","))?;
        }
        Ok(())
    }
}

/// Odometer over the assignments of a list of cardinalities (last varies fastest).
#[derive(Debug, Clone)]
pub struct Assignments {
    cards: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl Assignments {
    pub fn new(cards: &[usize]) -> Self {
        let next = if cards.iter().any(|c| *c == 0) {
            None
        } else {
            Some(vec![0; cards.len()])
        };
        Self {
            cards: cards.to_vec(),
            next,
        }
    }
}

impl Iterator for Assignments {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut succ = current.clone();
        for k in (0..succ.len()).rev() {
            succ[k] += 1;
            if succ[k] < self.cards[k] {
                self.next = Some(succ);
                break;
            }
            succ[k] = 0;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> VarId {
        VarId(0)
    }
    fn b() -> VarId {
        VarId(1)
    }

    #[test]
    fn assignments_cover_every_cell_in_storage_order() {
        let all: Vec<Vec<usize>> = Assignments::new(&[2, 3]).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[1], vec![0, 1]);
        assert_eq!(all[5], vec![1, 2]);
        assert_eq!(Assignments::new(&[]).count(), 1);
    }

    #[test]
    fn product_broadcasts_over_union_scope() {
        let pa = Potential::from_values(&[(a(), 2)], vec![0.3, 0.7]).unwrap();
        let pb = Potential::from_values(&[(b(), 2)], vec![0.5, 0.5]).unwrap();
        let joint = pa.product(&pb).unwrap();
        assert_eq!(joint.vars(), &[a(), b()]);
        assert!((joint.sum() - 1.0).abs() < 1e-12);
        let cell = joint.get(&BTreeMap::from([(a(), 1), (b(), 0)])).unwrap();
        assert!((cell - 0.35).abs() < 1e-12);
    }

    #[test]
    fn marginalize_and_reorder_agree() {
        let p = Potential::from_values(&[(a(), 2), (b(), 2)], vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let pb = p.marginalize(&BTreeSet::from([a()]));
        assert!((pb.values()[0] - 0.4).abs() < 1e-12);
        assert!((pb.values()[1] - 0.6).abs() < 1e-12);
        let swapped = p.reorder(&[b(), a()]).unwrap();
        assert_eq!(swapped.values(), &[0.1, 0.3, 0.2, 0.4]);
        assert!(swapped.approx_eq(&p, 1e-12));
    }

    #[test]
    fn extract_fixes_values() {
        let p = Potential::from_values(&[(a(), 2), (b(), 2)], vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let slice = p.extract(&BTreeMap::from([(a(), 1)])).unwrap();
        assert_eq!(slice.vars(), &[b()]);
        assert_eq!(slice.values(), &[0.3, 0.4]);
        assert!(p.extract(&BTreeMap::from([(a(), 5)])).is_err());
    }

    #[test]
    fn conditional_rows_sum_to_one() {
        let p = Potential::from_values(&[(a(), 2), (b(), 2)], vec![0.1, 0.3, 0.2, 0.4]).unwrap();
        let cond = p.conditional(&BTreeSet::from([a()])).unwrap();
        let row0 = cond.extract(&BTreeMap::from([(a(), 0)])).unwrap();
        assert!((row0.sum() - 1.0).abs() < 1e-12);
        assert!((row0.values()[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn rename_keeps_values_and_rejects_collisions() {
        let p = Potential::from_values(&[(a(), 2), (b(), 2)], vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let renamed = p.rename(&BTreeMap::from([(b(), VarId(7))])).unwrap();
        assert_eq!(renamed.vars(), &[a(), VarId(7)]);
        assert_eq!(renamed.values(), p.values());
        assert!(p.rename(&BTreeMap::from([(b(), a())])).is_err());
    }

    #[test]
    fn rejects_mismatched_cardinalities() {
        let p = Potential::from_values(&[(a(), 2)], vec![0.5, 0.5]).unwrap();
        let q = Potential::from_values(&[(a(), 3)], vec![0.2, 0.3, 0.5]).unwrap();
        assert!(p.product(&q).is_err());
        assert!(Potential::from_values(&[(a(), 2)], vec![1.0]).is_err());
    }
}
