//! # Rank-1 Constraint Systems
//!
//! The constraint language of every circuit in this crate. A constraint
//! states `⟨a, z⟩ · ⟨b, z⟩ = ⟨c, z⟩` where `z = (1, public…, private…)`,
//! so every check is a polynomial equality of degree at most two.
//!
//! ## Two synthesis modes
//!
//! The same circuit code runs twice:
//!
//! - [`SynthesisMode::Setup`] records the constraint shape. Value closures
//!   passed to `alloc_*` are never invoked, so no assignment is needed.
//! - [`SynthesisMode::Witness`] additionally evaluates every closure and
//!   stores the resulting values.
//!
//! Gadgets must not branch on values when deciding which constraints to
//! emit; otherwise the two modes would disagree on the shape. The witness
//! builder catches such a mismatch through the shape digest.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rxzk_core::{
    sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest, FieldElement, SignalError,
    Visibility,
};

/// Error raised while running a circuit's synthesis code.
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// A value closure was invoked without an assignment to read from.
    #[error("no value available for signal {0:?}")]
    AssignmentMissing(String),

    /// The supplied assignment is malformed.
    #[error(transparent)]
    Signal(#[from] SignalError),

    /// The shape could not be canonicalized for digesting.
    #[error("shape canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// A variable of the constraint system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// The constant `1`.
    One,
    /// The `i`-th public signal, in public input vector order.
    Public(usize),
    /// The `i`-th private signal, in allocation order.
    Private(usize),
}

/// A weighted sum of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearCombination {
    terms: Vec<(Variable, FieldElement)>,
}

impl LinearCombination {
    /// The empty sum.
    pub fn zero() -> Self {
        Self::default()
    }

    /// `value · 1`.
    pub fn constant(value: FieldElement) -> Self {
        Self::zero().add_term(Variable::One, value)
    }

    /// Append `coeff · var`.
    pub fn add_term(mut self, var: Variable, coeff: FieldElement) -> Self {
        if let Some(existing) = self.terms.iter_mut().find(|(v, _)| *v == var) {
            existing.1 = existing.1 + coeff;
        } else {
            self.terms.push((var, coeff));
        }
        self
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&self, factor: FieldElement) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(v, c)| (*v, *c * factor))
                .collect(),
        }
    }

    /// The `(variable, coefficient)` pairs.
    pub fn terms(&self) -> &[(Variable, FieldElement)] {
        &self.terms
    }

    /// Evaluate against an assignment; `None` if any variable is unassigned.
    pub fn evaluate<F>(&self, value_of: F) -> Option<FieldElement>
    where
        F: Fn(Variable) -> Option<FieldElement>,
    {
        self.terms
            .iter()
            .try_fold(FieldElement::zero(), |acc, (var, coeff)| {
                Some(acc + *coeff * value_of(*var)?)
            })
    }
}

impl From<Variable> for LinearCombination {
    fn from(var: Variable) -> Self {
        Self::zero().add_term(var, FieldElement::one())
    }
}

impl std::ops::Add for LinearCombination {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        rhs.terms
            .into_iter()
            .fold(self, |acc, (var, coeff)| acc.add_term(var, coeff))
    }
}

impl std::ops::Sub for LinearCombination {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + rhs.scale(-FieldElement::one())
    }
}

/// One rank-1 constraint `a · b = c`, labelled with its namespace path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Left factor.
    pub a: LinearCombination,
    /// Right factor.
    pub b: LinearCombination,
    /// Product.
    pub c: LinearCombination,
    /// Slash-separated path, e.g. `freshness/less_than/recompose`.
    pub label: String,
}

impl Constraint {
    /// Whether the constraint holds; `None` if a variable is unassigned.
    pub fn is_satisfied<F>(&self, value_of: F) -> Option<bool>
    where
        F: Fn(Variable) -> Option<FieldElement> + Copy,
    {
        let a = self.a.evaluate(value_of)?;
        let b = self.b.evaluate(value_of)?;
        let c = self.c.evaluate(value_of)?;
        Some(a * b == c)
    }
}

/// Whether synthesis records values alongside constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Shape only.
    Setup,
    /// Shape and values.
    Witness,
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    value: Option<FieldElement>,
}

/// Mutable state of one synthesis pass.
#[derive(Debug)]
pub struct ConstraintSystem {
    mode: SynthesisMode,
    public: Vec<Slot>,
    private: Vec<Slot>,
    constraints: Vec<Constraint>,
    namespace: Vec<String>,
}

impl ConstraintSystem {
    /// A fresh system in the given mode.
    pub fn new(mode: SynthesisMode) -> Self {
        Self {
            mode,
            public: Vec::new(),
            private: Vec::new(),
            constraints: Vec::new(),
            namespace: Vec::new(),
        }
    }

    /// The synthesis mode.
    pub fn mode(&self) -> SynthesisMode {
        self.mode
    }

    /// Allocate the next public signal. Public signals are numbered in
    /// allocation order, which therefore fixes the public input vector order.
    pub fn alloc_public<F>(&mut self, name: &str, value: F) -> Result<Variable, SynthesisError>
    where
        F: FnOnce() -> Result<FieldElement, SynthesisError>,
    {
        let slot = self.slot(name, value)?;
        self.public.push(slot);
        Ok(Variable::Public(self.public.len() - 1))
    }

    /// Allocate the next private signal (input or auxiliary hint).
    pub fn alloc_private<F>(&mut self, name: &str, value: F) -> Result<Variable, SynthesisError>
    where
        F: FnOnce() -> Result<FieldElement, SynthesisError>,
    {
        let slot = self.slot(name, value)?;
        self.private.push(slot);
        Ok(Variable::Private(self.private.len() - 1))
    }

    /// Record `a · b = c` under the current namespace.
    pub fn enforce(
        &mut self,
        label: &str,
        a: LinearCombination,
        b: LinearCombination,
        c: LinearCombination,
    ) {
        let label = self.qualify(label);
        self.constraints.push(Constraint { a, b, c, label });
    }

    /// Run `f` inside a child namespace.
    pub fn namespace<T, F>(&mut self, name: &str, f: F) -> Result<T, SynthesisError>
    where
        F: FnOnce(&mut Self) -> Result<T, SynthesisError>,
    {
        self.namespace.push(name.to_string());
        let result = f(self);
        self.namespace.pop();
        result
    }

    /// The value of `var`, when known.
    pub fn value(&self, var: Variable) -> Option<FieldElement> {
        match var {
            Variable::One => Some(FieldElement::one()),
            Variable::Public(i) => self.public.get(i).and_then(|s| s.value),
            Variable::Private(i) => self.private.get(i).and_then(|s| s.value),
        }
    }

    /// Number of constraints recorded so far.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// The first constraint that does not hold, with its index.
    ///
    /// Always `None` in setup mode.
    pub fn which_is_unsatisfied(&self) -> Option<(usize, &Constraint)> {
        if self.mode == SynthesisMode::Setup {
            return None;
        }
        self.constraints
            .iter()
            .enumerate()
            .find(|(_, c)| c.is_satisfied(|v| self.value(v)) != Some(true))
    }

    /// Freeze the recorded constraints into a shape, returning the values
    /// (if any) alongside it.
    pub fn finish(self, circuit: &str) -> Result<SynthesisOutput, SynthesisError> {
        let (public_signals, public_values): (Vec<_>, Vec<_>) =
            self.public.into_iter().map(|s| (s.name, s.value)).unzip();
        let (private_signals, private_values): (Vec<_>, Vec<_>) =
            self.private.into_iter().map(|s| (s.name, s.value)).unzip();
        let shape = R1csShape::new(circuit, public_signals, private_signals, self.constraints)?;
        Ok(SynthesisOutput {
            shape,
            public_values,
            private_values,
        })
    }

    fn slot<F>(&self, name: &str, value: F) -> Result<Slot, SynthesisError>
    where
        F: FnOnce() -> Result<FieldElement, SynthesisError>,
    {
        let value = match self.mode {
            SynthesisMode::Setup => None,
            SynthesisMode::Witness => Some(value()?),
        };
        Ok(Slot {
            name: self.qualify(name),
            value,
        })
    }

    fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.namespace.join("/"), name)
        }
    }
}

/// Result of [`ConstraintSystem::finish`].
#[derive(Debug)]
pub struct SynthesisOutput {
    /// The frozen constraint shape.
    pub shape: R1csShape,
    /// Public values in vector order (all `None` in setup mode).
    pub public_values: Vec<Option<FieldElement>>,
    /// Private values in allocation order (all `None` in setup mode).
    pub private_values: Vec<Option<FieldElement>>,
}

/// The immutable constraint system of a circuit: signal names and
/// constraints, fixed at design time and identical for every assignment.
///
/// The digest is cached at synthesis time; a deserialized shape recomputes
/// it on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct R1csShape {
    circuit: String,
    public_signals: Vec<String>,
    private_signals: Vec<String>,
    constraints: Vec<Constraint>,
    #[serde(skip)]
    digest: Option<ContentDigest>,
}

impl PartialEq for R1csShape {
    fn eq(&self, other: &Self) -> bool {
        self.circuit == other.circuit
            && self.public_signals == other.public_signals
            && self.private_signals == other.private_signals
            && self.constraints == other.constraints
    }
}

impl Eq for R1csShape {}

impl R1csShape {
    fn new(
        circuit: &str,
        public_signals: Vec<String>,
        private_signals: Vec<String>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, SynthesisError> {
        let mut shape = Self {
            circuit: circuit.to_string(),
            public_signals,
            private_signals,
            constraints,
            digest: None,
        };
        shape.digest = Some(sha256_digest(&CanonicalBytes::new(&shape)?));
        Ok(shape)
    }

    /// Circuit name.
    pub fn circuit(&self) -> &str {
        &self.circuit
    }

    /// SHA-256 over the canonical serialization of the shape.
    pub fn digest(&self) -> Result<ContentDigest, SynthesisError> {
        match &self.digest {
            Some(d) => Ok(d.clone()),
            None => {
                let stripped = Self {
                    digest: None,
                    ..self.clone()
                };
                Ok(sha256_digest(&CanonicalBytes::new(&stripped)?))
            }
        }
    }

    /// Public signal names in vector order.
    pub fn public_signals(&self) -> &[String] {
        &self.public_signals
    }

    /// Private signal names in allocation order.
    pub fn private_signals(&self) -> &[String] {
        &self.private_signals
    }

    /// Visibility of a named signal, if the shape declares it.
    pub fn visibility(&self, name: &str) -> Option<Visibility> {
        if self.public_signals.iter().any(|s| s == name) {
            Some(Visibility::Public)
        } else if self.private_signals.iter().any(|s| s == name) {
            Some(Visibility::Private)
        } else {
            None
        }
    }

    /// All constraints.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of public signals.
    pub fn num_public(&self) -> usize {
        self.public_signals.len()
    }

    /// Number of private signals, hints included.
    pub fn num_private(&self) -> usize {
        self.private_signals.len()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// A circuit: synthesis code that can run in either [`SynthesisMode`].
pub trait Circuit {
    /// Stable circuit name, part of the shape digest.
    fn name(&self) -> &'static str;

    /// Emit constraints (and, in witness mode, values) into `cs`.
    fn synthesize(&self, cs: &mut ConstraintSystem) -> Result<(), SynthesisError>;
}

/// Run `circuit` in setup mode and return its shape.
pub fn synthesize_shape<C: Circuit>(circuit: &C) -> Result<R1csShape, SynthesisError> {
    let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
    circuit.synthesize(&mut cs)?;
    Ok(cs.finish(circuit.name())?.shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    #[test]
    fn add_term_merges_duplicates() {
        let lc = LinearCombination::from(Variable::Private(0))
            .add_term(Variable::Private(0), fe(2))
            .add_term(Variable::One, fe(5));
        assert_eq!(lc.terms().len(), 2);
        assert_eq!(lc.terms()[0], (Variable::Private(0), fe(3)));
    }

    #[test]
    fn subtraction_cancels() {
        let x = LinearCombination::from(Variable::Public(0));
        let zero = x.clone() - x;
        assert_eq!(zero.evaluate(|_| Some(fe(7))), Some(FieldElement::zero()));
    }

    #[test]
    fn setup_mode_never_calls_value_closures() {
        let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
        let v = cs
            .alloc_private("x", || panic!("closure must not run in setup mode"))
            .unwrap();
        assert_eq!(cs.value(v), None);
        assert!(cs.which_is_unsatisfied().is_none());
    }

    #[test]
    fn witness_mode_detects_violation() {
        let mut cs = ConstraintSystem::new(SynthesisMode::Witness);
        let x = cs.alloc_public("x", || Ok(fe(3))).unwrap();
        let y = cs.alloc_private("y", || Ok(fe(4))).unwrap();
        cs.namespace("square", |cs| {
            cs.enforce("x_times_x", x.into(), x.into(), LinearCombination::constant(fe(9)));
            cs.enforce("y_times_y", y.into(), y.into(), LinearCombination::constant(fe(15)));
            Ok(())
        })
        .unwrap();
        let (index, constraint) = cs.which_is_unsatisfied().unwrap();
        assert_eq!(index, 1);
        assert_eq!(constraint.label, "square/y_times_y");
    }

    #[test]
    fn namespaces_qualify_signal_names() {
        let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
        cs.namespace("outer", |cs| {
            cs.namespace("inner", |cs| cs.alloc_private("hint", || Ok(fe(1))))
        })
        .unwrap();
        cs.alloc_public("top", || Ok(fe(1))).unwrap();
        let out = cs.finish("test").unwrap();
        assert_eq!(out.shape.private_signals(), ["outer/inner/hint".to_string()]);
        assert_eq!(out.shape.public_signals(), ["top".to_string()]);
        assert_eq!(out.shape.visibility("top"), Some(Visibility::Public));
        assert_eq!(out.shape.visibility("nope"), None);
    }

    #[test]
    fn shape_digest_survives_serde() {
        let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
        let x = cs.alloc_public("x", || Ok(fe(1))).unwrap();
        cs.enforce("id", x.into(), LinearCombination::constant(fe(1)), x.into());
        let shape = cs.finish("test").unwrap().shape;
        let json = serde_json::to_string(&shape).unwrap();
        let back: R1csShape = serde_json::from_str(&json).unwrap();
        assert_eq!(shape.digest().unwrap(), back.digest().unwrap());
    }
}
