//! # Prescription-Validity Circuit
//!
//! Encodes "the prescription is valid" as one rank-1 constraint system over
//! five checks and a declared outcome bit.
//!
//! ## Signal Boundary
//!
//! Public vector, in this exact order (part of the key contract):
//!
//! ```text
//! [doctorCredentialHash, trustedSourceHash, requiredAction, deltaMax, outcome]
//! ```
//!
//! Private: `doctorId, doctorSecret, authorizedAction, sourceId, dataAge,
//! allergyClassId, medicationClassId`.
//!
//! ## Checks
//!
//! | namespace          | check                                         | on failure |
//! |--------------------|-----------------------------------------------|------------|
//! | `credential`       | `commit(doctorId, doctorSecret) = credentialHash` | no witness |
//! | `trusted_source`   | `commit(sourceId) = trustedSourceHash`        | no witness |
//! | `freshness`        | `freshOk = dataAge < deltaMax` (32-bit)       | `freshOk = 0` |
//! | `authorization`    | `authorizedAction = requiredAction`           | no witness |
//! | `contraindication` | `noContra = 1 - isZero(allergy - medication)` | `noContra = 0` |
//! | `outcome`          | `freshOk · noContra = outcome`                | no witness |
//!
//! Only freshness and contraindication can produce an honest reject proof
//! (`outcome = 0`). Credential, source and authorization failures leave no
//! satisfying assignment at all. The freshness comparator range-checks its
//! operands, so `dataAge` or `deltaMax` at or above `2^32` also leaves no
//! satisfying assignment.

use serde::{Deserialize, Serialize};

use rxzk_core::{FieldElement, PublicInputVector, SignalError, WitnessInput};

use crate::gadgets::commitment::mimc_commit;
use crate::gadgets::comparator::less_than;
use crate::gadgets::equality::assert_equal;
use crate::gadgets::is_zero::is_zero;
use crate::gadgets::{mul, Num};
use crate::r1cs::{Circuit, ConstraintSystem, SynthesisError};

/// Bit width of the freshness comparator operands.
pub const COMPARATOR_BITS: u32 = 32;

/// Public signals, in public input vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PublicSignal {
    /// `commit(doctorId, doctorSecret)` of the registered prescriber.
    DoctorCredentialHash,
    /// `commit(sourceId)` of the trusted patient-data source.
    TrustedSourceHash,
    /// Action the prescription requires.
    RequiredAction,
    /// Maximum admissible data age.
    DeltaMax,
    /// Declared result: `1` accept, `0` reject.
    Outcome,
}

impl PublicSignal {
    /// The public input vector order.
    pub const ORDER: [PublicSignal; 5] = [
        PublicSignal::DoctorCredentialHash,
        PublicSignal::TrustedSourceHash,
        PublicSignal::RequiredAction,
        PublicSignal::DeltaMax,
        PublicSignal::Outcome,
    ];

    /// Wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::DoctorCredentialHash => "doctorCredentialHash",
            Self::TrustedSourceHash => "trustedSourceHash",
            Self::RequiredAction => "requiredAction",
            Self::DeltaMax => "deltaMax",
            Self::Outcome => "outcome",
        }
    }

    /// Coordinate in the public input vector.
    pub fn index(self) -> usize {
        match self {
            Self::DoctorCredentialHash => 0,
            Self::TrustedSourceHash => 1,
            Self::RequiredAction => 2,
            Self::DeltaMax => 3,
            Self::Outcome => 4,
        }
    }

    /// Look up a signal by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|s| s.name() == name)
    }
}

/// Private signals, in allocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrivateSignal {
    DoctorId,
    DoctorSecret,
    AuthorizedAction,
    SourceId,
    DataAge,
    AllergyClassId,
    MedicationClassId,
}

impl PrivateSignal {
    /// Every private input signal.
    pub const ALL: [PrivateSignal; 7] = [
        PrivateSignal::DoctorId,
        PrivateSignal::DoctorSecret,
        PrivateSignal::AuthorizedAction,
        PrivateSignal::SourceId,
        PrivateSignal::DataAge,
        PrivateSignal::AllergyClassId,
        PrivateSignal::MedicationClassId,
    ];

    /// Wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::DoctorId => "doctorId",
            Self::DoctorSecret => "doctorSecret",
            Self::AuthorizedAction => "authorizedAction",
            Self::SourceId => "sourceId",
            Self::DataAge => "dataAge",
            Self::AllergyClassId => "allergyClassId",
            Self::MedicationClassId => "medicationClassId",
        }
    }

    /// Look up a signal by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// The check a constraint belongs to, recovered from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionCheck {
    CredentialAuthentication,
    TrustedSource,
    Freshness,
    Authorization,
    Contraindication,
    OutcomeBinding,
}

impl PrescriptionCheck {
    /// Circuit order.
    pub const ALL: [PrescriptionCheck; 6] = [
        PrescriptionCheck::CredentialAuthentication,
        PrescriptionCheck::TrustedSource,
        PrescriptionCheck::Freshness,
        PrescriptionCheck::Authorization,
        PrescriptionCheck::Contraindication,
        PrescriptionCheck::OutcomeBinding,
    ];

    /// Constraint namespace of the check.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::CredentialAuthentication => "credential",
            Self::TrustedSource => "trusted_source",
            Self::Freshness => "freshness",
            Self::Authorization => "authorization",
            Self::Contraindication => "contraindication",
            Self::OutcomeBinding => "outcome",
        }
    }

    /// The check owning a constraint label such as `freshness/lhs_range/b3`.
    pub fn from_label(label: &str) -> Option<Self> {
        let head = label.split('/').next()?;
        Self::ALL.into_iter().find(|c| c.namespace() == head)
    }

    /// Whether the check aborts witness construction rather than flowing
    /// into the outcome bit.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::CredentialAuthentication | Self::TrustedSource | Self::Authorization
        )
    }

    /// Short human-readable description.
    pub fn describe(self) -> &'static str {
        match self {
            Self::CredentialAuthentication => "doctor credential does not match its public commitment",
            Self::TrustedSource => "data source does not match the trusted source commitment",
            Self::Freshness => "data age or freshness bound outside the comparator range",
            Self::Authorization => "doctor is not authorized for the required action",
            Self::Contraindication => "contraindication detector is inconsistent",
            Self::OutcomeBinding => "declared outcome differs from the computed outcome",
        }
    }
}

impl std::fmt::Display for PrescriptionCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}

/// A complete assignment of the prescription circuit's input signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionAssignment {
    pub doctor_credential_hash: FieldElement,
    pub trusted_source_hash: FieldElement,
    pub required_action: FieldElement,
    pub delta_max: FieldElement,
    pub outcome: FieldElement,
    pub doctor_id: FieldElement,
    pub doctor_secret: FieldElement,
    pub authorized_action: FieldElement,
    pub source_id: FieldElement,
    pub data_age: FieldElement,
    pub allergy_class_id: FieldElement,
    pub medication_class_id: FieldElement,
}

impl PrescriptionAssignment {
    /// Extract every signal from a raw witness input.
    ///
    /// # Errors
    ///
    /// [`SignalError::Unknown`] for a name the circuit does not declare,
    /// [`SignalError::Missing`] for a declared signal without a value.
    pub fn from_input(input: &WitnessInput) -> Result<Self, SignalError> {
        if let Some(unknown) = input
            .names()
            .find(|n| PublicSignal::from_name(n).is_none() && PrivateSignal::from_name(n).is_none())
        {
            return Err(SignalError::Unknown(unknown.to_string()));
        }
        let public = |s: PublicSignal| input.require(s.name());
        let private = |s: PrivateSignal| input.require(s.name());
        Ok(Self {
            doctor_credential_hash: public(PublicSignal::DoctorCredentialHash)?,
            trusted_source_hash: public(PublicSignal::TrustedSourceHash)?,
            required_action: public(PublicSignal::RequiredAction)?,
            delta_max: public(PublicSignal::DeltaMax)?,
            outcome: public(PublicSignal::Outcome)?,
            doctor_id: private(PrivateSignal::DoctorId)?,
            doctor_secret: private(PrivateSignal::DoctorSecret)?,
            authorized_action: private(PrivateSignal::AuthorizedAction)?,
            source_id: private(PrivateSignal::SourceId)?,
            data_age: private(PrivateSignal::DataAge)?,
            allergy_class_id: private(PrivateSignal::AllergyClassId)?,
            medication_class_id: private(PrivateSignal::MedicationClassId)?,
        })
    }

    /// The raw witness input form.
    pub fn to_input(&self) -> WitnessInput {
        let mut input = WitnessInput::new();
        for s in PublicSignal::ORDER {
            input.set(s.name(), self.public(s));
        }
        for s in PrivateSignal::ALL {
            input.set(s.name(), self.private(s));
        }
        input
    }

    /// Value of a public signal.
    pub fn public(&self, signal: PublicSignal) -> FieldElement {
        match signal {
            PublicSignal::DoctorCredentialHash => self.doctor_credential_hash,
            PublicSignal::TrustedSourceHash => self.trusted_source_hash,
            PublicSignal::RequiredAction => self.required_action,
            PublicSignal::DeltaMax => self.delta_max,
            PublicSignal::Outcome => self.outcome,
        }
    }

    /// Value of a private signal.
    pub fn private(&self, signal: PrivateSignal) -> FieldElement {
        match signal {
            PrivateSignal::DoctorId => self.doctor_id,
            PrivateSignal::DoctorSecret => self.doctor_secret,
            PrivateSignal::AuthorizedAction => self.authorized_action,
            PrivateSignal::SourceId => self.source_id,
            PrivateSignal::DataAge => self.data_age,
            PrivateSignal::AllergyClassId => self.allergy_class_id,
            PrivateSignal::MedicationClassId => self.medication_class_id,
        }
    }

    /// The public input vector this assignment would be proven against.
    pub fn public_inputs(&self) -> PublicInputVector {
        PublicInputVector::new(PublicSignal::ORDER.iter().map(|s| self.public(*s)).collect())
    }

    /// Evaluate the checks natively, outside the constraint system.
    pub fn evaluate(&self) -> NativeEvaluation {
        let bound = 1u64 << COMPARATOR_BITS;
        let age = self.data_age.to_u64().filter(|v| *v < bound);
        let max = self.delta_max.to_u64().filter(|v| *v < bound);
        let operands_in_range = age.is_some() && max.is_some();
        let fresh = matches!((age, max), (Some(a), Some(m)) if a < m);
        let no_contraindication = self.allergy_class_id != self.medication_class_id;
        NativeEvaluation {
            credential_ok: rxzk_crypto::commit(&[self.doctor_id, self.doctor_secret])
                == self.doctor_credential_hash,
            source_ok: rxzk_crypto::commit(&[self.source_id]) == self.trusted_source_hash,
            operands_in_range,
            fresh,
            authorized: self.authorized_action == self.required_action,
            no_contraindication,
            computed_outcome: fresh && no_contraindication,
            declared_outcome: self.outcome,
        }
    }
}

/// Result of [`PrescriptionAssignment::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeEvaluation {
    pub credential_ok: bool,
    pub source_ok: bool,
    pub operands_in_range: bool,
    pub fresh: bool,
    pub authorized: bool,
    pub no_contraindication: bool,
    pub computed_outcome: bool,
    pub declared_outcome: FieldElement,
}

impl NativeEvaluation {
    /// The first check, in circuit order, that leaves no satisfying assignment.
    pub fn first_failure(&self) -> Option<PrescriptionCheck> {
        if !self.credential_ok {
            Some(PrescriptionCheck::CredentialAuthentication)
        } else if !self.source_ok {
            Some(PrescriptionCheck::TrustedSource)
        } else if !self.operands_in_range {
            Some(PrescriptionCheck::Freshness)
        } else if !self.authorized {
            Some(PrescriptionCheck::Authorization)
        } else if FieldElement::from(self.computed_outcome) != self.declared_outcome {
            Some(PrescriptionCheck::OutcomeBinding)
        } else {
            None
        }
    }

    /// Whether a witness exists.
    pub fn is_satisfiable(&self) -> bool {
        self.first_failure().is_none()
    }
}

/// The prescription-validity circuit.
///
/// [`blank`](Self::blank) synthesizes the shape for setup;
/// [`new`](Self::new) carries an assignment for witness construction.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionCircuit {
    assignment: Option<PrescriptionAssignment>,
}

impl PrescriptionCircuit {
    /// Circuit name recorded in the shape.
    pub const NAME: &'static str = "prescription-validity";

    /// Shape-only circuit.
    pub fn blank() -> Self {
        Self { assignment: None }
    }

    /// Circuit carrying a concrete assignment.
    pub fn new(assignment: PrescriptionAssignment) -> Self {
        Self {
            assignment: Some(assignment),
        }
    }

    /// Parse a raw witness input into a circuit.
    pub fn from_input(input: &WitnessInput) -> Result<Self, SignalError> {
        PrescriptionAssignment::from_input(input).map(Self::new)
    }

    /// The carried assignment, if any.
    pub fn assignment(&self) -> Option<&PrescriptionAssignment> {
        self.assignment.as_ref()
    }

    fn alloc_public(
        &self,
        cs: &mut ConstraintSystem,
        signal: PublicSignal,
    ) -> Result<Num, SynthesisError> {
        let value = self.assignment.as_ref().map(|a| a.public(signal));
        let var = cs.alloc_public(signal.name(), || {
            value.ok_or_else(|| SynthesisError::AssignmentMissing(signal.name().to_string()))
        })?;
        Ok(Num::from_variable(var, value))
    }

    fn alloc_private(
        &self,
        cs: &mut ConstraintSystem,
        signal: PrivateSignal,
    ) -> Result<Num, SynthesisError> {
        let value = self.assignment.as_ref().map(|a| a.private(signal));
        let var = cs.alloc_private(signal.name(), || {
            value.ok_or_else(|| SynthesisError::AssignmentMissing(signal.name().to_string()))
        })?;
        Ok(Num::from_variable(var, value))
    }
}

impl Circuit for PrescriptionCircuit {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn synthesize(&self, cs: &mut ConstraintSystem) -> Result<(), SynthesisError> {
        // Public signals first: allocation order is vector order.
        let credential_hash = self.alloc_public(cs, PublicSignal::DoctorCredentialHash)?;
        let source_hash = self.alloc_public(cs, PublicSignal::TrustedSourceHash)?;
        let required_action = self.alloc_public(cs, PublicSignal::RequiredAction)?;
        let delta_max = self.alloc_public(cs, PublicSignal::DeltaMax)?;
        let outcome = self.alloc_public(cs, PublicSignal::Outcome)?;

        let doctor_id = self.alloc_private(cs, PrivateSignal::DoctorId)?;
        let doctor_secret = self.alloc_private(cs, PrivateSignal::DoctorSecret)?;
        let authorized_action = self.alloc_private(cs, PrivateSignal::AuthorizedAction)?;
        let source_id = self.alloc_private(cs, PrivateSignal::SourceId)?;
        let data_age = self.alloc_private(cs, PrivateSignal::DataAge)?;
        let allergy = self.alloc_private(cs, PrivateSignal::AllergyClassId)?;
        let medication = self.alloc_private(cs, PrivateSignal::MedicationClassId)?;

        cs.namespace(PrescriptionCheck::CredentialAuthentication.namespace(), |cs| {
            let commitment = mimc_commit(cs, &[doctor_id, doctor_secret])?;
            assert_equal(cs, "matches_public_hash", &commitment, &credential_hash);
            Ok(())
        })?;

        cs.namespace(PrescriptionCheck::TrustedSource.namespace(), |cs| {
            let commitment = mimc_commit(cs, &[source_id])?;
            assert_equal(cs, "matches_public_hash", &commitment, &source_hash);
            Ok(())
        })?;

        let fresh_ok = cs.namespace(PrescriptionCheck::Freshness.namespace(), |cs| {
            less_than(cs, &data_age, &delta_max, COMPARATOR_BITS)
        })?;

        cs.namespace(PrescriptionCheck::Authorization.namespace(), |cs| {
            assert_equal(cs, "action_matches", &authorized_action, &required_action);
            Ok(())
        })?;

        let no_contraindication =
            cs.namespace(PrescriptionCheck::Contraindication.namespace(), |cs| {
                let is_match = is_zero(cs, &allergy.sub(&medication))?;
                Ok(Num::constant(FieldElement::one()).sub(&is_match))
            })?;

        cs.namespace(PrescriptionCheck::OutcomeBinding.namespace(), |cs| {
            let computed = mul(cs, "computed", &fresh_ok, &no_contraindication)?;
            assert_equal(cs, "declared_matches_computed", &computed, &outcome);
            Ok(())
        })
    }
}
