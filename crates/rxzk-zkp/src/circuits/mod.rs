//! # Circuits
//!
//! Concrete constraint systems built from the gadget library. Only the
//! prescription-validity circuit exists today.

pub mod prescription;

pub use prescription::{
    NativeEvaluation, PrescriptionAssignment, PrescriptionCheck, PrescriptionCircuit,
    PrivateSignal, PublicSignal, COMPARATOR_BITS,
};
