//! Fuzz target for [`Synchronizer`] propagation
//!
//! Drive arbitrary mutation sequences through both sides of a synchronizer
//! and compare against the reference model after every step.
//!
//! # Strategy
//!
//! - Operation sequences: pushes, inserts, removes, moves, replaces, clears
//!   and resets on either side, interleaved with stop/start
//! - Veto: half of the inputs run with a target that declines some values
//! - Raw kinds: arbitrary notification codes decoded as `ChangeKind`
//!
//! # Invariants
//!
//! - Real results and observable state equal the model's after every step
//! - Out-of-range indices fail with `IndexOutOfRange`, never panic
//! - A final start leaves master and target converged
//! - Only codes `0..=4` decode to a `ChangeKind`
//!
//! [`Synchronizer`]: tandem_core::Synchronizer

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tandem_core::{ChangeKind, SyncError};
use tandem_harness::{ModelWorld, Operation, RealWorld};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzInput {
    /// Whether the target declines some values.
    veto: bool,
    /// Operations applied in order.
    operations: Vec<Operation>,
    /// Notification codes to decode.
    raw_kinds: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let mut model = ModelWorld::new(input.veto);
    let Ok(real) = RealWorld::new(input.veto) else {
        panic!("starting over empty lists failed");
    };

    for (step, op) in input.operations.iter().enumerate() {
        let model_result = model.apply(op);
        let real_result = real.apply(op);

        assert_eq!(model_result, real_result, "result divergence at step {step}: {op:?}");
        assert_eq!(
            model.observable_state(),
            real.observable_state(),
            "state divergence at step {step}: {op:?}"
        );
    }

    model.apply(&Operation::Start);
    real.apply(&Operation::Start);
    assert!(model.is_converged());
    assert!(matches!(real.synchronizer().is_converged(), Ok(true)));

    for code in input.raw_kinds {
        match ChangeKind::try_from(code) {
            Ok(kind) => assert_eq!(kind.code(), code),
            Err(SyncError::UnknownChangeKind(rejected)) => {
                assert_eq!(rejected, code);
                assert!(code > 4);
            },
            Err(other) => panic!("unexpected error for code {code}: {other}"),
        }
    }
});
