//! End-to-end behavior of gated burns through `BurnService`.

use std::sync::Arc;

use burn_gate::blockchain::BlockchainError;
use burn_gate::gate::{BurnService, GateError, TokenId, TransactionGate};
use burn_gate::notify::Severity;

mod common;
use common::{ControlledBurner, CountingConfirm, MemoryNotifier};

type TestService = BurnService<ControlledBurner, Arc<MemoryNotifier>>;

fn setup() -> (TestService, common::BurnerControl, Arc<ControlledBurner>, Arc<MemoryNotifier>) {
    let (burner, control) = ControlledBurner::new();
    let notifier = Arc::new(MemoryNotifier::default());
    let service = BurnService::new(TransactionGate::new(), burner.clone(), notifier.clone());
    (service, control, burner, notifier)
}

fn id(n: u64) -> TokenId {
    TokenId::new(n).unwrap()
}

#[tokio::test]
async fn test_different_tokens_proceed_concurrently() {
    let (service, mut control, burner, _) = setup();

    let first = service.burn("1", |_| async { true });
    let second = service.burn("2", |_| async { true });

    let driver = async {
        let mut started = vec![control.next_started().await, control.next_started().await];
        started.sort();
        assert_eq!(started, vec![id(1), id(2)]);
        assert_eq!(service.gate().pending().ids(), vec![id(1), id(2)]);

        control.release(Ok(()));
        control.release(Ok(()));
    };

    let (a, b, ()) = tokio::join!(first, second, driver);
    assert_eq!(a.unwrap().token_id, id(1));
    assert_eq!(b.unwrap().token_id, id(2));
    assert_eq!(burner.calls(), 2);
    assert!(service.gate().pending().is_empty());
}

#[tokio::test]
async fn test_equivalent_spellings_collapse_to_one_request() {
    let (service, mut control, burner, notifier) = setup();
    let confirm = CountingConfirm::default();

    let first = service.burn("#42", confirm.answer(true));

    let driver = async {
        assert_eq!(control.next_started().await, id(42));

        let duplicate = service.burn("042", confirm.answer(true)).await;
        assert!(matches!(duplicate, Err(GateError::DuplicateInFlight(t)) if t == id(42)));

        control.release(Ok(()));
    };

    let (outcome, ()) = tokio::join!(first, driver);
    assert!(outcome.is_ok());
    assert_eq!(confirm.asked(), 1);
    assert_eq!(burner.calls(), 1);
    assert_eq!(notifier.count(Severity::Warning), 1);
    assert_eq!(notifier.count(Severity::Success), 1);
}

#[tokio::test]
async fn test_failure_releases_token_for_retry() {
    let (service, mut control, burner, notifier) = setup();

    let first = service.burn("9", |_| async { true });
    let driver = async {
        control.next_started().await;
        control.release(Err(BlockchainError::Reverted("out of gas".into())));
    };
    let (outcome, ()) = tokio::join!(first, driver);

    let err = outcome.unwrap_err();
    assert!(matches!(err.collaborator(), Some(BlockchainError::Reverted(_))));
    assert!(!service.gate().is_pending(&id(9)));
    assert_eq!(notifier.count(Severity::Error), 1);

    control.release(Ok(()));
    let retry = service.burn("9", |_| async { true }).await;
    assert!(retry.is_ok());
    assert_eq!(burner.calls(), 2);
}

#[tokio::test]
async fn test_decline_does_not_execute_and_releases() {
    let (service, _control, burner, notifier) = setup();
    let confirm = CountingConfirm::default();

    let outcome = service.burn("5", confirm.answer(false)).await;
    assert!(matches!(outcome, Err(GateError::UserCancelled(t)) if t == id(5)));
    assert_eq!(confirm.asked(), 1);
    assert_eq!(burner.calls(), 0);
    assert!(service.gate().pending().is_empty());

    // Only the cancellation notice; no "Burning..." message.
    assert_eq!(notifier.events().len(), 1);
    assert_eq!(notifier.count(Severity::Info), 1);
}

#[tokio::test]
async fn test_invalid_identifiers_never_prompt() {
    let (service, _control, burner, _) = setup();
    let confirm = CountingConfirm::default();

    for raw in ["", "abc", "0", "000", "#"] {
        let outcome = service.burn(raw, confirm.answer(true)).await;
        assert!(
            matches!(outcome, Err(GateError::InvalidIdentifier(_))),
            "{raw:?} should be rejected"
        );
    }

    assert_eq!(confirm.asked(), 0);
    assert_eq!(burner.calls(), 0);
    assert!(service.gate().pending().is_empty());
}

#[tokio::test]
async fn test_abandoned_request_releases_token() {
    let (service, mut control, _burner, _) = setup();

    let mut abandoned = Box::pin(service.burn("77", |_| async { true }));
    tokio::select! {
        _ = &mut abandoned => panic!("burn should still be waiting"),
        started = control.next_started() => assert_eq!(started, id(77)),
    }
    assert!(service.gate().is_pending(&id(77)));

    drop(abandoned);
    assert!(!service.gate().is_pending(&id(77)));

    control.release(Ok(()));
    let next = service.burn("77", |_| async { true }).await;
    assert!(next.is_ok());
}

#[tokio::test]
async fn test_pending_entry_only_while_outstanding() {
    let (service, mut control, _burner, _) = setup();
    let gate = service.gate().clone();
    assert!(!gate.is_pending(&id(3)));

    let request = service.burn("3", |_| async { true });
    let driver = async {
        control.next_started().await;
        let entry = gate.pending().get(&id(3)).expect("entry while in flight");
        assert!(entry.elapsed().as_secs() < 5);
        control.release(Ok(()));
    };
    let (outcome, ()) = tokio::join!(request, driver);

    assert!(outcome.is_ok());
    assert!(!gate.is_pending(&id(3)));
    assert_eq!(gate.pending().len(), 0);
}
