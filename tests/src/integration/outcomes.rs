//! # Dispatch Outcomes
//!
//! Success, module failure, nested sudo failure and opaque errors as seen by
//! the caller of `submit`.

#[cfg(test)]
mod tests {
    use tx_sender::{
        AccountRef, DispatchError, DispatchFailure, KeyringError, ModuleErrorIndex, ResolvedAt,
        RuntimeEvent, Script, SenderConfig, SenderError, TransactionSenderApi,
    };

    use crate::harness::{remark, resolve, sudo_call, Harness};

    fn bad_origin() -> DispatchError {
        DispatchError::Module(ModuleErrorIndex::new(0, 2))
    }

    #[tokio::test]
    async fn test_in_block_success_resolves_receipt() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        let sender = harness.sender(SenderConfig::labelled("success"));

        let submission = sender.submit(&AccountRef::from(&alice), remark(1)).await.unwrap();
        let tx_hash = submission.tx_hash().unwrap();

        let receipt = resolve(submission).await.unwrap();
        assert_eq!(receipt.tx_hash, tx_hash);
        assert_eq!(receipt.signer, alice);
        assert_eq!(receipt.nonce, 0);
        assert_eq!(receipt.call, "system.remark");
        assert_eq!(receipt.resolved_at, ResolvedAt::InBlock);
        assert!(receipt
            .records
            .iter()
            .any(|r| r.event == RuntimeEvent::ExtrinsicSuccess));
    }

    #[tokio::test]
    async fn test_module_failure_carries_error_name() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        harness.node.push_script(&alice, Script::Fail(bad_origin()));
        let sender = harness.sender(SenderConfig::labelled("failure"));

        let submission = sender.submit(&AccountRef::from(&alice), remark(1)).await.unwrap();
        let err = resolve(submission).await.unwrap_err();

        assert!(err.is_dispatch_failure());
        match err {
            SenderError::OnChainFailure { call, error, .. } => {
                assert_eq!(call, "system.remark");
                assert_eq!(error.name(), "BadOrigin");
                assert_eq!(
                    error,
                    DispatchFailure::Module {
                        module: "System".into(),
                        name: "BadOrigin".into()
                    }
                );
            }
            other => panic!("expected OnChainFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sudo_wrapped_failure_is_not_success() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        harness
            .node
            .push_script(&alice, Script::SudoFail(DispatchError::Module(ModuleErrorIndex::new(5, 1))));
        let sender = harness.sender(SenderConfig::labelled("sudo"));

        let submission = sender.submit(&AccountRef::from(&alice), sudo_call()).await.unwrap();
        match resolve(submission).await {
            Err(SenderError::NestedDispatchFailure { call, error, .. }) => {
                assert_eq!(call, "sudo.sudo");
                assert_eq!(error.name(), "InsufficientBalance");
            }
            other => panic!("expected NestedDispatchFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unmapped_and_non_module_errors_are_opaque() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        harness.node.push_script(
            &alice,
            Script::Fail(DispatchError::Module(ModuleErrorIndex::new(42, 3))),
        );
        harness.node.push_script(&alice, Script::Fail(DispatchError::CannotLookup));
        let sender = harness.sender(SenderConfig::labelled("opaque"));
        let account = AccountRef::from(&alice);

        let first = sender.submit(&account, remark(1)).await.unwrap();
        let second = sender.submit(&account, remark(2)).await.unwrap();

        let err = resolve(first).await.unwrap_err();
        assert_eq!(
            err.dispatch_failure(),
            Some(&DispatchFailure::Opaque("module 42 error 3".into()))
        );

        let err = resolve(second).await.unwrap_err();
        assert_eq!(
            err.dispatch_failure(),
            Some(&DispatchFailure::Opaque("CannotLookup".into()))
        );
    }

    #[tokio::test]
    async fn test_diagnostics_do_not_change_resolution() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        let account = AccountRef::from(&alice);
        let sender = harness.sender(SenderConfig::labelled("diagnostics"));

        sender.enable_diagnostics();
        assert!(sender.diagnostics_enabled());
        harness.node.push_script(&alice, Script::Fail(bad_origin()));
        let loud = resolve(sender.submit(&account, remark(1)).await.unwrap()).await;

        sender.disable_diagnostics();
        harness.node.push_script(&alice, Script::Fail(bad_origin()));
        let quiet = resolve(sender.submit(&account, remark(2)).await.unwrap()).await;

        assert_eq!(loud.unwrap_err().kind(), quiet.unwrap_err().kind());
    }

    #[tokio::test]
    async fn test_sign_and_send_awaits_resolution() {
        let harness = Harness::new();
        let bob = harness.account("//Bob");
        let sender = harness.sender(SenderConfig::labelled("convenience"));

        let receipt = tokio::time::timeout(
            crate::harness::WAIT,
            sender.sign_and_send(&AccountRef::from(&bob), remark(9)),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(receipt.signer, bob);
    }

    #[tokio::test]
    async fn test_public_key_reference_resolves() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        let identity = tx_sender::Keyring::resolve(&*harness.keyring, &AccountRef::from(&alice))
            .unwrap();
        let sender = harness.sender(SenderConfig::labelled("pubkey"));

        let submission = sender
            .submit(&AccountRef::PublicKey(identity.public_key), remark(1))
            .await
            .unwrap();
        assert_eq!(resolve(submission).await.unwrap().signer, alice);
    }

    #[tokio::test]
    async fn test_unknown_identity_fails_synchronously() {
        let harness = Harness::new();
        let sender = harness.sender(SenderConfig::labelled("unknown"));

        let err = sender
            .submit(&AccountRef::from("0xnobody"), remark(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SenderError::Keyring(KeyringError::UnknownAccount(_))));
        assert!(harness.node.calls().is_empty());
    }
}
