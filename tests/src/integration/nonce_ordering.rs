//! # Nonce Ordering
//!
//! Same-account submissions get strictly increasing, gap-free nonces and
//! never overlap in their nonce-fetch-to-broadcast window. Different
//! accounts proceed concurrently.

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::time::timeout;

    use tx_sender::{
        AccountRef, NodeCall, NodeError, Script, SenderConfig, SenderError, SimulatedNode,
        TransactionSenderApi,
    };

    use crate::harness::{remark, resolve, Harness, WAIT};

    // =========================================================================
    // SAME ACCOUNT
    // =========================================================================

    #[tokio::test]
    async fn test_concurrent_same_account_nonces_are_gap_free() {
        let harness = Harness::with_node(SimulatedNode::new().with_latency(Duration::from_millis(2)));
        let alice = harness.account("//Alice");
        harness.node.set_account_nonce(&alice, 7);
        let sender = harness.sender(SenderConfig::labelled("gap-free"));
        let account = AccountRef::from(&alice);

        const N: u8 = 16;
        let submissions = timeout(
            WAIT,
            join_all((0..N).map(|i| sender.submit(&account, remark(i)))),
        )
        .await
        .unwrap();

        let mut nonces: Vec<u64> = submissions
            .iter()
            .map(|s| s.as_ref().unwrap().nonce().unwrap())
            .collect();
        nonces.sort_unstable();
        assert_eq!(nonces, (7..7 + N as u64).collect::<Vec<_>>());

        // Acceptance order at the node is nonce order.
        let accepted: Vec<u64> = harness.node.submitted().iter().map(|tx| tx.nonce).collect();
        assert_eq!(accepted, (7..7 + N as u64).collect::<Vec<_>>());

        for submission in submissions {
            let receipt = resolve(submission.unwrap()).await.unwrap();
            assert_eq!(receipt.signer, alice);
        }
        assert_eq!(harness.node.account_nonce(&alice), 7 + N as u64);
    }

    #[tokio::test]
    async fn test_windows_serialize_per_account_and_overlap_across_accounts() {
        let harness = Harness::with_node(SimulatedNode::new().with_latency(Duration::from_millis(3)));
        let accounts: Vec<_> = ["//Alice", "//Bob", "//Charlie", "//Dave"]
            .iter()
            .map(|seed| AccountRef::from(&harness.account(seed)))
            .collect();
        let sender = harness.sender(SenderConfig::labelled("windows"));

        let calls = accounts
            .iter()
            .flat_map(|account| (0..4u8).map(move |i| (account, i)))
            .map(|(account, i)| sender.submit(account, remark(i)));
        let submissions = timeout(WAIT, join_all(calls)).await.unwrap();
        assert!(submissions.iter().all(Result::is_ok));

        let mut open = HashMap::new();
        let mut max_concurrent = 0;
        for call in harness.node.calls() {
            match call {
                NodeCall::NonceQuery(address) => {
                    assert!(
                        open.insert(address.clone(), ()).is_none(),
                        "overlapping window for {}",
                        address
                    );
                }
                NodeCall::Broadcast { address, .. } => {
                    assert!(open.remove(&address).is_some(), "broadcast outside window");
                }
            }
            max_concurrent = max_concurrent.max(open.len());
        }
        assert!(open.is_empty());
        assert!(max_concurrent > 1, "distinct accounts never overlapped");

        // Per account, nonces are 0..4 in acceptance order.
        for account in &accounts {
            let AccountRef::Address(address) = account else {
                unreachable!()
            };
            let nonces: Vec<u64> = harness
                .node
                .submitted()
                .iter()
                .filter(|tx| &tx.signer == address)
                .map(|tx| tx.nonce)
                .collect();
            assert_eq!(nonces, vec![0, 1, 2, 3]);
        }
    }

    #[tokio::test]
    async fn test_senders_share_the_global_registry() {
        let harness = Harness::with_node(SimulatedNode::new().with_latency(Duration::from_millis(2)));
        let ferdie = harness.account("//GlobalRegistryFerdie");
        let first = harness.global_sender(SenderConfig::labelled("first"));
        let second = harness.global_sender(SenderConfig::labelled("second"));
        assert_ne!(first.id(), second.id());

        let account = AccountRef::from(&ferdie);
        let calls = (0..6u8).map(|i| {
            let sender = if i % 2 == 0 { &first } else { &second };
            sender.submit(&account, remark(i))
        });
        let submissions = timeout(WAIT, join_all(calls)).await.unwrap();

        for submission in submissions {
            resolve(submission.unwrap()).await.unwrap();
        }
        let accepted: Vec<u64> = harness.node.submitted().iter().map(|tx| tx.nonce).collect();
        assert_eq!(accepted, vec![0, 1, 2, 3, 4, 5]);
    }

    // =========================================================================
    // LOCK RELEASE ON FAILURE PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_rejection_fails_fast_and_releases_lock() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        harness.node.push_script(
            &alice,
            Script::Reject(NodeError::Rejected {
                code: 1002,
                message: "Verification Error: bad signature".into(),
            }),
        );
        let sender = harness.sender(SenderConfig::labelled("reject"));
        let account = AccountRef::from(&alice);

        let rejected = timeout(WAIT, sender.submit(&account, remark(1)))
            .await
            .unwrap()
            .unwrap();
        assert!(!harness.locks.is_locked(alice.as_str()));

        match resolve(rejected).await {
            Err(SenderError::SubmissionRejected { call, reason, tx }) => {
                assert_eq!(call, "system.remark");
                assert!(matches!(reason, NodeError::Rejected { code: 1002, .. }));
                assert_eq!(tx["nonce"], 0);
                assert_eq!(tx["method"]["args"]["remark"], "0x01");
            }
            other => panic!("expected SubmissionRejected, got {:?}", other),
        }

        // The next submission is not blocked and reuses the unconsumed nonce.
        let next = timeout(WAIT, sender.submit(&account, remark(2)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.nonce(), Some(0));
        assert!(resolve(next).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_synchronous_and_releases_lock() {
        let harness = Harness::new();
        let alice = harness.account("//Alice");
        let sender = harness.sender(SenderConfig::labelled("unreachable"));
        let account = AccountRef::from(&alice);

        harness.node.set_unreachable(true);
        let err = timeout(WAIT, sender.submit(&account, remark(1)))
            .await
            .unwrap()
            .err()
            .unwrap();
        assert!(matches!(err, SenderError::NodeUnavailable(NodeError::Unreachable(_))));
        assert!(!harness.locks.is_locked(alice.as_str()));

        harness.node.set_unreachable(false);
        let submission = timeout(WAIT, sender.submit(&account, remark(2)))
            .await
            .unwrap()
            .unwrap();
        assert!(resolve(submission).await.is_ok());
    }
}
