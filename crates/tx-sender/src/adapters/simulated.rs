//! In-process node double
//!
//! `SimulatedNode` keeps a per-account pool nonce, accepts or rejects
//! broadcasts like a real node would and replays a scripted status stream
//! for each accepted transaction. Every call is logged so tests can check
//! how the sender interleaved them.

use async_trait::async_trait;
use parking_lot::Mutex;
use primitive_types::H256;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::domain::{
    AccountAddress, BlockHash, DispatchError, EventRecord, NodeError, Nonce, RuntimeEvent,
    SignedTransaction, TxHash, TxStatus,
};
use crate::ports::outbound::NodeRpc;
use crate::ports::subscription::{StatusSender, StatusSubscription};

/// RPC error code for a stale or otherwise invalid transaction.
pub const INVALID_TRANSACTION: i64 = 1010;

/// How the node treats the next accepted transaction of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// `ready`, `broadcast`, `inBlock` and `finalized` with `ExtrinsicSuccess`
    Succeed,
    /// Same lifecycle with `ExtrinsicFailed`
    Fail(DispatchError),
    /// Same lifecycle with `Sudid(Err(..))` followed by `ExtrinsicSuccess`
    SudoFail(DispatchError),
    /// Refuse the broadcast
    Reject(NodeError),
    /// Emit exactly these statuses; `events` are attached to every block
    /// referenced by an `inBlock` or `finalized` status
    Emit {
        statuses: Vec<TxStatus>,
        events: Vec<RuntimeEvent>,
    },
    /// `ready` and nothing else
    Hang,
}

/// One logged RPC call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCall {
    NonceQuery(AccountAddress),
    Broadcast {
        address: AccountAddress,
        nonce: Nonce,
        accepted: bool,
    },
}

impl NodeCall {
    pub fn address(&self) -> &AccountAddress {
        match self {
            NodeCall::NonceQuery(address) => address,
            NodeCall::Broadcast { address, .. } => address,
        }
    }
}

#[derive(Debug)]
struct NodeState {
    nonces: HashMap<AccountAddress, Nonce>,
    scripts: HashMap<AccountAddress, VecDeque<Script>>,
    default_script: Script,
    unreachable: bool,
    failing_record_queries: usize,
    blocks_produced: u64,
    records: HashMap<(BlockHash, TxHash), Vec<EventRecord>>,
    watchers: HashMap<TxHash, StatusSender>,
    submitted: Vec<SignedTransaction>,
    unsubscribed: HashSet<TxHash>,
    calls: Vec<NodeCall>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            nonces: HashMap::new(),
            scripts: HashMap::new(),
            default_script: Script::Succeed,
            unreachable: false,
            failing_record_queries: 0,
            blocks_produced: 0,
            records: HashMap::new(),
            watchers: HashMap::new(),
            submitted: Vec::new(),
            unsubscribed: HashSet::new(),
            calls: Vec::new(),
        }
    }
}

impl NodeState {
    fn next_block(&mut self) -> BlockHash {
        self.blocks_produced += 1;
        H256::from_low_u64_be(0xb10c_0000 + self.blocks_produced)
    }

    fn script_for(&mut self, address: &AccountAddress) -> Script {
        self.scripts
            .get_mut(address)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.default_script.clone())
    }

    /// Produce a block for `tx_hash` carrying `events`, then report it.
    fn include(&mut self, sender: &StatusSender, tx_hash: TxHash, events: Vec<RuntimeEvent>) {
        let block = self.next_block();
        let records = events
            .into_iter()
            .map(|event| EventRecord::applied(1, event))
            .collect();
        self.records.insert((block, tx_hash), records);
        let _ = sender.send(TxStatus::InBlock(block));
        let _ = sender.send(TxStatus::Finalized(block));
    }
}

/// Deterministic node double
#[derive(Debug, Clone, Default)]
pub struct SimulatedNode {
    state: Arc<Mutex<NodeState>>,
    latency: Option<Duration>,
}

impl SimulatedNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every RPC call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Script used when an account has nothing queued.
    pub fn with_default_script(self, script: Script) -> Self {
        self.state.lock().default_script = script;
        self
    }

    /// Set the on-chain nonce of `address`.
    pub fn set_account_nonce(&self, address: &AccountAddress, nonce: Nonce) {
        self.state.lock().nonces.insert(address.clone(), nonce);
    }

    pub fn account_nonce(&self, address: &AccountAddress) -> Nonce {
        self.state.lock().nonces.get(address).copied().unwrap_or(0)
    }

    /// Queue `script` for the next accepted transaction from `address`.
    pub fn push_script(&self, address: &AccountAddress, script: Script) {
        self.state
            .lock()
            .scripts
            .entry(address.clone())
            .or_default()
            .push_back(script);
    }

    /// Make nonce queries fail as if the node were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Fail the next `count` block-record queries.
    pub fn fail_record_queries(&self, count: usize) {
        self.state.lock().failing_record_queries = count;
    }

    /// Push a status into a live subscription. Returns `false` if nobody is watching.
    pub fn emit(&self, tx_hash: TxHash, status: TxStatus) -> bool {
        let state = self.state.lock();
        match state.watchers.get(&tx_hash) {
            Some(sender) => sender.send(status).is_ok(),
            None => false,
        }
    }

    /// Attach records to `(block, tx_hash)`.
    pub fn set_records(&self, block: BlockHash, tx_hash: TxHash, events: Vec<RuntimeEvent>) {
        let records = events
            .into_iter()
            .map(|event| EventRecord::applied(1, event))
            .collect();
        self.state.lock().records.insert((block, tx_hash), records);
    }

    /// End the status stream of `tx_hash` from the node side.
    pub fn close(&self, tx_hash: TxHash) -> bool {
        self.state.lock().watchers.remove(&tx_hash).is_some()
    }

    /// Transactions accepted so far, in acceptance order.
    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.state.lock().submitted.clone()
    }

    /// Every RPC call in arrival order.
    pub fn calls(&self) -> Vec<NodeCall> {
        self.state.lock().calls.clone()
    }

    /// Whether the subscriber of `tx_hash` has unsubscribed.
    pub fn unsubscribed(&self, tx_hash: TxHash) -> bool {
        self.state.lock().unsubscribed.contains(&tx_hash)
    }

    /// Number of subscriptions still open.
    pub fn live_subscriptions(&self) -> usize {
        self.state.lock().watchers.len()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl NodeRpc for SimulatedNode {
    async fn next_account_index(&self, address: &AccountAddress) -> Result<Nonce, NodeError> {
        {
            let mut state = self.state.lock();
            state.calls.push(NodeCall::NonceQuery(address.clone()));
            if state.unreachable {
                return Err(NodeError::Unreachable("connection refused".into()));
            }
        }
        self.delay().await;
        Ok(self.account_nonce(address))
    }

    async fn submit_and_watch(
        &self,
        tx: &SignedTransaction,
    ) -> Result<StatusSubscription, NodeError> {
        self.delay().await;

        let mut guard = self.state.lock();
        let state = &mut *guard;
        let expected = state.nonces.get(&tx.signer).copied().unwrap_or(0);

        // A stale nonce leaves the queued script for the next accepted transaction.
        let scripted_reject = matches!(
            state.scripts.get(&tx.signer).and_then(VecDeque::front),
            Some(Script::Reject(_))
        );
        let rejection = if tx.nonce < expected && !scripted_reject {
            Err(NodeError::Rejected {
                code: INVALID_TRANSACTION,
                message: format!(
                    "Invalid Transaction: stale nonce {} (expected {})",
                    tx.nonce, expected
                ),
            })
        } else {
            match state.script_for(&tx.signer) {
                Script::Reject(err) => Err(err),
                script => Ok(script),
            }
        };

        state.calls.push(NodeCall::Broadcast {
            address: tx.signer.clone(),
            nonce: tx.nonce,
            accepted: rejection.is_ok(),
        });
        let script = rejection?;

        let (sender, subscription) = StatusSubscription::channel(tx.hash);

        if tx.nonce > expected {
            debug!(nonce = tx.nonce, expected, "Nonce gap, parking transaction");
            let _ = sender.send(TxStatus::Future);
        } else {
            state.nonces.insert(tx.signer.clone(), expected + 1);
            let _ = sender.send(TxStatus::Ready);

            match script {
                Script::Succeed => {
                    let _ = sender.send(TxStatus::Broadcast(vec!["sim-peer".into()]));
                    state.include(&sender, tx.hash, vec![RuntimeEvent::ExtrinsicSuccess]);
                }
                Script::Fail(error) => {
                    let _ = sender.send(TxStatus::Broadcast(vec!["sim-peer".into()]));
                    state.include(
                        &sender,
                        tx.hash,
                        vec![RuntimeEvent::ExtrinsicFailed { error }],
                    );
                }
                Script::SudoFail(error) => {
                    let _ = sender.send(TxStatus::Broadcast(vec!["sim-peer".into()]));
                    state.include(
                        &sender,
                        tx.hash,
                        vec![
                            RuntimeEvent::Sudid { result: Err(error) },
                            RuntimeEvent::ExtrinsicSuccess,
                        ],
                    );
                }
                Script::Emit { statuses, events } => {
                    for status in statuses {
                        if let Some(block) = status.block_hash() {
                            let records = events
                                .iter()
                                .cloned()
                                .map(|event| EventRecord::applied(1, event))
                                .collect();
                            state.records.insert((block, tx.hash), records);
                        }
                        let _ = sender.send(status);
                    }
                }
                Script::Hang | Script::Reject(_) => {}
            }
        }

        state.watchers.insert(tx.hash, sender);
        state.submitted.push(tx.clone());
        drop(guard);

        trace!(tx_hash = ?tx.hash, nonce = tx.nonce, "Accepted broadcast");

        let state = self.state.clone();
        Ok(subscription.on_close(move |hash| {
            let mut state = state.lock();
            state.watchers.remove(&hash);
            state.unsubscribed.insert(hash);
        }))
    }

    async fn block_records(
        &self,
        block: BlockHash,
        tx_hash: TxHash,
    ) -> Result<Vec<EventRecord>, NodeError> {
        self.delay().await;
        let mut state = self.state.lock();
        if state.failing_record_queries > 0 {
            state.failing_record_queries -= 1;
            return Err(NodeError::Unreachable("state query timed out".into()));
        }
        Ok(state
            .records
            .get(&(block, tx_hash))
            .cloned()
            .unwrap_or_default())
    }
}
