// Copyright 2021, The Android Open Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The engine: owns the RF state objects, the deferred-transition queue and
//! the single in-flight command slot, and drives both from notifications
//! and responses handed to it by the embedder.
//!
//! This is deliberately synchronous and single-threaded: no runtime, no
//! channels. The embedder (whatever owns the SAR/transport) calls
//! [`NciSm::handle_notification`] / [`NciSm::handle_response`] / [`NciSm::poll`]
//! directly as bytes and timer ticks arrive.

use crate::command::{CommandOutcome, InFlightCommand, QueuedCommand, ResponseCallback};
use crate::config::EngineConfig;
use crate::error::TransportError;
use crate::observer::{ControlPacketSink, SmObserver};
use crate::param::StateParam;
use crate::proto::{DeactivationType, StallReason, GID_RF, OID_RF_DEACTIVATE};
use crate::state::{
    DiscoveryState, IdleState, ListenActiveState, ListenSleepState, PollActiveState, RfStateId,
    State, W4AllDiscoveriesState, W4HostSelectState,
};
use crate::wire::{parse_deactivate_ntf, serialize_deactivate_cmd, IntfActivationNtf};
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;

struct PendingTransition {
    target: RfStateId,
    param: Option<StateParam>,
}

/// The host-side NCI RF discovery and activation state machine (NFC Forum
/// NCI 1.0 §5.2).
pub struct NciSm {
    config: EngineConfig,
    current: RfStateId,
    states: HashMap<RfStateId, Box<dyn State>>,
    pending: VecDeque<PendingTransition>,
    draining: bool,
    command_queue: VecDeque<QueuedCommand>,
    pending_command: Option<InFlightCommand>,
    observer: Box<dyn SmObserver>,
    sink: Box<dyn ControlPacketSink>,
    stalled: Option<StallReason>,
}

impl NciSm {
    /// Construct the engine, starting in RFST_IDLE.
    pub fn new(
        config: EngineConfig,
        observer: Box<dyn SmObserver>,
        sink: Box<dyn ControlPacketSink>,
    ) -> Self {
        let mut states: HashMap<RfStateId, Box<dyn State>> = HashMap::new();
        states.insert(RfStateId::Idle, Box::<IdleState>::default());
        states.insert(RfStateId::Discovery, Box::<DiscoveryState>::default());
        states.insert(RfStateId::W4AllDiscoveries, Box::<W4AllDiscoveriesState>::default());
        states.insert(RfStateId::W4HostSelect, Box::<W4HostSelectState>::default());
        states.insert(RfStateId::PollActive, Box::<PollActiveState>::default());
        states.insert(RfStateId::ListenActive, Box::<ListenActiveState>::default());
        states.insert(RfStateId::ListenSleep, Box::<ListenSleepState>::default());

        NciSm {
            config,
            current: RfStateId::Idle,
            states,
            pending: VecDeque::new(),
            draining: false,
            command_queue: VecDeque::new(),
            pending_command: None,
            observer,
            sink,
            stalled: None,
        }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The RF state the machine currently occupies
    pub fn current_state(&self) -> RfStateId {
        self.current
    }

    /// Whether the engine has stalled and is refusing notifications
    pub fn stall_reason(&self) -> Option<StallReason> {
        self.stalled
    }

    /// Request a transition to `target`, carrying `param` into its
    /// `on_enter`/`on_reenter`. If called re-entrantly from within a state
    /// handler, the transition is queued and runs after the current handler
    /// returns rather than nesting.
    pub fn enter_state(&mut self, target: RfStateId, param: Option<StateParam>) {
        self.pending.push_back(PendingTransition { target, param });
        self.drain_pending();
    }

    /// Ask the NFCC to deactivate down to `target`'s entry point. Unlike
    /// [`Self::enter_state`], this doesn't change `current_state` itself:
    /// the actual transition happens once the resulting `RF_DEACTIVATE_NTF`
    /// comes back through [`Self::handle_rf_deactivate_ntf`].
    pub fn switch_to(&mut self, target: RfStateId) {
        let deactivation_type = match target {
            RfStateId::Discovery => DeactivationType::Discovery,
            RfStateId::Idle => DeactivationType::Idle,
            RfStateId::ListenSleep => DeactivationType::Sleep,
            _ => {
                log::warn!(
                    "switch_to({}) has no RF_DEACTIVATE_CMD mapping; transitioning directly",
                    target.name()
                );
                self.enter_state(target, None);
                return;
            }
        };
        let payload = serialize_deactivate_cmd(deactivation_type);
        self.send_command(
            GID_RF,
            OID_RF_DEACTIVATE,
            payload,
            Box::new(|outcome| {
                if let CommandOutcome::Failed(e) = outcome {
                    log::warn!("RF_DEACTIVATE_CMD failed: {:?}", e);
                }
            }),
        );
    }

    /// Queue `gid`/`oid`/`payload` for transmission, invoking `callback`
    /// exactly once with the eventual outcome. Returns `false` without
    /// queueing anything if the machine is in RFST_IDLE.
    pub fn send_command(
        &mut self,
        gid: u8,
        oid: u8,
        payload: Bytes,
        callback: ResponseCallback,
    ) -> bool {
        if self.current == RfStateId::Idle {
            log::warn!(
                "send_command(gid=0x{:02x}, oid=0x{:02x}) refused: RFST_IDLE",
                gid,
                oid
            );
            return false;
        }
        self.command_queue.push_back(QueuedCommand {
            gid,
            oid,
            payload,
            callback,
            initiating_state: self.current,
        });
        self.pump_command_queue();
        true
    }

    /// Feed in the NFCC's response to whatever command is currently in
    /// flight. A response that doesn't match the in-flight command's
    /// GID/OID is logged and otherwise ignored — the embedder is expected
    /// to only ever have one command in flight on the wire, matching this
    /// engine's queue.
    pub fn handle_response(&mut self, gid: u8, oid: u8, payload: &[u8]) {
        match &self.pending_command {
            Some(c) if c.gid == gid && c.oid == oid => {
                let cmd = self.pending_command.take().unwrap();
                (cmd.callback)(CommandOutcome::Success(Bytes::copy_from_slice(payload)));
                self.pump_command_queue();
            }
            _ => {
                log::error!(
                    "unexpected response gid=0x{:02x} oid=0x{:02x}: no matching in-flight command",
                    gid,
                    oid
                );
            }
        }
    }

    /// Dispatch one notification to the current state. A no-op while the
    /// engine is stalled.
    pub fn handle_notification(&mut self, gid: u8, oid: u8, payload: &[u8]) {
        if self.stalled.is_some() {
            log::debug!(
                "stalled; ignoring notification gid=0x{:02x} oid=0x{:02x}",
                gid,
                oid
            );
            return;
        }
        let current = self.current;
        let mut state = self.states.remove(&current).expect("current state missing");
        state.on_notification(self, gid, oid, payload);
        self.states.insert(current, state);
    }

    /// Drive command timeouts. The embedder calls this periodically (or
    /// whenever its timer fires); `now` is threaded in rather than read
    /// internally so callers control the clock.
    pub fn poll(&mut self, now: Instant) {
        let timed_out = matches!(
            &self.pending_command,
            Some(c) if now.saturating_duration_since(c.sent_at) >= self.config.command_timeout
        );
        if timed_out {
            let cmd = self.pending_command.take().unwrap();
            log::warn!(
                "command gid=0x{:02x} oid=0x{:02x} timed out",
                cmd.gid,
                cmd.oid
            );
            (cmd.callback)(CommandOutcome::Failed(TransportError::Timeout));
            self.pump_command_queue();
        }
    }

    /// Shared `RF_DEACTIVATE_NTF` handling for every state except
    /// RFST_LISTEN_SLEEP, which has its own rules.
    pub(crate) fn handle_rf_deactivate_ntf(&mut self, payload: &[u8]) {
        match parse_deactivate_ntf(payload) {
            Ok((ty, _reason)) => {
                let target = match ty {
                    DeactivationType::Discovery => RfStateId::Discovery,
                    DeactivationType::Idle => RfStateId::Idle,
                    DeactivationType::Sleep | DeactivationType::SleepAf => {
                        if matches!(self.current, RfStateId::ListenActive | RfStateId::ListenSleep)
                        {
                            RfStateId::ListenSleep
                        } else {
                            RfStateId::PollActive
                        }
                    }
                    DeactivationType::Unknown(b) => {
                        log::error!("RF_DEACTIVATE_NTF unknown type 0x{:02x}", b);
                        self.stall(StallReason::Error);
                        return;
                    }
                };
                self.enter_state(target, None);
            }
            Err(e) => {
                log::error!("RF_DEACTIVATE_NTF failed to parse: {}", e);
                self.stall(StallReason::Error);
            }
        }
    }

    /// Publish a successful activation to the observer
    pub(crate) fn intf_activated(&mut self, ntf: &IntfActivationNtf) {
        self.observer.intf_activated(ntf);
    }

    /// Freeze the engine: stop processing notifications until an external
    /// reset. Idempotent — only the first call reaches the observer.
    pub(crate) fn stall(&mut self, reason: StallReason) {
        if self.stalled.is_none() {
            log::error!("engine stalled: {:?}", reason);
            self.stalled = Some(reason);
            self.observer.stalled(reason);
        }
    }

    fn drain_pending(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        while let Some(pt) = self.pending.pop_front() {
            self.perform_transition(pt.target, pt.param);
        }
        self.draining = false;
    }

    fn perform_transition(&mut self, target: RfStateId, param: Option<StateParam>) {
        let old = self.current;

        if old == target {
            let mut state = self.states.remove(&target).expect("state missing");
            state.on_reenter(self, param);
            self.states.insert(target, state);
            return;
        }

        self.cancel_commands_for(old);

        let mut leaving = self.states.remove(&old).expect("state missing");
        leaving.on_leave(self);
        self.states.insert(old, leaving);

        self.current = target;
        log::debug!("{} -> {}", old.name(), target.name());
        self.observer.state_changed(old, target);

        let mut entering = self.states.remove(&target).expect("state missing");
        entering.on_enter(self, param);
        self.states.insert(target, entering);
    }

    fn pump_command_queue(&mut self) {
        if self.pending_command.is_some() {
            return;
        }
        if let Some(queued) = self.command_queue.pop_front() {
            self.sink.send_control_packet(queued.gid, queued.oid, &queued.payload);
            self.pending_command = Some(InFlightCommand {
                gid: queued.gid,
                oid: queued.oid,
                callback: queued.callback,
                initiating_state: queued.initiating_state,
                sent_at: Instant::now(),
            });
        }
    }

    /// Cancel every command (in flight or merely queued) initiated from
    /// `state`, invoking each callback with
    /// [`TransportError::Cancelled`](crate::error::TransportError::Cancelled)
    /// exactly once.
    fn cancel_commands_for(&mut self, state: RfStateId) {
        if matches!(&self.pending_command, Some(c) if c.initiating_state == state) {
            let cmd = self.pending_command.take().unwrap();
            (cmd.callback)(CommandOutcome::Failed(TransportError::Cancelled));
            self.pump_command_queue();
        }

        let mut remaining = VecDeque::with_capacity(self.command_queue.len());
        while let Some(q) = self.command_queue.pop_front() {
            if q.initiating_state == state {
                (q.callback)(CommandOutcome::Failed(TransportError::Cancelled));
            } else {
                remaining.push_back(q);
            }
        }
        self.command_queue = remaining;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{RfInterface, RfProtocol, RfTechMode};
    use crate::wire::serialize_discover_ntf;
    use crate::wire::DiscoveryNtf;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeSink {
        sent: Rc<RefCell<Vec<(u8, u8, Bytes)>>>,
    }

    impl ControlPacketSink for FakeSink {
        fn send_control_packet(&mut self, gid: u8, oid: u8, payload: &[u8]) {
            self.sent.borrow_mut().push((gid, oid, Bytes::copy_from_slice(payload)));
        }
    }

    #[derive(Default)]
    struct FakeObserver {
        transitions: Rc<RefCell<Vec<(RfStateId, RfStateId)>>>,
        activations: Rc<RefCell<usize>>,
        stalls: Rc<RefCell<usize>>,
    }

    impl SmObserver for FakeObserver {
        fn state_changed(&mut self, old: RfStateId, new: RfStateId) {
            self.transitions.borrow_mut().push((old, new));
        }
        fn intf_activated(&mut self, _ntf: &IntfActivationNtf) {
            *self.activations.borrow_mut() += 1;
        }
        fn stalled(&mut self, _reason: StallReason) {
            *self.stalls.borrow_mut() += 1;
        }
    }

    fn discovery_ntf(discovery_id: u8, protocol: RfProtocol, last: bool) -> DiscoveryNtf {
        let raw = serialize_discover_ntf_for_test(discovery_id, protocol, last);
        crate::wire::parse_discover_ntf(&raw).unwrap()
    }

    fn serialize_discover_ntf_for_test(discovery_id: u8, protocol: RfProtocol, last: bool) -> Bytes {
        let ntf = DiscoveryNtfBuilder { discovery_id, protocol, last }.build();
        serialize_discover_ntf(&ntf)
    }

    struct DiscoveryNtfBuilder {
        discovery_id: u8,
        protocol: RfProtocol,
        last: bool,
    }

    impl DiscoveryNtfBuilder {
        fn build(self) -> DiscoveryNtf {
            let raw = vec![
                self.discovery_id,
                self.protocol.into(),
                RfTechMode::PollA.into(),
                0x00,
                if self.last { 0x00 } else { 0x02 },
            ];
            crate::wire::parse_discover_ntf(&raw).unwrap()
        }
    }

    fn activated_ntf_bytes(protocol: RfProtocol, mode: RfTechMode) -> Vec<u8> {
        vec![
            0x01,
            RfInterface::Frame.into(),
            protocol.into(),
            mode.into(),
            0xfe,
            0x01,
            0x00, // no mode param
            0x04,
            0x04,
            0x00, // no activation param
        ]
    }

    fn new_engine() -> (NciSm, Rc<RefCell<Vec<(u8, u8, Bytes)>>>, Rc<RefCell<Vec<(RfStateId, RfStateId)>>>, Rc<RefCell<usize>>) {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let sink = FakeSink { sent: sent.clone() };
        let transitions = Rc::new(RefCell::new(Vec::new()));
        let activations = Rc::new(RefCell::new(0));
        let observer = FakeObserver {
            transitions: transitions.clone(),
            activations: activations.clone(),
            stalls: Rc::new(RefCell::new(0)),
        };
        let sm = NciSm::new(EngineConfig::default(), Box::new(observer), Box::new(sink));
        (sm, sent, transitions, activations)
    }

    #[test]
    fn single_target_auto_activates() {
        let (mut sm, _sent, transitions, activations) = new_engine();
        sm.enter_state(RfStateId::Discovery, None);

        let ntf = discovery_ntf(0x01, RfProtocol::T2T, true);
        sm.handle_notification(
            crate::proto::GID_RF,
            crate::proto::OID_RF_DISCOVER,
            &serialize_discover_ntf(&ntf),
        );
        // A single, last=true discovery still routes through
        // RFST_W4_ALL_DISCOVERIES before RFST_W4_HOST_SELECT selects it.
        assert_eq!(sm.current_state(), RfStateId::W4HostSelect);

        let activated = activated_ntf_bytes(RfProtocol::T2T, RfTechMode::PollA);
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_INTF_ACTIVATED, &activated);

        assert_eq!(sm.current_state(), RfStateId::PollActive);
        assert_eq!(*activations.borrow(), 1);
        assert!(transitions
            .borrow()
            .contains(&(RfStateId::Discovery, RfStateId::W4AllDiscoveries)));
    }

    #[test]
    fn w4_host_select_prefers_t2t_over_iso_dep() {
        let (mut sm, sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::Discovery, None);

        let first = discovery_ntf(0x01, RfProtocol::IsoDep, false);
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_DISCOVER, &serialize_discover_ntf(&first));
        let second = discovery_ntf(0x02, RfProtocol::T2T, true);
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_DISCOVER, &serialize_discover_ntf(&second));

        assert_eq!(sm.current_state(), RfStateId::W4HostSelect);
        let (gid, oid, payload) = sent.borrow().last().cloned().unwrap();
        assert_eq!((gid, oid), (crate::proto::GID_RF, crate::proto::OID_RF_DISCOVER_SELECT));
        // discovery id 0x02 (the T2T one) must have been selected, not 0x01
        assert_eq!(payload[0], 0x02);
    }

    #[test]
    fn w4_host_select_stays_parked_with_no_supported_protocol() {
        let (mut sm, sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::Discovery, None);

        // T1T isn't in EngineConfig::default()'s supported_protocols.
        let only = discovery_ntf(0x01, RfProtocol::T1T, true);
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_DISCOVER, &serialize_discover_ntf(&only));

        assert_eq!(sm.current_state(), RfStateId::W4HostSelect);
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn activation_failure_recovers_to_discovery() {
        let (mut sm, _sent, _transitions, activations) = new_engine();
        sm.enter_state(RfStateId::Discovery, None);

        // A truncated RF_INTF_ACTIVATED_NTF fails to parse.
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_INTF_ACTIVATED, &[0x01, 0x02]);

        assert_eq!(*activations.borrow(), 0);
        assert_eq!(sm.current_state(), RfStateId::PollActive);
        // switch_to(Discovery) queued an RF_DEACTIVATE_CMD; simulate its
        // response then the resulting notification.
        sm.handle_response(crate::proto::GID_RF, crate::proto::OID_RF_DEACTIVATE, &[0x00]);
        sm.handle_notification(
            crate::proto::GID_RF,
            crate::proto::OID_RF_DEACTIVATE,
            &[crate::proto::DeactivationType::Discovery.into(), 0x00],
        );
        assert_eq!(sm.current_state(), RfStateId::Discovery);
    }

    #[test]
    fn interface_error_stays_in_poll_active() {
        let (mut sm, _sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::PollActive, None);

        sm.handle_notification(crate::proto::GID_CORE, crate::proto::OID_CORE_INTERFACE_ERROR, &[0xb2, 0x00]);
        assert_eq!(sm.current_state(), RfStateId::PollActive);
    }

    #[test]
    fn listen_sleep_wakes_to_listen_active() {
        let (mut sm, _sent, _transitions, activations) = new_engine();
        sm.enter_state(RfStateId::ListenSleep, None);

        let activated = activated_ntf_bytes(RfProtocol::IsoDep, RfTechMode::ListenA);
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_INTF_ACTIVATED, &activated);

        assert_eq!(sm.current_state(), RfStateId::ListenActive);
        assert_eq!(*activations.borrow(), 1);
    }

    #[test]
    fn listen_sleep_stalls_on_poll_mode_activation() {
        let (mut sm, _sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::ListenSleep, None);

        let activated = activated_ntf_bytes(RfProtocol::IsoDep, RfTechMode::PollA);
        sm.handle_notification(crate::proto::GID_RF, crate::proto::OID_RF_INTF_ACTIVATED, &activated);

        assert_eq!(sm.current_state(), RfStateId::ListenSleep);
        assert_eq!(sm.stall_reason(), Some(StallReason::Error));
    }

    #[test]
    fn listen_sleep_returns_to_discovery_on_deactivate() {
        let (mut sm, _sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::ListenSleep, None);

        sm.handle_notification(
            crate::proto::GID_RF,
            crate::proto::OID_RF_DEACTIVATE,
            &[crate::proto::DeactivationType::Discovery.into(), 0x00],
        );
        assert_eq!(sm.current_state(), RfStateId::Discovery);
    }

    #[test]
    fn command_cancelled_when_initiating_state_is_left() {
        let (mut sm, _sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::W4HostSelect, None);

        let outcome = Rc::new(RefCell::new(None));
        let outcome_clone = outcome.clone();
        sm.send_command(
            0x01,
            0x04,
            Bytes::from_static(&[0x01, 0x02, 0x01]),
            Box::new(move |o| {
                *outcome_clone.borrow_mut() = Some(matches!(o, CommandOutcome::Failed(TransportError::Cancelled)));
            }),
        );

        // Force a transition away from RFST_W4_HOST_SELECT without a response.
        sm.enter_state(RfStateId::Discovery, None);

        assert_eq!(*outcome.borrow(), Some(true));
    }

    #[test]
    fn command_times_out() {
        let (mut sm, _sent, _transitions, _activations) = new_engine();
        sm.enter_state(RfStateId::PollActive, None);

        let outcome = Rc::new(RefCell::new(None));
        let outcome_clone = outcome.clone();
        sm.send_command(
            0x01,
            0x06,
            Bytes::from_static(&[0x00]),
            Box::new(move |o| {
                *outcome_clone.borrow_mut() = Some(matches!(o, CommandOutcome::Failed(TransportError::Timeout)));
            }),
        );

        let later = Instant::now() + sm.config().command_timeout + std::time::Duration::from_millis(1);
        sm.poll(later);
        assert_eq!(*outcome.borrow(), Some(true));
    }
}
