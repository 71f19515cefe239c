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

//! End-to-end exercises of the public API: a fake NFCC implemented as a
//! [`ControlPacketSink`] that hands command responses straight back, driven
//! entirely through `NciSm`'s public surface.

use nci_core::{
    config::EngineConfig, observer::ControlPacketSink, observer::SmObserver, proto, state::RfStateId,
    wire::IntfActivationNtf, NciSm,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct RecordingSink {
    sent: Rc<RefCell<Vec<(u8, u8, Vec<u8>)>>>,
}

impl ControlPacketSink for RecordingSink {
    fn send_control_packet(&mut self, gid: u8, oid: u8, payload: &[u8]) {
        self.sent.borrow_mut().push((gid, oid, payload.to_vec()));
    }
}

#[derive(Default)]
struct RecordingObserver {
    states: Rc<RefCell<Vec<RfStateId>>>,
    activations: Rc<RefCell<Vec<IntfActivationNtf>>>,
}

impl SmObserver for RecordingObserver {
    fn state_changed(&mut self, _old: RfStateId, new: RfStateId) {
        self.states.borrow_mut().push(new);
    }

    fn intf_activated(&mut self, ntf: &IntfActivationNtf) {
        self.activations.borrow_mut().push(ntf.clone());
    }
}

fn new_engine() -> (NciSm, Rc<RefCell<Vec<(u8, u8, Vec<u8>)>>>, Rc<RefCell<Vec<RfStateId>>>, Rc<RefCell<Vec<IntfActivationNtf>>>) {
    let sent = Rc::new(RefCell::new(Vec::new()));
    let states = Rc::new(RefCell::new(Vec::new()));
    let activations = Rc::new(RefCell::new(Vec::new()));
    let sink = RecordingSink { sent: sent.clone() };
    let observer = RecordingObserver { states: states.clone(), activations: activations.clone() };
    let sm = NciSm::new(EngineConfig::default(), Box::new(observer), Box::new(sink));
    (sm, sent, states, activations)
}

fn discover_ntf(discovery_id: u8, protocol: u8, last: bool) -> Vec<u8> {
    vec![discovery_id, protocol, 0x00, 0x00, if last { 0x00 } else { 0x02 }]
}

fn intf_activated_ntf(protocol: u8, mode: u8) -> Vec<u8> {
    vec![0x01, 0x01, protocol, mode, 0xfe, 0x01, 0x00, 0x04, 0x04, 0x00]
}

#[test]
fn single_target_discovery_to_poll_active() {
    let (mut sm, _sent, states, activations) = new_engine();
    sm.enter_state(RfStateId::Discovery, None);

    sm.handle_notification(proto::GID_RF, proto::OID_RF_DISCOVER, &discover_ntf(0x01, 0x02, true));
    assert_eq!(sm.current_state(), RfStateId::W4HostSelect);

    sm.handle_notification(proto::GID_RF, proto::OID_RF_INTF_ACTIVATED, &intf_activated_ntf(0x02, 0x00));
    assert_eq!(sm.current_state(), RfStateId::PollActive);
    assert_eq!(activations.borrow().len(), 1);
    assert_eq!(
        states.borrow().as_slice(),
        &[
            RfStateId::Discovery,
            RfStateId::W4AllDiscoveries,
            RfStateId::W4HostSelect,
            RfStateId::PollActive
        ]
    );
}

#[test]
fn multi_target_batch_waits_for_last_flag() {
    let (mut sm, sent, _states, _activations) = new_engine();
    sm.enter_state(RfStateId::Discovery, None);

    sm.handle_notification(proto::GID_RF, proto::OID_RF_DISCOVER, &discover_ntf(0x01, 0x04, false));
    assert_eq!(sm.current_state(), RfStateId::W4AllDiscoveries);

    sm.handle_notification(proto::GID_RF, proto::OID_RF_DISCOVER, &discover_ntf(0x02, 0x04, false));
    assert_eq!(sm.current_state(), RfStateId::W4AllDiscoveries);

    sm.handle_notification(proto::GID_RF, proto::OID_RF_DISCOVER, &discover_ntf(0x03, 0x02, true));
    assert_eq!(sm.current_state(), RfStateId::W4HostSelect);

    // RF_DISCOVER_SELECT_CMD should have picked discovery id 0x03 (T2T),
    // the only T2T candidate, over the two ISO-DEP ones.
    let (gid, oid, payload) = sent.borrow().last().cloned().unwrap();
    assert_eq!((gid, oid), (proto::GID_RF, proto::OID_RF_DISCOVER_SELECT));
    assert_eq!(payload[0], 0x03);
}

#[test]
fn command_response_releases_the_in_flight_slot() {
    let (mut sm, sent, _states, _activations) = new_engine();
    sm.enter_state(RfStateId::PollActive, None);

    let fired = Rc::new(RefCell::new(false));
    let fired_clone = fired.clone();
    sm.send_command(
        proto::GID_RF,
        proto::OID_RF_DEACTIVATE,
        bytes::Bytes::from_static(&[0x01]),
        Box::new(move |_outcome| *fired_clone.borrow_mut() = true),
    );
    assert_eq!(sent.borrow().len(), 1);

    sm.handle_response(proto::GID_RF, proto::OID_RF_DEACTIVATE, &[0x00]);
    assert!(*fired.borrow());
}

#[test]
fn listen_sleep_mismatched_mode_stalls_the_engine() {
    let (mut sm, _sent, _states, _activations) = new_engine();
    sm.enter_state(RfStateId::ListenSleep, None);

    // Mode 0x00 (PollA) woke a listen-sleep state: this can't happen on a
    // well-behaved NFCC and the engine refuses to guess what to do.
    sm.handle_notification(proto::GID_RF, proto::OID_RF_INTF_ACTIVATED, &intf_activated_ntf(0x04, 0x00));

    assert_eq!(sm.current_state(), RfStateId::ListenSleep);
    assert_eq!(sm.stall_reason(), Some(proto::StallReason::Error));

    // Stalled: further notifications are refused.
    sm.handle_notification(proto::GID_RF, proto::OID_RF_DEACTIVATE, &[0x03, 0x00]);
    assert_eq!(sm.current_state(), RfStateId::ListenSleep);
}
