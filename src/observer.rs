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

//! The two seams an embedder implements: publishing engine events outward,
//! and actually putting bytes on the wire.

use crate::proto::StallReason;
use crate::state::RfStateId;
use crate::wire::IntfActivationNtf;

/// Engine events of interest to whatever owns the NciSm (typically the NFC
/// service layer that also drives logical connections on top of an
/// activated interface).
pub trait SmObserver {
    /// The RF state changed. Never called for a re-entry into the same state.
    fn state_changed(&mut self, _old: RfStateId, _new: RfStateId) {}

    /// An RF interface was successfully activated
    fn intf_activated(&mut self, _ntf: &IntfActivationNtf) {}

    /// The engine refuses to process further notifications until reset
    fn stalled(&mut self, _reason: StallReason) {}
}

/// Where the engine sends outbound control packets. The embedder owns the
/// transport (SAR, socket, whatever carries NCI frames) and is responsible
/// for driving responses and notifications back into the engine.
pub trait ControlPacketSink {
    /// Send one control packet. `gid`/`oid` address it; `payload` is the
    /// control packet's payload (the embedder prepends whatever framing its
    /// transport needs).
    fn send_control_packet(&mut self, gid: u8, oid: u8, payload: &[u8]);
}
