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

//! RF states: one object per element of the RFST_* set, each implementing
//! the capability set `{on_enter, on_reenter, on_leave, on_notification}`.
//!
//! The inheritance depth never exceeds one: every state gets the same
//! "log and ignore" default for `on_notification`, `on_enter`, `on_reenter`
//! and `on_leave` by inheriting the [`State`] trait's default methods, and
//! overrides only the handlers its RFST_* section of NCI 1.0 §5.2 requires.

mod discovery;
mod idle;
mod listen_active;
mod listen_sleep;
mod poll_active;
mod w4_all_discoveries;
mod w4_host_select;

pub use discovery::DiscoveryState;
pub use idle::IdleState;
pub use listen_active::ListenActiveState;
pub use listen_sleep::ListenSleepState;
pub use poll_active::PollActiveState;
pub use w4_all_discoveries::W4AllDiscoveriesState;
pub use w4_host_select::W4HostSelectState;

use crate::param::StateParam;
use crate::proto::GenericErrorStatus;
use crate::sm::NciSm;
use crate::wire::parse_generic_error_ntf;

/// Element of the closed RF state set (NFC Forum NCI 1.0 §5.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfStateId {
    /// RFST_IDLE
    Idle,
    /// RFST_DISCOVERY
    Discovery,
    /// RFST_W4_ALL_DISCOVERIES
    W4AllDiscoveries,
    /// RFST_W4_HOST_SELECT
    W4HostSelect,
    /// RFST_POLL_ACTIVE
    PollActive,
    /// RFST_LISTEN_ACTIVE
    ListenActive,
    /// RFST_LISTEN_SLEEP
    ListenSleep,
}

impl RfStateId {
    /// The full set of RF states, in no particular order
    pub const ALL: [RfStateId; 7] = [
        RfStateId::Idle,
        RfStateId::Discovery,
        RfStateId::W4AllDiscoveries,
        RfStateId::W4HostSelect,
        RfStateId::PollActive,
        RfStateId::ListenActive,
        RfStateId::ListenSleep,
    ];

    /// The NCI-standard name of this state, as used in log output
    pub fn name(&self) -> &'static str {
        match self {
            RfStateId::Idle => "RFST_IDLE",
            RfStateId::Discovery => "RFST_DISCOVERY",
            RfStateId::W4AllDiscoveries => "RFST_W4_ALL_DISCOVERIES",
            RfStateId::W4HostSelect => "RFST_W4_HOST_SELECT",
            RfStateId::PollActive => "RFST_POLL_ACTIVE",
            RfStateId::ListenActive => "RFST_LISTEN_ACTIVE",
            RfStateId::ListenSleep => "RFST_LISTEN_SLEEP",
        }
    }
}

/// Capability set every RF state implements
pub trait State {
    /// This state's identity
    fn id(&self) -> RfStateId;

    /// Called when the machine transitions into this state from a
    /// different state. `param` is owned by this state until it leaves.
    fn on_enter(&mut self, _sm: &mut NciSm, _param: Option<StateParam>) {}

    /// Called when the machine transitions into this state while already
    /// in it. Distinguishable from `on_enter` so a state can tell first
    /// entry from re-entry with a fresh parameter.
    fn on_reenter(&mut self, _sm: &mut NciSm, _param: Option<StateParam>) {}

    /// Called before the machine leaves this state for a different one.
    /// Never called when re-entering the same state.
    fn on_leave(&mut self, _sm: &mut NciSm) {}

    /// Dispatch one notification. The default logs and ignores it.
    fn on_notification(&mut self, _sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        log_unhandled(self.id(), gid, oid, payload.len());
    }
}

/// Shared "log and ignore" behaviour, reused by every state's default
/// `on_notification` and by states that fall through to it explicitly.
pub(crate) fn log_unhandled(state: RfStateId, gid: u8, oid: u8, payload_len: usize) {
    log::debug!(
        "{}: ignoring unhandled notification gid=0x{:02x} oid=0x{:02x} ({} bytes)",
        state.name(),
        gid,
        oid,
        payload_len
    );
}

/// Parse a `CORE_GENERIC_ERROR_NTF` payload and report whether its status
/// is one this state absorbs (stays put, no observer event). A payload
/// whose length isn't exactly 1, or whose status isn't in `absorbed`, is
/// never consumed here — it falls through to the default handler, per
/// spec's boundary behaviour for malformed/unrecognized generic errors.
pub(crate) fn absorb_generic_error(payload: &[u8], absorbed: &[GenericErrorStatus]) -> bool {
    match parse_generic_error_ntf(payload) {
        Ok(status) => {
            let status = GenericErrorStatus::from(status);
            let hit = absorbed.contains(&status);
            if hit {
                log::debug!("CORE_GENERIC_ERROR_NTF ({:?}) absorbed", status);
            }
            hit
        }
        Err(_) => false,
    }
}

/// Shared handler for `RF_INTF_ACTIVATED_NTF` in RFST_DISCOVERY and
/// RFST_W4_HOST_SELECT: publish the activation and enter RFST_POLL_ACTIVE,
/// or — if the notification fails to parse — still enter RFST_POLL_ACTIVE
/// (the NFCC is activated regardless of whether the DH could decode the
/// notification) and immediately request a deactivating round trip back to
/// RFST_DISCOVERY. This is an intentional defensive recovery path carried
/// over unchanged from the original implementation.
pub(crate) fn handle_intf_activated_ntf(sm: &mut NciSm, payload: &[u8]) {
    match crate::wire::parse_intf_activated_ntf(payload) {
        Ok(ntf) => {
            sm.intf_activated(&ntf);
            sm.enter_state(RfStateId::PollActive, None);
        }
        Err(e) => {
            log::warn!("RF_INTF_ACTIVATED_NTF failed to parse: {}", e);
            sm.enter_state(RfStateId::PollActive, None);
            sm.switch_to(RfStateId::Discovery);
        }
    }
}
