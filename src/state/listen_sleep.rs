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

use super::{log_unhandled, RfStateId, State};
use crate::proto::{is_listen_mode, DeactivationType, StallReason, GID_RF, OID_RF_DEACTIVATE, OID_RF_INTF_ACTIVATED};
use crate::sm::NciSm;
use crate::wire::{parse_deactivate_ntf, parse_intf_activated_ntf};

/// RFST_LISTEN_SLEEP: listening but dormant, waiting to be woken by the
/// Reader/Writer or to be released back into discovery.
#[derive(Default)]
pub struct ListenSleepState;

impl State for ListenSleepState {
    fn id(&self) -> RfStateId {
        RfStateId::ListenSleep
    }

    fn on_notification(&mut self, sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        match (gid, oid) {
            (GID_RF, OID_RF_INTF_ACTIVATED) => match parse_intf_activated_ntf(payload) {
                Ok(ntf) if is_listen_mode(ntf.mode) => {
                    sm.intf_activated(&ntf);
                    sm.enter_state(RfStateId::ListenActive, None);
                }
                Ok(ntf) => {
                    log::error!(
                        "RF_INTF_ACTIVATED_NTF woke RFST_LISTEN_SLEEP in a non-listen mode ({:?})",
                        ntf.mode
                    );
                    sm.stall(StallReason::Error);
                }
                Err(e) => {
                    log::error!("RF_INTF_ACTIVATED_NTF failed to parse: {}", e);
                    sm.stall(StallReason::Error);
                }
            },
            // Not delegated to the shared deactivate-notification handler:
            // this state only ever leaves on its own terms.
            (GID_RF, OID_RF_DEACTIVATE) => match parse_deactivate_ntf(payload) {
                Ok((DeactivationType::Discovery, _)) => sm.enter_state(RfStateId::Discovery, None),
                Ok((ty, _)) => {
                    log::error!("RF_DEACTIVATE_NTF({:?}) unexpected in RFST_LISTEN_SLEEP", ty);
                    sm.stall(StallReason::Error);
                }
                Err(e) => {
                    log::error!("RF_DEACTIVATE_NTF failed to parse: {}", e);
                    sm.stall(StallReason::Error);
                }
            },
            _ => log_unhandled(self.id(), gid, oid, payload.len()),
        }
    }
}
