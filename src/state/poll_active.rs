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
use crate::proto::{InterfaceErrorStatus, GID_CORE, GID_RF, OID_CORE_INTERFACE_ERROR, OID_RF_DEACTIVATE};
use crate::sm::NciSm;
use crate::wire::parse_interface_error_ntf;

/// RFST_POLL_ACTIVE: an endpoint is activated in poll mode.
#[derive(Default)]
pub struct PollActiveState;

impl State for PollActiveState {
    fn id(&self) -> RfStateId {
        RfStateId::PollActive
    }

    fn on_notification(&mut self, sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        match (gid, oid) {
            (GID_CORE, OID_CORE_INTERFACE_ERROR) => match parse_interface_error_ntf(payload) {
                Ok((status, _conn_id)) => {
                    let status = InterfaceErrorStatus::from(status);
                    match status {
                        InterfaceErrorStatus::Transmission
                        | InterfaceErrorStatus::Protocol
                        | InterfaceErrorStatus::Timeout => {
                            log::debug!("CORE_INTERFACE_ERROR_NTF ({:?}) absorbed", status);
                        }
                        InterfaceErrorStatus::Unknown(_) => {
                            log_unhandled(self.id(), gid, oid, payload.len())
                        }
                    }
                }
                Err(e) => log::warn!("CORE_INTERFACE_ERROR_NTF failed to parse: {}", e),
            },
            (GID_RF, OID_RF_DEACTIVATE) => sm.handle_rf_deactivate_ntf(payload),
            _ => log_unhandled(self.id(), gid, oid, payload.len()),
        }
    }
}
