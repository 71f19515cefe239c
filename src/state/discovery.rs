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

use super::{absorb_generic_error, handle_intf_activated_ntf, log_unhandled, RfStateId, State};
use crate::param::{StateParam, W4AllDiscoveriesParam};
use crate::proto::{GenericErrorStatus, GID_CORE, GID_RF, OID_CORE_GENERIC_ERROR, OID_RF_DEACTIVATE, OID_RF_DISCOVER, OID_RF_INTF_ACTIVATED};
use crate::sm::NciSm;
use crate::wire::parse_discover_ntf;

/// RFST_DISCOVERY: waiting for the NFCC to report discovered endpoints.
#[derive(Default)]
pub struct DiscoveryState;

impl State for DiscoveryState {
    fn id(&self) -> RfStateId {
        RfStateId::Discovery
    }

    fn on_notification(&mut self, sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        match (gid, oid) {
            (GID_RF, OID_RF_DISCOVER) => match parse_discover_ntf(payload) {
                Ok(ntf) => {
                    sm.enter_state(
                        RfStateId::W4AllDiscoveries,
                        Some(StateParam::W4AllDiscoveries(W4AllDiscoveriesParam { ntf })),
                    );
                }
                Err(e) => log::warn!("RF_DISCOVER_NTF failed to parse: {}", e),
            },
            (GID_RF, OID_RF_INTF_ACTIVATED) => handle_intf_activated_ntf(sm, payload),
            (GID_RF, OID_RF_DEACTIVATE) => sm.handle_rf_deactivate_ntf(payload),
            (GID_CORE, OID_CORE_GENERIC_ERROR) => {
                if !absorb_generic_error(
                    payload,
                    &[GenericErrorStatus::TargetActivationFailed, GenericErrorStatus::TearDown],
                ) {
                    log_unhandled(self.id(), gid, oid, payload.len());
                }
            }
            _ => log_unhandled(self.id(), gid, oid, payload.len()),
        }
    }
}
