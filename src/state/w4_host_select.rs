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
use crate::command::CommandOutcome;
use crate::param::StateParam;
use crate::proto::{
    GenericErrorStatus, RfInterface, RfProtocol, GID_CORE, GID_RF, OID_CORE_GENERIC_ERROR,
    OID_RF_INTF_ACTIVATED, OID_RF_DISCOVER_SELECT,
};
use crate::sm::NciSm;
use crate::wire::serialize_discover_select_cmd;

/// RFST_W4_HOST_SELECT: picking which of the accumulated discoveries to
/// activate, per [`crate::config::EngineConfig::protocol_preference`].
#[derive(Default)]
pub struct W4HostSelectState;

impl W4HostSelectState {
    fn select(&mut self, sm: &mut NciSm, param: Option<StateParam>) {
        let discoveries = match param {
            Some(StateParam::W4HostSelect(p)) => p.discoveries,
            _ => Vec::new(),
        };

        let mut eligible: Vec<_> = discoveries
            .into_iter()
            .filter(|d| sm.config().supports_protocol(d.protocol))
            .collect();

        // If nothing supported was discovered, stay parked here: no command
        // is sent and no transition is requested.
        if eligible.is_empty() {
            return;
        }

        eligible.sort_by_key(|d| (sm.config().preference_rank(d.protocol), d.discovery_id));
        let chosen = eligible.remove(0);

        let interface = if chosen.protocol == RfProtocol::IsoDep {
            RfInterface::IsoDep
        } else {
            RfInterface::Frame
        };
        let discovery_id = chosen.discovery_id;
        let protocol = chosen.protocol;
        let payload = serialize_discover_select_cmd(discovery_id, protocol, interface);

        sm.send_command(
            GID_RF,
            OID_RF_DISCOVER_SELECT,
            payload,
            Box::new(move |outcome| match outcome {
                CommandOutcome::Success(_) => {
                    log::debug!("RF_DISCOVER_SELECT_CMD({}) accepted", discovery_id)
                }
                // No retry: the original implementation leaves this as a
                // possible future improvement (storing the list and
                // selecting the next-best protocol on rejection).
                CommandOutcome::Failed(e) => {
                    log::warn!("RF_DISCOVER_SELECT_CMD({}) failed: {:?}", discovery_id, e)
                }
            }),
        );
    }
}

impl State for W4HostSelectState {
    fn id(&self) -> RfStateId {
        RfStateId::W4HostSelect
    }

    fn on_enter(&mut self, sm: &mut NciSm, param: Option<StateParam>) {
        self.select(sm, param);
    }

    fn on_reenter(&mut self, sm: &mut NciSm, param: Option<StateParam>) {
        self.select(sm, param);
    }

    fn on_notification(&mut self, sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        match (gid, oid) {
            (GID_RF, OID_RF_INTF_ACTIVATED) => handle_intf_activated_ntf(sm, payload),
            (GID_CORE, OID_CORE_GENERIC_ERROR) => {
                if !absorb_generic_error(payload, &[GenericErrorStatus::TargetActivationFailed]) {
                    log_unhandled(self.id(), gid, oid, payload.len());
                }
            }
            _ => log_unhandled(self.id(), gid, oid, payload.len()),
        }
    }
}
