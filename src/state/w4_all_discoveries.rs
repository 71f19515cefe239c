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
use crate::param::{StateParam, W4HostSelectParam};
use crate::proto::{GID_RF, OID_RF_DISCOVER};
use crate::sm::NciSm;
use crate::wire::{parse_discover_ntf, DiscoveryNtf};

/// RFST_W4_ALL_DISCOVERIES: accumulating `RF_DISCOVER_NTF`s until the NFCC
/// marks one as the last of the batch.
#[derive(Default)]
pub struct W4AllDiscoveriesState {
    discoveries: Vec<DiscoveryNtf>,
}

impl W4AllDiscoveriesState {
    /// Record one discovery and, if it's marked as the last of the batch,
    /// hand the accumulated list off to RFST_W4_HOST_SELECT. Shared between
    /// entry (the discovery that triggered the transition into this state)
    /// and every subsequent `RF_DISCOVER_NTF` received while already here —
    /// a single-target discovery whose first notification is already
    /// marked "last" moves straight on to RFST_W4_HOST_SELECT without
    /// waiting for more.
    fn handle_discovery(&mut self, sm: &mut NciSm, ntf: DiscoveryNtf) {
        let last = ntf.last;
        self.discoveries.push(ntf);
        if last {
            let discoveries = std::mem::take(&mut self.discoveries);
            sm.enter_state(
                RfStateId::W4HostSelect,
                Some(StateParam::W4HostSelect(W4HostSelectParam { discoveries })),
            );
        }
    }

    fn start(&mut self, sm: &mut NciSm, param: Option<StateParam>) {
        self.discoveries.clear();
        if let Some(StateParam::W4AllDiscoveries(p)) = param {
            self.handle_discovery(sm, p.ntf);
        }
    }
}

impl State for W4AllDiscoveriesState {
    fn id(&self) -> RfStateId {
        RfStateId::W4AllDiscoveries
    }

    fn on_enter(&mut self, sm: &mut NciSm, param: Option<StateParam>) {
        self.start(sm, param);
    }

    fn on_reenter(&mut self, sm: &mut NciSm, param: Option<StateParam>) {
        self.start(sm, param);
    }

    fn on_leave(&mut self, _sm: &mut NciSm) {
        self.discoveries.clear();
    }

    fn on_notification(&mut self, sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        match (gid, oid) {
            (GID_RF, OID_RF_DISCOVER) => match parse_discover_ntf(payload) {
                Ok(ntf) => self.handle_discovery(sm, ntf),
                Err(e) => log::warn!("RF_DISCOVER_NTF failed to parse: {}", e),
            },
            _ => log_unhandled(self.id(), gid, oid, payload.len()),
        }
    }
}
