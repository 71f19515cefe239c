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
use crate::proto::{GID_RF, OID_RF_DEACTIVATE};
use crate::sm::NciSm;

/// RFST_LISTEN_ACTIVE: an endpoint is activated in listen mode.
#[derive(Default)]
pub struct ListenActiveState;

impl State for ListenActiveState {
    fn id(&self) -> RfStateId {
        RfStateId::ListenActive
    }

    fn on_notification(&mut self, sm: &mut NciSm, gid: u8, oid: u8, payload: &[u8]) {
        match (gid, oid) {
            (GID_RF, OID_RF_DEACTIVATE) => sm.handle_rf_deactivate_ntf(payload),
            _ => log_unhandled(self.id(), gid, oid, payload.len()),
        }
    }
}
