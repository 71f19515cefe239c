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

use super::{RfStateId, State};

/// RFST_IDLE: RF discovery not running. No notification handling of its
/// own; everything falls to the default log-and-ignore behaviour.
#[derive(Default)]
pub struct IdleState;

impl State for IdleState {
    fn id(&self) -> RfStateId {
        RfStateId::Idle
    }
}
