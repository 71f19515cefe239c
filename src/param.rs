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

//! Typed carriers of per-transition data.
//!
//! A [`StateParam`] is produced by whoever requests a transition and is
//! handed to the target state's `on_enter`/`on_reenter`. Ownership transfers
//! at that point: the target state decides how long to keep it.

use crate::wire::DiscoveryNtf;

/// Data carried across a state transition
#[derive(Debug, Clone)]
pub enum StateParam {
    /// The single discovery that triggered entry into W4_ALL_DISCOVERIES
    W4AllDiscoveries(W4AllDiscoveriesParam),
    /// The ordered discoveries accumulated in W4_ALL_DISCOVERIES
    W4HostSelect(W4HostSelectParam),
}

/// Parameter carried into RFST_W4_ALL_DISCOVERIES
#[derive(Debug, Clone)]
pub struct W4AllDiscoveriesParam {
    /// The discovery notification that caused this transition
    pub ntf: DiscoveryNtf,
}

/// Parameter carried into RFST_W4_HOST_SELECT
#[derive(Debug, Clone)]
pub struct W4HostSelectParam {
    /// All discoveries accumulated while in RFST_W4_ALL_DISCOVERIES, in
    /// the order they were received
    pub discoveries: Vec<DiscoveryNtf>,
}
