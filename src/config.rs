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

//! Engine configuration.
//!
//! The original C implementation hard-codes the set of supported protocols
//! and the RFST_W4_HOST_SELECT preference order. Per the open question in
//! the design notes, this crate exposes both as configuration but keeps the
//! bit-compatible default order.

use crate::proto::RfProtocol;
use std::time::Duration;

/// Engine construction parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Protocols this DH is willing to select in RFST_W4_HOST_SELECT
    pub supported_protocols: Vec<RfProtocol>,
    /// Preference order used to rank discoveries in RFST_W4_HOST_SELECT.
    /// Earlier entries win; protocols absent from this list sort after
    /// every listed protocol (but are still eligible if present in
    /// `supported_protocols`).
    pub protocol_preference: Vec<RfProtocol>,
    /// How long the engine waits for a command response before invoking
    /// the response callback with [`crate::error::TransportError::Timeout`]
    pub command_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            supported_protocols: vec![RfProtocol::T2T, RfProtocol::IsoDep],
            protocol_preference: vec![RfProtocol::T2T, RfProtocol::IsoDep],
            command_timeout: Duration::from_millis(500),
        }
    }
}

impl EngineConfig {
    /// Index of `protocol` in the preference order, or `protocol_preference.len()`
    /// if it is not explicitly ranked (still sorts after every ranked protocol).
    pub(crate) fn preference_rank(&self, protocol: RfProtocol) -> usize {
        self.protocol_preference.iter().position(|p| *p == protocol).unwrap_or(self.protocol_preference.len())
    }

    /// True if `protocol` is one this DH is willing to select
    pub(crate) fn supports_protocol(&self, protocol: RfProtocol) -> bool {
        self.supported_protocols.contains(&protocol)
    }
}
