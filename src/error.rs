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

//! Error types for the NCI codec and command correlator

use thiserror::Error;

/// Errors raised while parsing an NCI control packet payload
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The payload was too short to contain the fields the message requires
    #[error("packet truncated: expected at least {expected} bytes, got {got}")]
    Truncated {
        /// minimum number of bytes the message requires
        expected: usize,
        /// number of bytes actually present
        got: usize,
    },
    /// The payload length did not match the fixed size the message requires
    #[error("unsupported payload length: expected exactly {expected} bytes, got {got}")]
    UnsupportedLength {
        /// exact number of bytes the message requires
        expected: usize,
        /// number of bytes actually present
        got: usize,
    },
}

/// Errors surfaced to a command's response callback instead of a decoded payload
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No response arrived within the configured command timeout
    #[error("command timed out waiting for a response")]
    Timeout,
    /// The command's initiating state was left before a response arrived
    #[error("command cancelled because its initiating state was left")]
    Cancelled,
}
