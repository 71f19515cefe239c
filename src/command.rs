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

//! Command queueing and response correlation.
//!
//! The engine only ever has one command outstanding to the NFCC at a time,
//! matching NCI's single in-flight-command rule. Anything sent while a
//! command is already in flight queues up FIFO and goes out once the slot
//! frees, whether that happens by response, timeout, or cancellation.

use crate::error::TransportError;
use crate::state::RfStateId;
use bytes::Bytes;
use std::time::Instant;

/// Outcome handed to a command's response callback. Invoked exactly once,
/// regardless of whether the command actually completed, timed out, or was
/// cancelled by a state transition.
pub enum CommandOutcome {
    /// The NFCC responded; this is its response payload
    Success(Bytes),
    /// The command did not complete
    Failed(TransportError),
}

/// A response callback. Boxed so `NciSm` can hold a queue of heterogeneous
/// closures without generic parameters leaking into its own type.
pub type ResponseCallback = Box<dyn FnOnce(CommandOutcome)>;

/// A command waiting for the in-flight slot to free up
pub(crate) struct QueuedCommand {
    pub gid: u8,
    pub oid: u8,
    pub payload: Bytes,
    pub callback: ResponseCallback,
    pub initiating_state: RfStateId,
}

/// The single command currently sent to the NFCC, awaiting its response
pub(crate) struct InFlightCommand {
    pub gid: u8,
    pub oid: u8,
    pub callback: ResponseCallback,
    pub initiating_state: RfStateId,
    pub sent_at: Instant,
}
