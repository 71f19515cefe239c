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

//! Host-side NCI RF discovery and activation state machine.
//!
//! Implements the RF Discovery and RF Interface Mode Activation procedures
//! of NFC Forum NCI 1.0 §5.2: the closed set of RF states a Device Host
//! cycles through between telling the NFCC to start discovery and having an
//! RF interface actually activated, in poll or listen mode.
//!
//! This crate owns only that state machine. It does not own a transport: the
//! embedder feeds it notifications and command responses through
//! [`NciSm::handle_notification`] and [`NciSm::handle_response`], and
//! implements [`ControlPacketSink`] to actually put bytes on the wire.

pub mod command;
pub mod config;
pub mod error;
pub mod observer;
pub mod param;
pub mod proto;
mod sm;
pub mod state;
pub mod wire;

pub use command::{CommandOutcome, ResponseCallback};
pub use config::EngineConfig;
pub use error::{ParseError, TransportError};
pub use observer::{ControlPacketSink, SmObserver};
pub use sm::NciSm;
pub use state::RfStateId;
