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

//! NCI 1.0 value enumerations.
//!
//! Unknown wire values never fail to decode: every enum here carries an
//! `Unknown(u8)` variant so the codec can stay permissive while the state
//! machine decides whether an unrecognized value participates in anything.

/// GID of CORE_* control messages
pub const GID_CORE: u8 = 0x00;
/// GID of RF_* control messages
pub const GID_RF: u8 = 0x01;

/// OID of CORE_GENERIC_ERROR_NTF
pub const OID_CORE_GENERIC_ERROR: u8 = 0x07;
/// OID of CORE_INTERFACE_ERROR_NTF
pub const OID_CORE_INTERFACE_ERROR: u8 = 0x08;
/// OID of RF_DISCOVER_NTF
pub const OID_RF_DISCOVER: u8 = 0x03;
/// OID of RF_DISCOVER_SELECT_CMD
pub const OID_RF_DISCOVER_SELECT: u8 = 0x04;
/// OID of RF_INTF_ACTIVATED_NTF
pub const OID_RF_INTF_ACTIVATED: u8 = 0x05;
/// OID of RF_DEACTIVATE_NTF / RF_DEACTIVATE_CMD
pub const OID_RF_DEACTIVATE: u8 = 0x06;

/// RF protocol, NCI 1.0 Table 89
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RfProtocol {
    /// Protocol not yet determined
    Undetermined,
    /// Type 1 Tag
    T1T,
    /// Type 2 Tag
    T2T,
    /// Type 3 Tag
    T3T,
    /// ISO-DEP (ISO/IEC 14443-4)
    IsoDep,
    /// NFC-DEP (peer to peer)
    NfcDep,
    /// Value not recognized by this implementation
    Unknown(u8),
}

impl From<u8> for RfProtocol {
    fn from(b: u8) -> Self {
        match b {
            0x00 => RfProtocol::Undetermined,
            0x01 => RfProtocol::T1T,
            0x02 => RfProtocol::T2T,
            0x03 => RfProtocol::T3T,
            0x04 => RfProtocol::IsoDep,
            0x05 => RfProtocol::NfcDep,
            other => RfProtocol::Unknown(other),
        }
    }
}

impl From<RfProtocol> for u8 {
    fn from(p: RfProtocol) -> Self {
        match p {
            RfProtocol::Undetermined => 0x00,
            RfProtocol::T1T => 0x01,
            RfProtocol::T2T => 0x02,
            RfProtocol::T3T => 0x03,
            RfProtocol::IsoDep => 0x04,
            RfProtocol::NfcDep => 0x05,
            RfProtocol::Unknown(b) => b,
        }
    }
}

/// RF interface, NCI 1.0 Table 67
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfInterface {
    /// Direct NFCEE interface, no RF involved
    NfceeDirect,
    /// Raw frame interface
    Frame,
    /// ISO-DEP interface
    IsoDep,
    /// NFC-DEP interface
    NfcDep,
    /// Value not recognized by this implementation
    Unknown(u8),
}

impl From<u8> for RfInterface {
    fn from(b: u8) -> Self {
        match b {
            0x00 => RfInterface::NfceeDirect,
            0x01 => RfInterface::Frame,
            0x02 => RfInterface::IsoDep,
            0x03 => RfInterface::NfcDep,
            other => RfInterface::Unknown(other),
        }
    }
}

impl From<RfInterface> for u8 {
    fn from(i: RfInterface) -> Self {
        match i {
            RfInterface::NfceeDirect => 0x00,
            RfInterface::Frame => 0x01,
            RfInterface::IsoDep => 0x02,
            RfInterface::NfcDep => 0x03,
            RfInterface::Unknown(b) => b,
        }
    }
}

/// RF technology and mode (poll/listen across A/B/F/V), NCI 1.0 Table 54
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfTechMode {
    /// NFC-A, passive poll
    PollA,
    /// NFC-B, passive poll
    PollB,
    /// NFC-F, passive poll
    PollF,
    /// NFC-A, active poll
    PollActiveA,
    /// NFC-F, active poll
    PollActiveF,
    /// NFC-V (ISO 15693), passive poll
    PollV,
    /// NFC-A Kovio, passive poll
    PollKovio,
    /// NFC-A, passive listen
    ListenA,
    /// NFC-B, passive listen
    ListenB,
    /// NFC-F, passive listen
    ListenF,
    /// NFC-A, active listen
    ListenActiveA,
    /// NFC-F, active listen
    ListenActiveF,
    /// NFC-V (ISO 15693), passive listen
    ListenV,
    /// Value not recognized by this implementation
    Unknown(u8),
}

impl From<u8> for RfTechMode {
    fn from(b: u8) -> Self {
        match b {
            0x00 => RfTechMode::PollA,
            0x01 => RfTechMode::PollB,
            0x02 => RfTechMode::PollF,
            0x03 => RfTechMode::PollActiveA,
            0x05 => RfTechMode::PollActiveF,
            0x06 => RfTechMode::PollV,
            0x77 => RfTechMode::PollKovio,
            0x80 => RfTechMode::ListenA,
            0x81 => RfTechMode::ListenB,
            0x82 => RfTechMode::ListenF,
            0x83 => RfTechMode::ListenActiveA,
            0x85 => RfTechMode::ListenActiveF,
            0x86 => RfTechMode::ListenV,
            other => RfTechMode::Unknown(other),
        }
    }
}

impl From<RfTechMode> for u8 {
    fn from(m: RfTechMode) -> Self {
        match m {
            RfTechMode::PollA => 0x00,
            RfTechMode::PollB => 0x01,
            RfTechMode::PollF => 0x02,
            RfTechMode::PollActiveA => 0x03,
            RfTechMode::PollActiveF => 0x05,
            RfTechMode::PollV => 0x06,
            RfTechMode::PollKovio => 0x77,
            RfTechMode::ListenA => 0x80,
            RfTechMode::ListenB => 0x81,
            RfTechMode::ListenF => 0x82,
            RfTechMode::ListenActiveA => 0x83,
            RfTechMode::ListenActiveF => 0x85,
            RfTechMode::ListenV => 0x86,
            RfTechMode::Unknown(b) => b,
        }
    }
}

/// True if `mode` is one of the listen-side technology/mode values.
///
/// NCI 1.0 sets bit 0x80 on every listen-mode value; poll-mode values never
/// set it. `Unknown` bytes are classified the same way so a malformed but
/// high-bit-set value is still treated as "listen" for the purposes of
/// RFST_LISTEN_SLEEP's wakeup check.
pub fn is_listen_mode(mode: RfTechMode) -> bool {
    u8::from(mode) & 0x80 != 0
}

/// RF Interface Deactivation type, NCI 1.0 Table 61
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationType {
    /// Deactivate to IDLE
    Idle,
    /// Deactivate to Sleep
    Sleep,
    /// Deactivate to Sleep, autonomously re-activatable by the Reader/Writer
    SleepAf,
    /// Deactivate to Discovery
    Discovery,
    /// Value not recognized by this implementation
    Unknown(u8),
}

impl From<u8> for DeactivationType {
    fn from(b: u8) -> Self {
        match b {
            0x00 => DeactivationType::Idle,
            0x01 => DeactivationType::Sleep,
            0x02 => DeactivationType::SleepAf,
            0x03 => DeactivationType::Discovery,
            other => DeactivationType::Unknown(other),
        }
    }
}

impl From<DeactivationType> for u8 {
    fn from(t: DeactivationType) -> Self {
        match t {
            DeactivationType::Idle => 0x00,
            DeactivationType::Sleep => 0x01,
            DeactivationType::SleepAf => 0x02,
            DeactivationType::Discovery => 0x03,
            DeactivationType::Unknown(b) => b,
        }
    }
}

/// CORE_GENERIC_ERROR_NTF status, NCI 1.0 Table 98
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericErrorStatus {
    /// DISCOVERY_ALREADY_STARTED
    DiscoveryAlreadyStarted,
    /// DISCOVERY_TARGET_ACTIVATION_FAILED
    TargetActivationFailed,
    /// DISCOVERY_TEAR_DOWN
    TearDown,
    /// Value not recognized by this implementation
    Unknown(u8),
}

impl From<u8> for GenericErrorStatus {
    fn from(b: u8) -> Self {
        match b {
            0xa0 => GenericErrorStatus::DiscoveryAlreadyStarted,
            0xa1 => GenericErrorStatus::TargetActivationFailed,
            0xa2 => GenericErrorStatus::TearDown,
            other => GenericErrorStatus::Unknown(other),
        }
    }
}

/// CORE_INTERFACE_ERROR_NTF status, NCI 1.0 Table 99
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceErrorStatus {
    /// RF_TRANSMISSION_ERROR
    Transmission,
    /// RF_PROTOCOL_ERROR
    Protocol,
    /// RF_TIMEOUT_ERROR
    Timeout,
    /// Value not recognized by this implementation
    Unknown(u8),
}

impl From<u8> for InterfaceErrorStatus {
    fn from(b: u8) -> Self {
        match b {
            0xb0 => InterfaceErrorStatus::Transmission,
            0xb1 => InterfaceErrorStatus::Protocol,
            0xb2 => InterfaceErrorStatus::Timeout,
            other => InterfaceErrorStatus::Unknown(other),
        }
    }
}

/// Reason the engine refused to process further notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallReason {
    /// A fatal, unrecoverable protocol or engine error
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_round_trips_known_values() {
        for b in [0x00u8, 0x01, 0x02, 0x03, 0x04, 0x05] {
            assert_eq!(u8::from(RfProtocol::from(b)), b);
        }
    }

    #[test]
    fn protocol_unknown_value_preserved() {
        assert_eq!(RfProtocol::from(0x7f), RfProtocol::Unknown(0x7f));
        assert_eq!(u8::from(RfProtocol::Unknown(0x7f)), 0x7f);
    }

    #[test]
    fn listen_mode_classification() {
        assert!(!is_listen_mode(RfTechMode::PollA));
        assert!(!is_listen_mode(RfTechMode::PollActiveF));
        assert!(!is_listen_mode(RfTechMode::PollKovio));
        assert!(is_listen_mode(RfTechMode::ListenA));
        assert!(is_listen_mode(RfTechMode::ListenActiveF));
        assert!(is_listen_mode(RfTechMode::Unknown(0x90)));
        assert!(!is_listen_mode(RfTechMode::Unknown(0x10)));
    }

    #[test]
    fn kovio_round_trips() {
        assert_eq!(RfTechMode::from(0x77), RfTechMode::PollKovio);
        assert_eq!(u8::from(RfTechMode::PollKovio), 0x77);
    }
}
