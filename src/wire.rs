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

//! Pure parse/serialize functions over NCI control packet payloads.
//!
//! Every function here is side-effect-free: no logging, no state. Callers
//! decide what a parse failure means for the state machine and log
//! accordingly, matching how the original `nci_parse_*` helpers stay free
//! of `GDEBUG`/`GWARN` calls while every call site around them logs.

use crate::error::ParseError;
use crate::proto::{DeactivationType, RfInterface, RfProtocol, RfTechMode};
use bytes::{BufMut, Bytes, BytesMut};

/// A single discovered remote endpoint, parsed from `RF_DISCOVER_NTF`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryNtf {
    /// RF Discovery ID assigned by the NFCC
    pub discovery_id: u8,
    /// RF protocol the endpoint was discovered with
    pub protocol: RfProtocol,
    /// RF technology/mode the endpoint was discovered on
    pub mode: RfTechMode,
    /// Mode-specific parameter bytes, opaque to this crate
    pub mode_param: Bytes,
    /// True when this was the last `RF_DISCOVER_NTF` of the batch
    pub last: bool,
    /// Raw wire value of the Notification Type field (2 means "not last")
    notification_type: u8,
}

/// Parse `RF_DISCOVER_NTF` (GID=1, OID=3)
pub fn parse_discover_ntf(payload: &[u8]) -> Result<DiscoveryNtf, ParseError> {
    if payload.len() < 4 {
        return Err(ParseError::Truncated { expected: 4, got: payload.len() });
    }
    let discovery_id = payload[0];
    let protocol = RfProtocol::from(payload[1]);
    let mode = RfTechMode::from(payload[2]);
    let mode_param_len = payload[3] as usize;
    let expected = 4 + mode_param_len + 1;
    if payload.len() < expected {
        return Err(ParseError::Truncated { expected, got: payload.len() });
    }
    let mode_param = Bytes::copy_from_slice(&payload[4..4 + mode_param_len]);
    let notification_type = payload[4 + mode_param_len];
    Ok(DiscoveryNtf {
        discovery_id,
        protocol,
        mode,
        mode_param,
        last: notification_type != 2,
        notification_type,
    })
}

/// Serialize a [`DiscoveryNtf`] back into an `RF_DISCOVER_NTF` payload.
///
/// Round-trips every field the parser extracts, including the opaque
/// mode-parameter bytes and the raw Notification Type byte.
pub fn serialize_discover_ntf(ntf: &DiscoveryNtf) -> Bytes {
    let mut buf = BytesMut::with_capacity(5 + ntf.mode_param.len());
    buf.put_u8(ntf.discovery_id);
    buf.put_u8(ntf.protocol.into());
    buf.put_u8(ntf.mode.into());
    buf.put_u8(ntf.mode_param.len() as u8);
    buf.put_slice(&ntf.mode_param);
    buf.put_u8(ntf.notification_type);
    buf.freeze()
}

/// An activated RF interface, parsed from `RF_INTF_ACTIVATED_NTF`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntfActivationNtf {
    /// RF Discovery ID of the activated endpoint
    pub discovery_id: u8,
    /// RF interface that was activated
    pub interface: RfInterface,
    /// RF protocol of the activated endpoint
    pub protocol: RfProtocol,
    /// RF technology/mode the endpoint activated on
    pub mode: RfTechMode,
    /// Maximum control/data packet payload size the NFCC will send on this interface
    pub max_data_packet_payload_size: u8,
    /// Initial number of credits granted for this logical connection
    pub initial_number_of_credits: u8,
    /// Mode-specific parameter bytes, opaque to this crate
    pub mode_param: Bytes,
    /// Data rate from the DH to the Remote NFC Endpoint
    pub tx_bit_rate: u8,
    /// Data rate from the Remote NFC Endpoint to the DH
    pub rx_bit_rate: u8,
    /// Activation-specific parameter bytes, opaque to this crate
    pub activation_param: Bytes,
}

/// Parse `RF_INTF_ACTIVATED_NTF` (GID=1, OID=5)
pub fn parse_intf_activated_ntf(payload: &[u8]) -> Result<IntfActivationNtf, ParseError> {
    // discovery id, interface, protocol, mode, max data size, init credits, mode-param-len
    const HEADER_LEN: usize = 7;
    if payload.len() < HEADER_LEN {
        return Err(ParseError::Truncated { expected: HEADER_LEN, got: payload.len() });
    }
    let discovery_id = payload[0];
    let interface = RfInterface::from(payload[1]);
    let protocol = RfProtocol::from(payload[2]);
    let mode = RfTechMode::from(payload[3]);
    let max_data_packet_payload_size = payload[4];
    let initial_number_of_credits = payload[5];
    let mode_param_len = payload[6] as usize;

    let after_mode_param = HEADER_LEN + mode_param_len;
    // + tx rate + rx rate + activation-param-len
    let min_after_rates = after_mode_param + 3;
    if payload.len() < min_after_rates {
        return Err(ParseError::Truncated { expected: min_after_rates, got: payload.len() });
    }
    let mode_param = Bytes::copy_from_slice(&payload[HEADER_LEN..after_mode_param]);
    let tx_bit_rate = payload[after_mode_param];
    let rx_bit_rate = payload[after_mode_param + 1];
    let activation_param_len = payload[after_mode_param + 2] as usize;

    let activation_param_start = after_mode_param + 3;
    let expected = activation_param_start + activation_param_len;
    if payload.len() < expected {
        return Err(ParseError::Truncated { expected, got: payload.len() });
    }
    let activation_param =
        Bytes::copy_from_slice(&payload[activation_param_start..expected]);

    Ok(IntfActivationNtf {
        discovery_id,
        interface,
        protocol,
        mode,
        max_data_packet_payload_size,
        initial_number_of_credits,
        mode_param,
        tx_bit_rate,
        rx_bit_rate,
        activation_param,
    })
}

/// Parse `RF_DEACTIVATE_NTF` (GID=1, OID=6): returns (type, reason)
pub fn parse_deactivate_ntf(payload: &[u8]) -> Result<(DeactivationType, u8), ParseError> {
    if payload.len() < 2 {
        return Err(ParseError::Truncated { expected: 2, got: payload.len() });
    }
    Ok((DeactivationType::from(payload[0]), payload[1]))
}

/// Parse `CORE_GENERIC_ERROR_NTF` (GID=0, OID=7): returns the raw status byte
pub fn parse_generic_error_ntf(payload: &[u8]) -> Result<u8, ParseError> {
    if payload.len() != 1 {
        return Err(ParseError::UnsupportedLength { expected: 1, got: payload.len() });
    }
    Ok(payload[0])
}

/// Parse `CORE_INTERFACE_ERROR_NTF` (GID=0, OID=8): returns (status, conn_id)
pub fn parse_interface_error_ntf(payload: &[u8]) -> Result<(u8, u8), ParseError> {
    if payload.len() != 2 {
        return Err(ParseError::UnsupportedLength { expected: 2, got: payload.len() });
    }
    Ok((payload[0], payload[1]))
}

/// Serialize `RF_DISCOVER_SELECT_CMD` (GID=1, OID=4): {discovery id, protocol, interface}
pub fn serialize_discover_select_cmd(
    discovery_id: u8,
    protocol: RfProtocol,
    interface: RfInterface,
) -> Bytes {
    let mut buf = BytesMut::with_capacity(3);
    buf.put_u8(discovery_id);
    buf.put_u8(protocol.into());
    buf.put_u8(interface.into());
    buf.freeze()
}

/// Serialize `RF_DEACTIVATE_CMD` (GID=1, OID=6): {deactivation type}
pub fn serialize_deactivate_cmd(deactivation_type: DeactivationType) -> Bytes {
    Bytes::copy_from_slice(&[deactivation_type.into()])
}
