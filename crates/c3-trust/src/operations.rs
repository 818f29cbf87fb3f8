//! Operation payloads carried by envelopes.
//!
//! Orders and delegations are packed with the codec behind a one-byte
//! operation tag. Cancellations are a plain concatenation of 32-byte order
//! ids, optionally followed by an 8-byte big-endian "cancel all before"
//! timestamp.

use bytes::Bytes;
use c3_trust_codec::{decode, encode, record, sha512_256, FieldDescriptor, Schema, Value};

use crate::error::{Result, TrustError};
use crate::fields;

/// Operation tag of an order payload.
pub const ORDER_TAG: u8 = 0x06;

/// Operation tag of a delegation payload.
pub const DELEGATION_TAG: u8 = 0x03;

const ORDER_ID_LEN: usize = 32;
const TIMESTAMP_LEN: usize = 8;

/// Decode a whole payload, rejecting trailing bytes.
fn decode_exact(bytes: &[u8], schema: &Schema, kind: &str) -> Result<c3_trust_codec::Record> {
    let (value, consumed) = decode(bytes, schema, 0)?;
    if consumed != bytes.len() {
        return Err(TrustError::InvalidOperation(format!(
            "{} trailing bytes after {kind}",
            bytes.len() - consumed
        )));
    }
    Ok(value)
}

/// A limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Order {
    /// Venue public key of the trading account.
    pub account: [u8; 32],
    pub nonce: u64,
    pub expires_on: u64,
    pub sell_slot_id: u8,
    pub sell_amount: u64,
    pub max_borrow: u64,
    pub buy_slot_id: u8,
    pub buy_amount: u64,
    pub max_repay: u64,
}

impl Order {
    pub fn schema() -> Schema {
        Schema::new()
            .field("operation", FieldDescriptor::literal([ORDER_TAG]))
            .field("account", FieldDescriptor::FixedAddress)
            .field("nonce", FieldDescriptor::uint())
            .field("expiresOn", FieldDescriptor::uint())
            .field("sellSlotId", FieldDescriptor::Byte)
            .field("sellAmount", FieldDescriptor::uint())
            .field("maxBorrow", FieldDescriptor::uint())
            .field("buySlotId", FieldDescriptor::Byte)
            .field("buyAmount", FieldDescriptor::uint())
            .field("maxRepay", FieldDescriptor::uint())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let value = record([
            ("account", Value::Address(self.account)),
            ("nonce", Value::UInt(self.nonce)),
            ("expiresOn", Value::UInt(self.expires_on)),
            ("sellSlotId", Value::from(self.sell_slot_id)),
            ("sellAmount", Value::UInt(self.sell_amount)),
            ("maxBorrow", Value::UInt(self.max_borrow)),
            ("buySlotId", Value::from(self.buy_slot_id)),
            ("buyAmount", Value::UInt(self.buy_amount)),
            ("maxRepay", Value::UInt(self.max_repay)),
        ]);
        Ok(encode(&value, &Self::schema())?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let value = decode_exact(bytes, &Self::schema(), "order")?;
        Ok(Self {
            account: fields::address(&value, "account")?,
            nonce: fields::uint(&value, "nonce")?,
            expires_on: fields::uint(&value, "expiresOn")?,
            sell_slot_id: fields::byte(&value, "sellSlotId")?,
            sell_amount: fields::uint(&value, "sellAmount")?,
            max_borrow: fields::uint(&value, "maxBorrow")?,
            buy_slot_id: fields::byte(&value, "buySlotId")?,
            buy_amount: fields::uint(&value, "buyAmount")?,
            max_repay: fields::uint(&value, "maxRepay")?,
        })
    }

    /// The order id a cancellation refers to: SHA-512/256 of the payload.
    pub fn id(&self) -> Result<[u8; 32]> {
        Ok(sha512_256(&self.encode()?))
    }
}

/// A grant letting `delegate` sign on the account's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delegation {
    pub delegate: [u8; 32],
    pub nonce: u64,
    pub expiration: u64,
}

impl Delegation {
    pub fn schema() -> Schema {
        Schema::new()
            .field("operation", FieldDescriptor::literal([DELEGATION_TAG]))
            .field("delegate", FieldDescriptor::FixedAddress)
            .field("nonce", FieldDescriptor::uint())
            .field("expiration", FieldDescriptor::uint())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let value = record([
            ("delegate", Value::Address(self.delegate)),
            ("nonce", Value::UInt(self.nonce)),
            ("expiration", Value::UInt(self.expiration)),
        ]);
        Ok(encode(&value, &Self::schema())?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let value = decode_exact(bytes, &Self::schema(), "delegation")?;
        Ok(Self {
            delegate: fields::address(&value, "delegate")?,
            nonce: fields::uint(&value, "nonce")?,
            expiration: fields::uint(&value, "expiration")?,
        })
    }
}

/// Cancellation of specific orders and, optionally, of every order placed
/// before a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cancellation {
    pub order_ids: Vec<[u8; 32]>,
    pub cancel_all_before: Option<u64>,
}

impl Cancellation {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.order_ids.len() * ORDER_ID_LEN + TIMESTAMP_LEN);
        for id in &self.order_ids {
            buf.extend_from_slice(id);
        }
        if let Some(ts) = self.cancel_all_before {
            buf.extend_from_slice(&ts.to_be_bytes());
        }
        buf
    }

    /// Parse a cancellation. A length of `32n + 8` carries a timestamp,
    /// `32n` does not.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (ids, cancel_all_before) = match bytes.len() % ORDER_ID_LEN {
            0 => (bytes, None),
            TIMESTAMP_LEN => {
                let (ids, ts) = bytes.split_at(bytes.len() - TIMESTAMP_LEN);
                let mut raw = [0u8; TIMESTAMP_LEN];
                raw.copy_from_slice(ts);
                (ids, Some(u64::from_be_bytes(raw)))
            }
            _ => {
                return Err(TrustError::InvalidOperation(format!(
                    "cancellation length {} is not 32n or 32n + 8",
                    bytes.len()
                )))
            }
        };

        let order_ids = ids
            .chunks_exact(ORDER_ID_LEN)
            .map(|chunk| {
                let mut id = [0u8; ORDER_ID_LEN];
                id.copy_from_slice(chunk);
                id
            })
            .collect();
        Ok(Self {
            order_ids,
            cancel_all_before,
        })
    }
}

/// The kind of an operation payload.
///
/// Cancellations carry no tag, so the kind cannot be recovered from the
/// bytes alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Order,
    Delegation,
    Cancellation,
}

/// Any operation an envelope can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Order(Order),
    Delegation(Delegation),
    Cancellation(Cancellation),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Order(_) => OperationKind::Order,
            Operation::Delegation(_) => OperationKind::Delegation,
            Operation::Cancellation(_) => OperationKind::Cancellation,
        }
    }

    /// The operation bytes to place in an envelope.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let bytes = match self {
            Operation::Order(order) => order.encode()?,
            Operation::Delegation(delegation) => delegation.encode()?,
            Operation::Cancellation(cancellation) => cancellation.encode(),
        };
        Ok(Bytes::from(bytes))
    }

    pub fn decode(kind: OperationKind, bytes: &[u8]) -> Result<Self> {
        Ok(match kind {
            OperationKind::Order => Operation::Order(Order::decode(bytes)?),
            OperationKind::Delegation => Operation::Delegation(Delegation::decode(bytes)?),
            OperationKind::Cancellation => Operation::Cancellation(Cancellation::decode(bytes)?),
        })
    }
}

impl From<Order> for Operation {
    fn from(order: Order) -> Self {
        Operation::Order(order)
    }
}

impl From<Delegation> for Operation {
    fn from(delegation: Delegation) -> Self {
        Operation::Delegation(delegation)
    }
}

impl From<Cancellation> for Operation {
    fn from(cancellation: Cancellation) -> Self {
        Operation::Cancellation(cancellation)
    }
}
