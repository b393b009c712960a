//! Shared vocabulary for the BoostPass issuance engine.
//!
//! Holds the account address codec and the scalar type aliases used across
//! the workspace. No engine logic lives here.

pub mod address;
pub mod scalars;

pub use address::{
    decode_address, encode_address, is_valid_address, Address, AddressError, ADDRESS_BYTES,
    ADDRESS_STRING_LENGTH,
};
pub use scalars::{Amount, ItemId, Quantity, TierId, Timestamp, FIRST_ITEM_ID, FIRST_TIER_ID};
