//! Local key-value persistence.
//!
//! # Responsibility
//! - Offer a string key to string value store shaped like the mobile
//!   platform's async storage (`get_item` / `set_item` / `remove_item`).
//! - Keep SQL details behind the `KeyValueStore` contract.

pub mod kv;
