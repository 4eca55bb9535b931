//! On-disk object framing
//!
//! This module contains the pure half of the object database: hashing the
//! framed `"<type> <len>\0" + payload` bytes and (de)compressing them.

pub mod codec;
