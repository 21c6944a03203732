//! Shared utilities for the Presensi backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token generation and fingerprinting
//! - Password hashing with Argon2id
//! - Lecturer JWTs
//! - Validation helpers and datetime parsing

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod time;
pub mod validation;
