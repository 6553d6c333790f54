//! mixgen - template-driven Go code generation
//!
//! A Go type opts into generated code by embedding a type whose name matches
//! a `<Name>.tmpl` file in its package directory. Every such pairing is
//! rendered with Tera and the results are merged into one generated file per
//! package.
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;
