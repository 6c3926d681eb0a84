//! Core library for astracode
//!
//! This crate implements the **Functional Core** of the astracode application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`astracode_core`** (this crate): Pure transformation functions with zero I/O
//! - **`astracode`**: The completion API client, CLI, and web UI (the Imperative Shell)
//!
//! Every function here is deterministic and can be tested with plain fixture
//! strings. Nothing in this crate talks to the network or reads the
//! environment.
//!
//! # Module Organization
//!
//! - [`codegen`]: Prompt building, fence extraction, session state, the
//!   fallback policy, and the completion API wire types
//! - [`theme`]: Cosmetic color themes for the web UI
//!
//! # Example Usage
//!
//! ```rust
//! use astracode_core::codegen::{build_prompt, extract_code, GenerationRequest, Language};
//!
//! let request = GenerationRequest::new("a function to reverse a string", Language::Python)
//!     .with_keywords(["slicing"]);
//! let prompt = build_prompt(&request);
//! assert!(prompt.contains("reverse a string in Python."));
//!
//! let code = extract_code("```python\nprint('hi'[::-1])\n```", Language::Python).unwrap();
//! assert_eq!(code, "print('hi'[::-1])");
//! ```

pub mod codegen;
pub mod theme;
