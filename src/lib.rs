//! Concierge chatbot and staff payroll service for a hotel chain.
//!
//! This crate answers guest questions arriving over a messaging webhook from
//! a knowledge base of hotels, rooms and FAQs, classifies questions from the
//! intake form, computes staff payroll with an audit trace and records
//! attendance check-ins.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod calculation;
pub mod concierge;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod llm;
pub mod messenger;
pub mod models;
pub mod store;
