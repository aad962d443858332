//! Integration tests for matdispatch.
//!
//! End-to-end cases that start real coordinator and worker servers on
//! ephemeral ports and talk to them over HTTP.

mod cases_liveness_test;

pub mod support;
