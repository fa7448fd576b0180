//! Test suite for the fake transport host.

mod support;
