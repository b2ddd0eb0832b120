//! Tests for the message context.
