//! Tests for the project context.
