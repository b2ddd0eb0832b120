//! Tests for the membership context.

mod application_service_tests;
mod invitation_service_tests;
