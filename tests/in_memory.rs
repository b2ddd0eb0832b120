//! In-memory integration tests across the engines.
//!
//! Tests are organized into modules by functionality:
//! - `collaboration_flow_tests`: Recruitment, task execution, and rollup
//!   across one project's full life
//! - `removal_tests`: Participant removal and its task side effects
//! - `cascade_tests`: Project deletion across every dependent table

mod in_memory {
    pub mod helpers;

    mod cascade_tests;
    mod collaboration_flow_tests;
    mod removal_tests;
}
