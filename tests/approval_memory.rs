//! In-memory approval workflow integration tests.
//!
//! - `storage_tests`: storage contract of the in-memory adapter
//! - `approval_flow_tests`: complete approval, decline, reopen and delete flows
//! - `reporting_tests`: outcome and duration reports after those flows

mod approval_memory {
    pub mod helpers;

    mod approval_flow_tests;
    mod reporting_tests;
    mod storage_tests;
}
