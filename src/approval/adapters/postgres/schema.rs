//! Diesel schema for approval persistence and telemetry.

diesel::table! {
    /// Task aggregates under approval.
    approval_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Identity that created the task.
        #[max_length = 255]
        initiator_login -> Varchar,
        /// Ordered approver logins as a JSON array.
        approval_logins -> Jsonb,
        /// Zero-based position of the awaited approver.
        current_approval_number -> Int4,
        /// Approval status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Start and end marks of task and approver windows.
    task_timestamps (id) {
        /// Surrogate key.
        id -> Int8,
        /// Task the mark belongs to.
        task_id -> Uuid,
        /// Approver whose window is marked, if any.
        #[max_length = 255]
        approver -> Nullable<Varchar>,
        /// Window kind (`task` or `approve`).
        #[max_length = 20]
        event_type -> Varchar,
        /// Window start.
        start_time -> Nullable<Timestamptz>,
        /// Window end.
        end_time -> Nullable<Timestamptz>,
        /// Time the mark was written.
        recorded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Final outcomes of tasks.
    task_results (id) {
        /// Surrogate key.
        id -> Int8,
        /// Task that reached a terminal status.
        task_id -> Uuid,
        /// `true` when approved.
        approved -> Bool,
        /// Time the outcome was written.
        recorded_at -> Timestamptz,
    }
}
