//! Domain-level command and result types.
//!
//! These structs are used by the schedule service and are **not** exposed on
//! the wire. The REST and RPC adapters map the DTOs of the `shared` crate to
//! and from these types.

pub mod schedules {
    /// Input for creating a new schedule.
    #[derive(Debug, Clone)]
    pub struct CreateScheduleCommand {
        pub medicine_name: String,
        pub frequency: i64,
        pub duration: i64,
        pub user_id: i64,
    }

    /// A stored schedule formatted for presentation.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ScheduleView {
        pub id: i64,
        pub medicine_name: String,
        /// "DD Mon YYYY"
        pub start_date: String,
        /// "DD Mon YYYY" or "infinite"
        pub end_date: String,
        pub user_id: i64,
        /// "HH:MM", ascending
        pub taking_times: Vec<String>,
    }

    /// A dose due within the lookahead interval.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TakingView {
        pub medicine_name: String,
        /// "HH:MM"
        pub taking_time: String,
    }
}
